//! Corpus metadata file.
//!
//! The metadata file is a `key: value` document owned by the user. The index
//! engine reads it but only ever rewrites the single `updated:` line.

use crate::error::KegError;
use crate::store::persistence::write_atomic;
use crate::types::format_timestamp;
use chrono::{DateTime, Utc};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

fn compile_regex(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(_compile_err) => match Regex::new(r"$^") {
            Ok(never) => never,
            Err(_) => unreachable!("empty-match pattern always compiles"),
        },
    }
}

static UPDATED_LINE: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"(?m)^updated:.*$"));

/// Parse the metadata file into a field map.
pub fn read_meta(path: &Path) -> Result<BTreeMap<String, serde_yaml::Value>, KegError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            KegError::not_found(path)
        } else {
            KegError::io(path, e)
        }
    })?;
    if text.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    serde_yaml::from_str(&text).map_err(|e| {
        KegError::ConfigError(format!("Invalid metadata file {}: {}", path.display(), e))
    })
}

/// Return `text` with its `updated:` line set to `ts`, appending the line
/// when the field is absent. Everything else is left byte-for-byte intact.
pub fn substitute_updated(text: &str, ts: &DateTime<Utc>) -> String {
    let line = format!("updated: {}", format_timestamp(ts));
    if UPDATED_LINE.is_match(text) {
        return UPDATED_LINE
            .replace(text, regex::NoExpand(&line))
            .into_owned();
    }
    let mut out = String::with_capacity(text.len() + line.len() + 1);
    out.push_str(text);
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
    out.push_str(&line);
    out.push('\n');
    out
}

/// Rewrite the `updated:` field of the metadata file at `path`.
///
/// Returns false without writing when the metadata file does not exist;
/// a corpus without one is still indexable.
pub fn set_updated(path: &Path, ts: &DateTime<Utc>) -> Result<bool, KegError> {
    let text = match std::fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("no metadata file at {}, skipping updated field", path.display());
            return Ok(false);
        }
        Err(e) => return Err(KegError::io(path, e)),
    };
    let updated = substitute_updated(&text, ts);
    if updated != text {
        write_atomic(path, updated.as_bytes())?;
    }
    Ok(true)
}

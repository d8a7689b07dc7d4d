//! Index Codec
//!
//! Textual forms of a [`Dex`]:
//!
//! - change log, most recent first, one markdown list item per entry:
//!   `* 2022-12-10 06:10:04Z [Some title](../2)`
//! - tabular file, ascending by id, tab separated:
//!   `2\t2022-12-10 06:10:04Z\tSome title`
//!
//! The change log round-trips through [`DexCodec::parse_changes`]; the tabular
//! form is write-only output for external tools. Both serializers drop
//! repeated identifiers and otherwise keep the order they are given.

use crate::dex::{Dex, DexEntry};
use crate::error::KegError;
use crate::types::{format_timestamp, parse_node_id, parse_timestamp};
use regex::Regex;

/// Encoder/decoder bound to one link prefix.
#[derive(Debug, Clone)]
pub struct DexCodec {
    link_prefix: String,
    line: Regex,
}

impl DexCodec {
    pub fn new(link_prefix: impl Into<String>) -> Result<Self, KegError> {
        let link_prefix = link_prefix.into();
        let pattern = format!(
            r"^\* (\d{{4}}-\d{{2}}-\d{{2}} \d{{2}}:\d{{2}}:\d{{2}}Z) \[(.*)\]\({}(\d+)\)$",
            regex::escape(&link_prefix)
        );
        let line = Regex::new(&pattern).map_err(|e| {
            KegError::ConfigError(format!("Invalid link prefix {:?}: {}", link_prefix, e))
        })?;
        Ok(Self { link_prefix, line })
    }

    pub fn link_prefix(&self) -> &str {
        &self.link_prefix
    }

    /// One change-log line, without the trailing newline.
    pub fn changes_line(&self, entry: &DexEntry) -> String {
        format!(
            "* {} [{}]({}{})",
            format_timestamp(&entry.updated),
            entry.title,
            self.link_prefix,
            entry.id
        )
    }

    /// Render the change log in the order given.
    pub fn serialize_changes(&self, dex: &Dex) -> String {
        let mut unique = dex.clone();
        unique.dedup();
        let mut out = String::new();
        for entry in unique.iter() {
            out.push_str(&self.changes_line(entry));
            out.push('\n');
        }
        out
    }

    /// Render the tabular file in the order given.
    pub fn serialize_tsv(&self, dex: &Dex) -> String {
        let mut unique = dex.clone();
        unique.dedup();
        let mut out = String::new();
        for entry in unique.iter() {
            out.push_str(&entry.to_string());
            out.push('\n');
        }
        out
    }

    /// Parse a change log. Every line must be an entry; the first line that
    /// is not fails the whole parse with its 1-based line number.
    pub fn parse_changes(&self, text: &str) -> Result<Dex, KegError> {
        let mut dex = Dex::new();
        for (index, line) in text.lines().enumerate() {
            let entry = self.parse_line(line).ok_or_else(|| KegError::MalformedIndexLine {
                line: index + 1,
                content: line.to_string(),
            })?;
            dex.push(entry);
        }
        Ok(dex)
    }

    fn parse_line(&self, line: &str) -> Option<DexEntry> {
        let caps = self.line.captures(line)?;
        let updated = parse_timestamp(caps.get(1)?.as_str())?;
        let title = caps.get(2)?.as_str();
        let id = parse_node_id(caps.get(3)?.as_str()).ok()?;
        Some(DexEntry::new(id, title, updated))
    }
}

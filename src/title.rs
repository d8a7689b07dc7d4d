//! Title Grammar
//!
//! Extracts the node title from the first line of a content file:
//!
//! ```text
//! Title <-- '#' SP <(printable){1,70}> (CR? LF / EOF)
//! ```
//!
//! The scan is single pass and only ever looks at the first line. Overlong
//! titles fail rather than truncate, and titles carrying the change-log link
//! delimiter `](` are refused here so the index grammar can never be broken
//! by node content.

use crate::error::KegError;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Maximum title length in code points
pub const MAX_TITLE_CHARS: usize = 70;

/// Upper bound on bytes read from a content file: `# `, 70 four-byte
/// code points, and a CRLF.
const MAX_TITLE_LINE_BYTES: u64 = 2 + (MAX_TITLE_CHARS as u64) * 4 + 2;

/// Why a title scan failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TitleError {
    #[error("content does not begin with \"# \"")]
    MissingPrefix,
    #[error("title is empty")]
    Empty,
    #[error("title exceeds {} characters (starts {partial:?})", MAX_TITLE_CHARS)]
    TooLong { partial: String },
    #[error("title contains unprintable character {0:?}")]
    Unprintable(char),
    #[error("title contains link markup \"](\"")]
    LinkMarkup,
}

fn is_title_char(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    if c.is_control() || c.is_whitespace() {
        return false;
    }
    !matches!(
        c,
        '\u{00AD}' | '\u{200B}'..='\u{200F}' | '\u{2060}' | '\u{FEFF}'
    )
}

/// Scan a title from the beginning of `content`.
pub fn scan_title(content: &str) -> Result<String, TitleError> {
    let body = content.strip_prefix("# ").ok_or(TitleError::MissingPrefix)?;

    let mut title = String::with_capacity(MAX_TITLE_CHARS);
    let mut count = 0usize;
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\n' || (c == '\r' && chars.peek() == Some(&'\n')) {
            break;
        }
        if count == MAX_TITLE_CHARS {
            return Err(TitleError::TooLong { partial: title });
        }
        if !is_title_char(c) {
            return Err(TitleError::Unprintable(c));
        }
        title.push(c);
        count += 1;
    }

    if title.is_empty() {
        return Err(TitleError::Empty);
    }
    if title.contains("](") {
        return Err(TitleError::LinkMarkup);
    }
    Ok(title)
}

/// Read and scan the title of a content file.
///
/// Only the bounded first-line prefix is read. A multi-byte character cut by
/// the bound can only sit past the 70th code point, so the lossy decode never
/// changes an accepted title.
pub fn read_title(path: &Path) -> Result<String, KegError> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            KegError::not_found(path)
        } else {
            KegError::io(path, e)
        }
    })?;
    let mut buf = Vec::with_capacity(MAX_TITLE_LINE_BYTES as usize);
    file.take(MAX_TITLE_LINE_BYTES)
        .read_to_end(&mut buf)
        .map_err(|e| KegError::io(path, e))?;
    let prefix = String::from_utf8_lossy(&buf);
    scan_title(&prefix).map_err(|reason| KegError::TitleGrammarFailed {
        path: path.to_path_buf(),
        reason,
    })
}

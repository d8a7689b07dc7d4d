//! Error types for the index engine.

use crate::title::TitleError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors surfaced by corpus, index, and tag operations.
#[derive(Debug, Error)]
pub enum KegError {
    /// Corpus root, node directory, or index file is absent
    #[error("not found: {0}")]
    NotFound(String),

    /// A change-log line does not match the entry grammar
    #[error("bad line {line} in change log: {content:?}")]
    MalformedIndexLine { line: usize, content: String },

    /// Directory name or argument is not a non-negative integer
    #[error("invalid node id: {0:?}")]
    InvalidIdentifier(String),

    /// No next identifier could be determined
    #[error("could not determine next node id: {0}")]
    AllocationFailed(String),

    /// The content file does not begin with a valid title line
    #[error("invalid title in {}: {reason}", path.display())]
    TitleGrammarFailed { path: PathBuf, reason: TitleError },

    /// Tag name is not a single whitespace-free token
    #[error("invalid tag: {0:?}")]
    InvalidTag(String),

    #[error("io error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl KegError {
    /// Wrap an io error with the path it occurred at.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        KegError::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn not_found(path: impl AsRef<Path>) -> Self {
        KegError::NotFound(path.as_ref().display().to_string())
    }
}

impl From<config::ConfigError> for KegError {
    fn from(err: config::ConfigError) -> Self {
        KegError::ConfigError(err.to_string())
    }
}

//! ConfigLoader facade delegating to merge service.

use super::merge::service::MergeService;
use super::KegConfig;
use crate::error::KegError;
use std::path::Path;

/// Configuration loader facade.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from the global file and environment.
    pub fn load() -> Result<KegConfig, KegError> {
        Ok(MergeService::load()?)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<KegConfig, KegError> {
        Ok(MergeService::load_from_file(path)?)
    }

    /// Load from `path` when given, otherwise from standard sources.
    pub fn load_or_default(path: Option<&Path>) -> Result<KegConfig, KegError> {
        match path {
            Some(p) => Self::load_from_file(p),
            None => Self::load(),
        }
    }
}

//! Resolution of the current corpus root.

use super::paths::expand_tilde;
use super::KegConfig;
use crate::corpus::Corpus;
use crate::error::KegError;
use std::path::PathBuf;

/// Resolves which corpus the caller operates on.
pub trait CorpusResolver {
    fn resolve(&self) -> Result<Corpus, KegError>;
}

/// Resolves through `current` and the `corpora` map of a [`KegConfig`].
pub struct ConfigCorpusResolver {
    config: KegConfig,
}

impl ConfigCorpusResolver {
    pub fn new(config: KegConfig) -> Self {
        Self { config }
    }
}

impl CorpusResolver for ConfigCorpusResolver {
    fn resolve(&self) -> Result<Corpus, KegError> {
        let name = self
            .config
            .current
            .as_deref()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| KegError::NotFound("no current corpus set".to_string()))?;
        // the config crate lowercases table keys but not string values
        let root = self
            .config
            .corpora
            .get(name)
            .or_else(|| {
                self.config
                    .corpora
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(name))
                    .map(|(_, root)| root)
            })
            .ok_or_else(|| KegError::NotFound(format!("corpus {:?} is not mapped", name)))?;
        Corpus::open(expand_tilde(root), self.config.layout.clone())
    }
}

/// Resolves to an explicit root, e.g. one given on the command line.
pub struct FixedCorpusResolver {
    root: PathBuf,
    config: KegConfig,
}

impl FixedCorpusResolver {
    pub fn new(root: PathBuf, config: KegConfig) -> Self {
        Self { root, config }
    }
}

impl CorpusResolver for FixedCorpusResolver {
    fn resolve(&self) -> Result<Corpus, KegError> {
        Corpus::open(expand_tilde(&self.root), self.config.layout.clone())
    }
}

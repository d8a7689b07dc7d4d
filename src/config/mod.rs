//! Configuration
//!
//! Layered configuration for the index engine: named corpora, the current
//! corpus, on-disk layout, rebuild behavior, and logging.

mod facade;
mod layout;
pub mod merge;
pub mod paths;
mod resolve;
pub mod sources;

pub use facade::ConfigLoader;
pub use layout::CorpusLayout;
pub use resolve::{ConfigCorpusResolver, CorpusResolver, FixedCorpusResolver};

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

fn default_true() -> bool {
    true
}

/// Rebuild configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebuildConfig {
    /// Inspect node directories on the rayon pool
    #[serde(default = "default_true")]
    pub parallel: bool,
}

impl Default for RebuildConfig {
    fn default() -> Self {
        Self { parallel: true }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KegConfig {
    /// Name of the current corpus (key into `corpora`)
    #[serde(default)]
    pub current: Option<String>,

    /// Corpus name to root directory; `~` is expanded on resolution
    #[serde(default)]
    pub corpora: BTreeMap<String, PathBuf>,

    #[serde(default)]
    pub layout: CorpusLayout,

    #[serde(default)]
    pub rebuild: RebuildConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

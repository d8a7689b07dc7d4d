//! MergeService: orchestrates sources, applies merge policy, deserializes to KegConfig.

use crate::config::sources::{environment, global_file};
use crate::config::KegConfig;
use config::{ConfigError, File, FileFormat};
use std::path::Path;

use super::merge_policy;

/// Merge service for config composition.
pub struct MergeService;

impl MergeService {
    /// Load config from standard sources.
    /// Precedence: global file (lowest) -> environment (highest).
    pub fn load() -> Result<KegConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = environment::add_to_builder(builder)?;

        builder.build()?.try_deserialize()
    }

    /// Load config from a specific file with environment overlay.
    /// The global file is skipped so the explicit file is authoritative.
    pub fn load_from_file(path: &Path) -> Result<KegConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = builder.add_source(
            File::from(path)
                .format(FileFormat::Toml)
                .required(true),
        );
        let builder = environment::add_to_builder(builder)?;

        builder.build()?.try_deserialize()
    }
}

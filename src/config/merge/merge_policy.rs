//! Baseline builder carrying defaults that serde defaults cannot express.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder().set_default("rebuild.parallel", true)
}

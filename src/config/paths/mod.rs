//! Platform path resolution for configuration.

pub mod xdg_root;

pub use xdg_root::{config_home, expand_tilde, global_config_path};

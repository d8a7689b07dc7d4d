//! Logging System
//!
//! Structured logging using the `tracing` crate. Level, format, and
//! destination come from the `[logging]` config table, overridden by the
//! `KEGDEX_LOG*` environment variables.

use crate::error::KegError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

const ENV_FILTER: &str = "KEGDEX_LOG";
const ENV_FORMAT: &str = "KEGDEX_LOG_FORMAT";
const ENV_OUTPUT: &str = "KEGDEX_LOG_OUTPUT";
const ENV_MODULES: &str = "KEGDEX_LOG_MODULES";
const ENV_FILE: &str = "KEGDEX_LOG_FILE";

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether logging is enabled (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file, file+stderr, both
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path when output includes file; None uses the state directory
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Colored text output on terminals
    #[serde(default = "default_true")]
    pub color: bool,

    /// Per-module levels, e.g. `kegdex::dex = "debug"`
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
            modules: HashMap::new(),
        }
    }
}

/// Resolve the log file path: explicit path, then `KEGDEX_LOG_FILE`, then
/// config, then `kegdex.log` in the platform state directory.
pub fn resolve_log_file_path(
    explicit: Option<PathBuf>,
    config_file: Option<PathBuf>,
) -> Result<PathBuf, KegError> {
    let env_file = std::env::var(ENV_FILE).ok().map(PathBuf::from);
    if let Some(path) = [explicit, env_file, config_file]
        .into_iter()
        .flatten()
        .find(|p| !p.as_os_str().is_empty())
    {
        return Ok(path);
    }

    let dirs = directories::ProjectDirs::from("", "kegdex", "kegdex").ok_or_else(|| {
        KegError::ConfigError("Could not determine platform directories for log file".to_string())
    })?;
    // state_dir is Linux-only; elsewhere fall back to local data
    let dir = dirs
        .state_dir()
        .unwrap_or_else(|| dirs.data_local_dir())
        .to_path_buf();
    Ok(dir.join("kegdex.log"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Text,
    Json,
}

/// Output destinations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Destinations {
    stdout: bool,
    stderr: bool,
    file: bool,
}

/// Initialize the global subscriber.
///
/// Environment variables take precedence over `config`; `None` uses
/// defaults. Fails if a subscriber is already installed.
pub fn init_logging(config: Option<&LoggingConfig>) -> Result<(), KegError> {
    let defaults = LoggingConfig::default();
    let config = config.unwrap_or(&defaults);

    if !config.enabled {
        Registry::default()
            .with(EnvFilter::new("off"))
            .try_init()
            .map_err(|e| KegError::ConfigError(format!("Failed to install logger: {}", e)))?;
        return Ok(());
    }

    let filter = build_env_filter(config)?;
    let format = determine_format(config)?;
    let destinations = determine_output(config)?;
    let writer = build_writer(destinations, config)?;
    // ANSI codes only make sense on a terminal stream
    let ansi = config.color && !destinations.file;

    let registry = Registry::default().with(filter);
    let installed = match format {
        Format::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(writer),
            )
            .try_init(),
        Format::Text => registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(ansi)
                    .with_writer(writer),
            )
            .try_init(),
    };
    installed.map_err(|e| KegError::ConfigError(format!("Failed to install logger: {}", e)))
}

fn build_writer(
    destinations: Destinations,
    config: &LoggingConfig,
) -> Result<BoxMakeWriter, KegError> {
    let writer = match destinations {
        Destinations {
            file: true,
            stderr: true,
            ..
        } => BoxMakeWriter::new(open_log_file(config)?.and(std::io::stderr)),
        Destinations { file: true, .. } => BoxMakeWriter::new(open_log_file(config)?),
        Destinations {
            stdout: true,
            stderr: true,
            ..
        } => BoxMakeWriter::new(std::io::stdout.and(std::io::stderr)),
        Destinations { stdout: true, .. } => BoxMakeWriter::new(std::io::stdout),
        _ => BoxMakeWriter::new(std::io::stderr),
    };
    Ok(writer)
}

fn open_log_file(config: &LoggingConfig) -> Result<Mutex<File>, KegError> {
    let path = resolve_log_file_path(None, config.file.clone())?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| KegError::io(parent, e))?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map(Mutex::new)
        .map_err(|e| KegError::io(&path, e))
}

fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, KegError> {
    if let Ok(filter) = EnvFilter::try_from_env(ENV_FILTER) {
        return Ok(filter);
    }
    if config.level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut directives: Vec<String> = config
        .modules
        .iter()
        .map(|(module, level)| format!("{}={}", module, level))
        .collect();
    if let Ok(modules) = std::env::var(ENV_MODULES) {
        directives.extend(
            modules
                .split(',')
                .filter_map(|spec| spec.split_once('='))
                .map(|(module, level)| format!("{}={}", module.trim(), level.trim())),
        );
    }

    let mut filter = EnvFilter::new(&config.level);
    for directive in directives {
        let parsed = directive.parse().map_err(|e| {
            KegError::ConfigError(format!("Invalid log directive {:?}: {}", directive, e))
        })?;
        filter = filter.add_directive(parsed);
    }
    Ok(filter)
}

fn determine_format(config: &LoggingConfig) -> Result<Format, KegError> {
    let format = std::env::var(ENV_FORMAT).unwrap_or_else(|_| config.format.clone());
    parse_format(&format)
}

fn parse_format(format: &str) -> Result<Format, KegError> {
    match format {
        "text" => Ok(Format::Text),
        "json" => Ok(Format::Json),
        other => Err(KegError::ConfigError(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            other
        ))),
    }
}

fn determine_output(config: &LoggingConfig) -> Result<Destinations, KegError> {
    let output = std::env::var(ENV_OUTPUT).unwrap_or_else(|_| config.output.clone());
    parse_output_destinations(&output)
}

fn parse_output_destinations(output: &str) -> Result<Destinations, KegError> {
    let (stdout, stderr, file) = match output {
        "stdout" => (true, false, false),
        "stderr" => (false, true, false),
        "file" => (false, false, true),
        "file+stderr" => (false, true, true),
        "both" => (true, true, false),
        other => {
            return Err(KegError::ConfigError(format!(
                "Invalid log output: {} (must be 'stdout', 'stderr', 'file', 'file+stderr', or 'both')",
                other
            )))
        }
    };
    Ok(Destinations {
        stdout,
        stderr,
        file,
    })
}

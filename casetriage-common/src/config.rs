//! Configuration loading and input resolution
//!
//! A TOML file is optional. When it is absent every field falls back to its
//! default, and the caller is expected to keep running.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "CASETRIAGE_CONFIG";

/// Environment variable naming the input file
pub const INPUT_ENV_VAR: &str = "CASETRIAGE_INPUT";

/// Top-level TOML configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Input file to ingest when none is given on the command line
    pub input: Option<PathBuf>,
    /// Candidate locations probed in order when no input is named anywhere
    pub search_paths: Vec<PathBuf>,
    /// Logging configuration
    pub logging: LoggingConfig,
    /// Ingestion overrides
    pub ingest: IngestSection,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `casetriage_ingest=debug`
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// `[ingest]` table; unset keys keep the ingest crate's defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestSection {
    pub date_format: Option<String>,
    pub fallback_encodings: Option<Vec<String>>,
    pub na_tokens: Option<Vec<String>>,
    pub join_delimiter: Option<String>,
    pub parallel_threshold: Option<usize>,
}

/// Platform config file location (`<config_dir>/casetriage/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("casetriage").join("config.toml"))
}

/// Resolve which config file to read
///
/// Priority order:
/// 1. Command-line argument
/// 2. `CASETRIAGE_CONFIG` environment variable
/// 3. Platform default location
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    default_config_path()
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse TOML failed for {}: {}", path.display(), e)))
}

/// Load the config file if it exists, defaults otherwise
///
/// A missing file is a warning, not an error. A file that exists but does not
/// parse is an error.
pub fn load_config(path: Option<&Path>) -> Result<TomlConfig> {
    let Some(path) = path else {
        debug!("No config location available, using defaults");
        return Ok(TomlConfig::default());
    };

    if !path.exists() {
        warn!(path = %path.display(), "Config file not found, using defaults");
        return Ok(TomlConfig::default());
    }

    let config = load_toml_config(path)?;
    debug!(path = %path.display(), "Loaded config file");
    Ok(config)
}

/// Resolve an explicitly named input file
///
/// Priority order:
/// 1. Command-line argument
/// 2. `CASETRIAGE_INPUT` environment variable
/// 3. `input` key of the TOML config
///
/// Returns `None` when nothing names an input; callers then fall back to
/// probing `search_paths`.
pub fn resolve_input_path(cli_arg: Option<&Path>, config: &TomlConfig) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(INPUT_ENV_VAR) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    config.input.clone()
}

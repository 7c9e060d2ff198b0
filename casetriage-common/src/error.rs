//! Error type for configuration and shared helpers

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised by casetriage-common
#[derive(Error, Debug)]
pub enum Error {
    /// Config file exists but could not be read
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config file was read but is not valid TOML for [`crate::config::TomlConfig`]
    #[error("Configuration error: {0}")]
    Config(String),
}

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or writing configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read or written
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`crate::QuireConfig`]
    #[error("Failed to parse {path}: {source}")]
    Parse {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: toml::de::Error,
    },

    /// An override carried a value that does not parse
    #[error("Invalid value for {key}: {value:?}")]
    InvalidValue {
        /// Setting or variable name
        key: String,
        /// Rejected value
        value: String,
    },

    /// A path was expected but none could be determined
    #[error("Could not determine {0}")]
    MissingPath(&'static str),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{AncestorTracking, ConfigError, ConfigResult, LoggingConfig, RenderConfig, StoreConfig};

/// Environment variable naming the memo directory
pub const ENV_MEMOS_DIR: &str = "QUIRE_MEMOS_DIR";
/// Environment variable overriding `logging.level`
pub const ENV_LOG_LEVEL: &str = "QUIRE_LOG_LEVEL";
/// Environment variable overriding `store.fetch_timeout_ms`
pub const ENV_FETCH_TIMEOUT_MS: &str = "QUIRE_FETCH_TIMEOUT_MS";
/// Environment variable overriding `render.ancestor_tracking`
pub const ENV_ANCESTOR_TRACKING: &str = "QUIRE_ANCESTOR_TRACKING";
/// When set, the user config file is never read
pub const ENV_TEST_MODE: &str = "QUIRE_TEST_MODE";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuireConfig {
    /// Memo store settings
    pub store: StoreConfig,
    /// Render settings
    pub render: RenderConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

impl QuireConfig {
    /// Load configuration with precedence: defaults < file < env
    ///
    /// With `config_file` unset the default location is used if it exists.
    /// An explicitly given file must exist.
    pub fn load(config_file: Option<&Path>) -> ConfigResult<Self> {
        let mut config = Self::from_file_or_default(config_file)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a TOML document
    pub fn from_toml_str(source: &str, origin: &Path) -> ConfigResult<Self> {
        toml::from_str(source).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Read and parse a config file
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source, path)
    }

    /// Apply overrides looked up by variable name
    ///
    /// `lookup` is `std::env::var` in production; tests pass a map.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_MEMOS_DIR) {
            self.store.memos_dir = Some(PathBuf::from(dir));
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
        if let Some(timeout) = lookup(ENV_FETCH_TIMEOUT_MS) {
            self.store.fetch_timeout_ms =
                timeout.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    key: ENV_FETCH_TIMEOUT_MS.to_string(),
                    value: timeout.clone(),
                })?;
        }
        if let Some(mode) = lookup(ENV_ANCESTOR_TRACKING) {
            self.render.ancestor_tracking = mode.parse::<AncestorTracking>()?;
        }
        Ok(())
    }

    /// Default config file location, `~/.config/quire/config.toml` on Linux
    pub fn default_config_path() -> ConfigResult<PathBuf> {
        let dir = dirs::config_dir().ok_or(ConfigError::MissingPath("config directory"))?;
        Ok(dir.join("quire").join("config.toml"))
    }

    /// Serialize to TOML
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue {
            key: "config".to_string(),
            value: e.to_string(),
        })
    }

    /// Write a commented example config
    pub fn create_example(path: &Path) -> ConfigResult<()> {
        let example = r#"# Quire configuration
# Location: ~/.config/quire/config.toml

[store]
# Directory containing <uid>.md memo files
# Can also be set with QUIRE_MEMOS_DIR
# memos_dir = "/home/user/memos"

# Per-memo fetch timeout in milliseconds (0 = no timeout)
fetch_timeout_ms = 5000

[render]
# "path": reject a memo only while it is an ancestor of the embed
# "pass": reject any memo already embedded during this render
ancestor_tracking = "path"

# Derived snippets are cut to this many characters
snippet_length = 64

# Prefix for memo links (/m/<uid>)
link_base = ""

# Embeds one render may hold before the rest show an error (0 = no limit)
max_embeds = 1000

[logging]
# off, error, warn, info, debug, trace
level = "warn"
"#;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(path, example).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    fn from_file_or_default(config_file: Option<&Path>) -> ConfigResult<Self> {
        if let Some(path) = config_file {
            debug!(path = %path.display(), "loading config file");
            return Self::from_file(path);
        }

        if std::env::var_os(ENV_TEST_MODE).is_some() {
            return Ok(Self::default());
        }

        match Self::default_config_path() {
            Ok(path) if path.exists() => {
                debug!(path = %path.display(), "loading default config file");
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }
}

//! # Quire Configuration
//!
//! Type-safe configuration for the Quire workspace.
//!
//! Values are resolved with the precedence `defaults < file < environment`;
//! command-line overrides are applied on top by the binary.
//!
//! ```rust,no_run
//! use quire_config::QuireConfig;
//!
//! let config = QuireConfig::load(None)?;
//! println!("snippet length: {}", config.render.snippet_length);
//! # Ok::<(), quire_config::ConfigError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod components;
mod config;
mod error;

pub use components::*;
pub use config::*;
pub use error::{ConfigError, ConfigResult};

//! Render configuration
//!
//! Controls how embedded memos are tracked and presented.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// How the set of already-embedded memos is scoped during a render
///
/// - `Path`: a memo is rejected only while it sits on the current chain of
///   ancestors. Two sibling embeds of the same memo both render.
/// - `Pass`: every memo embedded anywhere in the render stays registered
///   until the render ends, so a sibling repeat is rejected as well.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AncestorTracking {
    /// Track the active ancestor chain only
    #[default]
    Path,
    /// Track every memo embedded during the render
    Pass,
}

impl AncestorTracking {
    /// Config-file spelling of this mode
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Pass => "pass",
        }
    }
}

impl fmt::Display for AncestorTracking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AncestorTracking {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "path" => Ok(Self::Path),
            "pass" => Ok(Self::Pass),
            other => Err(ConfigError::InvalidValue {
                key: "render.ancestor_tracking".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Render settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Scope of the embedded-memo set
    pub ancestor_tracking: AncestorTracking,

    /// Maximum characters of a derived snippet before it is cut with `...`
    pub snippet_length: usize,

    /// Prefix for memo links, e.g. `https://memos.example.com`
    pub link_base: String,

    /// Embeds a single render may hold, `0` disables the limit
    pub max_embeds: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            ancestor_tracking: AncestorTracking::default(),
            snippet_length: 64,
            link_base: String::new(),
            max_embeds: 1_000,
        }
    }
}

impl RenderConfig {
    /// Embed limit, `None` when disabled
    pub fn embed_limit(&self) -> Option<usize> {
        (self.max_embeds > 0).then_some(self.max_embeds)
    }
}

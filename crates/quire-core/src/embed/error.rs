use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an embed could not be rendered
///
/// These never abort a render; the renderer turns each into a visible
/// placeholder in place of the embed.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum EmbedError {
    /// No memo with this uid after the fetch completed
    #[error("Memo not found: {0}")]
    NotFound(String),

    /// The memo is the root or already embedded above this point
    #[error("Nested Rendering Error: ![[{0}]]")]
    NestedRendering(String),

    /// The directive names something other than a memo
    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    /// The render already holds as many embeds as it may
    #[error("Embed limit reached: ![[{0}]]")]
    EmbedLimit(String),
}

impl EmbedError {
    /// The uid or resource name the error is about
    pub fn target(&self) -> &str {
        match self {
            Self::NotFound(t)
            | Self::NestedRendering(t)
            | Self::UnknownResource(t)
            | Self::EmbedLimit(t) => t,
        }
    }
}

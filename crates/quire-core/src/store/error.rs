//! Store error types

use thiserror::Error;

/// Errors raised by a [`super::MemoSource`]
///
/// The renderer never shows these: a failed fetch resolves as "not found".
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Invalid frontmatter in {uid}: {message}")]
    Frontmatter { uid: String, message: String },

    #[error("Timeout error: fetch of {uid} timed out after {duration_ms}ms")]
    Timeout { uid: String, duration_ms: u64 },

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn backend<S: Into<String>>(msg: S) -> Self {
        Self::Backend(msg.into())
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

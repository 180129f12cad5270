//! Memo store configuration

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Where memos come from and how long a fetch may take
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Directory holding `<uid>.md` memo files
    pub memos_dir: Option<PathBuf>,

    /// Per-memo fetch timeout in milliseconds, `0` disables the timeout
    pub fetch_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            memos_dir: None,
            fetch_timeout_ms: 5_000,
        }
    }
}

impl StoreConfig {
    /// Fetch timeout as a [`Duration`], `None` when disabled
    pub fn fetch_timeout(&self) -> Option<Duration> {
        (self.fetch_timeout_ms > 0).then(|| Duration::from_millis(self.fetch_timeout_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_timeout_disables() {
        let config = StoreConfig {
            fetch_timeout_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.fetch_timeout(), None);
    }

    #[test]
    fn test_default_timeout() {
        assert_eq!(
            StoreConfig::default().fetch_timeout(),
            Some(Duration::from_secs(5))
        );
    }
}

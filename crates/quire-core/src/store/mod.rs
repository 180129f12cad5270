//! Memo store
//!
//! A [`MemoSource`] is where memos come from (a directory, a map, a remote
//! API). [`MemoStore`] sits in front of it as a shared cache that records the
//! load state of every uid:
//!
//! - absent from the cache: never requested
//! - [`LoadState::Pending`]: a fetch is in flight
//! - [`LoadState::Resolved`]: the fetch finished, with or without a memo
//!
//! A fetch that fails or times out resolves as absent. A fetch future that is
//! dropped before finishing removes its pending entry, so a cancelled render
//! leaves nothing behind.

mod directory;
mod error;
mod memory;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::memo::Memo;

pub use directory::DirectorySource;
pub use error::{StoreError, StoreResult};
pub use memory::InMemorySource;

/// Backend that can look a memo up by uid
#[async_trait]
pub trait MemoSource: Send + Sync {
    /// `Ok(None)` when no memo has this uid
    async fn fetch(&self, uid: &str) -> StoreResult<Option<Memo>>;

    /// Short label used in logs
    fn label(&self) -> &'static str {
        "memo-source"
    }
}

/// Load state of one uid
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Resolved(Option<Arc<Memo>>),
}

impl LoadState {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// The memo, when resolved and found
    pub fn memo(&self) -> Option<&Arc<Memo>> {
        match self {
            Self::Resolved(memo) => memo.as_ref(),
            Self::Pending => None,
        }
    }
}

/// Caching front of a [`MemoSource`]
pub struct MemoStore {
    source: Arc<dyn MemoSource>,
    cache: RwLock<HashMap<String, LoadState>>,
    fetch_timeout: Option<Duration>,
}

impl MemoStore {
    pub fn new(source: Arc<dyn MemoSource>) -> Self {
        Self {
            source,
            cache: RwLock::new(HashMap::new()),
            fetch_timeout: None,
        }
    }

    /// Builder-style: bound each fetch, `None` waits indefinitely
    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Cached memo, without fetching
    pub fn get_by_uid(&self, uid: &str) -> Option<Arc<Memo>> {
        self.cache.read().get(uid).and_then(LoadState::memo).cloned()
    }

    /// `None` when `uid` was never requested
    pub fn load_state(&self, uid: &str) -> Option<LoadState> {
        self.cache.read().get(uid).cloned()
    }

    /// Whether a found memo for `uid` is cached
    pub fn is_resident(&self, uid: &str) -> bool {
        self.get_by_uid(uid).is_some()
    }

    /// Seed the cache with a memo
    pub fn insert(&self, memo: Memo) -> Arc<Memo> {
        let memo = Arc::new(memo);
        self.cache
            .write()
            .insert(memo.uid.clone(), LoadState::Resolved(Some(Arc::clone(&memo))));
        memo
    }

    /// Forget `uid`; the next render fetches it again
    pub fn invalidate(&self, uid: &str) {
        self.cache.write().remove(uid);
    }

    pub fn clear(&self) {
        self.cache.write().clear();
    }

    /// Fetch `uid` from the source and record the outcome
    ///
    /// Errors and timeouts are logged and resolve as absent.
    pub async fn fetch_by_uid(&self, uid: &str) -> Option<Arc<Memo>> {
        self.cache.write().insert(uid.to_string(), LoadState::Pending);
        let entry = PendingEntry {
            store: self,
            uid,
            resolved: false,
        };
        debug!(uid, source = self.source.label(), "fetching memo");

        let outcome = match self.fetch_timeout {
            Some(limit) => tokio::time::timeout(limit, self.source.fetch(uid))
                .await
                .unwrap_or_else(|_| {
                    Err(StoreError::Timeout {
                        uid: uid.to_string(),
                        duration_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                    })
                }),
            None => self.source.fetch(uid).await,
        };

        let memo = match outcome {
            Ok(memo) => memo.map(Arc::new),
            Err(err) => {
                warn!(uid, error = %err, "memo fetch failed");
                None
            }
        };
        entry.resolve(memo.clone());
        memo
    }
}

impl fmt::Debug for MemoStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoStore")
            .field("source", &self.source.label())
            .field("cached", &self.cache.read().len())
            .field("fetch_timeout", &self.fetch_timeout)
            .finish()
    }
}

/// Clears a pending entry if its fetch is dropped before resolving
struct PendingEntry<'a> {
    store: &'a MemoStore,
    uid: &'a str,
    resolved: bool,
}

impl PendingEntry<'_> {
    fn resolve(mut self, memo: Option<Arc<Memo>>) {
        self.store
            .cache
            .write()
            .insert(self.uid.to_string(), LoadState::Resolved(memo));
        self.resolved = true;
    }
}

impl Drop for PendingEntry<'_> {
    fn drop(&mut self) {
        if self.resolved {
            return;
        }
        let mut cache = self.store.cache.write();
        if cache.get(self.uid).is_some_and(LoadState::is_pending) {
            cache.remove(self.uid);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FailingSource;

    #[async_trait]
    impl MemoSource for FailingSource {
        async fn fetch(&self, _uid: &str) -> StoreResult<Option<Memo>> {
            Err(StoreError::backend("offline"))
        }
    }

    struct SlowSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MemoSource for SlowSource {
        async fn fetch(&self, uid: &str) -> StoreResult<Option<Memo>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Some(Memo::new(uid, "late")))
        }
    }

    #[tokio::test]
    async fn test_fetch_resolves_found_and_absent() {
        let source = InMemorySource::new().with_memo(Memo::new("a", "hello"));
        let store = MemoStore::new(Arc::new(source));

        assert!(store.load_state("a").is_none());
        assert!(store.fetch_by_uid("a").await.is_some());
        assert!(store.is_resident("a"));

        assert!(store.fetch_by_uid("missing").await.is_none());
        assert_eq!(store.load_state("missing"), Some(LoadState::Resolved(None)));
        assert!(store.get_by_uid("missing").is_none());
    }

    #[tokio::test]
    async fn test_backend_error_resolves_absent() {
        let store = MemoStore::new(Arc::new(FailingSource));
        assert!(store.fetch_by_uid("a").await.is_none());
        assert_eq!(store.load_state("a"), Some(LoadState::Resolved(None)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_resolves_absent() {
        let source = Arc::new(SlowSource {
            calls: AtomicUsize::new(0),
        });
        let store = MemoStore::new(source.clone()).with_fetch_timeout(Some(Duration::from_millis(50)));

        assert!(store.fetch_by_uid("a").await.is_none());
        assert_eq!(store.load_state("a"), Some(LoadState::Resolved(None)));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_fetch_leaves_no_pending_entry() {
        let source = Arc::new(SlowSource {
            calls: AtomicUsize::new(0),
        });
        let store = MemoStore::new(source);

        {
            let fetch = store.fetch_by_uid("a");
            tokio::pin!(fetch);
            let polled = tokio::time::timeout(Duration::from_millis(10), &mut fetch).await;
            assert!(polled.is_err());
            assert_eq!(store.load_state("a"), Some(LoadState::Pending));
        }

        assert!(store.load_state("a").is_none());
    }

    #[test]
    fn test_insert_and_invalidate() {
        let store = MemoStore::new(Arc::new(InMemorySource::new()));
        store.insert(Memo::new("a", "x"));
        assert!(store.is_resident("a"));

        store.invalidate("a");
        assert!(store.load_state("a").is_none());
    }
}

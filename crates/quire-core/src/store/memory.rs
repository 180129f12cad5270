//! In-memory memo source

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{MemoSource, StoreResult};
use crate::memo::Memo;

/// Memos held in a map, for tests and embedding callers
///
/// Counts fetches so callers can assert how often a uid was requested.
#[derive(Debug, Default)]
pub struct InMemorySource {
    memos: RwLock<HashMap<String, Memo>>,
    fetches: RwLock<HashMap<String, usize>>,
    total_fetches: AtomicUsize,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style: add a memo
    #[must_use]
    pub fn with_memo(self, memo: Memo) -> Self {
        self.insert(memo);
        self
    }

    pub fn insert(&self, memo: Memo) {
        self.memos.write().insert(memo.uid.clone(), memo);
    }

    pub fn remove(&self, uid: &str) -> Option<Memo> {
        self.memos.write().remove(uid)
    }

    /// Fetches of `uid` so far
    pub fn fetch_count(&self, uid: &str) -> usize {
        self.fetches.read().get(uid).copied().unwrap_or(0)
    }

    /// Fetches of any uid so far
    pub fn total_fetches(&self) -> usize {
        self.total_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MemoSource for InMemorySource {
    async fn fetch(&self, uid: &str) -> StoreResult<Option<Memo>> {
        *self.fetches.write().entry(uid.to_string()).or_default() += 1;
        self.total_fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.memos.read().get(uid).cloned())
    }

    fn label(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_counts() {
        let source = InMemorySource::new().with_memo(Memo::new("a", "x"));

        assert!(source.fetch("a").await.unwrap().is_some());
        assert!(source.fetch("a").await.unwrap().is_some());
        assert!(source.fetch("b").await.unwrap().is_none());

        assert_eq!(source.fetch_count("a"), 2);
        assert_eq!(source.fetch_count("b"), 1);
        assert_eq!(source.total_fetches(), 3);
    }
}

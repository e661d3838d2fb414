use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::OnceCell;

use crate::key::CacheKey;

/// Scan-once memoization keyed by [`CacheKey`].
///
/// Contract:
///
/// - For a fixed key the scan function runs at most once over the lifetime
///   of the cache, however many threads call [`resolve`](Self::resolve).
/// - Threads racing on an uninitialized key block until the in-flight scan
///   finishes and then share its result; nobody sees a partial value.
/// - Initialized keys are served without touching the initialization lock.
/// - Scans for different keys never wait on each other.
/// - A failed scan leaves the key uninitialized and returns the error to the
///   caller that ran it; the next call scans again.
///
/// Entries are never evicted. There is no TTL and no invalidation; the cache
/// lives exactly as long as its owner keeps it, so tests construct their own.
pub struct DocumentCache<V> {
    entries: DashMap<CacheKey, Arc<OnceCell<V>>>,
}

impl<V: Clone> DocumentCache<V> {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// The cached value, if the key has been scanned successfully.
    pub fn get(&self, key: &CacheKey) -> Option<V> {
        self.entries.get(key).and_then(|cell| cell.get().cloned())
    }

    pub fn is_initialized(&self, key: &CacheKey) -> bool {
        self.entries
            .get(key)
            .is_some_and(|cell| cell.get().is_some())
    }

    /// Number of keys that have been scanned successfully.
    pub fn initialized_len(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.value().get().is_some())
            .count()
    }

    /// Return the value for `key`, running `scan` if nobody has succeeded yet.
    pub fn resolve<F, E>(&self, key: &CacheKey, scan: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(value) = self.get(key) {
            tracing::trace!(key = %key, "document cache hit");
            return Ok(value);
        }

        // The map guard is dropped before initialization so the shard stays
        // free while the scan runs.
        let cell = Arc::clone(&self.entries.entry(key.clone()).or_default());

        let value = cell.get_or_try_init(|| {
            tracing::info!(key = %key, strategy = ?key.strategy(), "scanning for document");
            let result = scan();
            if result.is_err() {
                tracing::warn!(key = %key, "scan failed; key left uninitialized");
            }
            result
        })?;
        Ok(value.clone())
    }
}

impl<V: Clone> Default for DocumentCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

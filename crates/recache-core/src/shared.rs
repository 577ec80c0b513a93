use crate::entry::CachedResponse;
use crate::store::{CacheStats, CacheStore, Lookup};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Thread-safe wrapper around a single `CacheStore`.
///
/// Every operation mutates the index, the recency list and the running byte
/// total together, so the whole store sits behind one mutex; applying part of
/// an operation without the rest would corrupt the byte-total invariant or the
/// list linkage. Critical sections are short — network I/O always happens
/// outside the lock, with the caller holding only an `Arc` snapshot.
pub struct SharedStore {
    inner: Mutex<CacheStore>,
}

impl SharedStore {
    pub fn new(max_bytes: usize) -> Self {
        Self {
            inner: Mutex::new(CacheStore::new(max_bytes)),
        }
    }

    /// Classify `key` at `now_ms` in one critical section. Fresh hits are
    /// promoted before the lock is released.
    pub fn lookup(&self, key: &str, now_ms: i64) -> Lookup {
        self.inner.lock().lookup(key, now_ms)
    }

    /// Insert or overwrite, then evict back under the byte bound, atomically.
    pub fn put(&self, key: String, response: CachedResponse, expires_at: i64) -> Arc<CachedResponse> {
        self.inner.lock().put(key, response, expires_at)
    }

    pub fn remove(&self, key: &str) -> bool {
        self.inner.lock().remove(key)
    }

    pub fn touch(&self, key: &str) -> bool {
        self.inner.lock().touch(key)
    }

    pub fn clear(&self) {
        self.inner.lock().clear()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Copy the cache contents while holding the lock.
    pub fn snapshot(&self) -> HashMap<String, Arc<CachedResponse>> {
        self.inner.lock().snapshot()
    }

    pub fn stats(&self) -> CacheStats {
        self.inner.lock().stats()
    }
}

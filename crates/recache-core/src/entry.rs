use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use std::sync::Arc;

/// Immutable snapshot of an HTTP response held by the cache.
///
/// Headers live in an `http::HeaderMap`, so all lookups are case-insensitive
/// by construction. The request URI is kept so a cache hit can be presented to
/// callers as a complete response without a live transport exchange.
#[derive(Clone, Debug)]
pub struct CachedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub uri: String,
}

impl CachedResponse {
    /// Byte length of the body, the unit the store's size bound is counted in.
    #[inline]
    pub fn body_len(&self) -> usize {
        self.body.len()
    }
}

/// Mutable cache record owned exclusively by the store.
///
/// The response is replaced wholesale on refresh; `size_bytes` must be
/// recomputed whenever that happens so the store's running total stays exact.
pub struct CacheEntry {
    pub key: String,
    pub response: Arc<CachedResponse>,
    /// Absolute expiry, epoch milliseconds. Fresh while `expires_at > now`.
    pub expires_at: i64,
    pub size_bytes: usize,
}

impl CacheEntry {
    pub fn new(key: String, response: Arc<CachedResponse>, expires_at: i64) -> Self {
        let size_bytes = response.body_len();
        Self {
            key,
            response,
            expires_at,
            size_bytes,
        }
    }

    /// Swap in a replacement response and return the new body size.
    pub fn replace(&mut self, response: Arc<CachedResponse>, expires_at: i64) -> usize {
        self.size_bytes = response.body_len();
        self.response = response;
        self.expires_at = expires_at;
        self.size_bytes
    }

    /// Whether the entry is fresh at `now_ms`.
    #[inline]
    pub fn is_fresh(&self, now_ms: i64) -> bool {
        self.expires_at > now_ms
    }
}

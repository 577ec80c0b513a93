//! Byte-bounded LRU store and HTTP caching policies.
//!
//! This crate holds the cache machinery with no transport attached: an
//! arena-allocated recency list, a byte-bounded store, the expiry computation
//! (`Cache-Control`, `Expires`/`Date` with clock-skew correction), and the
//! revalidation policy (conditional headers, `no-cache` gates, 304 metadata
//! merge). The transport-decorating engine lives in `recache-client`.

pub mod arena;
pub mod entry;
pub mod freshness;
pub mod http_date;
pub mod revalidate;
pub mod shared;
pub mod store;

pub use entry::{CacheEntry, CachedResponse};
pub use freshness::{compute_expiry, ExpiryOptions, DEFAULT_MAX_AGE_MS};
pub use revalidate::{
    conditional_headers, merge_revalidated_metadata, request_forbids_lookup,
    response_forbids_caching,
};
pub use shared::SharedStore;
pub use store::{CacheStats, CacheStore, Lookup, DEFAULT_MAX_SIZE_BYTES};

//! Transparent HTTP response caching over a pluggable transport.
//!
//! [`CacheEngine`] sits between an application and an HTTP transport. GET
//! requests that opt in are served from a byte-bounded LRU store while fresh,
//! revalidated with conditional requests (`If-None-Match` /
//! `If-Modified-Since`) when stale, and fetched fresh otherwise. The engine
//! never owns connection handling: anything that implements [`Transport`]
//! can sit underneath it, with [`HyperTransport`] as the batteries-included
//! default.

pub mod config;
pub mod engine;
pub mod error;
pub mod options;
pub mod transport;

pub use config::{CacheConfig, Config};
pub use engine::{CacheEngine, FetchOutcome};
pub use error::{ConfigError, TransportError};
pub use options::RequestCacheOptions;
pub use transport::{HttpResponse, HyperTransport, Transport};

pub use recache_core::{CacheStats, CachedResponse};

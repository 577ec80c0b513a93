use crate::config::CacheConfig;
use crate::error::TransportError;
use crate::options::RequestCacheOptions;
use crate::transport::{HttpResponse, Transport};
use bytes::Bytes;
use http::{HeaderMap, Method, Request, StatusCode, Uri};
use recache_core::freshness::{compute_expiry, ExpiryOptions};
use recache_core::revalidate::{
    conditional_headers, merge_revalidated_metadata, request_forbids_lookup,
    response_forbids_caching,
};
use recache_core::store::{CacheStats, Lookup};
use recache_core::{CachedResponse, SharedStore};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// How a request was ultimately served. Callers branch on the tag instead of
/// duck-typing a response object.
pub enum FetchOutcome {
    /// Served from cache with zero transport calls.
    Cached(Arc<CachedResponse>),
    /// A 304 confirmed the cached body; one round-trip, body not re-transferred.
    Revalidated(Arc<CachedResponse>),
    /// A live response from the transport.
    Fresh(HttpResponse),
}

impl FetchOutcome {
    pub fn status(&self) -> StatusCode {
        match self {
            FetchOutcome::Cached(r) | FetchOutcome::Revalidated(r) => r.status,
            FetchOutcome::Fresh(r) => r.status,
        }
    }

    pub fn headers(&self) -> &HeaderMap {
        match self {
            FetchOutcome::Cached(r) | FetchOutcome::Revalidated(r) => &r.headers,
            FetchOutcome::Fresh(r) => &r.headers,
        }
    }

    pub fn body(&self) -> &Bytes {
        match self {
            FetchOutcome::Cached(r) | FetchOutcome::Revalidated(r) => &r.body,
            FetchOutcome::Fresh(r) => &r.body,
        }
    }

    /// True when the body came out of the cache rather than off the wire.
    pub fn from_cache(&self) -> bool {
        !matches!(self, FetchOutcome::Fresh(_))
    }
}

/// Transparent HTTP response cache over a transport.
///
/// Constructed once with its configuration and handed around by reference;
/// there is no process-global cache state. Only GET requests that opt in via
/// [`RequestCacheOptions::cache`] ever touch the store — everything else is
/// delegated straight to the transport.
pub struct CacheEngine<T: Transport> {
    transport: T,
    store: SharedStore,
    config: CacheConfig,
}

impl<T: Transport> CacheEngine<T> {
    pub fn new(transport: T, config: CacheConfig) -> Self {
        tracing::info!(
            max_size_bytes = config.max_size_bytes,
            default_max_age_ms = config.default_max_age_ms,
            "response cache initialized"
        );
        Self {
            store: SharedStore::new(config.max_size_bytes),
            transport,
            config,
        }
    }

    /// Execute a request through the cache.
    ///
    /// Decides per request whether to serve from cache, revalidate with a
    /// conditional request, or fetch fresh, and updates the store from the
    /// outcome. Transport failures propagate unchanged; a stale entry is
    /// never substituted for a failed fetch.
    pub async fn execute(
        &self,
        req: Request<Bytes>,
        opts: &RequestCacheOptions,
    ) -> Result<FetchOutcome, TransportError> {
        if !opts.cache || req.method() != Method::GET {
            return Ok(FetchOutcome::Fresh(self.transport.send(req).await?));
        }

        let key = cache_key(req.method(), req.uri());
        let req_time = now_ms();
        let expiry = self.expiry_options(opts);

        if request_forbids_lookup(req.headers()) {
            tracing::debug!(key = %key, "request says no-cache, lookup skipped");
            return self.fetch_fresh(req, &key, req_time, &expiry).await;
        }

        match self.store.lookup(&key, req_time) {
            Lookup::Fresh(cached) => {
                tracing::debug!(key = %key, "cache HIT");
                Ok(FetchOutcome::Cached(cached))
            }
            Lookup::Stale(cached) => match conditional_headers(&cached.headers) {
                Some(cond) => {
                    self.revalidate(req, cond, cached, &key, req_time, &expiry)
                        .await
                }
                None => {
                    tracing::debug!(key = %key, "stale entry has no validators, fetching fresh");
                    self.fetch_fresh(req, &key, req_time, &expiry).await
                }
            },
            Lookup::Miss => {
                tracing::debug!(key = %key, "cache MISS");
                self.fetch_fresh(req, &key, req_time, &expiry).await
            }
        }
    }

    /// Read-only copy of the cache contents.
    pub fn snapshot(&self) -> HashMap<String, Arc<CachedResponse>> {
        self.store.snapshot()
    }

    /// Implementation-defined cache statistics.
    pub fn report(&self) -> CacheStats {
        self.store.stats()
    }

    /// Drop every cached entry.
    pub fn clear(&self) {
        self.store.clear()
    }

    async fn revalidate(
        &self,
        mut req: Request<Bytes>,
        conditionals: HeaderMap,
        cached: Arc<CachedResponse>,
        key: &str,
        req_time: i64,
        expiry: &ExpiryOptions,
    ) -> Result<FetchOutcome, TransportError> {
        // Request-supplied headers take precedence over synthesized ones
        for (name, value) in conditionals.iter() {
            if !req.headers().contains_key(name) {
                req.headers_mut().insert(name.clone(), value.clone());
            }
        }

        let uri = req.uri().to_string();
        let response = self.transport.send(req).await?;

        if response.status == StatusCode::NOT_MODIFIED {
            let refreshed = merge_revalidated_metadata(&cached, &response.headers);
            let expires_at = compute_expiry(&response.headers, req_time, expiry);
            let refreshed = self.store.put(key.to_string(), refreshed, expires_at);
            tracing::debug!(key = %key, expires_at, "revalidated, serving cached body");
            return Ok(FetchOutcome::Revalidated(refreshed));
        }

        self.apply_response_caching(key, &uri, &response, req_time, expiry);
        Ok(FetchOutcome::Fresh(response))
    }

    async fn fetch_fresh(
        &self,
        req: Request<Bytes>,
        key: &str,
        req_time: i64,
        expiry: &ExpiryOptions,
    ) -> Result<FetchOutcome, TransportError> {
        let uri = req.uri().to_string();
        let response = self.transport.send(req).await?;
        self.apply_response_caching(key, &uri, &response, req_time, expiry);
        Ok(FetchOutcome::Fresh(response))
    }

    /// Post-response cache bookkeeping shared by every transport path:
    /// a forbidding response purges, a cacheable 200 is stored, anything
    /// else leaves the cache untouched.
    fn apply_response_caching(
        &self,
        key: &str,
        uri: &str,
        response: &HttpResponse,
        req_time: i64,
        expiry: &ExpiryOptions,
    ) {
        if response_forbids_caching(&response.headers) {
            if self.store.remove(key) {
                tracing::debug!(key = %key, "response forbids caching, entry purged");
            }
        } else if response.status == StatusCode::OK {
            let expires_at = compute_expiry(&response.headers, req_time, expiry);
            self.store.put(
                key.to_string(),
                CachedResponse {
                    status: response.status,
                    headers: response.headers.clone(),
                    body: response.body.clone(),
                    uri: uri.to_string(),
                },
                expires_at,
            );
            tracing::debug!(key = %key, expires_at, "response stored");
        }
    }

    fn expiry_options(&self, opts: &RequestCacheOptions) -> ExpiryOptions {
        ExpiryOptions {
            forced_max_age_ms: opts.forced_max_age_ms,
            default_max_age_ms: opts
                .default_max_age_ms
                .unwrap_or(self.config.default_max_age_ms),
            max_max_age_ms: self.config.max_max_age_ms,
        }
    }
}

/// Cache key: method plus URI, query string verbatim and unnormalized.
fn cache_key(method: &Method, uri: &Uri) -> String {
    format!("{method}:{uri}")
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before Unix epoch")
        .as_millis() as i64
}

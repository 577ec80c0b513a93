use crate::entry::CachedResponse;
use http::header::{
    HeaderName, CACHE_CONTROL, DATE, ETAG, EXPIRES, IF_MODIFIED_SINCE, IF_NONE_MATCH,
    LAST_MODIFIED,
};
use http::HeaderMap;

/// Build the conditional headers for revalidating a stale cached response.
///
/// `ETag` becomes `If-None-Match`; the cached `Date` becomes
/// `If-Modified-Since`. Returns `None` when the cached response carries
/// neither validator — the entry cannot be revalidated and the caller must
/// fall back to an unconditional fetch rather than serving stale data.
pub fn conditional_headers(cached: &HeaderMap) -> Option<HeaderMap> {
    let mut out = HeaderMap::new();

    if let Some(etag) = cached.get(ETAG) {
        out.insert(IF_NONE_MATCH, etag.clone());
    }
    if let Some(date) = cached.get(DATE) {
        out.insert(IF_MODIFIED_SINCE, date.clone());
    }

    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

/// True when the request's `Cache-Control` carries `no-cache`: skip the cache
/// lookup for this request only. The response may still be cached afterward.
pub fn request_forbids_lookup(headers: &HeaderMap) -> bool {
    has_no_cache_token(headers)
}

/// True when the response's `Cache-Control` carries `no-cache`: the response
/// must not be stored, and any existing entry for its key must be purged.
pub fn response_forbids_caching(headers: &HeaderMap) -> bool {
    has_no_cache_token(headers)
}

// Case-insensitive substring match on the token, across all Cache-Control
// values if the header is repeated.
fn has_no_cache_token(headers: &HeaderMap) -> bool {
    headers.get_all(CACHE_CONTROL).iter().any(|value| {
        value
            .to_str()
            .map(|s| s.to_ascii_lowercase().contains("no-cache"))
            .unwrap_or(false)
    })
}

/// Header fields refreshed from a 304 response; everything else in the cached
/// response, body included, is retained unchanged.
const REFRESHED_METADATA: [HeaderName; 5] = [ETAG, EXPIRES, DATE, LAST_MODIFIED, CACHE_CONTROL];

/// Apply a 304 response's metadata onto a cached response, producing the
/// refreshed snapshot. Fields absent from the 304 keep their cached values.
pub fn merge_revalidated_metadata(cached: &CachedResponse, fresh: &HeaderMap) -> CachedResponse {
    let mut headers = cached.headers.clone();
    for name in &REFRESHED_METADATA {
        if let Some(value) = fresh.get(name) {
            headers.insert(name.clone(), value.clone());
        }
    }

    CachedResponse {
        status: cached.status,
        headers,
        body: cached.body.clone(),
        uri: cached.uri.clone(),
    }
}

use crate::http_date::parse_http_date_ms;
use http::header::{CACHE_CONTROL, DATE, EXPIRES};
use http::HeaderMap;

/// Builtin fallback freshness lifetime when nothing else applies: 4 hours.
pub const DEFAULT_MAX_AGE_MS: i64 = 4 * 60 * 60 * 1000;

/// Knobs consulted when computing an absolute expiry timestamp.
#[derive(Clone, Debug)]
pub struct ExpiryOptions {
    /// When set, overrides every response-derived expiry.
    pub forced_max_age_ms: Option<i64>,
    /// Fallback lifetime when the response carries no usable headers.
    pub default_max_age_ms: i64,
    /// Optional upper clamp on any computed lifetime. Never raises an expiry.
    pub max_max_age_ms: Option<i64>,
}

impl Default for ExpiryOptions {
    fn default() -> Self {
        Self {
            forced_max_age_ms: None,
            default_max_age_ms: DEFAULT_MAX_AGE_MS,
            max_max_age_ms: None,
        }
    }
}

/// Compute the absolute expiry (epoch ms) for a response received at
/// `req_time_ms`.
///
/// Resolution order, first applicable wins:
/// 1. `forced_max_age_ms` — ignores all response headers.
/// 2. `Cache-Control: max-age=<seconds>` (integer, may be negative).
/// 3. `Expires`, corrected for origin clock skew when a parseable `Date`
///    header is present (`expires - (date - req_time)`). An unparseable
///    `Expires` counts as already expired.
/// 4. `default_max_age_ms`.
pub fn compute_expiry(headers: &HeaderMap, req_time_ms: i64, opts: &ExpiryOptions) -> i64 {
    let expiry = resolve_expiry(headers, req_time_ms, opts);
    match opts.max_max_age_ms {
        Some(cap) => expiry.min(req_time_ms.saturating_add(cap)),
        None => expiry,
    }
}

fn resolve_expiry(headers: &HeaderMap, req_time_ms: i64, opts: &ExpiryOptions) -> i64 {
    if let Some(forced) = opts.forced_max_age_ms {
        return req_time_ms.saturating_add(forced);
    }

    if let Some(seconds) = max_age_directive(headers) {
        return req_time_ms.saturating_add(seconds.saturating_mul(1000));
    }

    if let Some(value) = headers.get(EXPIRES) {
        let origin_expiry = match value.to_str().ok().and_then(parse_http_date_ms) {
            Some(ms) => ms,
            // Unparseable Expires: treat as already expired rather than
            // risking indefinite staleness.
            None => return req_time_ms,
        };

        if let Some(origin_time) = headers
            .get(DATE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_http_date_ms)
        {
            let origin_offset = origin_time - req_time_ms;
            return origin_expiry - origin_offset;
        }

        // No usable Date header: take Expires at face value.
        return origin_expiry;
    }

    req_time_ms.saturating_add(opts.default_max_age_ms)
}

/// Extract the `max-age` directive from `Cache-Control`, if any.
/// The value is an integer number of seconds and may be negative.
pub fn max_age_directive(headers: &HeaderMap) -> Option<i64> {
    let value = headers.get(CACHE_CONTROL)?.to_str().ok()?;
    for directive in value.split(',').map(|s| s.trim().to_ascii_lowercase()) {
        if let Some(age) = directive.strip_prefix("max-age=") {
            if let Ok(secs) = age.trim().parse::<i64>() {
                return Some(secs);
            }
        }
    }
    None
}

/// Per-request cache behaviour.
///
/// The default is opt-out: a request that does not ask for caching never
/// touches the cache in either direction.
#[derive(Clone, Debug, Default)]
pub struct RequestCacheOptions {
    /// Opt-in switch. When false the engine delegates straight to the
    /// transport, with no lookup and no storage.
    pub cache: bool,
    /// Overrides all response-derived expiry for responses to this request.
    pub forced_max_age_ms: Option<i64>,
    /// Fallback lifetime when the response carries no usable headers,
    /// overriding the engine-level default for this request only.
    pub default_max_age_ms: Option<i64>,
}

impl RequestCacheOptions {
    /// Options with caching switched on and everything else defaulted.
    pub fn enabled() -> Self {
        Self {
            cache: true,
            ..Self::default()
        }
    }
}

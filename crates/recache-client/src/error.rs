use thiserror::Error;

/// Failure of the underlying transport exchange.
///
/// Transport errors are surfaced to the caller unchanged: the engine never
/// retries, never substitutes a stale cache entry for a failed fetch, and
/// mutates the cache only when response headers actually arrived.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(#[from] hyper_util::client::legacy::Error),

    #[error("failed to read response body: {0}")]
    Body(#[from] hyper::Error),

    #[error("transport rejected request: {0}")]
    Rejected(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

use crate::error::ConfigError;
use recache_core::freshness::DEFAULT_MAX_AGE_MS;
use recache_core::store::DEFAULT_MAX_SIZE_BYTES;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Global bound on cached body bytes across all entries.
    #[serde(default = "default_max_size")]
    pub max_size_bytes: usize,
    /// Engine-level fallback freshness lifetime; per-request options may
    /// override it.
    #[serde(default = "default_max_age")]
    pub default_max_age_ms: i64,
    /// Optional upper clamp on every computed freshness lifetime.
    #[serde(default)]
    pub max_max_age_ms: Option<i64>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Config {
            cache: CacheConfig::default(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: default_max_size(),
            default_max_age_ms: default_max_age(),
            max_max_age_ms: None,
        }
    }
}

fn default_max_size() -> usize {
    DEFAULT_MAX_SIZE_BYTES
}
fn default_max_age() -> i64 {
    DEFAULT_MAX_AGE_MS
}

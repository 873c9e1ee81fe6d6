//! Serde-friendly cache configuration.
//!
//! ```
//! use stowage::CachingConfig;
//!
//! let config: CachingConfig = serde_json::from_str(r#"{
//!     "local": { "expire": "30s", "maximum_size": "64MiB" },
//!     "remote_timeout": "250ms"
//! }"#).unwrap();
//! let cache = config.build().unwrap();
//! ```

use std::sync::Arc;
use std::time::Duration;

use bytesize::ByteSize;
use serde::{Deserialize, Serialize};
use stowage_backend::ResponseStore;
use stowage_moka::MokaStore;

use crate::cache::{DEFAULT_REMOTE_TIMEOUT, ResponseCache};
use crate::error::ConfigError;

/// Complete cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct CachingConfig {
    /// The in-process tier.
    pub local: LocalCacheConfig,
    /// The shared remote tier, if any.
    pub store: Option<StoreConfig>,
    /// Time limit for every remote tier operation.
    ///
    /// # Default
    ///
    /// [`DEFAULT_REMOTE_TIMEOUT`]
    #[serde(with = "humantime_serde")]
    pub remote_timeout: Duration,
}

impl Default for CachingConfig {
    fn default() -> Self {
        Self {
            local: LocalCacheConfig::default(),
            store: None,
            remote_timeout: DEFAULT_REMOTE_TIMEOUT,
        }
    }
}

impl CachingConfig {
    /// Builds the cache described by this configuration.
    ///
    /// No connection is made here: remote stores connect on first use.
    pub fn build(&self) -> Result<ResponseCache<MokaStore>, ConfigError> {
        let mut cache = ResponseCache::new(self.local.build()).remote_timeout(self.remote_timeout);
        if let Some(store) = &self.store {
            cache = cache.remote(store.build()?);
        }
        Ok(cache)
    }
}

/// Local tier limits.
///
/// Without any limit the local tier is disabled.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct LocalCacheConfig {
    /// Drops entries this long after they were written.
    #[serde(with = "humantime_serde")]
    pub expire: Option<Duration>,
    /// Bounds the tier by estimated response size.
    pub maximum_size: Option<ByteSize>,
}

impl LocalCacheConfig {
    /// Builds the local store.
    pub fn build(&self) -> MokaStore {
        let builder = MokaStore::builder().label("local");
        match (self.maximum_size, self.expire) {
            (None, None) => MokaStore::disabled(),
            (Some(size), expire) => {
                let builder = builder.max_bytes(size.as_u64());
                match expire {
                    Some(ttl) => builder.time_to_live(ttl).build(),
                    None => builder.build(),
                }
            }
            (None, Some(ttl)) => builder.max_entries(u64::MAX).time_to_live(ttl).build(),
        }
    }
}

/// Remote tier backends.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreConfig {
    /// A Redis server.
    Redis(RedisStoreConfig),
}

impl StoreConfig {
    /// Creates the store. Fails when the backend was compiled out or its
    /// settings are invalid.
    pub fn build(&self) -> Result<Arc<dyn ResponseStore>, ConfigError> {
        match self {
            #[cfg(feature = "redis")]
            StoreConfig::Redis(config) => {
                let store = stowage_redis::RedisStore::builder()
                    .server(config.url.as_str())
                    .key_prefix(config.key_prefix.as_str())
                    .read_only(config.read_only)
                    .max_key_bytes(config.max_key_bytes)
                    .build()?;
                Ok(Arc::new(store))
            }
            #[cfg(not(feature = "redis"))]
            StoreConfig::Redis(_) => Err(ConfigError::StoreUnavailable("redis")),
        }
    }
}

/// Redis connection settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RedisStoreConfig {
    /// Connection URL, e.g. `redis://127.0.0.1:6379/0`.
    pub url: String,
    /// Prefix for every storage key.
    #[serde(default)]
    pub key_prefix: String,
    /// Serve reads only.
    #[serde(default)]
    pub read_only: bool,
    /// Storage keys longer than this are truncated and hashed.
    #[serde(default)]
    pub max_key_bytes: Option<usize>,
}

use thiserror::Error;

/// Error raised while turning a [`CachingConfig`](crate::CachingConfig) into a cache.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The Redis store could not be created.
    #[cfg(feature = "redis")]
    #[error(transparent)]
    Redis(#[from] stowage_redis::Error),

    /// The configured store was compiled out.
    #[error("store `{0}` is not available, enable the `{0}` feature")]
    StoreUnavailable(&'static str),
}

//! Error types for Redis store operations.
//!
//! All errors convert into [`StoreError`] for uniform handling across
//! stores.
//!
//! [`StoreError`]: stowage_backend::StoreError

use redis::RedisError;
use stowage_backend::StoreError;

/// Error type for Redis store operations.
///
/// You typically meet it when [`RedisStoreBuilder::build`] is given an
/// invalid connection URL or a key limit that is too small. Errors raised by cache operations (the connection
/// is established lazily, on first use) are converted to [`StoreError`].
///
/// [`RedisStoreBuilder::build`]: crate::RedisStoreBuilder::build
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An error from the underlying Redis client.
    ///
    /// This includes connection failures, protocol errors, authentication
    /// failures, and command execution errors.
    #[error("Redis store error: {0}")]
    Redis(#[from] RedisError),

    /// The storage key limit leaves no room for the uniqueness digest.
    #[error("max_key_bytes {limit} is below the minimum of {minimum}")]
    KeyLimit {
        /// The configured limit.
        limit: usize,
        /// The smallest limit that keeps the whole digest.
        minimum: usize,
    },
}

impl From<Error> for StoreError {
    fn from(error: Error) -> Self {
        let network = match &error {
            Error::Redis(redis) => redis.is_io_error() || redis.is_connection_dropped(),
            Error::KeyLimit { .. } => false,
        };
        if network {
            Self::Connection(Box::new(error))
        } else {
            Self::Internal(Box::new(error))
        }
    }
}

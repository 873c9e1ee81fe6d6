//! Redis remote tier for stowage.
//!
//! Responses are stored as plain string values (encoded with a
//! [`Format`](stowage_backend::Format), [`WireFormat`](stowage_backend::WireFormat)
//! by default) and expire in Redis at the response's own expiration instant.
//!
//! ```no_run
//! use stowage_redis::RedisStore;
//!
//! let store = RedisStore::builder()
//!     .server("redis://cache.internal:6379/")
//!     .key_prefix("pages:")
//!     .max_key_bytes(Some(1024))
//!     .build()
//!     .expect("valid redis url");
//! ```

mod error;
mod store;

pub use error::Error;
pub use store::{RedisStore, RedisStoreBuilder};

//! In-process local tier for stowage, built on [`moka`].
//!
//! ```
//! use std::time::Duration;
//! use stowage_moka::MokaStore;
//!
//! let local = MokaStore::builder()
//!     .max_bytes(64 * 1024 * 1024)
//!     .time_to_live(Duration::from_secs(300))
//!     .build();
//! ```
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
pub mod metrics;
mod store;

pub use builder::{ByteCapacity, EntryCapacity, MokaStoreBuilder, NoCapacity};
pub use moka::policy::EvictionPolicy;
pub use store::MokaStore;

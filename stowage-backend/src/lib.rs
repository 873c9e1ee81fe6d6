// #![warn(missing_docs)]
//! Traits and structs for stowage response store interaction.
//!
//! A [`ResponseStore`] is one tier of the response cache. Implement it to
//! plug in a new shared store; wrap any store in a [`FailSafeStore`] so that
//! its faults degrade to cache misses instead of failed requests.
mod error;
mod fail_safe;
pub mod format;
mod key;
pub mod metrics;
mod null;
mod store;

pub use error::StoreError;
pub use fail_safe::FailSafeStore;
pub use format::{Format, FormatError, JsonFormat, WireFormat};
pub use key::{KEY_SUFFIX_LEN, truncate_key};
pub use null::NullStore;
pub use store::{ResponseStore, StoreResult};

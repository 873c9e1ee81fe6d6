//! Error types for store operations.

use std::time::Duration;

use crate::format::FormatError;
use thiserror::Error;

/// Error type for response store operations.
///
/// This enum groups the faults a store can hit so that callers (and the
/// fail-safe wrapper's logs) can tell them apart.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Internal store error, state or computation error.
    ///
    /// Any error not related to network interaction.
    #[error(transparent)]
    Internal(Box<dyn std::error::Error + Send>),

    /// Network interaction error.
    ///
    /// Errors occurring during communication with remote stores (e.g., Redis).
    #[error(transparent)]
    Connection(Box<dyn std::error::Error + Send>),

    /// A stored payload could not be encoded or decoded.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The operation did not finish within the configured limit.
    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),

    /// The store implementation panicked.
    #[error("store operation panicked: {0}")]
    Panicked(String),
}

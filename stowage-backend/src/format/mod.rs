//! Value formats for stores that keep responses as bytes.
//!
//! | Format         | Human-readable | Notes                                   |
//! |----------------|----------------|-----------------------------------------|
//! | [`WireFormat`] | Mostly         | HTTP/1.1 message framing, raw body      |
//! | [`JsonFormat`] | Yes            | `serde_json`, body as a byte array      |

mod json;
mod wire;

pub use json::JsonFormat;
pub use wire::{WireError, WireFormat};

use std::fmt::Debug;

use bytes::Bytes;
use stowage_core::CachedResponse;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error(transparent)]
    Serialize(Box<dyn std::error::Error + Send>),

    #[error(transparent)]
    Deserialize(Box<dyn std::error::Error + Send>),
}

/// Encoding of a [`CachedResponse`] for byte-oriented stores.
///
/// Decoding rebuilds the entry with [`CachedResponse::new`], so every derived
/// field is recomputed from the stored headers.
pub trait Format: Debug + Send + Sync {
    fn encode(&self, response: &CachedResponse) -> Result<Bytes, FormatError>;

    fn decode(&self, data: &[u8]) -> Result<CachedResponse, FormatError>;
}

impl<F> Format for &F
where
    F: Format + ?Sized,
{
    fn encode(&self, response: &CachedResponse) -> Result<Bytes, FormatError> {
        (**self).encode(response)
    }

    fn decode(&self, data: &[u8]) -> Result<CachedResponse, FormatError> {
        (**self).decode(data)
    }
}

impl Format for Box<dyn Format> {
    fn encode(&self, response: &CachedResponse) -> Result<Bytes, FormatError> {
        (**self).encode(response)
    }

    fn decode(&self, data: &[u8]) -> Result<CachedResponse, FormatError> {
        (**self).decode(data)
    }
}

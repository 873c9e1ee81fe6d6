use bytes::Bytes;
use chrono::Utc;
use http::{HeaderMap, StatusCode};
use serde::{Deserialize, Serialize};
use stowage_core::CachedResponse;

use super::{Format, FormatError};

/// JSON format.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

#[derive(Serialize, Deserialize)]
struct SerializableResponse {
    #[serde(with = "http_serde::status_code")]
    status: StatusCode,
    #[serde(with = "http_serde::header_map")]
    headers: HeaderMap,
    body: Bytes,
}

impl Format for JsonFormat {
    fn encode(&self, response: &CachedResponse) -> Result<Bytes, FormatError> {
        let dto = SerializableResponse {
            status: response.status(),
            headers: response.headers().clone(),
            body: response.body().clone(),
        };
        serde_json::to_vec(&dto)
            .map(Bytes::from)
            .map_err(|error| FormatError::Serialize(Box::new(error)))
    }

    fn decode(&self, data: &[u8]) -> Result<CachedResponse, FormatError> {
        let dto: SerializableResponse = serde_json::from_slice(data)
            .map_err(|error| FormatError::Deserialize(Box::new(error)))?;
        Ok(CachedResponse::new(dto.status, dto.headers, dto.body, Utc::now()))
    }
}

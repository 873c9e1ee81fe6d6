use bytes::{BufMut, Bytes, BytesMut};
use chrono::Utc;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use stowage_core::CachedResponse;
use thiserror::Error;

use super::{Format, FormatError};

const STATUS_PREFIX: &[u8] = b"HTTP/1.1 ";
const HEAD_END: &[u8] = b"\r\n\r\n";

/// HTTP/1.1 message framing.
///
/// ```text
/// HTTP/1.1 200 OK\r\n
/// content-type: text/plain\r\n
/// \r\n
/// <body bytes>
/// ```
///
/// The reason phrase is informative only; decoding reads the status code.
#[derive(Debug, Clone, Copy, Default)]
pub struct WireFormat;

/// A payload that is not a well-formed wire message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WireError {
    #[error("missing end of header section")]
    MissingHeadEnd,
    #[error("malformed status line")]
    StatusLine,
    #[error("malformed header line {0}")]
    HeaderLine(usize),
}

impl Format for WireFormat {
    fn encode(&self, response: &CachedResponse) -> Result<Bytes, FormatError> {
        let status = response.status();
        let mut out = BytesMut::with_capacity(response.weight() + 64);

        out.put_slice(STATUS_PREFIX);
        out.put_slice(status.as_str().as_bytes());
        out.put_u8(b' ');
        out.put_slice(status.canonical_reason().unwrap_or_default().as_bytes());
        out.put_slice(b"\r\n");
        for (name, value) in response.headers() {
            out.put_slice(name.as_str().as_bytes());
            out.put_slice(b": ");
            out.put_slice(value.as_bytes());
            out.put_slice(b"\r\n");
        }
        out.put_slice(b"\r\n");
        out.put_slice(response.body());

        Ok(out.freeze())
    }

    fn decode(&self, data: &[u8]) -> Result<CachedResponse, FormatError> {
        let (status, headers, body) =
            parse(data).map_err(|error| FormatError::Deserialize(Box::new(error)))?;
        Ok(CachedResponse::new(status, headers, body, Utc::now()))
    }
}

fn parse(data: &[u8]) -> Result<(StatusCode, HeaderMap, Bytes), WireError> {
    let head_end = data
        .windows(HEAD_END.len())
        .position(|window| window == HEAD_END)
        .ok_or(WireError::MissingHeadEnd)?;
    let head = &data[..head_end];
    let body = Bytes::copy_from_slice(&data[head_end + HEAD_END.len()..]);

    let mut lines = head.split(|&b| b == b'\n').map(|line| {
        line.strip_suffix(b"\r").unwrap_or(line)
    });

    let status = lines
        .next()
        .and_then(|line| line.strip_prefix(STATUS_PREFIX))
        .and_then(|rest| rest.get(..3).filter(|_| rest.get(3).is_none_or(|&b| b == b' ')))
        .and_then(|code| StatusCode::from_bytes(code).ok())
        .ok_or(WireError::StatusLine)?;

    let mut headers = HeaderMap::new();
    for (index, line) in lines.enumerate() {
        let colon = line
            .iter()
            .position(|&b| b == b':')
            .ok_or(WireError::HeaderLine(index + 1))?;
        let name = HeaderName::from_bytes(&line[..colon])
            .map_err(|_| WireError::HeaderLine(index + 1))?;
        let value = &line[colon + 1..];
        let value = value.strip_prefix(b" ").unwrap_or(value);
        let value =
            HeaderValue::from_bytes(value).map_err(|_| WireError::HeaderLine(index + 1))?;
        headers.append(name, value);
    }

    Ok((status, headers, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_minimal_message() {
        let (status, headers, body) = parse(b"HTTP/1.1 404 \r\n\r\n").unwrap();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(headers.is_empty());
        assert!(body.is_empty());
    }

    #[test]
    fn body_may_contain_blank_lines() {
        let (_, headers, body) =
            parse(b"HTTP/1.1 200 OK\r\nx-a: 1\r\n\r\nline\r\n\r\nmore").unwrap();
        assert_eq!(headers["x-a"], "1");
        assert_eq!(&body[..], b"line\r\n\r\nmore");
    }

    #[test]
    fn header_values_keep_their_own_whitespace() {
        let (_, headers, _) =
            parse(b"HTTP/1.1 200 OK\r\nx-a:  padded\t\r\nx-b:tight\r\n\r\n").unwrap();
        assert_eq!(headers["x-a"], " padded\t");
        assert_eq!(headers["x-b"], "tight");
    }

    #[test]
    fn rejects_corrupt_payloads() {
        assert_eq!(parse(b"HTTP/1.1 200 OK\r\n"), Err(WireError::MissingHeadEnd));
        assert_eq!(parse(b"HTTP/2 200\r\n\r\n"), Err(WireError::StatusLine));
        assert_eq!(parse(b"HTTP/1.1 2000\r\n\r\n"), Err(WireError::StatusLine));
        assert_eq!(
            parse(b"HTTP/1.1 200 OK\r\nno colon here\r\n\r\n"),
            Err(WireError::HeaderLine(1))
        );
        assert_eq!(
            parse(b"HTTP/1.1 200 OK\r\nbad name: x\r\n\r\n"),
            Err(WireError::HeaderLine(1))
        );
    }
}

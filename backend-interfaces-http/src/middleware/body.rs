use std::io::Read;

use anyhow::{anyhow, Result};
use axum::http::{header, HeaderMap};
use flate2::read::GzDecoder;
use serde_json::Value;

use crate::error::HttpError;

/// Decodes a request body into JSON. An empty body reads as `null` so the
/// commands can answer with their own "no data" message.
pub fn parse_json_body(headers: &HeaderMap, body: &[u8], limit: usize) -> Result<Value, HttpError> {
    let content = maybe_gunzip(headers, body, limit).map_err(|err| HttpError::invalid(err.to_string()))?;
    if content.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&content).map_err(|err| HttpError::invalid(format!("JSON parse error - {}", err)))
}

fn maybe_gunzip(headers: &HeaderMap, body: &[u8], limit: usize) -> Result<Vec<u8>> {
    let gzip = headers
        .get(header::CONTENT_ENCODING)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().eq_ignore_ascii_case("gzip"))
        .unwrap_or(false);
    if !gzip {
        return Ok(body.to_vec());
    }
    let mut out = Vec::new();
    GzDecoder::new(body)
        .take(limit as u64 + 1)
        .read_to_end(&mut out)
        .map_err(|err| anyhow!("invalid gzip body: {}", err))?;
    if out.len() > limit {
        return Err(anyhow!("decompressed body exceeds {} bytes", limit));
    }
    Ok(out)
}

//! Response classification shared by the async and blocking transports.

use std::time::Duration;

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Method, StatusCode};
use serde_json::Value;

use crate::{Error, Result};

/// Largest response body decoded as JSON (10 MiB).
pub const MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024;

/// Requests taking longer than this are logged at `warn`.
pub const SLOW_REQUEST_THRESHOLD: Duration = Duration::from_secs(5);

/// A fully received HTTP response, before interpretation.
pub(crate) struct RawResponse {
    pub(crate) status: StatusCode,
    pub(crate) headers: HeaderMap,
    pub(crate) body: Vec<u8>,
}

impl RawResponse {
    /// Map error statuses onto the crate's error taxonomy.
    pub(crate) fn error_for_status(&self, path: &str) -> Result<()> {
        let status = self.status;
        match status.as_u16() {
            401 | 403 => Err(Error::Auth {
                status: status.as_u16(),
                body: self.text(),
            }),
            404 => Err(Error::NotFound {
                path: path.to_string(),
            }),
            429 => Err(Error::RateLimited {
                retry_after: parse_retry_after(&self.headers),
            }),
            code if code >= 400 => {
                let body = self.text();
                Err(Error::Api {
                    status: code,
                    message: api_message(status, &body),
                    body,
                })
            }
            _ => Ok(()),
        }
    }

    /// Interpret the body as JSON. `204` and empty bodies yield `None`.
    pub(crate) fn into_json(self, path: &str) -> Result<Option<Value>> {
        self.error_for_status(path)?;

        if self.status == StatusCode::NO_CONTENT || self.body.is_empty() {
            return Ok(None);
        }

        if self.body.len() > MAX_RESPONSE_SIZE {
            tracing::error!(
                path,
                size = self.body.len(),
                limit = MAX_RESPONSE_SIZE,
                "response too large"
            );
            return Err(Error::Api {
                status: self.status.as_u16(),
                message: format!(
                    "response too large: {} bytes exceeds {} byte limit",
                    self.body.len(),
                    MAX_RESPONSE_SIZE
                ),
                body: String::new(),
            });
        }

        serde_json::from_slice(&self.body)
            .map(Some)
            .map_err(|e| Error::Api {
                status: self.status.as_u16(),
                message: format!("invalid JSON in response: {e}"),
                body: self.text(),
            })
    }

    /// Interpret the body as text (CSV exports and similar).
    pub(crate) fn into_text(self, path: &str) -> Result<String> {
        self.error_for_status(path)?;
        match String::from_utf8(self.body) {
            Ok(text) => Ok(text),
            Err(e) => Ok(String::from_utf8_lossy(e.as_bytes()).into_owned()),
        }
    }

    fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Numeric `Retry-After` seconds, if present. HTTP-date values are ignored.
pub(crate) fn parse_retry_after(headers: &HeaderMap) -> Option<f64> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite())
}

/// Best-effort human-readable message for an error body.
fn api_message(status: StatusCode, body: &str) -> String {
    let from_body = serde_json::from_str::<Value>(body).ok().and_then(|json| {
        ["message", "error_description", "error"]
            .iter()
            .find_map(|key| json.get(*key).and_then(Value::as_str).map(String::from))
    });

    from_body
        .or_else(|| status.canonical_reason().map(String::from))
        .unwrap_or_else(|| "request failed".to_string())
}

fn is_slow(elapsed: Duration) -> bool {
    elapsed > SLOW_REQUEST_THRESHOLD
}

pub(crate) fn log_timing(method: &Method, path: &str, elapsed: Duration) {
    let elapsed_ms = elapsed.as_millis() as u64;
    if is_slow(elapsed) {
        tracing::warn!(%method, path, elapsed_ms, "slow request");
    } else {
        tracing::debug!(%method, path, elapsed_ms, "request completed");
    }
}

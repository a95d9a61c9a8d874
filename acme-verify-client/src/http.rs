//! Shared HTTP request plumbing.
//!
//! One place for sending requests, logging, and translating transport-level
//! failures into [`ClientError`]. Status-code semantics that depend on the
//! endpoint (404 means "domain not registered") stay in the client.

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::error::ClientError;

/// Default connect timeout (seconds).
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// Default request timeout (seconds).
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Response bodies longer than this are truncated in debug logs.
const LOG_BODY_MAX_LEN: usize = 2048;

/// Create an HTTP client with timeout configuration.
pub(crate) fn create_http_client() -> Client {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .build()
        .expect("Failed to create HTTP client")
}

fn truncate_for_log(body: &str) -> &str {
    let mut end = body.len().min(LOG_BODY_MAX_LEN);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

/// Performs an HTTP request and returns `(status_code, response_text)`.
///
/// Transport failures map to [`ClientError::Timeout`] /
/// [`ClientError::NetworkError`]; HTTP 429 maps to
/// [`ClientError::RateLimited`] with the `Retry-After` header when present;
/// 502–504 map to [`ClientError::NetworkError`] so the polling loop treats
/// them as transient. All other status codes are returned to the caller.
pub(crate) async fn execute_request(
    request_builder: RequestBuilder,
    method_name: &str,
    url: &str,
) -> Result<(u16, String), ClientError> {
    log::debug!("{method_name} {url}");

    let response = request_builder.send().await.map_err(|e| {
        if e.is_timeout() {
            ClientError::Timeout {
                detail: e.to_string(),
            }
        } else {
            ClientError::NetworkError {
                detail: e.to_string(),
            }
        }
    })?;

    let status_code = response.status().as_u16();
    log::debug!("Response Status: {status_code}");

    // Extract Retry-After header (before consuming the response body)
    let retry_after = response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());

    if status_code == 429 {
        let body = response.text().await.unwrap_or_default();
        log::warn!("Rate limited (HTTP 429), retry_after={retry_after:?}");
        return Err(ClientError::RateLimited {
            retry_after,
            raw_message: Some(body),
        });
    }

    // 502/503/504 are transient gateway failures
    if matches!(status_code, 502..=504) {
        let body = response.text().await.unwrap_or_default();
        log::warn!("Server error (HTTP {status_code})");
        return Err(ClientError::NetworkError {
            detail: format!("HTTP {status_code}: {body}"),
        });
    }

    let response_text = response.text().await.map_err(|e| ClientError::NetworkError {
        detail: format!("Failed to read response body: {e}"),
    })?;

    log::debug!("Response Body: {}", truncate_for_log(&response_text));

    Ok((status_code, response_text))
}

/// Parse a JSON response body.
pub(crate) fn parse_json<T>(response_text: &str) -> Result<T, ClientError>
where
    T: DeserializeOwned,
{
    serde_json::from_str(response_text).map_err(|e| {
        log::error!("JSON parse failed: {e}");
        log::error!("Raw response: {}", truncate_for_log(response_text));
        ClientError::ParseError {
            detail: e.to_string(),
        }
    })
}

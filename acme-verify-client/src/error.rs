use serde::{Deserialize, Serialize};

/// Unified error type for all status-API operations.
///
/// All variants are serializable for structured error reporting.
///
/// # Transient Errors
///
/// The following variants represent transient failures that may succeed on retry:
/// - [`NetworkError`](Self::NetworkError) — network connectivity issues
/// - [`Timeout`](Self::Timeout) — request timed out
/// - [`RateLimited`](Self::RateLimited) — API rate limit exceeded
///
/// The client itself never retries; the polling loop in `acme-verify-core`
/// owns the retry budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "code")]
pub enum ClientError {
    /// A network-level error occurred (DNS resolution failure, connection refused,
    /// HTTP 502–504, etc.).
    NetworkError {
        /// Error details.
        detail: String,
    },

    /// The HTTP request timed out.
    Timeout {
        /// Error details.
        detail: String,
    },

    /// The API rate limit has been exceeded (HTTP 429).
    RateLimited {
        /// Suggested wait time in seconds before retrying, if provided by the API.
        retry_after: Option<u64>,
        /// Original response body, if available.
        raw_message: Option<String>,
    },

    /// The domain is not registered against this site/environment (HTTP 404).
    DomainNotFound {
        /// Domain name that was not found.
        domain: String,
    },

    /// The API rejected the request with a non-2xx status not covered above.
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Response body or error message.
        detail: String,
    },

    /// Failed to parse the API response.
    ParseError {
        /// Details about the parse failure.
        detail: String,
    },
}

impl ClientError {
    /// Whether the failure is transient and worth another attempt.
    ///
    /// Business errors (missing domain, malformed response) are not retried.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::NetworkError { .. } | Self::Timeout { .. } | Self::RateLimited { .. }
        )
    }

    /// Whether it is expected behavior (user input, resource does not exist),
    /// used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error`
    /// when returning `false`.
    #[must_use]
    pub fn is_expected(&self) -> bool {
        matches!(self, Self::DomainNotFound { .. })
    }
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkError { detail } => {
                write!(f, "Network error: {detail}")
            }
            Self::Timeout { detail } => {
                write!(f, "Request timeout: {detail}")
            }
            Self::RateLimited { retry_after, .. } => {
                if let Some(secs) = retry_after {
                    write!(f, "Rate limited (retry after {secs}s)")
                } else {
                    write!(f, "Rate limited")
                }
            }
            Self::DomainNotFound { domain } => {
                write!(
                    f,
                    "The domain '{domain}' has not been added to this site and environment"
                )
            }
            Self::ApiError { status, detail } => {
                write!(f, "API error (HTTP {status}): {detail}")
            }
            Self::ParseError { detail } => {
                write!(f, "Parse error: {detail}")
            }
        }
    }
}

impl std::error::Error for ClientError {}

/// Convenience type alias for `Result<T, ClientError>`.
pub type Result<T> = std::result::Result<T, ClientError>;

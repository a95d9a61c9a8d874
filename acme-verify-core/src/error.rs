//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use acme_verify_client::ClientError;

use crate::types::VerificationFailure;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// Verification cannot currently be attempted; carries the API's
    /// explanation (typically a rate-limit message)
    #[error("{0}")]
    Unavailable(String),

    /// Status and challenge data contradict each other (backend contract
    /// violation, never retried)
    #[error("Inconsistent status data: {0}")]
    InconsistentState(String),

    /// The API reported an ownership status this client does not implement
    #[error("Unimplemented status '{status}' for domain {domain}")]
    UnknownStatus { domain: String, status: String },

    /// The backend repeatedly returned a snapshot without verification data
    #[error("Due to an error, we are temporarily unable to verify domain ownership")]
    TemporarilyUnavailable,

    /// Terminal negative outcome after triggering/polling; carries the
    /// structured diagnostics collected from the last-known snapshot
    #[error("Ownership verification was not successful")]
    VerificationFailed(Box<VerificationFailure>),

    /// The caller cancelled the polling session
    #[error("Verification cancelled")]
    Cancelled,

    /// API client error (converting from library)
    #[error("{0}")]
    Client(#[from] ClientError),
}

impl CoreError {
    /// Whether it is expected behavior (user input, resource does not exist,
    /// negative verification outcome) used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error`
    /// when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Unavailable(_) | Self::VerificationFailed(_) | Self::Cancelled => true,
            Self::Client(e) => e.is_expected(),
            _ => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;

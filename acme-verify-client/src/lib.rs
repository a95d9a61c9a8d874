//! # acme-verify-client
//!
//! Wire-level client for a hosting platform's ACME domain-ownership status
//! API.
//!
//! The API exposes, per site/environment and domain:
//!
//! - `GET {base}/{domain}?acme_version=2` — current ownership/challenge
//!   snapshot, wrapped in a `{ "data": ... }` envelope; HTTP 404 means the
//!   domain is not registered against the site/environment.
//! - `POST {base}/{domain}/verify-ownership` — start asynchronous
//!   ownership verification for one challenge type (form body
//!   `challenge_type`, `client`).
//!
//! ## Usage
//!
//! ```rust,no_run
//! use acme_verify_client::{AcmeStatusApi, ChallengeType, PlatformClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = PlatformClient::new(
//!         "https://api.example/sites/s1/environments/live/acme",
//!         "machine-token",
//!         "acme-verify",
//!     );
//!
//!     let status = client.fetch_status("www.example.com").await?;
//!     if let Some(challenge) = status.challenge(ChallengeType::Dns01) {
//!         println!("TXT {} -> {}", challenge.verification_key, challenge.verification_value);
//!     }
//!
//!     client
//!         .start_verification("www.example.com", ChallengeType::Dns01)
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ClientError>`](ClientError). Transient
//! failures (`NetworkError`, `Timeout`, `RateLimited`) are classified by
//! [`ClientError::is_transient`]. This crate never retries; the polling
//! loop in `acme-verify-core` owns the retry budget.

mod client;
mod error;
mod http;
mod types;

// Re-export error types
pub use error::{ClientError, Result};

// Re-export the API seam and the concrete client
pub use client::{AcmeStatusApi, PlatformClient};

// Re-export wire types
pub use types::{
    ChallengeData, ChallengeType, DomainStatus, OwnershipState, OwnershipStatus,
    PreprovisionResult, PreprovisionState, ProblemDetail,
};

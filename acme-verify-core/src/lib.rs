//! ACME Ownership Verification Core Library
//!
//! Provides the client-side orchestration for proving domain ownership
//! against a hosting platform's ACME status API:
//! - challenge retrieval and status interpretation (Challenge Service)
//! - the verification polling state machine (Verification Service)
//! - pure challenge-artifact formatting (http-01 file, dns-01 TXT record)
//!
//! The wire-level API access lives in `acme-verify-client` behind the
//! `AcmeStatusApi` trait, so frontends and tests can inject their own.

pub mod error;
pub mod services;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{ClientError, CoreError, CoreResult};
pub use services::{ChallengeService, PollConfig, VerificationService};
pub use types::{
    ChallengeReadiness, ChallengeSet, DnsTxtRecord, HttpChallengeFile, VerificationFailure,
    VerificationOutcome,
};

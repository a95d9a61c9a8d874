//! Core domain types: challenge artifacts and verification results.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use acme_verify_client::{ChallengeData, ChallengeType, ProblemDetail};

/// TTL written into generated DNS TXT records (seconds).
pub const DNS_TXT_TTL: u32 = 300;
/// DNS record class for generated TXT records.
pub const DNS_TXT_CLASS: &str = "IN";
/// DNS record type for generated TXT records.
pub const DNS_TXT_RECORD_TYPE: &str = "TXT";

/// Challenge artifacts by type, as handed out by the status endpoint.
pub type ChallengeSet = HashMap<ChallengeType, ChallengeData>;

/// What the caller should do with a domain's challenge, after interpreting
/// the ownership status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ChallengeReadiness {
    /// Verification checks are already done; nothing to do.
    AlreadyCompleted,
    /// HTTPS is not configured for this domain in its current location;
    /// nothing to do.
    NotRequired,
    /// A challenge must be completed; artifacts are available.
    Ready(ChallengeSet),
}

/// Displayable http-01 challenge: a file to write and the URL it must be
/// served from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpChallengeFile {
    /// Name of the file to create (the challenge token).
    pub filename: String,
    /// Exact file contents.
    pub contents: String,
    /// URL path the file must be reachable under, e.g.
    /// `/.well-known/acme-challenge/<token>`.
    pub url_path: String,
}

impl HttpChallengeFile {
    /// Build the file artifact from raw challenge data.
    ///
    /// Precondition: the challenge is an `http-01` entry with a non-empty
    /// token. Callers validate presence before formatting; this function
    /// performs no I/O and no validation.
    #[must_use]
    pub fn from_challenge(challenge: &ChallengeData) -> Self {
        Self {
            filename: challenge.token.clone(),
            contents: challenge.verification_value.clone(),
            url_path: challenge.verification_key.clone(),
        }
    }

    /// The full URL the challenge must be served from.
    #[must_use]
    pub fn serve_url(&self, domain: &str) -> String {
        format!("http://{domain}{}", self.url_path)
    }
}

/// Displayable dns-01 challenge: one TXT record, as a line and as fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsTxtRecord {
    /// Domain the record proves ownership of.
    pub domain: String,
    /// Record name (the challenge's `verification_key`).
    pub record_name: String,
    /// Record TTL in seconds.
    pub ttl: u32,
    /// Record class.
    pub class: String,
    /// Record type.
    pub record_type: String,
    /// TXT record content (the challenge's `verification_value`).
    pub text_data: String,
}

impl DnsTxtRecord {
    /// Build the TXT record from raw challenge data.
    ///
    /// Precondition: the challenge is a `dns-01` entry. Pure; no I/O.
    #[must_use]
    pub fn from_challenge(domain: &str, challenge: &ChallengeData) -> Self {
        Self {
            domain: domain.to_string(),
            record_name: challenge.verification_key.clone(),
            ttl: DNS_TXT_TTL,
            class: DNS_TXT_CLASS.to_string(),
            record_type: DNS_TXT_RECORD_TYPE.to_string(),
            text_data: challenge.verification_value.clone(),
        }
    }

    /// Render as a zone-file style line: `record-name ttl class record-type "text-data"`.
    #[must_use]
    pub fn record_line(&self) -> String {
        format!(
            "{} {} {} {} \"{}\"",
            self.record_name, self.ttl, self.class, self.record_type, self.text_data
        )
    }
}

/// Positive terminal result of a verification session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum VerificationOutcome {
    /// Verification checks were already done; no trigger, no polls.
    AlreadyComplete,
    /// HTTPS is not configured for this domain in its current location;
    /// no trigger, no polls.
    NotRequired,
    /// Ownership was already proven before this session started.
    AlreadyVerified,
    /// Ownership was proven during this session.
    Verified,
}

/// Structured diagnostics for a failed (or timed-out) verification session.
///
/// Built from the last-known status snapshot; no re-fetch is performed for
/// reporting. Carried inside [`CoreError::VerificationFailed`](crate::CoreError).
#[derive(Debug, Clone, Default, Serialize)]
pub struct VerificationFailure {
    /// Challenge type this session was verifying.
    pub challenge_type: Option<ChallengeType>,
    /// Rich diagnostic from the backend's last attempt, if any.
    pub problem: Option<ProblemDetail>,
    /// Set when ownership verification has become unavailable (typically the
    /// user attempted more times than the CA allows per hour). Can co-occur
    /// with `problem`.
    pub rate_limit_warning: Option<String>,
    /// The challenge's `verification_value` changed between the start of the
    /// session and the last snapshot; the old artifact cannot be tried again.
    pub challenge_changed: bool,
    /// Latest challenge data for the session's type, for regenerating the
    /// artifact when `challenge_changed` is set.
    pub current_challenge: Option<ChallengeData>,
    /// The poll budget ran out before the backend reached a terminal state.
    pub timed_out: bool,
}

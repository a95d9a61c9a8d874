//! Wire model for the ACME ownership-status endpoint.
//!
//! Everything here is a read-only snapshot: deserialized once per request,
//! validated at the boundary, never mutated client-side. The endpoint
//! conflates two status vocabularies ([`OwnershipState`] on the outer
//! object, [`PreprovisionState`] on the nested verification attempt); they
//! are modeled as two distinct enums and bridged in `acme-verify-core`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// ACME challenge type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChallengeType {
    /// Ownership proof by serving a file at a well-known URL path.
    #[serde(rename = "http-01")]
    Http01,
    /// Ownership proof by publishing a DNS TXT record.
    #[serde(rename = "dns-01")]
    Dns01,
}

impl ChallengeType {
    /// Wire identifier, as used in challenge maps and form bodies.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http01 => "http-01",
            Self::Dns01 => "dns-01",
        }
    }
}

impl std::fmt::Display for ChallengeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ChallengeType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "http-01" => Ok(Self::Http01),
            "dns-01" => Ok(Self::Dns01),
            other => Err(format!("unknown challenge type: {other}")),
        }
    }
}

/// The artifact needed to prove ownership for one challenge type.
///
/// For `http-01` the `token` is the filename, `verification_value` the file
/// contents and `verification_key` the URL path the file must be served
/// from. For `dns-01` the `verification_key` is the TXT record name and
/// `verification_value` the record content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeData {
    /// Challenge token (http-01 only; empty for dns-01).
    #[serde(default)]
    pub token: String,
    /// URL path (http-01) or DNS record name (dns-01).
    pub verification_key: String,
    /// File contents (http-01) or TXT record content (dns-01).
    pub verification_value: String,
}

/// Outer ownership-status vocabulary.
///
/// Unrecognized tokens are preserved as [`Unknown`](Self::Unknown) so the
/// caller can report exactly what the API said.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OwnershipState {
    /// A challenge must be completed before a certificate can be issued.
    Required,
    /// Verification checks are done.
    Completed,
    /// HTTPS is not configured for this domain in its current location.
    NotRequired,
    /// Verification cannot currently be attempted (typically rate limited).
    Unavailable,
    /// A state this client does not recognize.
    Unknown(String),
}

impl From<String> for OwnershipState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "required" => Self::Required,
            "completed" => Self::Completed,
            "not_required" => Self::NotRequired,
            "unavailable" => Self::Unavailable,
            _ => Self::Unknown(s),
        }
    }
}

impl From<OwnershipState> for String {
    fn from(state: OwnershipState) -> Self {
        state.to_string()
    }
}

impl std::fmt::Display for OwnershipState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Required => f.write_str("required"),
            Self::Completed => f.write_str("completed"),
            Self::NotRequired => f.write_str("not_required"),
            Self::Unavailable => f.write_str("unavailable"),
            Self::Unknown(s) => f.write_str(s),
        }
    }
}

/// Nested verification-attempt vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PreprovisionState {
    /// Ownership has been proven.
    Success,
    /// The last verification attempt failed.
    Failed,
    /// A verification attempt is running.
    InProgress,
    /// A state this client does not recognize; treated like
    /// [`InProgress`](Self::InProgress) by the poller.
    Unknown(String),
}

impl From<String> for PreprovisionState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "success" => Self::Success,
            "failed" => Self::Failed,
            "in_progress" => Self::InProgress,
            _ => Self::Unknown(s),
        }
    }
}

impl From<PreprovisionState> for String {
    fn from(state: PreprovisionState) -> Self {
        state.to_string()
    }
}

impl std::fmt::Display for PreprovisionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::Failed => f.write_str("failed"),
            Self::InProgress => f.write_str("in_progress"),
            Self::Unknown(s) => f.write_str(s),
        }
    }
}

/// Rich diagnostic attached to a failed verification attempt.
///
/// Every field is optional; the backend fills in whatever it knows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDetail {
    /// Short human-readable summary.
    #[serde(default)]
    pub title: Option<String>,
    /// Longer explanation of what went wrong.
    #[serde(default)]
    pub detail: Option<String>,
    /// What the user should do next.
    #[serde(default)]
    pub action_item: Option<String>,
    /// ACME problem type URN.
    #[serde(default)]
    pub problem_type: Option<String>,
    /// Raw detail string from the CA.
    #[serde(default)]
    pub raw_detail: Option<String>,
    /// Link to relevant documentation.
    #[serde(default)]
    pub docs_link: Option<String>,
    /// Reference to quote when contacting support.
    #[serde(default)]
    pub support_reference: Option<String>,
}

impl ProblemDetail {
    /// Whether any diagnostic field is populated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.detail.is_none()
            && self.action_item.is_none()
            && self.problem_type.is_none()
            && self.raw_detail.is_none()
            && self.docs_link.is_none()
            && self.support_reference.is_none()
    }
}

/// Backend-side record of the asynchronous verification attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreprovisionResult {
    /// Progress/outcome of the attempt.
    pub status: PreprovisionState,
    /// Diagnostics from the most recent failed attempt, if any.
    #[serde(default)]
    pub last_preprovision_problem: Option<ProblemDetail>,
}

/// Ownership status of a domain, including the nested verification attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipStatus {
    /// Outer ownership-status vocabulary.
    pub status: OwnershipState,
    /// Human-readable explanation, present when status is `unavailable`.
    #[serde(default)]
    pub message: Option<String>,
    /// Missing until the backend has built the verification-attempt object.
    #[serde(default)]
    pub preprovision_result: Option<PreprovisionResult>,
}

/// Snapshot returned by the status endpoint for one domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainStatus {
    /// Missing when the backend could not build the status object in time.
    #[serde(default)]
    pub ownership_status: Option<OwnershipStatus>,
    /// Challenge artifacts keyed by challenge type.
    #[serde(default)]
    pub challenges: Option<HashMap<ChallengeType, ChallengeData>>,
}

impl DomainStatus {
    /// The nested verification-attempt record, if the backend has built one.
    #[must_use]
    pub fn preprovision(&self) -> Option<&PreprovisionResult> {
        self.ownership_status
            .as_ref()
            .and_then(|o| o.preprovision_result.as_ref())
    }

    /// The challenge artifact for one challenge type, if present.
    #[must_use]
    pub fn challenge(&self, challenge_type: ChallengeType) -> Option<&ChallengeData> {
        self.challenges.as_ref().and_then(|c| c.get(&challenge_type))
    }

    /// The current `verification_value` for one challenge type, if present.
    ///
    /// The backend may rotate this between polls; the poller compares it
    /// against the value it started with.
    #[must_use]
    pub fn challenge_value(&self, challenge_type: ChallengeType) -> Option<&str> {
        self.challenge(challenge_type)
            .map(|c| c.verification_value.as_str())
    }
}

/// Response envelope used by the status endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiEnvelope<T> {
    pub data: T,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn challenge_type_round_trip() {
        assert_eq!(ChallengeType::Http01.as_str(), "http-01");
        assert_eq!(ChallengeType::Dns01.as_str(), "dns-01");
        assert_eq!("http-01".parse::<ChallengeType>(), Ok(ChallengeType::Http01));
        assert_eq!("dns-01".parse::<ChallengeType>(), Ok(ChallengeType::Dns01));
        assert!("tls-alpn-01".parse::<ChallengeType>().is_err());
    }

    #[test]
    fn ownership_state_from_string() {
        assert_eq!(OwnershipState::from("required".to_string()), OwnershipState::Required);
        assert_eq!(
            OwnershipState::from("not_required".to_string()),
            OwnershipState::NotRequired
        );
        assert_eq!(
            OwnershipState::from("something_new".to_string()),
            OwnershipState::Unknown("something_new".to_string())
        );
    }

    #[test]
    fn preprovision_state_from_string() {
        assert_eq!(
            PreprovisionState::from("in_progress".to_string()),
            PreprovisionState::InProgress
        );
        assert_eq!(
            PreprovisionState::from("queued".to_string()),
            PreprovisionState::Unknown("queued".to_string())
        );
    }

    #[test]
    fn deserialize_full_status() {
        let json = r#"{
            "ownership_status": {
                "status": "required",
                "preprovision_result": {
                    "status": "failed",
                    "last_preprovision_problem": {
                        "title": "Challenge file not found",
                        "docs_link": "https://docs.example/acme"
                    }
                }
            },
            "challenges": {
                "http-01": {
                    "token": "tok1",
                    "verification_key": "/.well-known/acme-challenge/tok1",
                    "verification_value": "val1"
                },
                "dns-01": {
                    "verification_key": "_acme-challenge.example.com",
                    "verification_value": "abc123"
                }
            }
        }"#;

        let status: DomainStatus = serde_json::from_str(json).unwrap();
        assert_eq!(
            status.ownership_status.as_ref().unwrap().status,
            OwnershipState::Required
        );
        assert_eq!(
            status.preprovision().unwrap().status,
            PreprovisionState::Failed
        );
        let problem = status
            .preprovision()
            .unwrap()
            .last_preprovision_problem
            .as_ref()
            .unwrap();
        assert_eq!(problem.title.as_deref(), Some("Challenge file not found"));
        assert!(!problem.is_empty());

        let http = status.challenge(ChallengeType::Http01).unwrap();
        assert_eq!(http.token, "tok1");
        // dns-01 entries carry no token
        let dns = status.challenge(ChallengeType::Dns01).unwrap();
        assert_eq!(dns.token, "");
        assert_eq!(status.challenge_value(ChallengeType::Dns01), Some("abc123"));
    }

    #[test]
    fn deserialize_empty_status() {
        let status: DomainStatus = serde_json::from_str("{}").unwrap();
        assert!(status.ownership_status.is_none());
        assert!(status.preprovision().is_none());
        assert!(status.challenge(ChallengeType::Http01).is_none());
    }

    #[test]
    fn deserialize_status_without_preprovision() {
        let json = r#"{"ownership_status": {"status": "unavailable", "message": "try later"}}"#;
        let status: DomainStatus = serde_json::from_str(json).unwrap();
        let ownership = status.ownership_status.as_ref().unwrap();
        assert_eq!(ownership.status, OwnershipState::Unavailable);
        assert_eq!(ownership.message.as_deref(), Some("try later"));
        assert!(status.preprovision().is_none());
    }

    #[test]
    fn problem_detail_empty() {
        assert!(ProblemDetail::default().is_empty());
        let p = ProblemDetail {
            support_reference: Some("REF-1".to_string()),
            ..ProblemDetail::default()
        };
        assert!(!p.is_empty());
    }
}

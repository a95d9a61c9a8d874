//! Challenge retrieval and ownership-status interpretation.

use std::sync::Arc;

use acme_verify_client::{AcmeStatusApi, ChallengeData, ChallengeType, DomainStatus, OwnershipState};

use crate::error::{CoreError, CoreResult};
use crate::types::{ChallengeReadiness, ChallengeSet};

/// Fetches a domain's ownership status and turns it into something the
/// caller can act on: a no-op, a challenge set, or a typed error.
pub struct ChallengeService {
    api: Arc<dyn AcmeStatusApi>,
}

impl ChallengeService {
    /// Create a challenge service over the given status API.
    #[must_use]
    pub fn new(api: Arc<dyn AcmeStatusApi>) -> Self {
        Self { api }
    }

    /// Fetch and interpret the ownership status for `domain`.
    pub async fn challenge_readiness(&self, domain: &str) -> CoreResult<ChallengeReadiness> {
        let status = self.api.fetch_status(domain).await?;
        interpret_readiness(domain, status)
    }
}

/// Bridge the outer ownership-status vocabulary into a challenge decision.
///
/// The status endpoint conflates two vocabularies; this is the translation
/// for the outer one. `completed`/`not_required` are no-ops, `unavailable`
/// surfaces the API's message, `required` must carry challenge data or the
/// snapshot is inconsistent, and anything else is a contract this client
/// does not implement.
pub fn interpret_readiness(domain: &str, status: DomainStatus) -> CoreResult<ChallengeReadiness> {
    let Some(ownership) = status.ownership_status else {
        return Err(CoreError::InconsistentState(format!(
            "no ownership status returned for domain {domain}"
        )));
    };

    match ownership.status {
        OwnershipState::Completed => Ok(ChallengeReadiness::AlreadyCompleted),
        OwnershipState::NotRequired => Ok(ChallengeReadiness::NotRequired),
        OwnershipState::Unavailable => {
            Err(CoreError::Unavailable(ownership.message.unwrap_or_default()))
        }
        OwnershipState::Required => match status.challenges {
            Some(challenges) if !challenges.is_empty() => Ok(ChallengeReadiness::Ready(challenges)),
            _ => Err(CoreError::InconsistentState(format!(
                "no challenge information currently available for domain {domain}"
            ))),
        },
        other => Err(CoreError::UnknownStatus {
            domain: domain.to_string(),
            status: other.to_string(),
        }),
    }
}

/// Pick one challenge type out of a ready challenge set.
///
/// A `required` status without an entry for the requested type is a backend
/// contract violation, reported as [`CoreError::InconsistentState`].
pub fn require_challenge<'a>(
    challenges: &'a ChallengeSet,
    domain: &str,
    challenge_type: ChallengeType,
) -> CoreResult<&'a ChallengeData> {
    challenges.get(&challenge_type).ok_or_else(|| {
        CoreError::InconsistentState(format!(
            "no {challenge_type} challenge information available for domain {domain}"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{status_builder, MockStatusApi};
    use acme_verify_client::ClientError;

    #[test]
    fn completed_is_a_noop() {
        let status = status_builder().ownership("completed").build();
        let readiness = interpret_readiness("example.com", status).unwrap();
        assert_eq!(readiness, ChallengeReadiness::AlreadyCompleted);
    }

    #[test]
    fn not_required_is_a_noop() {
        let status = status_builder().ownership("not_required").build();
        let readiness = interpret_readiness("example.com", status).unwrap();
        assert_eq!(readiness, ChallengeReadiness::NotRequired);
    }

    #[test]
    fn unavailable_surfaces_exact_message() {
        let status = status_builder()
            .ownership("unavailable")
            .message("Too many attempts this hour.")
            .build();
        let err = interpret_readiness("example.com", status).unwrap_err();
        match err {
            CoreError::Unavailable(msg) => assert_eq!(msg, "Too many attempts this hour."),
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }

    #[test]
    fn unavailable_without_message_still_fails() {
        let status = status_builder().ownership("unavailable").build();
        let err = interpret_readiness("example.com", status).unwrap_err();
        assert!(matches!(err, CoreError::Unavailable(_)));
    }

    #[test]
    fn required_without_challenges_is_inconsistent() {
        let status = status_builder().ownership("required").build();
        let err = interpret_readiness("example.com", status).unwrap_err();
        assert!(matches!(err, CoreError::InconsistentState(_)));
    }

    #[test]
    fn required_with_challenges_is_ready() {
        let status = status_builder()
            .ownership("required")
            .http_challenge("tok1", "/.well-known/acme-challenge/tok1", "val1")
            .build();
        match interpret_readiness("example.com", status).unwrap() {
            ChallengeReadiness::Ready(challenges) => {
                assert!(challenges.contains_key(&ChallengeType::Http01));
            }
            other => panic!("expected Ready, got {other:?}"),
        }
    }

    #[test]
    fn missing_ownership_status_is_inconsistent() {
        let err = interpret_readiness("example.com", DomainStatus::default()).unwrap_err();
        assert!(matches!(err, CoreError::InconsistentState(_)));
    }

    #[test]
    fn unknown_status_is_reported_verbatim() {
        let status = status_builder().ownership("pending_review").build();
        let err = interpret_readiness("example.com", status).unwrap_err();
        assert!(matches!(
            err,
            CoreError::UnknownStatus { status, .. } if status == "pending_review"
        ));
    }

    #[test]
    fn require_challenge_missing_type() {
        let status = status_builder()
            .ownership("required")
            .http_challenge("tok1", "/path", "val1")
            .build();
        let ChallengeReadiness::Ready(challenges) =
            interpret_readiness("example.com", status).unwrap()
        else {
            panic!("expected Ready");
        };
        assert!(require_challenge(&challenges, "example.com", ChallengeType::Http01).is_ok());
        let err =
            require_challenge(&challenges, "example.com", ChallengeType::Dns01).unwrap_err();
        assert!(matches!(err, CoreError::InconsistentState(_)));
    }

    #[tokio::test]
    async fn service_propagates_not_found() {
        let api = MockStatusApi::new();
        api.push_fetch_error(ClientError::DomainNotFound {
            domain: "example.com".to_string(),
        })
        .await;
        let service = ChallengeService::new(Arc::new(api));
        let err = service.challenge_readiness("example.com").await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::Client(ClientError::DomainNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn service_interprets_fetched_status() {
        let api = MockStatusApi::new();
        api.push_status(status_builder().ownership("completed").build())
            .await;
        let service = ChallengeService::new(Arc::new(api));
        let readiness = service.challenge_readiness("example.com").await.unwrap();
        assert_eq!(readiness, ChallengeReadiness::AlreadyCompleted);
    }
}

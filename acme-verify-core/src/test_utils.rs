//! Test helpers: a scripted status API and a snapshot builder.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::Mutex;

use acme_verify_client::{
    AcmeStatusApi, ChallengeData, ChallengeType, ClientError, DomainStatus, OwnershipState,
    OwnershipStatus, PreprovisionResult, PreprovisionState, ProblemDetail, Result,
};

// ===== MockStatusApi =====

/// Scripted [`AcmeStatusApi`]: responses are served in push order, and every
/// fetch/trigger is recorded for assertions.
pub struct MockStatusApi {
    responses: Mutex<VecDeque<Result<DomainStatus>>>,
    fetches: Mutex<Vec<String>>,
    triggers: Mutex<Vec<(String, ChallengeType)>>,
    trigger_error: Mutex<Option<ClientError>>,
}

impl MockStatusApi {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            fetches: Mutex::new(Vec::new()),
            triggers: Mutex::new(Vec::new()),
            trigger_error: Mutex::new(None),
        }
    }

    /// Queue a successful fetch response.
    pub async fn push_status(&self, status: DomainStatus) {
        self.responses.lock().await.push_back(Ok(status));
    }

    /// Queue a failed fetch response.
    pub async fn push_fetch_error(&self, error: ClientError) {
        self.responses.lock().await.push_back(Err(error));
    }

    /// Make every `start_verification` call fail with `error`.
    pub async fn set_trigger_error(&self, error: ClientError) {
        *self.trigger_error.lock().await = Some(error);
    }

    /// Number of fetches performed so far.
    pub async fn fetch_count(&self) -> usize {
        self.fetches.lock().await.len()
    }

    /// Every `start_verification` call recorded so far.
    pub async fn triggers(&self) -> Vec<(String, ChallengeType)> {
        self.triggers.lock().await.clone()
    }
}

#[async_trait]
impl AcmeStatusApi for MockStatusApi {
    async fn fetch_status(&self, domain: &str) -> Result<DomainStatus> {
        self.fetches.lock().await.push(domain.to_string());
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| {
                Err(ClientError::NetworkError {
                    detail: "mock response queue exhausted".to_string(),
                })
            })
    }

    async fn start_verification(&self, domain: &str, challenge_type: ChallengeType) -> Result<()> {
        if let Some(error) = self.trigger_error.lock().await.clone() {
            return Err(error);
        }
        self.triggers
            .lock()
            .await
            .push((domain.to_string(), challenge_type));
        Ok(())
    }
}

// ===== Snapshot builder =====

/// Builder for [`DomainStatus`] snapshots in the shapes the API produces.
pub struct StatusBuilder {
    ownership: Option<String>,
    message: Option<String>,
    preprovision: Option<String>,
    problem_title: Option<String>,
    challenges: Vec<(ChallengeType, ChallengeData)>,
}

/// Start building a status snapshot.
pub fn status_builder() -> StatusBuilder {
    StatusBuilder {
        ownership: None,
        message: None,
        preprovision: None,
        problem_title: None,
        challenges: Vec::new(),
    }
}

impl StatusBuilder {
    /// Set the outer ownership state (wire token, e.g. `"required"`).
    pub fn ownership(mut self, state: &str) -> Self {
        self.ownership = Some(state.to_string());
        self
    }

    /// Set the `unavailable` explanation message.
    pub fn message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }

    /// Set the nested verification-attempt state (wire token, e.g. `"failed"`).
    pub fn preprovision(mut self, state: &str) -> Self {
        self.preprovision = Some(state.to_string());
        self
    }

    /// Attach a `last_preprovision_problem` with the given title.
    pub fn problem_title(mut self, title: &str) -> Self {
        self.problem_title = Some(title.to_string());
        self
    }

    /// Add an http-01 challenge entry.
    pub fn http_challenge(mut self, token: &str, key: &str, value: &str) -> Self {
        self.challenges.push((
            ChallengeType::Http01,
            ChallengeData {
                token: token.to_string(),
                verification_key: key.to_string(),
                verification_value: value.to_string(),
            },
        ));
        self
    }

    /// Add a dns-01 challenge entry.
    pub fn dns_challenge(mut self, key: &str, value: &str) -> Self {
        self.challenges.push((
            ChallengeType::Dns01,
            ChallengeData {
                token: String::new(),
                verification_key: key.to_string(),
                verification_value: value.to_string(),
            },
        ));
        self
    }

    pub fn build(self) -> DomainStatus {
        let preprovision_result = self.preprovision.map(|state| PreprovisionResult {
            status: PreprovisionState::from(state),
            last_preprovision_problem: self.problem_title.map(|title| ProblemDetail {
                title: Some(title),
                ..ProblemDetail::default()
            }),
        });

        let ownership_status = self.ownership.map(|state| OwnershipStatus {
            status: OwnershipState::from(state),
            message: self.message,
            preprovision_result,
        });

        let challenges = if self.challenges.is_empty() {
            None
        } else {
            Some(self.challenges.into_iter().collect())
        };

        DomainStatus {
            ownership_status,
            challenges,
        }
    }
}

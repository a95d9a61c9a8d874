//! Ownership-verification polling state machine.
//!
//! One session walks `Unverified → Triggering → Polling` and ends in
//! `Success`, `Failed`, or `TimedOut`. The backend may rotate the challenge
//! while a session runs, so the session records the challenge value it
//! started with and reports a change on failure.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use acme_verify_client::{
    AcmeStatusApi, ChallengeType, ClientError, DomainStatus, OwnershipState, PreprovisionState,
};

use crate::error::{CoreError, CoreResult};
use crate::types::{VerificationFailure, VerificationOutcome};

/// Default number of poll iterations.
const DEFAULT_MAX_ATTEMPTS: u32 = 15;
/// Default delay before each poll iteration (seconds).
const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;
/// Default tolerance for fetch failures within one session.
const DEFAULT_MAX_FETCH_FAILURES: u32 = 3;
/// Default tolerance for snapshots missing the verification-attempt object.
const DEFAULT_MAX_MISSING_STATUS: u32 = 10;

/// Polling-loop configuration.
///
/// Tests run the state machine with `interval: Duration::ZERO`; production
/// callers keep the defaults.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Maximum poll iterations before the session times out. Transient
    /// failures consume an iteration slot like any other poll.
    pub max_attempts: u32,
    /// Sleep before each poll iteration.
    pub interval: Duration,
    /// Fetch failures tolerated per session; one more aborts the session
    /// with the fetch error as fatal. Only a missing domain is exempt and
    /// aborts immediately.
    pub max_fetch_failures: u32,
    /// Snapshots without a verification-attempt object tolerated per
    /// session; one more aborts with a "temporarily unable" error.
    pub max_missing_status: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            max_fetch_failures: DEFAULT_MAX_FETCH_FAILURES,
            max_missing_status: DEFAULT_MAX_MISSING_STATUS,
        }
    }
}

/// Runs ownership-verification sessions against the status API.
///
/// Each call to [`verify`](Self::verify) is an independent session with its
/// own counters; the only shared resource is the API client, which is used
/// strictly sequentially within a session.
pub struct VerificationService {
    api: Arc<dyn AcmeStatusApi>,
    config: PollConfig,
}

impl VerificationService {
    /// Create a verification service with the default poll configuration.
    #[must_use]
    pub fn new(api: Arc<dyn AcmeStatusApi>) -> Self {
        Self::with_config(api, PollConfig::default())
    }

    /// Create a verification service with a custom poll configuration.
    #[must_use]
    pub fn with_config(api: Arc<dyn AcmeStatusApi>, config: PollConfig) -> Self {
        Self { api, config }
    }

    /// Run one verification session for `domain` and `challenge_type`.
    ///
    /// Triggers backend verification if it has not started (at most once per
    /// session), then polls until the backend reports success or failure,
    /// the poll budget runs out, or `cancel` fires during an interval sleep.
    ///
    /// Negative terminal states surface as
    /// [`CoreError::VerificationFailed`] carrying the structured
    /// [`VerificationFailure`](crate::types::VerificationFailure) report
    /// built from the last-known snapshot.
    pub async fn verify(
        &self,
        domain: &str,
        challenge_type: ChallengeType,
        cancel: &CancellationToken,
    ) -> CoreResult<VerificationOutcome> {
        let initial = self.api.fetch_status(domain).await?;

        if let Some(outcome) = preflight(domain, &initial)? {
            return Ok(outcome);
        }

        // The backend may rotate the challenge between polls; keep the value
        // this session started with for change detection.
        let baseline = initial
            .challenge_value(challenge_type)
            .map(ToString::to_string);

        match initial.preprovision().map(|p| p.status.clone()) {
            Some(PreprovisionState::Success) => {
                log::info!("Ownership verification for {domain} is complete");
                return Ok(VerificationOutcome::AlreadyVerified);
            }
            Some(PreprovisionState::InProgress | PreprovisionState::Unknown(_)) => {
                log::info!("Verification for {domain} already in progress, polling");
            }
            // None: the backend has not built the verification-attempt
            // object yet; launch verification and poll like a failed attempt.
            Some(PreprovisionState::Failed) | None => {
                self.api.start_verification(domain, challenge_type).await?;
                log::info!("The challenge for {domain} is being verified");
            }
        }

        self.poll(domain, challenge_type, initial, baseline, cancel)
            .await
    }

    async fn poll(
        &self,
        domain: &str,
        challenge_type: ChallengeType,
        initial: DomainStatus,
        baseline: Option<String>,
        cancel: &CancellationToken,
    ) -> CoreResult<VerificationOutcome> {
        let mut fetch_failures: u32 = 0;
        let mut missing_status: u32 = 0;
        let mut last_status = initial;

        for attempt in 1..=self.config.max_attempts {
            tokio::select! {
                () = cancel.cancelled() => return Err(CoreError::Cancelled),
                () = tokio::time::sleep(self.config.interval) => {}
            }

            let status = match self.api.fetch_status(domain).await {
                Ok(status) => status,
                // A missing domain is final; any other fetch failure (network,
                // timeout, rate limit, 5xx, malformed body) consumes the budget
                Err(e @ ClientError::DomainNotFound { .. }) => return Err(e.into()),
                Err(e) => {
                    fetch_failures += 1;
                    if fetch_failures > self.config.max_fetch_failures {
                        return Err(e.into());
                    }
                    log::warn!(
                        "Status fetch for {domain} failed (poll {attempt}/{}): {e}",
                        self.config.max_attempts
                    );
                    continue;
                }
            };

            let state = status.preprovision().map(|p| p.status.clone());
            last_status = status;

            let Some(state) = state else {
                missing_status += 1;
                if missing_status > self.config.max_missing_status {
                    return Err(CoreError::TemporarilyUnavailable);
                }
                continue;
            };

            match state {
                PreprovisionState::Success => {
                    log::info!("Ownership verification for {domain} is complete");
                    return Ok(VerificationOutcome::Verified);
                }
                PreprovisionState::Failed => {
                    return Err(failure(&last_status, challenge_type, baseline.as_deref(), false));
                }
                PreprovisionState::InProgress | PreprovisionState::Unknown(_) => {}
            }
        }

        // Budget exhausted without a terminal state; report like a failure
        Err(failure(&last_status, challenge_type, baseline.as_deref(), true))
    }
}

/// Outer-vocabulary short circuit before any trigger or poll.
///
/// Returns a no-op outcome for `completed`/`not_required`, fails for
/// `unavailable` and inconsistent `required` snapshots, and returns `None`
/// when the session should proceed to trigger/poll. A snapshot without any
/// ownership status also proceeds: the backend has not built the status
/// object yet and verification must be launched to make progress.
fn preflight(domain: &str, status: &DomainStatus) -> CoreResult<Option<VerificationOutcome>> {
    let Some(ownership) = status.ownership_status.as_ref() else {
        return Ok(None);
    };

    match &ownership.status {
        OwnershipState::Completed => {
            log::info!("Domain verification for {domain} has been completed");
            Ok(Some(VerificationOutcome::AlreadyComplete))
        }
        OwnershipState::NotRequired => {
            log::info!("Domain verification for {domain} is not necessary");
            Ok(Some(VerificationOutcome::NotRequired))
        }
        OwnershipState::Unavailable => Err(CoreError::Unavailable(
            ownership.message.clone().unwrap_or_default(),
        )),
        OwnershipState::Required => {
            let has_challenges = status.challenges.as_ref().is_some_and(|c| !c.is_empty());
            if has_challenges {
                Ok(None)
            } else {
                Err(CoreError::InconsistentState(format!(
                    "no challenge information currently available for domain {domain}"
                )))
            }
        }
        other => Err(CoreError::UnknownStatus {
            domain: domain.to_string(),
            status: other.to_string(),
        }),
    }
}

/// Build the failure report from the last-known snapshot. No re-fetch.
fn failure(
    status: &DomainStatus,
    challenge_type: ChallengeType,
    baseline: Option<&str>,
    timed_out: bool,
) -> CoreError {
    let problem = status
        .preprovision()
        .and_then(|p| p.last_preprovision_problem.clone())
        .filter(|p| !p.is_empty());

    let rate_limit_warning = status.ownership_status.as_ref().and_then(|o| {
        if o.status == OwnershipState::Unavailable {
            o.message.clone()
        } else {
            None
        }
    });

    let current_challenge = status.challenge(challenge_type).cloned();
    // A rotated challenge invalidates the artifact the user set up; absence
    // of fresh challenge data means there is nothing to re-render.
    let challenge_changed = match (baseline, current_challenge.as_ref()) {
        (Some(old), Some(new)) => old != new.verification_value,
        (None, Some(_)) => true,
        (_, None) => false,
    };

    CoreError::VerificationFailed(Box::new(VerificationFailure {
        challenge_type: Some(challenge_type),
        problem,
        rate_limit_warning,
        challenge_changed,
        current_challenge,
        timed_out,
    }))
}

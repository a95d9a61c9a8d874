//! Command implementations.

pub mod challenge;
pub mod verify;

use acme_verify_core::ChallengeReadiness;

/// Log the no-op outcomes shared by the challenge commands. Returns the
/// ready challenge set when there is work to do.
pub(crate) fn report_readiness(
    domain: &str,
    readiness: ChallengeReadiness,
) -> Option<acme_verify_core::ChallengeSet> {
    match readiness {
        ChallengeReadiness::AlreadyCompleted => {
            log::info!("Domain verification for {domain} has been completed.");
            None
        }
        ChallengeReadiness::NotRequired => {
            log::info!(
                "Domain verification for {domain} is not necessary; https has not been \
                 configured for this domain in its current location."
            );
            None
        }
        ChallengeReadiness::Ready(challenges) => Some(challenges),
    }
}

//! Business-logic service layer.

mod challenge_service;
mod verification_service;

pub use challenge_service::{interpret_readiness, require_challenge, ChallengeService};
pub use verification_service::{PollConfig, VerificationService};

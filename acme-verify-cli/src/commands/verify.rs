//! The `verify` command: trigger and poll ownership verification, then
//! render the outcome.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use acme_verify_client::{AcmeStatusApi, ChallengeType};
use acme_verify_core::{
    CoreError, DnsTxtRecord, VerificationFailure, VerificationOutcome, VerificationService,
};

pub async fn run(
    api: Arc<dyn AcmeStatusApi>,
    domain: &str,
    challenge_type: ChallengeType,
) -> anyhow::Result<()> {
    let service = VerificationService::new(api);

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupt received, stopping after the current poll");
            signal_cancel.cancel();
        }
    });

    log::info!("Verifying the {challenge_type} challenge for {domain}...");
    match service.verify(domain, challenge_type, &cancel).await {
        Ok(outcome) => {
            render_success(domain, outcome);
            Ok(())
        }
        Err(CoreError::VerificationFailed(report)) => {
            render_failure(domain, &report);
            anyhow::bail!("Ownership verification was not successful.");
        }
        Err(e) => Err(e.into()),
    }
}

fn render_success(domain: &str, outcome: VerificationOutcome) {
    match outcome {
        VerificationOutcome::AlreadyComplete => {
            println!("Verification checks for {domain} have been completed.");
        }
        VerificationOutcome::NotRequired => {
            println!("Domain verification for {domain} is not necessary.");
        }
        VerificationOutcome::AlreadyVerified => {
            println!("Ownership verification for {domain} is complete!");
        }
        VerificationOutcome::Verified => {
            println!("Ownership verification is complete!");
            println!("Your HTTPS certificate will be deployed shortly.");
        }
    }
}

fn render_failure(domain: &str, report: &VerificationFailure) {
    if report.timed_out {
        log::warn!("Verification did not finish within the polling budget.");
    }

    if let Some(problem) = &report.problem {
        for line in [&problem.title, &problem.detail, &problem.action_item]
            .into_iter()
            .flatten()
        {
            println!("{line}");
        }

        if problem.problem_type.is_some() || problem.raw_detail.is_some() {
            println!();
            println!("Raw verification result:");
            for line in [&problem.problem_type, &problem.raw_detail]
                .into_iter()
                .flatten()
            {
                println!("{line}");
            }
        }

        if let Some(link) = &problem.docs_link {
            println!("See {link} for assistance.");
        }
        if let Some(reference) = &problem.support_reference {
            println!("Or contact support with reference \"{reference}\".");
        }
    } else {
        println!("Double-check that your challenge is being served correctly.");
    }

    // Typically the user attempted more times than the CA allows per hour
    if let Some(warning) = &report.rate_limit_warning {
        log::warn!("{warning}");
    }

    if report.challenge_changed {
        log::warn!("The old challenge cannot be tried again.");
        match (report.challenge_type, &report.current_challenge) {
            (Some(ChallengeType::Dns01), Some(challenge)) => {
                let record = DnsTxtRecord::from_challenge(domain, challenge);
                log::warn!(
                    "Please update your DNS to serve the new challenge below:\n{}",
                    record.record_line()
                );
            }
            (Some(ChallengeType::Http01), _) => {
                log::warn!(
                    "Please run 'acme-verify challenge-file {domain}' again to obtain a new \
                     challenge file."
                );
            }
            _ => {}
        }
    }
}

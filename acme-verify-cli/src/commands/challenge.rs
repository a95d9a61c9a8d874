//! Challenge-artifact commands: write the http-01 file, print the dns-01
//! TXT record.

use std::sync::Arc;

use anyhow::Context;

use acme_verify_client::{AcmeStatusApi, ChallengeType};
use acme_verify_core::services::require_challenge;
use acme_verify_core::{ChallengeService, DnsTxtRecord, HttpChallengeFile};

use super::report_readiness;

/// `challenge-file`: write the http-01 challenge to the current directory
/// and print serving instructions.
pub async fn write_file(api: Arc<dyn AcmeStatusApi>, domain: &str) -> anyhow::Result<()> {
    let service = ChallengeService::new(api);
    let readiness = service.challenge_readiness(domain).await?;
    let Some(challenges) = report_readiness(domain, readiness) else {
        return Ok(());
    };

    let challenge = require_challenge(&challenges, domain, ChallengeType::Http01)?;
    let file = HttpChallengeFile::from_challenge(challenge);

    std::fs::write(&file.filename, &file.contents)
        .with_context(|| format!("Failed writing to {}", file.filename))?;

    log::info!("Wrote ACME challenge to file {}", file.filename);
    println!("Please copy this file to your web server so that it will be served from the URL");
    println!("{}", file.serve_url(domain));
    println!("After this is complete, run: acme-verify verify {domain} --challenge-type http-01");
    Ok(())
}

/// `challenge-dns-txt`: print the dns-01 TXT record, either as one
/// zone-file line or one field per line.
pub async fn print_dns_txt(
    api: Arc<dyn AcmeStatusApi>,
    domain: &str,
    fields: bool,
) -> anyhow::Result<()> {
    let service = ChallengeService::new(api);
    let readiness = service.challenge_readiness(domain).await?;
    let Some(challenges) = report_readiness(domain, readiness) else {
        return Ok(());
    };

    let challenge = require_challenge(&challenges, domain, ChallengeType::Dns01)?;
    let record = DnsTxtRecord::from_challenge(domain, challenge);

    if fields {
        println!("domain: {}", record.domain);
        println!("record-name: {}", record.record_name);
        println!("ttl: {}", record.ttl);
        println!("class: {}", record.class);
        println!("record-type: {}", record.record_type);
        println!("text-data: {}", record.text_data);
    } else {
        println!("Create a DNS txt record containing:");
        println!("{}", record.record_line());
        println!("After this is complete, run: acme-verify verify {domain} --challenge-type dns-01");
    }
    Ok(())
}

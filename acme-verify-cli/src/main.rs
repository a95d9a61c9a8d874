//! acme-verify: challenge generation and ownership verification for domains
//! hosted behind an ACME-enabled platform.

mod commands;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use acme_verify_client::{ChallengeType, PlatformClient};

/// Generate ACME challenges and verify domain ownership against the
/// platform's status API.
#[derive(Parser, Debug)]
#[command(name = "acme-verify")]
#[command(about = "ACME domain-ownership challenges and verification")]
struct Cli {
    /// Base URL of the site/environment's ACME status resource
    #[arg(long, env = "ACME_API_BASE")]
    base_url: String,

    /// Machine token for the platform API
    #[arg(long, env = "ACME_API_TOKEN", hide_env_values = true)]
    token: String,

    /// Caller identifier sent with verification triggers
    #[arg(long, default_value = "acme-verify")]
    client_id: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write an http-01 challenge file to the current directory and print
    /// instructions on how to serve it
    ChallengeFile {
        /// The domain to produce a challenge for
        domain: String,
    },
    /// Print the dns-01 challenge TXT record
    ChallengeDnsTxt {
        /// The domain to produce a challenge for
        domain: String,
        /// Print the record as one field per line instead of a zone-file line
        #[arg(long)]
        fields: bool,
    },
    /// Trigger verification of the challenge and poll until the backend
    /// reports success or failure
    Verify {
        /// The domain to verify
        domain: String,
        /// Challenge type to verify (http-01 or dns-01)
        #[arg(long, default_value = "http-01")]
        challenge_type: ChallengeType,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let api = Arc::new(PlatformClient::new(
        &cli.base_url,
        &cli.token,
        &cli.client_id,
    ));

    match cli.command {
        Command::ChallengeFile { domain } => commands::challenge::write_file(api, &domain).await,
        Command::ChallengeDnsTxt { domain, fields } => {
            commands::challenge::print_dns_txt(api, &domain, fields).await
        }
        Command::Verify {
            domain,
            challenge_type,
        } => commands::verify::run(api, &domain, challenge_type).await,
    }
}

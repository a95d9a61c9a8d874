//! Concrete client for the hosting platform's ACME ownership-status API.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{ClientError, Result};
use crate::http::{create_http_client, execute_request, parse_json};
use crate::types::{ApiEnvelope, ChallengeType, DomainStatus};

/// ACME protocol version requested from the status endpoint.
const ACME_VERSION: u32 = 2;

/// Read-side and trigger-side access to a domain's ownership status.
///
/// One implementation talks to the real API ([`PlatformClient`]); tests
/// script their own. Neither operation retries: the polling loop in
/// `acme-verify-core` owns the retry budget.
#[async_trait]
pub trait AcmeStatusApi: Send + Sync {
    /// Fetch the current ownership/challenge snapshot for `domain`.
    ///
    /// Fails with [`ClientError::DomainNotFound`] when the API returns
    /// HTTP 404 (domain not registered against the site/environment).
    async fn fetch_status(&self, domain: &str) -> Result<DomainStatus>;

    /// Ask the backend to begin asynchronous ownership verification for
    /// `domain` using `challenge_type`.
    ///
    /// Must be called at most once per polling session; repeated triggers
    /// reset backend rate limits. Same 404 semantics as
    /// [`fetch_status`](Self::fetch_status).
    async fn start_verification(&self, domain: &str, challenge_type: ChallengeType) -> Result<()>;
}

/// HTTP client bound to one site/environment's ACME status resource.
///
/// The client is cheap to clone and safe for sequential reuse across the
/// fetch/trigger calls of a polling session.
#[derive(Clone)]
pub struct PlatformClient {
    client: Client,
    base_url: String,
    token: String,
    client_id: String,
}

impl PlatformClient {
    /// Create a client for the status resource at `base_url`.
    ///
    /// `token` is sent as a bearer token; `client_id` identifies this
    /// caller in the verification-trigger form body.
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        client_id: impl Into<String>,
    ) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: create_http_client(),
            base_url,
            token: token.into(),
            client_id: client_id.into(),
        }
    }

    fn domain_url(&self, domain: &str) -> String {
        format!("{}/{}", self.base_url, urlencoding::encode(domain))
    }
}

#[async_trait]
impl AcmeStatusApi for PlatformClient {
    async fn fetch_status(&self, domain: &str) -> Result<DomainStatus> {
        let url = format!("{}?acme_version={ACME_VERSION}", self.domain_url(domain));

        let request = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.token));

        let (status_code, body) = execute_request(request, "GET", &url).await?;

        match status_code {
            200..=299 => {
                let envelope: ApiEnvelope<DomainStatus> = parse_json(&body)?;
                Ok(envelope.data)
            }
            404 => Err(ClientError::DomainNotFound {
                domain: domain.to_string(),
            }),
            _ => Err(ClientError::ApiError {
                status: status_code,
                detail: body,
            }),
        }
    }

    async fn start_verification(&self, domain: &str, challenge_type: ChallengeType) -> Result<()> {
        let url = format!("{}/verify-ownership", self.domain_url(domain));

        let form = [
            ("challenge_type", challenge_type.as_str()),
            ("client", self.client_id.as_str()),
        ];
        let request = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .form(&form);

        let (status_code, body) = execute_request(request, "POST", &url).await?;

        match status_code {
            200..=299 => Ok(()),
            404 => Err(ClientError::DomainNotFound {
                domain: domain.to_string(),
            }),
            _ => Err(ClientError::ApiError {
                status: status_code,
                detail: body,
            }),
        }
    }
}

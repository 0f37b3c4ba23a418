//! ConnectWise REST API probe
//!
//! Issues a fixed ticket-count request with empty filter conditions. The
//! client is stateless per call; no connection is held between rounds.

use crate::config::env::ApiEnv;
use crate::config::ProbeKind;
use crate::error::{AppError, Result};
use crate::probe::Probe;
use async_trait::async_trait;
use serde::Deserialize;

/// Path of the ticket-count endpoint under the API base.
const TICKET_COUNT_PATH: &str = "/service/tickets/count";

#[derive(Debug, Deserialize)]
struct TicketCount {
    count: i64,
}

/// Thin ConnectWise REST client covering the one call the probe needs.
pub struct CwApiClient {
    http: reqwest::Client,
    base_url: String,
    auth_user: String,
    private_key: String,
}

impl CwApiClient {
    pub fn new(env: &ApiEnv) -> Result<Self> {
        Self::with_base_url(env, api_base_url(&env.server))
    }

    /// Build a client against an explicit base URL (test seam).
    pub fn with_base_url(env: &ApiEnv, base_url: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| AppError::config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base_url,
            auth_user: format!("{}+{}", env.company, env.public_key),
            private_key: env.private_key.clone(),
        })
    }

    /// Count service tickets with no filter conditions.
    pub async fn ticket_count(&self) -> Result<i64> {
        let url = format!("{}{}", self.base_url, TICKET_COUNT_PATH);
        let response = self
            .http
            .get(&url)
            .basic_auth(&self.auth_user, Some(&self.private_key))
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::api(format!("{} returned {}", url, status)));
        }

        let body: TicketCount = response.json().await?;
        Ok(body.count)
    }
}

/// Probe wrapper over the ticket-count call.
pub struct ApiProbe {
    client: CwApiClient,
}

impl ApiProbe {
    pub fn new(env: &ApiEnv) -> Result<Self> {
        Ok(Self {
            client: CwApiClient::new(env)?,
        })
    }

    pub fn with_client(client: CwApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Probe for ApiProbe {
    fn kind(&self) -> ProbeKind {
        ProbeKind::CwApi
    }

    async fn execute(&self) -> Result<i64> {
        self.client.ticket_count().await
    }
}

/// Derive the versioned API base from the `API_SERVER` value. A bare host
/// gets an https scheme; an explicit scheme is kept as-is.
fn api_base_url(server: &str) -> String {
    let trimmed = server.trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        format!("{}/v4_6_release/apis/3.0", trimmed)
    } else {
        format!("https://{}/v4_6_release/apis/3.0", trimmed)
    }
}

//! HTTP probe against the n8n REST API using [`reqwest`].

use std::time::Duration;

/// Fixed health endpoint path probed on the instance's base URL.
pub const HEALTH_PATH: &str = "/rest/active-workflows";

/// Header carrying the stored instance API key.
const API_KEY_HEADER: &str = "X-N8N-API-KEY";

/// Upper bound on the whole probe round trip.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for a single registered n8n instance.
pub struct N8nApi {
    client: reqwest::Client,
    api_base_url: String,
}

/// Errors from the n8n REST layer.
#[derive(Debug, thiserror::Error)]
pub enum N8nApiError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The instance responded with a non-2xx status code.
    #[error("n8n API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for diagnostics.
        body: String,
    },
}

impl N8nApi {
    /// Create an API client for an instance.
    ///
    /// * `api_base_url` - base HTTP URL, e.g. `https://n8n.example.com`.
    pub fn new(api_base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base_url,
        }
    }

    /// Create an API client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling across instances).
    pub fn with_client(client: reqwest::Client, api_base_url: String) -> Self {
        Self {
            client,
            api_base_url,
        }
    }

    /// Base HTTP API URL for this instance.
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// URL of the connectivity probe endpoint.
    pub fn health_url(&self) -> String {
        format!("{}{HEALTH_PATH}", self.api_base_url.trim_end_matches('/'))
    }

    /// Probe the instance with a bounded GET against [`HEALTH_PATH`].
    ///
    /// Sends the stored API key in the `X-N8N-API-KEY` header regardless of
    /// the instance's configured auth type, matching what the platform
    /// accepts for REST access. Returns `Ok(())` on any 2xx response.
    pub async fn check_connectivity(&self, api_key: &str) -> Result<(), N8nApiError> {
        let response = self
            .client
            .get(self.health_url())
            .header(API_KEY_HEADER, api_key)
            .timeout(CONNECT_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            tracing::debug!(url = %self.health_url(), "Connectivity probe succeeded");
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(N8nApiError::ApiError {
            status: status.as_u16(),
            body,
        })
    }
}

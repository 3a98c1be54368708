//! HTTP Reply Client
//!
//! [`ReplySource`] implementation against the remote "no" endpoint: a single
//! GET whose success payload is a JSON document with a string field
//! `"reason"` carrying the reply text. A payload without a usable `"reason"`
//! is a success with a generic fallback, not an error.

use std::time::Duration;

use async_trait::async_trait;

use super::traits::{ReplyError, ReplySource};
use crate::config::CompanionConfig;

/// Default remote endpoint
pub const DEFAULT_ENDPOINT: &str = "https://naas.isalman.dev/no";

/// Reply used when the payload decodes but lacks a usable `"reason"` field
pub const MISSING_REASON_FALLBACK: &str = "reply";

/// HTTP client for the remote reply endpoint
#[derive(Clone)]
pub struct HttpReplyClient {
    /// Endpoint URL
    endpoint: String,
    /// HTTP client with a bounded request timeout
    http_client: reqwest::Client,
}

impl HttpReplyClient {
    /// Create a new client for `endpoint` with the given request timeout
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.into(),
            http_client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    /// Create a client from the engine configuration
    #[must_use]
    pub fn from_config(config: &CompanionConfig) -> Self {
        Self::new(config.endpoint_url.clone(), config.request_timeout)
    }

    /// The endpoint this client talks to
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Extract the reply text from a response body
    ///
    /// A body that is not JSON is a decode failure; a JSON body without a
    /// string `"reason"` yields the generic fallback.
    fn extract_reply(body: &str) -> Result<String, ReplyError> {
        let payload: serde_json::Value =
            serde_json::from_str(body).map_err(|err| ReplyError::Decode(err.to_string()))?;
        Ok(payload
            .get("reason")
            .and_then(|reason| reason.as_str())
            .map_or_else(|| MISSING_REASON_FALLBACK.to_string(), str::to_owned))
    }
}

impl Default for HttpReplyClient {
    fn default() -> Self {
        Self::from_config(&CompanionConfig::default())
    }
}

#[async_trait]
impl ReplySource for HttpReplyClient {
    fn name(&self) -> &'static str {
        "no-as-a-service"
    }

    async fn generate_reply(&self) -> Result<String, ReplyError> {
        let response = self.http_client.get(&self.endpoint).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReplyError::Fetch(format!("endpoint returned {status}")));
        }

        let body = response.text().await?;
        Self::extract_reply(&body)
    }
}

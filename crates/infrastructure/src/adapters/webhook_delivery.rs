//! Webhook delivery - posts reports to a chat relay
//!
//! Payload shape:
//!
//! ```json
//! {"type": "say", "data": {"channel": "weather", "message": "Sunny."}}
//! ```

use std::time::Duration;

use application::error::ApplicationError;
use application::ports::{Delivery, DeliveryPort};
use application::services::format_report;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Webhook delivery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Endpoint receiving the JSON payload
    pub url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

const fn default_timeout_secs() -> u64 {
    10
}

impl WebhookConfig {
    /// Configuration for an endpoint with the default timeout
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SayPayload<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    data: SayData<'a>,
}

#[derive(Debug, Serialize)]
struct SayData<'a> {
    channel: &'a str,
    message: String,
}

/// Posts reports to an HTTP endpoint
#[derive(Debug, Clone)]
pub struct WebhookDelivery {
    client: Client,
    config: WebhookConfig,
}

impl WebhookDelivery {
    /// Create a new webhook delivery
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: WebhookConfig) -> Result<Self, ApplicationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl DeliveryPort for WebhookDelivery {
    #[instrument(skip(self, delivery), fields(channel = %delivery.channel))]
    async fn deliver(&self, delivery: &Delivery) -> Result<(), ApplicationError> {
        let payload = SayPayload {
            kind: "say",
            data: SayData {
                channel: delivery.channel.trim_start_matches('#'),
                message: format_report(&delivery.report),
            },
        };

        let response = self
            .client
            .post(&self.config.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ApplicationError::Delivery(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApplicationError::Delivery(format!(
                "Webhook returned HTTP {status}"
            )));
        }

        debug!(%status, "Webhook accepted report");
        Ok(())
    }
}

//! Alert delivery to an external webhook
//!
//! Best-effort: delivery runs under a bounded timeout and failures are
//! reported to the caller, never propagated as process-fatal. No retry,
//! no backoff, no deduplication.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use crate::error::DeliverError;

/// Webhook request timeout
const DELIVER_TIMEOUT: Duration = Duration::from_secs(5);

/// Notification sink for anomaly alerts.
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Deliver a human-readable notification.
    async fn notify(&self, message: &str) -> Result<(), DeliverError>;
}

/// Webhook message body, `{"text": ...}`
#[derive(Debug, Serialize)]
pub struct WebhookPayload<'a> {
    pub text: &'a str,
}

/// Delivers alerts by POSTing to a Slack-compatible webhook.
pub struct WebhookAlerter {
    client: Client,
    webhook_url: String,
}

impl WebhookAlerter {
    pub fn new(webhook_url: &str) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(DELIVER_TIMEOUT).build()?;

        Ok(Self {
            client,
            webhook_url: webhook_url.to_string(),
        })
    }
}

#[async_trait]
impl AlertSink for WebhookAlerter {
    async fn notify(&self, message: &str) -> Result<(), DeliverError> {
        let response = self
            .client
            .post(&self.webhook_url)
            .json(&WebhookPayload { text: message })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DeliverError::HttpStatus(status));
        }

        debug!(status = %status, "alert delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_notify_posts_text_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/webhook")
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "text": "Anomaly detected: cpu = 97.20"
            })))
            .with_status(200)
            .create_async()
            .await;

        let alerter = WebhookAlerter::new(&format!("{}/webhook", server.url())).unwrap();
        let result = alerter.notify("Anomaly detected: cpu = 97.20").await;

        assert!(result.is_ok());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_notify_non_2xx_is_deliver_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/webhook")
            .with_status(500)
            .create_async()
            .await;

        let alerter = WebhookAlerter::new(&format!("{}/webhook", server.url())).unwrap();
        let result = alerter.notify("hello").await;

        assert!(matches!(result, Err(DeliverError::HttpStatus(status)) if status.as_u16() == 500));
    }

    #[tokio::test]
    async fn test_notify_unreachable_host_is_network_error() {
        // Reserved TEST-NET-1 address, nothing listens there
        let alerter = WebhookAlerter::new("http://192.0.2.1:9/webhook").unwrap();
        let result = alerter.notify("hello").await;

        assert!(matches!(result, Err(DeliverError::Network(_))));
    }
}

use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use super::{NotificationSender, SenderError};

/// Posts card messages to a Microsoft Teams incoming webhook.
pub struct TeamsSender {
    client: Client,
    timeout: Duration,
}

impl TeamsSender {
    pub fn new(timeout: Duration) -> Result<Self, SenderError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl NotificationSender for TeamsSender {
    async fn send(&self, webhook_url: &str, message: &Value) -> Result<(), SenderError> {
        let body = serde_json::to_vec(message)?;
        debug!(bytes = body.len(), timeout = ?self.timeout, "Posting message to webhook.");

        let response = self
            .client
            .post(webhook_url)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SenderError::Timeout(self.timeout)
                } else {
                    SenderError::NetworkError(e)
                }
            })?;
        let status = response.status();

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(SenderError::SendFailed {
                status: status.as_u16(),
                body: error_body,
            });
        }

        debug!(status = status.as_u16(), "Webhook accepted message.");
        Ok(())
    }
}

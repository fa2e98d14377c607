use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

pub mod teams;

#[derive(Error, Debug)]
pub enum SenderError {
    #[error("Webhook returned non-success status: {status}. Body: {body}")]
    SendFailed { status: u16, body: String },
    #[error("Webhook did not answer within {0:?}")]
    Timeout(Duration),
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("Failed to serialize message: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Delivers a serialized card message to a webhook.
#[async_trait]
pub trait NotificationSender {
    /// Sends `message` once. Retrying is left to the caller.
    ///
    /// # Arguments
    ///
    /// * `webhook_url` - The destination the chat platform exposes.
    /// * `message` - The wire form of the card.
    async fn send(&self, webhook_url: &str, message: &Value) -> Result<(), SenderError>;
}

use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};

use super::models::RenderError;
use super::renderers::renderer_for;
use super::senders::{teams::TeamsSender, NotificationSender, SenderError};
use super::status::Status;
use crate::config::{ConfigError, HandlerConfig};
use crate::event::{Event, EventError};

#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("could not load configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("could not create webhook client: {0}")]
    Client(#[source] SenderError),
    #[error("could not read event: {0}")]
    Event(#[from] EventError),
    #[error("could not generate card because of error {0}")]
    Render(#[from] RenderError),
    #[error("could not generate Teams message because of error {0}")]
    Serialization(#[source] serde_json::Error),
    #[error("could not send Teams message because of error {source} \n message (len {length}): {message}")]
    Delivery {
        #[source]
        source: SenderError,
        length: usize,
        message: String,
    },
}

/// Renders one event and delivers it with a single webhook call.
pub struct TeamsHandler<S = TeamsSender> {
    config: HandlerConfig,
    sender: S,
}

impl TeamsHandler<TeamsSender> {
    /// Validates `config` before anything touches the network.
    pub fn new(config: HandlerConfig) -> Result<Self, HandlerError> {
        config.validate()?;
        let sender = TeamsSender::new(config.timeout).map_err(HandlerError::Client)?;
        Ok(Self { config, sender })
    }
}

impl<S: NotificationSender> TeamsHandler<S> {
    pub fn with_sender(config: HandlerConfig, sender: S) -> Result<Self, HandlerError> {
        config.validate()?;
        Ok(Self { config, sender })
    }

    fn prepare(&self, event: &Event) -> Result<(HandlerConfig, Value), HandlerError> {
        event.validate()?;
        let config = self.config.with_annotation_overrides(event)?;
        let renderer = renderer_for(config.card_style);

        let card = renderer.build_card(event, &config)?;
        let message = renderer
            .to_message(&card)
            .map_err(HandlerError::Serialization)?;
        Ok((config, message))
    }

    pub async fn handle(&self, event: &Event) -> Result<(), HandlerError> {
        let status = Status::from(event.status());
        info!(
            entity = %event.entity_name(),
            check = %event.check_name(),
            status = status.label(),
            "Handling event."
        );

        let (config, message) = self.prepare(event)?;

        match self.sender.send(&config.webhook_url, &message).await {
            Ok(()) => {
                info!(
                    entity = %event.entity_name(),
                    check = %event.check_name(),
                    style = ?config.card_style,
                    "Sent Teams notification."
                );
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Failed to send Teams notification.");
                let pretty = serde_json::to_string_pretty(&message)
                    .unwrap_or_else(|_| message.to_string());
                Err(HandlerError::Delivery {
                    source: e,
                    length: pretty.len(),
                    message: pretty,
                })
            }
        }
    }
}

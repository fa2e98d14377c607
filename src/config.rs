use clap::{Parser, ValueEnum};
use reqwest::Url;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::event::Event;

pub const DEFAULT_SENSU_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Annotation prefix under which checks and entities may override options.
pub const ANNOTATION_KEYSPACE: &str = "sensu.io/plugins/sensu-teams-handler/config";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("webhook url is not defined in flags nor environment")]
    MissingWebhook,
    #[error("Invalid webhook url: {0}")]
    InvalidWebhook(String),
    #[error("Timeout must be greater than zero seconds")]
    InvalidTimeout,
    #[error("Invalid card style '{0}'")]
    InvalidCardStyle(String),
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardStyle {
    /// Nested Adaptive Card with expandable output and annotations.
    #[default]
    Adaptive,
    /// Flat connector MessageCard with a theme color.
    Connector,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "sensu-teams-handler", author, version, about = "MS Teams handler for Sensu", long_about = None)]
pub struct Args {
    /// URL of the teams webhook
    #[arg(short = 'w', long, env = "TEAMS_WEBHOOK_URL", default_value = "", hide_env_values = true)]
    pub teams_webhook: String,

    /// URL for the link to Sensu
    #[arg(short = 'd', long, env = "SENSU_URL", default_value = DEFAULT_SENSU_URL)]
    pub sensu_url: String,

    /// A space separated list of ms teams email addresses that should be mentioned in the notifications
    #[arg(short = 'm', long, env = "TEAMS_MENTIONS", default_value = "", hide_env_values = true)]
    pub mentions: String,

    /// Card layout posted to the webhook
    #[arg(long, env = "TEAMS_CARD_STYLE", value_enum, default_value_t = CardStyle::Adaptive)]
    pub card_style: CardStyle,

    /// Seconds to wait for the webhook before giving up
    #[arg(long, env = "TEAMS_TIMEOUT", default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout: u64,

    /// Also link the Sensu dashboard root from connector cards
    #[arg(long)]
    pub link_dashboard: bool,

    /// Do not attach mention entities to adaptive cards
    #[arg(long)]
    pub no_mention_entities: bool,

    /// Directory for JSON log files (daily rotation)
    #[arg(long, env = "TEAMS_HANDLER_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

/// Immutable handler settings, loaded once before the event is processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    pub webhook_url: String,
    pub sensu_url: String,
    pub mentions: String,
    pub card_style: CardStyle,
    pub timeout: Duration,
    pub link_dashboard: bool,
    pub mention_entities: bool,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            webhook_url: String::new(),
            sensu_url: DEFAULT_SENSU_URL.to_string(),
            mentions: String::new(),
            card_style: CardStyle::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            link_dashboard: false,
            mention_entities: true,
        }
    }
}

impl From<&Args> for HandlerConfig {
    fn from(args: &Args) -> Self {
        Self {
            webhook_url: args.teams_webhook.trim().to_string(),
            sensu_url: args.sensu_url.trim().to_string(),
            mentions: args.mentions.clone(),
            card_style: args.card_style,
            timeout: Duration::from_secs(args.timeout),
            link_dashboard: args.link_dashboard,
            mention_entities: !args.no_mention_entities,
        }
    }
}

impl HandlerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.webhook_url.is_empty() {
            return Err(ConfigError::MissingWebhook);
        }
        let url = Url::parse(&self.webhook_url)
            .map_err(|e| ConfigError::InvalidWebhook(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidWebhook(format!(
                "unsupported scheme '{}'",
                url.scheme()
            )));
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }
        Ok(())
    }

    /// Whitespace separated mention tokens, in configured order.
    pub fn mention_tokens(&self) -> Vec<&str> {
        self.mentions.split_whitespace().collect()
    }

    /// Overrides non-secret options from `sensu.io/plugins/...` annotations.
    /// The check annotation wins over the entity one and empty values are
    /// ignored. The webhook URL and mentions always come from flags or
    /// environment.
    pub fn with_annotation_overrides(&self, event: &Event) -> Result<Self, ConfigError> {
        let mut config = self.clone();

        if let Some((source, url)) = annotation_override(event, "sensu-url") {
            debug!(source, sensu_url = %url, "Overriding sensu-url from annotation.");
            config.sensu_url = url.to_string();
        }
        if let Some((source, style)) = annotation_override(event, "card-style") {
            config.card_style = <CardStyle as ValueEnum>::from_str(style, true)
                .map_err(|_| ConfigError::InvalidCardStyle(style.to_string()))?;
            debug!(source, card_style = ?config.card_style, "Overriding card-style from annotation.");
        }
        for secret in ["teams-webhook", "mentions"] {
            if let Some((source, _)) = annotation_override(event, secret) {
                info!(source, option = secret, "Ignoring annotation override for secret option.");
            }
        }
        Ok(config)
    }
}

/// First non-empty value for `option`, looking at the check before the entity.
fn annotation_override<'a>(event: &'a Event, option: &str) -> Option<(&'static str, &'a str)> {
    let key = annotation_key(option);
    [
        ("check", &event.check.metadata.annotations),
        ("entity", &event.entity.metadata.annotations),
    ]
    .into_iter()
    .find_map(|(source, annotations)| {
        annotations
            .get(&key)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .map(|value| (source, value))
    })
}

fn annotation_key(option: &str) -> String {
    format!("{ANNOTATION_KEYSPACE}/{option}")
}

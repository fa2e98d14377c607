use chrono::{Local, TimeZone};
use serde_json::Value;
use std::fmt::Display;

use super::models::{Card, Mention, RenderError};
use super::status::Status;
use crate::config::{CardStyle, HandlerConfig};
use crate::event::Event;

pub mod adaptive;
pub mod connector;

pub use adaptive::AdaptiveCardRenderer;
pub use connector::ConnectorCardRenderer;

pub const HISTORY_FACT: &str = "History (past \u{2192} now)";
pub const MENTIONED_FACT: &str = "Mentioned";
pub const OUTPUT_ACTION: &str = "Show check output";
pub const ANNOTATIONS_ACTION: &str = "Show event annotations";
pub const DEEP_LINK_ACTION: &str = "Open in Sensu";
pub const DASHBOARD_ACTION: &str = "Open Sensu";

/// Turns an event into a card of one style and that card into the JSON
/// message the Teams webhook accepts.
pub trait EventRenderer: Send + Sync {
    fn style(&self) -> CardStyle;

    fn build_card(&self, event: &Event, config: &HandlerConfig) -> Result<Card, RenderError>;

    fn to_message(&self, card: &Card) -> Result<Value, serde_json::Error>;
}

pub fn renderer_for(style: CardStyle) -> Box<dyn EventRenderer> {
    match style {
        CardStyle::Adaptive => Box::new(AdaptiveCardRenderer),
        CardStyle::Connector => Box::new(ConnectorCardRenderer),
    }
}

/// `<icon> <label>: <entity> - <check>`, or without the icon.
pub fn card_title(event: &Event, with_icon: bool) -> String {
    let status = Status::from(event.status());
    let title = format!("{}: {} - {}", status.label(), event.entity_name(), event.check_name());
    if with_icon {
        format!("{} {}", status.icon(), title)
    } else {
        title
    }
}

/// One glyph per history entry, oldest first, each followed by a space.
pub fn status_history(event: &Event, glyph: impl Fn(Status) -> char) -> String {
    event
        .check
        .history
        .iter()
        .map(|item| format!("{} ", glyph(Status::from(item.status))))
        .collect()
}

/// Deep link to the event in the Sensu web UI.
pub fn event_url(base_url: &str, event: &Event) -> String {
    format!(
        "{}/c/~/n/{}/events/{}/{}",
        base_url.trim_end_matches('/'),
        event.namespace(),
        event.entity_name(),
        event.check_name()
    )
}

pub fn mentions(config: &HandlerConfig) -> Vec<Mention> {
    config.mention_tokens().into_iter().map(Mention::new).collect()
}

pub fn mention_markup(mentions: &[Mention]) -> String {
    mentions
        .iter()
        .map(Mention::markup)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn format_timestamp(secs: i64) -> String {
    format_timestamp_in(secs, &Local)
}

pub fn format_timestamp_in<Tz>(secs: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match tz.timestamp_opt(secs, 0).single() {
        Some(time) => time.format("%Y-%m-%d %H:%M:%S %z").to_string(),
        None => secs.to_string(),
    }
}

/// Title, history and the fixed fact list shared by every style.
pub(crate) fn base_card(
    event: &Event,
    config: &HandlerConfig,
    title: String,
    history: String,
) -> Result<Card, RenderError> {
    let status = Status::from(event.status());
    let mut card = Card::new(title);

    card.add_fact(HISTORY_FACT, history.clone())?;
    card.add_fact("Namespace", event.namespace())?;
    card.add_fact("Entity", event.entity_name())?;
    card.add_fact("Check", event.check_name())?;
    card.add_fact("Status", status.label())?;
    card.add_fact("Last Ok", format_timestamp(event.check.last_ok))?;
    card.add_fact("Event created", format_timestamp(event.check.issued))?;

    let mentioned = mentions(config);
    if !mentioned.is_empty() {
        card.add_fact(MENTIONED_FACT, mention_markup(&mentioned))?;
    }

    card.history = Some(history);
    Ok(card)
}

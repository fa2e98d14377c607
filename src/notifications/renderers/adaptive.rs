//! Rich Adaptive Card style: nested cards for output and annotations.

use serde::Serialize;
use serde_json::Value;

use super::{
    base_card, card_title, event_url, mentions, status_history, EventRenderer, ANNOTATIONS_ACTION,
    DEEP_LINK_ACTION, OUTPUT_ACTION,
};
use crate::config::{CardStyle, HandlerConfig};
use crate::event::Event;
use crate::notifications::models::{Action, ActionTarget, Card, RenderError};
use crate::notifications::status::Status;
use crate::notifications::truncate::{truncate_annotations, truncate_output};

pub const ADAPTIVE_CONTENT_TYPE: &str = "application/vnd.microsoft.card.adaptive";
const ADAPTIVE_SCHEMA: &str = "http://adaptivecards.io/schemas/adaptive-card.json";
const ADAPTIVE_VERSION: &str = "1.5";

#[derive(Debug, Clone, Copy, Default)]
pub struct AdaptiveCardRenderer;

#[derive(Serialize)]
struct Message {
    #[serde(rename = "type")]
    kind: &'static str,
    attachments: Vec<Attachment>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Attachment {
    content_type: &'static str,
    content: AdaptiveCard,
}

#[derive(Serialize)]
struct AdaptiveCard {
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    schema: Option<&'static str>,
    version: &'static str,
    body: Vec<Element>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    actions: Vec<AdaptiveAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    msteams: Option<MsTeams>,
}

impl AdaptiveCard {
    fn nested(body: Vec<Element>) -> Self {
        Self {
            kind: "AdaptiveCard",
            schema: None,
            version: ADAPTIVE_VERSION,
            body,
            actions: Vec::new(),
            msteams: None,
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
enum Element {
    TextBlock {
        text: String,
        wrap: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        size: Option<&'static str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        weight: Option<&'static str>,
    },
    FactSet {
        facts: Vec<AdaptiveFact>,
        is_subtle: bool,
    },
}

impl Element {
    fn text(text: String) -> Self {
        Element::TextBlock {
            text,
            wrap: true,
            size: None,
            weight: None,
        }
    }
}

#[derive(Serialize)]
struct AdaptiveFact {
    title: String,
    value: String,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum AdaptiveAction {
    #[serde(rename = "Action.ShowCard")]
    ShowCard { title: String, card: Box<AdaptiveCard> },
    #[serde(rename = "Action.OpenUrl")]
    OpenUrl { title: String, url: String },
}

#[derive(Serialize)]
struct MsTeams {
    width: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    entities: Vec<MentionEntity>,
}

#[derive(Serialize)]
struct MentionEntity {
    #[serde(rename = "type")]
    kind: &'static str,
    text: String,
    mentioned: Mentioned,
}

#[derive(Serialize)]
struct Mentioned {
    id: String,
    name: String,
}

impl EventRenderer for AdaptiveCardRenderer {
    fn style(&self) -> CardStyle {
        CardStyle::Adaptive
    }

    fn build_card(&self, event: &Event, config: &HandlerConfig) -> Result<Card, RenderError> {
        let history = status_history(event, Status::icon);
        let mut card = base_card(event, config, card_title(event, true), history)?;

        card.add_action(Action::detail_view(OUTPUT_ACTION, truncate_output(&event.check.output)))?;
        card.add_action(Action::detail_view(
            ANNOTATIONS_ACTION,
            truncate_annotations(event.annotations()),
        ))?;
        card.add_action(Action::open_url(
            DEEP_LINK_ACTION,
            event_url(&config.sensu_url, event),
        ))?;

        // Teams does not always resolve mention entities; the markup in the
        // facts stays readable either way.
        if config.mention_entities {
            for mention in mentions(config) {
                card.add_mention(mention)?;
            }
        }

        card.theme.full_width = true;
        Ok(card)
    }

    fn to_message(&self, card: &Card) -> Result<Value, serde_json::Error> {
        let title = Element::TextBlock {
            text: card.title.clone(),
            wrap: true,
            size: Some("ExtraLarge"),
            weight: Some("Bolder"),
        };
        let facts = Element::FactSet {
            facts: card
                .facts
                .iter()
                .map(|f| AdaptiveFact {
                    title: f.name.clone(),
                    value: f.value.clone(),
                })
                .collect(),
            is_subtle: true,
        };

        let actions = card
            .actions
            .iter()
            .map(|action| match &action.target {
                ActionTarget::DetailView { text } => AdaptiveAction::ShowCard {
                    title: action.label.clone(),
                    card: Box::new(AdaptiveCard::nested(vec![Element::text(text.clone())])),
                },
                ActionTarget::OpenUrl { url } => AdaptiveAction::OpenUrl {
                    title: action.label.clone(),
                    url: url.clone(),
                },
            })
            .collect();

        let msteams = MsTeams {
            width: if card.theme.full_width { "Full" } else { "Default" },
            entities: card
                .mentions
                .iter()
                .map(|m| MentionEntity {
                    kind: "mention",
                    text: m.markup(),
                    mentioned: Mentioned {
                        id: m.id.clone(),
                        name: m.name.clone(),
                    },
                })
                .collect(),
        };

        let message = Message {
            kind: "message",
            attachments: vec![Attachment {
                content_type: ADAPTIVE_CONTENT_TYPE,
                content: AdaptiveCard {
                    kind: "AdaptiveCard",
                    schema: Some(ADAPTIVE_SCHEMA),
                    version: ADAPTIVE_VERSION,
                    body: vec![title, facts],
                    actions,
                    msteams: Some(msteams),
                },
            }],
        };
        serde_json::to_value(message)
    }
}

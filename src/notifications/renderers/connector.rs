//! Flat connector MessageCard style with a status theme color.

use serde::Serialize;
use serde_json::Value;

use super::{
    base_card, card_title, event_url, status_history, EventRenderer, DASHBOARD_ACTION,
    DEEP_LINK_ACTION, OUTPUT_ACTION,
};
use crate::config::{CardStyle, HandlerConfig};
use crate::event::Event;
use crate::notifications::models::{Action, ActionTarget, Card, RenderError};
use crate::notifications::status::Status;
use crate::notifications::truncate::truncate_output;

const MESSAGE_CARD_CONTEXT: &str = "https://schema.org/extensions";
const OUTPUT_INPUT_ID: &str = "output";

#[derive(Debug, Clone, Copy, Default)]
pub struct ConnectorCardRenderer;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MessageCard {
    #[serde(rename = "@type")]
    kind: &'static str,
    #[serde(rename = "@context")]
    context: &'static str,
    summary: String,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    theme_color: Option<String>,
    sections: Vec<Section>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    potential_action: Vec<PotentialAction>,
}

#[derive(Serialize)]
struct Section {
    facts: Vec<SectionFact>,
    markdown: bool,
}

#[derive(Serialize)]
struct SectionFact {
    name: String,
    value: String,
}

#[derive(Serialize)]
#[serde(tag = "@type")]
enum PotentialAction {
    ActionCard { name: String, inputs: Vec<TextInput> },
    OpenUri { name: String, targets: Vec<UriTarget> },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TextInput {
    #[serde(rename = "@type")]
    kind: &'static str,
    id: String,
    title: String,
    is_multiline: bool,
    value: String,
}

#[derive(Serialize)]
struct UriTarget {
    os: &'static str,
    uri: String,
}

fn text_input_action(name: &str, id: &str, value: &str) -> PotentialAction {
    PotentialAction::ActionCard {
        name: name.to_string(),
        inputs: vec![TextInput {
            kind: "TextInput",
            id: id.to_string(),
            title: name.to_string(),
            is_multiline: true,
            value: value.to_string(),
        }],
    }
}

impl EventRenderer for ConnectorCardRenderer {
    fn style(&self) -> CardStyle {
        CardStyle::Connector
    }

    fn build_card(&self, event: &Event, config: &HandlerConfig) -> Result<Card, RenderError> {
        let status = Status::from(event.status());
        let history = status_history(event, Status::marker);
        let mut card = base_card(event, config, card_title(event, false), history)?;

        card.add_action(Action::detail_view(OUTPUT_ACTION, truncate_output(&event.check.output)))?;
        card.add_action(Action::open_url(
            DEEP_LINK_ACTION,
            event_url(&config.sensu_url, event),
        ))?;
        if config.link_dashboard {
            card.add_action(Action::open_url(DASHBOARD_ACTION, config.sensu_url.clone()))?;
        }

        card.theme.color = Some(status.color().hex().to_string());
        Ok(card)
    }

    fn to_message(&self, card: &Card) -> Result<Value, serde_json::Error> {
        let potential_action = card
            .actions
            .iter()
            .map(|action| match &action.target {
                // Connector cards cannot nest cards; the text goes in an input instead.
                ActionTarget::DetailView { text } => {
                    text_input_action(&action.label, OUTPUT_INPUT_ID, text)
                }
                ActionTarget::OpenUrl { url } => PotentialAction::OpenUri {
                    name: action.label.clone(),
                    targets: vec![UriTarget {
                        os: "default",
                        uri: url.clone(),
                    }],
                },
            })
            .collect();

        let message = MessageCard {
            kind: "MessageCard",
            context: MESSAGE_CARD_CONTEXT,
            summary: card.title.clone(),
            title: card.title.clone(),
            theme_color: card.theme.color.clone(),
            sections: vec![Section {
                facts: card
                    .facts
                    .iter()
                    .map(|f| SectionFact {
                        name: f.name.clone(),
                        value: f.value.clone(),
                    })
                    .collect(),
                markdown: true,
            }],
            potential_action,
        };
        serde_json::to_value(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::CheckHistory;
    use crate::notifications::renderers::tests::sample_event;
    use crate::notifications::renderers::HISTORY_FACT;

    #[test]
    fn test_build_card() {
        let mut event = sample_event(2);
        event.check.history = vec![
            CheckHistory { status: 0, executed: 1 },
            CheckHistory { status: 2, executed: 2 },
        ];
        event
            .metadata
            .annotations
            .insert("team".to_string(), "ops".to_string());

        let card = ConnectorCardRenderer
            .build_card(&event, &HandlerConfig::default())
            .unwrap();

        assert_eq!(card.title, "Critical: web1 - http-check");
        assert_eq!(card.theme.color.as_deref(), Some("A30200"));
        assert!(!card.theme.full_width);
        assert_eq!(card.fact(HISTORY_FACT), Some("\u{1F7E2} \u{1F534} "));

        let labels: Vec<&str> = card.actions.iter().map(|a| a.label.as_str()).collect();
        assert_eq!(labels, vec![OUTPUT_ACTION, DEEP_LINK_ACTION]);
        assert_eq!(
            card.actions[0].target,
            ActionTarget::DetailView { text: "HTTP OK".to_string() }
        );
        assert!(card.mentions.is_empty());
    }

    #[test]
    fn test_dashboard_link_and_mentions() {
        let config = HandlerConfig {
            link_dashboard: true,
            mentions: "alice".to_string(),
            ..Default::default()
        };
        let card = ConnectorCardRenderer.build_card(&sample_event(0), &config).unwrap();

        assert_eq!(card.actions.len(), 3);
        assert_eq!(card.actions[2].label, DASHBOARD_ACTION);
        assert_eq!(
            card.actions[2].target,
            ActionTarget::OpenUrl { url: "http://localhost:3000".to_string() }
        );
        // The connector schema has no mention entities; only the fact remains.
        assert!(card.mentions.is_empty());
        assert_eq!(card.fact("Mentioned"), Some("<at>alice</at>"));
        assert_eq!(card.theme.color.as_deref(), Some("2EB886"));
    }

    #[test]
    fn test_message_shape() {
        let card = ConnectorCardRenderer
            .build_card(&sample_event(1), &HandlerConfig::default())
            .unwrap();
        let message = ConnectorCardRenderer.to_message(&card).unwrap();

        assert_eq!(message["@type"], "MessageCard");
        assert_eq!(message["@context"], MESSAGE_CARD_CONTEXT);
        assert_eq!(message["themeColor"], "DAA038");
        assert_eq!(message["title"], "Warning: web1 - http-check");
        assert_eq!(message["sections"][0]["facts"][1]["name"], "Namespace");
        assert_eq!(message["sections"][0]["facts"][1]["value"], "default");

        let actions = &message["potentialAction"];
        assert_eq!(actions[0]["@type"], "ActionCard");
        assert_eq!(actions[0]["inputs"][0]["@type"], "TextInput");
        assert_eq!(actions[0]["inputs"][0]["id"], OUTPUT_INPUT_ID);
        assert_eq!(actions[0]["inputs"][0]["isMultiline"], true);
        assert_eq!(actions[0]["inputs"][0]["value"], "HTTP OK");
        assert_eq!(actions[1]["@type"], "OpenUri");
        assert_eq!(
            actions[1]["targets"][0]["uri"],
            "http://localhost:3000/c/~/n/default/events/web1/http-check"
        );
    }
}

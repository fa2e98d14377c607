use reqwest::Url;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RenderError {
    #[error("Could not attach action '{label}': {reason}")]
    InvalidAction { label: String, reason: String },
    #[error("Could not attach fact: {0}")]
    InvalidFact(String),
    #[error("Could not attach mention: {0}")]
    InvalidMention(String),
}

/// A labeled name/value pair displayed in the card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fact {
    pub name: String,
    pub value: String,
}

/// Reference to a Teams user that triggers a notification for them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mention {
    pub id: String,
    pub name: String,
}

impl Mention {
    pub fn new(token: &str) -> Self {
        Self {
            id: token.to_string(),
            name: token.to_string(),
        }
    }

    /// Inline markup Teams resolves against the mention entities.
    pub fn markup(&self) -> String {
        format!("<at>{}</at>", self.name)
    }
}

/// What an action reveals or opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionTarget {
    /// Text shown on demand: a nested card in adaptive cards, a read-only
    /// multi-line input in connector cards.
    DetailView { text: String },
    OpenUrl { url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    pub label: String,
    pub target: ActionTarget,
}

impl Action {
    pub fn detail_view(label: &str, text: String) -> Self {
        Self {
            label: label.to_string(),
            target: ActionTarget::DetailView { text },
        }
    }

    pub fn open_url(label: &str, url: String) -> Self {
        Self {
            label: label.to_string(),
            target: ActionTarget::OpenUrl { url },
        }
    }

    fn validate(&self) -> Result<(), RenderError> {
        let invalid = |reason: String| RenderError::InvalidAction {
            label: self.label.clone(),
            reason,
        };

        if self.label.trim().is_empty() {
            return Err(invalid("label is empty".to_string()));
        }
        match &self.target {
            ActionTarget::DetailView { .. } => Ok(()),
            ActionTarget::OpenUrl { url } => Url::parse(url)
                .map(|_| ())
                .map_err(|e| invalid(format!("invalid URL '{url}': {e}"))),
        }
    }
}

/// Presentation hints carried next to the content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Theme {
    /// Hex color without `#`, used by flat connector cards.
    pub color: Option<String>,
    pub full_width: bool,
}

/// Platform-neutral card assembled from one event. Renderers turn it into
/// the wire message of their card style.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Card {
    pub title: String,
    pub facts: Vec<Fact>,
    pub history: Option<String>,
    pub actions: Vec<Action>,
    pub mentions: Vec<Mention>,
    pub theme: Theme,
}

impl Card {
    pub fn new(title: String) -> Self {
        Self {
            title,
            ..Default::default()
        }
    }

    pub fn add_fact(&mut self, name: &str, value: impl Into<String>) -> Result<(), RenderError> {
        if name.trim().is_empty() {
            return Err(RenderError::InvalidFact("fact name is empty".to_string()));
        }
        self.facts.push(Fact {
            name: name.to_string(),
            value: value.into(),
        });
        Ok(())
    }

    pub fn add_action(&mut self, action: Action) -> Result<(), RenderError> {
        action.validate()?;
        self.actions.push(action);
        Ok(())
    }

    pub fn add_mention(&mut self, mention: Mention) -> Result<(), RenderError> {
        if mention.id.trim().is_empty() {
            return Err(RenderError::InvalidMention("mention id is empty".to_string()));
        }
        self.mentions.push(mention);
        Ok(())
    }

    pub fn fact(&self, name: &str) -> Option<&str> {
        self.facts
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}

use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EventError {
    #[error("Failed to read event: {0}")]
    ReadFailed(#[from] std::io::Error),
    #[error("Failed to parse event JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Event is missing {0}")]
    MissingField(&'static str),
}

/// Object metadata shared by events, entities and checks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ObjectMeta {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default)]
    pub annotations: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Entity {
    #[serde(default)]
    pub metadata: ObjectMeta,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct CheckHistory {
    #[serde(default)]
    pub status: u32,
    #[serde(default)]
    pub executed: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Check {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub status: u32,
    #[serde(default)]
    pub output: String,
    /// Unix seconds of the last OK result.
    #[serde(default)]
    pub last_ok: i64,
    /// Unix seconds at which the check request was issued.
    #[serde(default)]
    pub issued: i64,
    /// Oldest first.
    #[serde(default)]
    pub history: Vec<CheckHistory>,
}

/// A single check result handed over by the Sensu pipeline.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub entity: Entity,
    #[serde(default)]
    pub check: Check,
}

impl Event {
    /// Parses the JSON document the pipeline writes to stdin.
    pub fn from_json(raw: &str) -> Result<Self, EventError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn validate(&self) -> Result<(), EventError> {
        if self.entity.metadata.name.trim().is_empty() {
            return Err(EventError::MissingField("entity name"));
        }
        if self.check.metadata.name.trim().is_empty() {
            return Err(EventError::MissingField("check name"));
        }
        Ok(())
    }

    pub fn entity_name(&self) -> &str {
        &self.entity.metadata.name
    }

    pub fn namespace(&self) -> &str {
        &self.entity.metadata.namespace
    }

    pub fn check_name(&self) -> &str {
        &self.check.metadata.name
    }

    pub fn status(&self) -> u32 {
        self.check.status
    }

    /// Event-level annotations, iteration order unspecified.
    pub fn annotations(&self) -> &HashMap<String, String> {
        &self.metadata.annotations
    }
}

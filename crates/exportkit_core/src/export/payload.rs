//! Export payloads and type-driven aggregation.
//!
//! # Invariants
//! - A list made only of text payloads collapses into one newline-joined
//!   text payload; the empty list collapses into `""`.
//! - Any other list is passed through unmerged and in order.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One shareable value produced by an export strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Payload {
    Text(String),
    Binary(Vec<u8>),
    Structured(serde_json::Value),
    /// A file written by the strategy, shared by path.
    File(PathBuf),
}

impl Payload {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }
}

impl From<String> for Payload {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Payload {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Vec<u8>> for Payload {
    fn from(value: Vec<u8>) -> Self {
        Self::Binary(value)
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        Self::Structured(value)
    }
}

/// What the sharing surface receives: one item or one collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SharePayload {
    Item(Payload),
    Collection(Vec<Payload>),
}

impl SharePayload {
    /// Merges ordered per-entry payloads into one share payload.
    pub fn aggregate(payloads: Vec<Payload>) -> Self {
        if !payloads.iter().all(Payload::is_text) {
            return Self::Collection(payloads);
        }

        let texts: Vec<String> = payloads
            .into_iter()
            .filter_map(|payload| match payload {
                Payload::Text(text) => Some(text),
                _ => None,
            })
            .collect();
        Self::Item(Payload::Text(texts.join("\n")))
    }

    /// Number of items the sharing surface will present.
    pub fn share_item_count(&self) -> usize {
        match self {
            Self::Item(_) => 1,
            Self::Collection(items) => items.len(),
        }
    }
}

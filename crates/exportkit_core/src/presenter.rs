//! Headless presentation adapter.
//!
//! # Responsibility
//! - Hold the entry list a UI renders.
//! - Route export/delete actions to services and share results to a sink.
//! - Surface failures through a single alert slot and an optional observer.
//!
//! # Invariants
//! - Every surfaced failure becomes an `AlertType`; nothing panics.
//! - A failed delete keeps its entry in the list.

use crate::context::ExportKitContext;
use crate::error::ExportKitError;
use crate::export::coordinator::ExportError;
use crate::export::payload::SharePayload;
use crate::model::entry::ExportableEntry;
use crate::store::RecordStore;
use log::warn;
use serde::{Deserialize, Serialize};

/// Receives payloads that should be offered to the user for sharing.
pub trait ShareSink {
    fn share(&self, payload: SharePayload);
}

impl<F> ShareSink for F
where
    F: Fn(SharePayload),
{
    fn share(&self, payload: SharePayload) {
        self(payload)
    }
}

/// Observer notified whenever the presenter raises an alert.
pub trait AlertSink {
    fn on_alert(&self, alert: &AlertType);
}

impl<F> AlertSink for F
where
    F: Fn(&AlertType),
{
    fn on_alert(&self, alert: &AlertType) {
        self(alert)
    }
}

/// Alert classification shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "description", rename_all = "snake_case")]
pub enum AlertType {
    /// Unexpected internal failure without an actionable message.
    Critical,
    /// Failure with a message worth showing verbatim.
    DescriptiveError(String),
}

impl AlertType {
    pub fn title(&self) -> &str {
        match self {
            Self::Critical => "Critical Error",
            Self::DescriptiveError(_) => "Error",
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Self::Critical => "A critical error occurred.",
            Self::DescriptiveError(description) => description.as_str(),
        }
    }

    /// Two-field view handed to the UI.
    pub fn to_alert(&self) -> Alert {
        Alert {
            title: self.title().to_string(),
            description: self.description().to_string(),
        }
    }
}

impl From<&ExportKitError> for AlertType {
    fn from(value: &ExportKitError) -> Self {
        match value {
            ExportKitError::Unknown => Self::Critical,
            other => Self::DescriptiveError(other.to_string()),
        }
    }
}

impl From<&ExportError> for AlertType {
    fn from(value: &ExportError) -> Self {
        match value {
            ExportError::Kit(err) => Self::from(err),
            ExportError::Strategy { source, .. } => Self::DescriptiveError(source.to_string()),
        }
    }
}

/// `{title, description}` pair shown by the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub title: String,
    pub description: String,
}

/// View-model over catalog, coordinator and group manager.
pub struct ExportPresenter<'ctx, S: RecordStore> {
    ctx: &'ctx ExportKitContext<S>,
    share_sink: &'ctx dyn ShareSink,
    alert_sink: Option<&'ctx dyn AlertSink>,
    entries: Vec<ExportableEntry>,
    alert: Option<AlertType>,
}

impl<'ctx, S: RecordStore> ExportPresenter<'ctx, S> {
    pub fn new(ctx: &'ctx ExportKitContext<S>, share_sink: &'ctx dyn ShareSink) -> Self {
        Self {
            ctx,
            share_sink,
            alert_sink: None,
            entries: Vec::new(),
            alert: None,
        }
    }

    /// Pushes every raised alert to `sink` as well as the alert slot.
    pub fn with_alert_sink(mut self, sink: &'ctx dyn AlertSink) -> Self {
        self.alert_sink = Some(sink);
        self
    }

    pub fn entries(&self) -> &[ExportableEntry] {
        &self.entries
    }

    pub fn alert(&self) -> Option<&AlertType> {
        self.alert.as_ref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Reloads the entry list from the catalog.
    ///
    /// On failure the previous list is kept and an alert is raised.
    pub fn load(&mut self) {
        match self.ctx.catalog().list_all() {
            Ok(entries) => self.entries = entries,
            Err(err) => self.raise(AlertType::DescriptiveError(err.to_string())),
        }
    }

    /// Exports the entry at `index` and shares the result.
    pub fn export(&mut self, index: usize) {
        let Some(entry) = self.entries.get(index) else {
            self.raise(AlertType::from(&ExportKitError::NotFound));
            return;
        };
        match self.ctx.coordinator().export_one(entry) {
            Ok(payload) => self.share_sink.share(payload),
            Err(err) => self.raise(AlertType::from(&err)),
        }
    }

    /// Exports every listed entry and shares the merged result.
    pub fn export_all(&mut self) {
        match self.ctx.coordinator().export_all(&self.entries) {
            Ok(payload) => self.share_sink.share(payload),
            Err(err) => self.raise(AlertType::from(&err)),
        }
    }

    /// Deletes the entry at `index`; groups cascade to their children.
    pub fn delete(&mut self, index: usize) {
        let Some(entry) = self.entries.get(index) else {
            self.raise(AlertType::from(&ExportKitError::NotFound));
            return;
        };
        let result = match entry {
            ExportableEntry::Single(item) => self.ctx.items().delete_item(item),
            ExportableEntry::Group { group, .. } => self.ctx.groups().delete_group(group),
        };
        match result {
            Ok(()) => {
                self.entries.remove(index);
            }
            Err(err) => self.raise(AlertType::from(&err)),
        }
    }

    fn raise(&mut self, alert: AlertType) {
        warn!(
            "event=alert module=presenter status=raised title={}",
            alert.title()
        );
        if let Some(sink) = self.alert_sink {
            sink.on_alert(&alert);
        }
        self.alert = Some(alert);
    }
}

//! Export strategy contract and built-in strategies.
//!
//! # Responsibility
//! - Define the caller-supplied `entry -> payload` conversion seam.
//! - Ship text, JSON and JSON-file conversions for common hosts.
//!
//! # Invariants
//! - Strategies receive group entries with children already resolved.
//! - Strategies never touch the record store.

use super::payload::Payload;
use crate::model::entry::ExportableEntry;
use std::error::Error;
use std::path::{Path, PathBuf};

/// Error returned by a strategy; surfaced verbatim to the host.
pub type StrategyError = Box<dyn Error + Send + Sync>;

pub type StrategyResult = Result<Payload, StrategyError>;

/// Converts one exportable entry into a shareable payload.
pub trait ExportStrategy {
    fn export(&self, entry: &ExportableEntry) -> StrategyResult;
}

impl<F> ExportStrategy for F
where
    F: Fn(&ExportableEntry) -> StrategyResult,
{
    fn export(&self, entry: &ExportableEntry) -> StrategyResult {
        self(entry)
    }
}

/// Tab-separated text, one line per entry plus one per resolved child.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextStrategy;

impl ExportStrategy for TextStrategy {
    fn export(&self, entry: &ExportableEntry) -> StrategyResult {
        let mut lines = vec![format!(
            "{}\t{}\t{}",
            entry.name(),
            entry.id(),
            entry.timestamp()
        )];
        for child in entry.children().unwrap_or_default() {
            lines.push(format!(
                "\t{}\t{}",
                child.id(),
                String::from_utf8_lossy(child.payload())
            ));
        }
        Ok(Payload::Text(lines.join("\n")))
    }
}

/// The entry serialized as a JSON value.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonStrategy;

impl ExportStrategy for JsonStrategy {
    fn export(&self, entry: &ExportableEntry) -> StrategyResult {
        Ok(Payload::Structured(serde_json::to_value(entry)?))
    }
}

/// Writes `<entry id>.json` into a directory and shares the file.
#[derive(Debug, Clone)]
pub struct JsonFileStrategy {
    directory: PathBuf,
}

impl JsonFileStrategy {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl ExportStrategy for JsonFileStrategy {
    fn export(&self, entry: &ExportableEntry) -> StrategyResult {
        std::fs::create_dir_all(&self.directory)?;
        let path = self.directory.join(format!("{}.json", entry.id()));
        std::fs::write(&path, serde_json::to_vec_pretty(entry)?)?;
        Ok(Payload::File(path))
    }
}

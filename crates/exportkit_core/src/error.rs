//! Module-boundary error taxonomy.
//!
//! # Invariants
//! - Storage failures are wrapped into `SaveFailed`/`FetchFailed` with a
//!   human-readable reason; raw storage errors never cross this boundary.
//! - The error is serializable so hosts can forward it unchanged.

use crate::store::StoreError;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ExportKitResult<T> = Result<T, ExportKitError>;

/// Errors surfaced by catalog, item, group and export services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum ExportKitError {
    SaveFailed { reason: String },
    FetchFailed { reason: String },
    NotFound,
    NoExportStrategy,
    Unknown,
}

impl ExportKitError {
    pub(crate) fn save_failed(err: &StoreError) -> Self {
        Self::SaveFailed {
            reason: err.to_string(),
        }
    }

    pub(crate) fn fetch_failed(err: &StoreError) -> Self {
        Self::FetchFailed {
            reason: err.to_string(),
        }
    }

    /// Stable machine-readable code, matching the serialized tag.
    pub fn code(&self) -> &'static str {
        match self {
            Self::SaveFailed { .. } => "save_failed",
            Self::FetchFailed { .. } => "fetch_failed",
            Self::NotFound => "not_found",
            Self::NoExportStrategy => "no_export_strategy",
            Self::Unknown => "unknown",
        }
    }
}

impl Display for ExportKitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SaveFailed { reason } => write!(f, "could not save data: {reason}"),
            Self::FetchFailed { reason } => write!(f, "could not fetch data: {reason}"),
            Self::NotFound => write!(f, "item not found"),
            Self::NoExportStrategy => write!(f, "no export strategy configured"),
            Self::Unknown => write!(f, "unknown error"),
        }
    }
}

impl Error for ExportKitError {}

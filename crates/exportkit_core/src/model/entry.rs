//! Exportable entry projection.
//!
//! # Responsibility
//! - Unify items and groups into one list shape for presentation/export.
//!
//! # Invariants
//! - `Single` always wraps an `Item`, `Group` always wraps an `ItemGroup`.
//! - `children` stays `None` until explicitly resolved.

use super::group::{GroupedItem, ItemGroup};
use super::item::Item;
use super::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Discriminant of an `ExportableEntry`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Single,
    Group,
}

/// Derived, non-persisted export unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExportableEntry {
    /// One stand-alone item.
    Single(Item),
    /// One group header; children are fetched on demand.
    Group {
        group: ItemGroup,
        children: Option<Vec<GroupedItem>>,
    },
}

impl ExportableEntry {
    /// Wraps a group with unresolved children.
    pub fn group(group: ItemGroup) -> Self {
        Self::Group {
            group,
            children: None,
        }
    }

    pub fn kind(&self) -> EntryKind {
        match self {
            Self::Single(_) => EntryKind::Single,
            Self::Group { .. } => EntryKind::Group,
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Self::Single(item) => item.id,
            Self::Group { group, .. } => group.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Single(item) => item.name.as_str(),
            Self::Group { group, .. } => group.name.as_str(),
        }
    }

    /// Item timestamp for `Single`, group start time for `Group`.
    pub fn timestamp(&self) -> Timestamp {
        match self {
            Self::Single(item) => item.timestamp,
            Self::Group { group, .. } => group.start_timestamp,
        }
    }

    /// Resolved children; `None` for singles and unresolved groups.
    pub fn children(&self) -> Option<&[GroupedItem]> {
        match self {
            Self::Single(_) => None,
            Self::Group { children, .. } => children.as_deref(),
        }
    }

    /// Whether this is a group whose children have not been fetched yet.
    pub fn needs_resolution(&self) -> bool {
        matches!(self, Self::Group { children: None, .. })
    }
}

impl From<Item> for ExportableEntry {
    fn from(item: Item) -> Self {
        Self::Single(item)
    }
}

impl From<ItemGroup> for ExportableEntry {
    fn from(group: ItemGroup) -> Self {
        Self::group(group)
    }
}

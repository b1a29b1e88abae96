//! Item domain model.
//!
//! # Responsibility
//! - Define the single exportable record created by host applications.
//! - Provide the raw row shape returned by storage before validation.
//!
//! # Invariants
//! - `id` is stable and never reused for another item.
//! - There is no dedicated update path: callers mutate fields and save.

use super::{now_epoch_ms, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for items.
pub type ItemId = Uuid;

/// User-created exportable record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    /// Creation time in epoch milliseconds.
    pub timestamp: Timestamp,
}

impl Item {
    /// Creates a new item with a generated id, stamped with the current time.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name, now_epoch_ms())
    }

    /// Creates an item with caller-provided identity and timestamp.
    ///
    /// Used by import paths and tests where identity already exists.
    pub fn with_id(id: ItemId, name: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            id,
            name: name.into(),
            timestamp,
        }
    }
}

/// Item row as stored, before required-field checks.
///
/// Every column is nullable at the storage layer; rows missing any of them
/// are treated as malformed and never reach callers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub timestamp: Option<Timestamp>,
}

impl ItemRecord {
    /// Converts the row into an `Item`, or `None` if it is malformed.
    pub fn into_item(self) -> Option<Item> {
        let id = Uuid::parse_str(self.id?.as_str()).ok()?;
        Some(Item {
            id,
            name: self.name?,
            timestamp: self.timestamp?,
        })
    }
}

impl From<&Item> for ItemRecord {
    fn from(item: &Item) -> Self {
        Self {
            id: Some(item.id.to_string()),
            name: Some(item.name.clone()),
            timestamp: Some(item.timestamp),
        }
    }
}

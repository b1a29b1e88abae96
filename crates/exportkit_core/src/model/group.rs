//! Item group and grouped item models.
//!
//! # Responsibility
//! - Define the group header record and its batched children.
//!
//! # Invariants
//! - Children reference their group by id only; storage does not cascade.
//! - `GroupedItem::item_group_id` is fixed at construction.

use super::{now_epoch_ms, Timestamp};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for item groups.
pub type ItemGroupId = Uuid;

/// Stable identifier for grouped items.
pub type GroupedItemId = Uuid;

/// Named container for batch-inserted grouped items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemGroup {
    pub id: ItemGroupId,
    pub name: String,
    /// Epoch ms; defaults to creation time.
    pub start_timestamp: Timestamp,
}

impl ItemGroup {
    /// Creates a group with a generated id.
    ///
    /// `start_timestamp = None` stamps the group with the current time.
    pub fn new(name: impl Into<String>, start_timestamp: Option<Timestamp>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            start_timestamp: start_timestamp.unwrap_or_else(now_epoch_ms),
        }
    }
}

/// Group row as stored, before required-field checks.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ItemGroupRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub start_timestamp: Option<Timestamp>,
}

impl ItemGroupRecord {
    /// Converts the row into an `ItemGroup`, or `None` if it is malformed.
    pub fn into_group(self) -> Option<ItemGroup> {
        let id = Uuid::parse_str(self.id?.as_str()).ok()?;
        Some(ItemGroup {
            id,
            name: self.name?,
            start_timestamp: self.start_timestamp?,
        })
    }
}

impl From<&ItemGroup> for ItemGroupRecord {
    fn from(group: &ItemGroup) -> Self {
        Self {
            id: Some(group.id.to_string()),
            name: Some(group.name.clone()),
            start_timestamp: Some(group.start_timestamp),
        }
    }
}

/// One batched child record of an `ItemGroup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedItem {
    id: GroupedItemId,
    item_group_id: ItemGroupId,
    payload: Vec<u8>,
}

impl GroupedItem {
    /// Allocates a child with a fresh id for the given group.
    pub fn new(item_group_id: ItemGroupId, payload: Vec<u8>) -> Self {
        Self::with_id(Uuid::new_v4(), item_group_id, payload)
    }

    /// Rebuilds a child with known identity (storage read path).
    pub fn with_id(id: GroupedItemId, item_group_id: ItemGroupId, payload: Vec<u8>) -> Self {
        Self {
            id,
            item_group_id,
            payload,
        }
    }

    pub fn id(&self) -> GroupedItemId {
        self.id
    }

    pub fn item_group_id(&self) -> ItemGroupId {
        self.item_group_id
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Replaces the payload bytes. The owning group cannot be changed.
    pub fn set_payload(&mut self, payload: Vec<u8>) {
        self.payload = payload;
    }
}

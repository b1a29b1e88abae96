//! Record store contracts.
//!
//! # Responsibility
//! - Define the storage boundary consumed by catalog/group/export services.
//! - Keep unit-of-work semantics explicit: writes are staged, `save` commits.
//!
//! # Invariants
//! - Staged writes are visible to fetches on the same store before `save`.
//! - `batch_insert_grouped_items` is all-or-nothing at the storage level.
//! - Deleting a group never touches its children; callers cascade.

mod sqlite;

use crate::db::DbError;
use crate::model::group::{GroupedItem, GroupedItemId, ItemGroup, ItemGroupId, ItemGroupRecord};
use crate::model::item::{Item, ItemId, ItemRecord};
use crate::model::Timestamp;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub use sqlite::SqliteRecordStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage-level failure.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Persisted data cannot be converted into a valid record.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid stored record: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Simple item filter. Anything richer is out of scope for the store.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ItemPredicate {
    #[default]
    All,
    IdEquals(ItemId),
    NameEquals(String),
    /// Case-sensitive substring match on `name`.
    NameContains(String),
    /// Inclusive timestamp window; a missing bound is open.
    TimestampBetween {
        from: Option<Timestamp>,
        to: Option<Timestamp>,
    },
    /// Every inner predicate must match. Empty matches everything.
    And(Vec<ItemPredicate>),
}

/// Identity of one record to delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordRef {
    Item(ItemId),
    ItemGroup(ItemGroupId),
    GroupedItem(GroupedItemId),
}

/// Outcome of one batch insert request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchInsertResult {
    pub requested: usize,
    pub inserted: usize,
}

impl BatchInsertResult {
    /// Whether every requested row was written.
    pub fn is_complete(&self) -> bool {
        self.requested == self.inserted
    }
}

/// Transactional record store for the three persisted kinds.
///
/// Implementations serialize access internally or are used from a single
/// execution context; services add no locking of their own.
pub trait RecordStore {
    /// Stages an insert-or-replace of `item` keyed by its id.
    fn stage_item(&self, item: &Item) -> StoreResult<()>;
    /// Stages an insert-or-replace of `group` keyed by its id.
    fn stage_group(&self, group: &ItemGroup) -> StoreResult<()>;
    /// Fetches raw item rows matching `predicate`, in insertion order.
    fn fetch_items(&self, predicate: &ItemPredicate) -> StoreResult<Vec<ItemRecord>>;
    /// Fetches raw group rows, in insertion order.
    fn fetch_groups(&self) -> StoreResult<Vec<ItemGroupRecord>>;
    /// Fetches children whose `item_group_id` equals `group_id`.
    fn fetch_grouped_items(&self, group_id: ItemGroupId) -> StoreResult<Vec<GroupedItem>>;
    /// Stages deletion of one record. Missing records are not an error.
    fn delete(&self, record: RecordRef) -> StoreResult<()>;
    /// Inserts `count` children built by `fill` as one atomic operation.
    fn batch_insert_grouped_items(
        &self,
        count: usize,
        fill: &mut dyn FnMut(usize) -> GroupedItem,
    ) -> StoreResult<BatchInsertResult>;
    /// Commits every staged change.
    fn save(&self) -> StoreResult<()>;
    /// Drops every staged, unsaved change.
    fn discard(&self) -> StoreResult<()>;
}

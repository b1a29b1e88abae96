//! Export domain model.
//!
//! # Responsibility
//! - Define persisted record kinds (`Item`, `ItemGroup`, `GroupedItem`).
//! - Define the derived `ExportableEntry` projection used by export flows.
//!
//! # Invariants
//! - Every persisted record is identified by a stable v4 UUID.
//! - Timestamps are Unix epoch milliseconds.
//! - A `GroupedItem` never changes its owning group after creation.

pub mod entry;
pub mod group;
pub mod item;

use std::time::{SystemTime, UNIX_EPOCH};

/// Unix epoch milliseconds.
pub type Timestamp = i64;

/// Returns the current wall-clock time as epoch milliseconds.
///
/// Clocks set before 1970 collapse to `0` instead of failing.
pub fn now_epoch_ms() -> Timestamp {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as Timestamp)
        .unwrap_or(0)
}

//! Embeddable data-export core.
//!
//! Persists items and item groups, lists them as exportable entries and runs
//! a host-supplied export strategy over them.

pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod export;
pub mod logging;
pub mod model;
pub mod presenter;
pub mod service;
pub mod store;

pub use config::{ConfigError, ExportKitConfig, StoreLocation};
pub use context::{ContextError, ExportKitContext, LogSink};
pub use error::{ExportKitError, ExportKitResult};
pub use export::coordinator::{ExportCoordinator, ExportError};
pub use export::payload::{Payload, SharePayload};
pub use export::strategy::{
    ExportStrategy, JsonFileStrategy, JsonStrategy, StrategyError, StrategyResult, TextStrategy,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::entry::{EntryKind, ExportableEntry};
pub use model::group::{GroupedItem, GroupedItemId, ItemGroup, ItemGroupId, ItemGroupRecord};
pub use model::item::{Item, ItemId, ItemRecord};
pub use model::{now_epoch_ms, Timestamp};
pub use presenter::{Alert, AlertSink, AlertType, ExportPresenter, ShareSink};
pub use service::catalog::ExportCatalog;
pub use service::group_manager::GroupManager;
pub use service::item_service::ItemService;
pub use store::{
    BatchInsertResult, ItemPredicate, RecordRef, RecordStore, SqliteRecordStore, StoreError,
    StoreResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

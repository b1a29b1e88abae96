//! Process-level export context.
//!
//! # Responsibility
//! - Bundle configuration, record store, export strategy and log sink.
//! - Hand borrowed views of them to catalog/item/group/export services.
//!
//! # Invariants
//! - Constructed once by the host and passed explicitly; there is no global.
//! - Strategy and log sink are fixed at construction time.

use crate::config::{ConfigError, ExportKitConfig, StoreLocation};
use crate::export::coordinator::ExportCoordinator;
use crate::export::strategy::ExportStrategy;
use crate::service::catalog::ExportCatalog;
use crate::service::group_manager::GroupManager;
use crate::service::item_service::ItemService;
use crate::store::{RecordStore, SqliteRecordStore, StoreError};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Observer receiving human-readable diagnostic messages.
pub trait LogSink {
    fn log(&self, message: &str);
}

impl<F> LogSink for F
where
    F: Fn(&str),
{
    fn log(&self, message: &str) {
        self(message)
    }
}

/// Errors while building a context.
#[derive(Debug)]
pub enum ContextError {
    Config(ConfigError),
    Store(StoreError),
}

impl Display for ContextError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ContextError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<ConfigError> for ContextError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<StoreError> for ContextError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Shared dependencies for every export component.
pub struct ExportKitContext<S: RecordStore = SqliteRecordStore> {
    config: ExportKitConfig,
    store: S,
    strategy: Option<Box<dyn ExportStrategy>>,
    log_sink: Option<Box<dyn LogSink>>,
}

impl ExportKitContext<SqliteRecordStore> {
    /// Validates `config` and opens the SQLite store it points to.
    pub fn open(config: ExportKitConfig) -> Result<Self, ContextError> {
        config.validate()?;
        let store = match config.store_location() {
            StoreLocation::InMemory => SqliteRecordStore::open_in_memory(&config.app_id)?,
            StoreLocation::File(path) => SqliteRecordStore::open(path, &config.app_id)?,
        };
        Ok(Self::new(config, store))
    }
}

impl<S: RecordStore> ExportKitContext<S> {
    /// Wraps an already opened store.
    pub fn new(config: ExportKitConfig, store: S) -> Self {
        Self {
            config,
            store,
            strategy: None,
            log_sink: None,
        }
    }

    /// Installs the export strategy used by the coordinator.
    pub fn with_strategy(mut self, strategy: impl ExportStrategy + 'static) -> Self {
        self.strategy = Some(Box::new(strategy));
        self
    }

    /// Installs the observer receiving surfaced error messages.
    pub fn with_log_sink(mut self, sink: impl LogSink + 'static) -> Self {
        self.log_sink = Some(Box::new(sink));
        self
    }

    pub fn config(&self) -> &ExportKitConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn strategy(&self) -> Option<&dyn ExportStrategy> {
        self.strategy.as_deref()
    }

    pub fn items(&self) -> ItemService<'_, S> {
        ItemService::new(self)
    }

    pub fn catalog(&self) -> ExportCatalog<'_, S> {
        ExportCatalog::new(self)
    }

    pub fn groups(&self) -> GroupManager<'_, S> {
        GroupManager::new(self)
    }

    pub fn coordinator(&self) -> ExportCoordinator<'_, S> {
        ExportCoordinator::new(self)
    }

    /// Forwards a message to the installed log sink, if any.
    pub(crate) fn notify(&self, message: &str) {
        if let Some(sink) = &self.log_sink {
            sink.log(message);
        }
    }
}

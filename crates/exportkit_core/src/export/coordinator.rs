//! Export coordinator.
//!
//! # Responsibility
//! - Run the configured strategy over one entry or an ordered list.
//! - Resolve group children before the strategy sees a group entry.
//! - Aggregate per-entry payloads into one `SharePayload`.
//!
//! # Invariants
//! - A missing strategy fails before any store access.
//! - Entries are processed strictly in order; the first failure aborts the
//!   remaining entries and is the reported error.
//! - The strategy is never invoked for a group whose resolution failed.

use super::payload::{Payload, SharePayload};
use super::strategy::{ExportStrategy, StrategyError};
use crate::context::ExportKitContext;
use crate::error::ExportKitError;
use crate::model::entry::ExportableEntry;
use crate::store::RecordStore;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;
use uuid::Uuid;

/// Failure of an export run.
#[derive(Debug)]
pub enum ExportError {
    /// Configuration or storage failure (including `NoExportStrategy`).
    Kit(ExportKitError),
    /// The strategy rejected one entry.
    Strategy {
        entry_id: Uuid,
        source: StrategyError,
    },
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Kit(err) => write!(f, "{err}"),
            Self::Strategy { source, .. } => write!(f, "{source}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Kit(err) => Some(err),
            Self::Strategy { source, .. } => Some(source.as_ref()),
        }
    }
}

impl From<ExportKitError> for ExportError {
    fn from(value: ExportKitError) -> Self {
        Self::Kit(value)
    }
}

/// Strategy runner bound to one context.
pub struct ExportCoordinator<'ctx, S: RecordStore> {
    ctx: &'ctx ExportKitContext<S>,
}

impl<'ctx, S: RecordStore> ExportCoordinator<'ctx, S> {
    pub fn new(ctx: &'ctx ExportKitContext<S>) -> Self {
        Self { ctx }
    }

    /// Exports one entry.
    ///
    /// Group entries are always re-resolved so the strategy sees current
    /// children.
    pub fn export_one(&self, entry: &ExportableEntry) -> Result<SharePayload, ExportError> {
        let strategy = self.require_strategy()?;
        let payload = match entry {
            ExportableEntry::Single(_) => self.invoke(strategy, entry)?,
            ExportableEntry::Group { .. } => {
                let mut resolved = entry.clone();
                self.ctx.groups().resolve(&mut resolved)?;
                self.invoke(strategy, &resolved)?
            }
        };
        info!(
            "event=export_one module=export status=ok entry_id={} kind={:?}",
            entry.id(),
            entry.kind()
        );
        Ok(SharePayload::Item(payload))
    }

    /// Exports every entry in order and merges the results.
    ///
    /// Groups whose children are still unresolved are resolved just before
    /// their strategy call.
    pub fn export_all(&self, entries: &[ExportableEntry]) -> Result<SharePayload, ExportError> {
        let strategy = self.require_strategy()?;
        let started_at = Instant::now();

        let mut payloads = Vec::with_capacity(entries.len());
        for entry in entries {
            let payload = if entry.needs_resolution() {
                let mut resolved = entry.clone();
                self.ctx.groups().resolve(&mut resolved)?;
                self.invoke(strategy, &resolved)?
            } else {
                self.invoke(strategy, entry)?
            };
            payloads.push(payload);
        }

        let share = SharePayload::aggregate(payloads);
        info!(
            "event=export_all module=export status=ok entries={} share_items={} duration_ms={}",
            entries.len(),
            share.share_item_count(),
            started_at.elapsed().as_millis()
        );
        Ok(share)
    }

    fn require_strategy(&self) -> Result<&'ctx dyn ExportStrategy, ExportError> {
        match self.ctx.strategy() {
            Some(strategy) => Ok(strategy),
            None => {
                error!("event=export module=export status=error error_code=no_export_strategy");
                let err = ExportKitError::NoExportStrategy;
                self.ctx.notify(&err.to_string());
                Err(err.into())
            }
        }
    }

    fn invoke(
        &self,
        strategy: &dyn ExportStrategy,
        entry: &ExportableEntry,
    ) -> Result<Payload, ExportError> {
        strategy.export(entry).map_err(|source| {
            error!(
                "event=export module=export status=error error_code=strategy_failed entry_id={} error={}",
                entry.id(),
                source
            );
            self.ctx
                .notify(&format!("export of {} failed: {source}", entry.id()));
            ExportError::Strategy {
                entry_id: entry.id(),
                source,
            }
        })
    }
}

//! Item group use-case service.
//!
//! # Responsibility
//! - Create groups and batch-insert their children atomically.
//! - Resolve a group's children on demand.
//! - Cascade group deletion: children first, then the group, one save.
//!
//! # Invariants
//! - `batch_insert` never contacts storage for an empty payload list.
//! - `delete_group` deletes nothing if child resolution fails.
//! - No `GroupedItem` outlives a successfully deleted group.

use crate::context::ExportKitContext;
use crate::error::{ExportKitError, ExportKitResult};
use crate::model::entry::ExportableEntry;
use crate::model::group::{GroupedItem, ItemGroup, ItemGroupId};
use crate::model::Timestamp;
use crate::store::{RecordRef, RecordStore, StoreError};
use log::{error, info, warn};
use std::time::Instant;

/// Group lifecycle facade bound to one context.
pub struct GroupManager<'ctx, S: RecordStore> {
    ctx: &'ctx ExportKitContext<S>,
}

impl<'ctx, S: RecordStore> GroupManager<'ctx, S> {
    pub fn new(ctx: &'ctx ExportKitContext<S>) -> Self {
        Self { ctx }
    }

    /// Creates and persists a group.
    ///
    /// Persistence is best-effort: a failed stage/save is logged and reported
    /// to the log sink, and the group is still returned.
    pub fn create_group(
        &self,
        name: impl Into<String>,
        start_timestamp: Option<Timestamp>,
    ) -> ItemGroup {
        let group = ItemGroup::new(name, start_timestamp);
        let persisted = self
            .ctx
            .store()
            .stage_group(&group)
            .and_then(|()| self.ctx.store().save());
        match persisted {
            Ok(()) => info!(
                "event=group_create module=group_manager status=ok group_id={}",
                group.id
            ),
            Err(err) => {
                warn!(
                    "event=group_create module=group_manager status=error group_id={} error={}",
                    group.id, err
                );
                self.ctx.notify(&format!("could not save group {}: {err}", group.id));
            }
        }
        group
    }

    /// Inserts one child per payload into `group` and saves.
    ///
    /// Returns `true` only when every row was inserted and the save
    /// succeeded. `false` does not mean nothing persisted; callers should
    /// verify or retry.
    pub fn batch_insert(&self, payloads: &[Vec<u8>], group: &ItemGroup) -> bool {
        if payloads.is_empty() {
            return false;
        }

        let started_at = Instant::now();
        let group_id = group.id;
        let mut fill = |index: usize| GroupedItem::new(group_id, payloads[index].clone());
        let batch = self
            .ctx
            .store()
            .batch_insert_grouped_items(payloads.len(), &mut fill);

        let batch_ok = match batch {
            Ok(result) if result.is_complete() => true,
            Ok(result) => {
                warn!(
                    "event=group_batch_insert module=group_manager status=error group_id={} error_code=incomplete requested={} inserted={}",
                    group_id, result.requested, result.inserted
                );
                false
            }
            Err(err) => {
                error!(
                    "event=group_batch_insert module=group_manager status=error group_id={} error_code=batch_failed error={}",
                    group_id, err
                );
                self.ctx.notify(&format!("batch insert failed: {err}"));
                false
            }
        };

        let save_ok = match self.ctx.store().save() {
            Ok(()) => true,
            Err(err) => {
                error!(
                    "event=group_batch_insert module=group_manager status=error group_id={} error_code=save_failed error={}",
                    group_id, err
                );
                self.ctx.notify(&format!("could not save data: {err}"));
                false
            }
        };

        if batch_ok && save_ok {
            info!(
                "event=group_batch_insert module=group_manager status=ok group_id={} count={} duration_ms={}",
                group_id,
                payloads.len(),
                started_at.elapsed().as_millis()
            );
        }
        batch_ok && save_ok
    }

    /// Fetches the children of `group_id`. An empty group is not an error.
    pub fn resolve_children(&self, group_id: ItemGroupId) -> ExportKitResult<Vec<GroupedItem>> {
        self.ctx
            .store()
            .fetch_grouped_items(group_id)
            .map_err(|err| {
                let err = ExportKitError::fetch_failed(&err);
                self.ctx.notify(&err.to_string());
                err
            })
    }

    /// Populates `children` of a group entry. Re-fetches when called again.
    ///
    /// Single entries are left untouched.
    pub fn resolve(&self, entry: &mut ExportableEntry) -> ExportKitResult<()> {
        if let ExportableEntry::Group { group, children } = entry {
            *children = Some(self.resolve_children(group.id)?);
        }
        Ok(())
    }

    /// Deletes every child of `group`, then the group, then saves once.
    pub fn delete_group(&self, group: &ItemGroup) -> ExportKitResult<()> {
        let children = self.resolve_children(group.id)?;
        let store = self.ctx.store();

        for child in &children {
            store
                .delete(RecordRef::GroupedItem(child.id()))
                .map_err(|err| self.save_failure(&err))?;
        }
        store
            .delete(RecordRef::ItemGroup(group.id))
            .map_err(|err| self.save_failure(&err))?;
        store.save().map_err(|err| self.save_failure(&err))?;

        info!(
            "event=group_delete module=group_manager status=ok group_id={} children={}",
            group.id,
            children.len()
        );
        Ok(())
    }

    fn save_failure(&self, err: &StoreError) -> ExportKitError {
        let err = ExportKitError::save_failed(err);
        error!("event=group_delete module=group_manager status=error error={err}");
        self.ctx.notify(&err.to_string());
        err
    }
}

//! Item use-case service.
//!
//! # Responsibility
//! - Create, save and delete items through the record store.
//!
//! # Invariants
//! - Creation stages the record; nothing is durable until `save`.
//! - Updates follow "fetch, mutate, save"; there is no partial update API.
//! - Every delete path ends with a `save`.

use crate::context::ExportKitContext;
use crate::error::{ExportKitError, ExportKitResult};
use crate::model::item::{Item, ItemId};
use crate::store::{ItemPredicate, RecordRef, RecordStore};
use log::{error, info};

/// Item CRUD facade bound to one context.
pub struct ItemService<'ctx, S: RecordStore> {
    ctx: &'ctx ExportKitContext<S>,
}

impl<'ctx, S: RecordStore> ItemService<'ctx, S> {
    pub fn new(ctx: &'ctx ExportKitContext<S>) -> Self {
        Self { ctx }
    }

    /// Creates an item stamped with the current time and stages it.
    ///
    /// The item is pending until `save` is called.
    pub fn create_item(&self, name: impl Into<String>) -> ExportKitResult<Item> {
        let item = Item::new(name);
        self.ctx
            .store()
            .stage_item(&item)
            .map_err(|err| self.save_failure(ExportKitError::save_failed(&err)))?;
        Ok(item)
    }

    /// Commits every pending change.
    pub fn save(&self) -> ExportKitResult<()> {
        self.ctx
            .store()
            .save()
            .map_err(|err| self.save_failure(ExportKitError::save_failed(&err)))
    }

    /// Stages the current field values of `item`, then saves.
    pub fn save_item(&self, item: &Item) -> ExportKitResult<()> {
        self.ctx
            .store()
            .stage_item(item)
            .map_err(|err| self.save_failure(ExportKitError::save_failed(&err)))?;
        self.save()
    }

    /// Drops pending, unsaved changes.
    pub fn discard(&self) -> ExportKitResult<()> {
        self.ctx
            .store()
            .discard()
            .map_err(|err| self.save_failure(ExportKitError::save_failed(&err)))
    }

    /// Deletes one item and saves.
    pub fn delete_item(&self, item: &Item) -> ExportKitResult<()> {
        self.ctx
            .store()
            .delete(RecordRef::Item(item.id))
            .map_err(|err| self.save_failure(ExportKitError::save_failed(&err)))?;
        self.save()
    }

    /// Looks up an item by id and deletes it.
    ///
    /// Lookup failures (including `NotFound`) are returned unchanged.
    pub fn delete_item_by_id(&self, id: ItemId) -> ExportKitResult<()> {
        let item = self.ctx.catalog().get_by_id(id)?;
        self.delete_item(&item)
    }

    /// Deletes every item and saves once.
    ///
    /// A failed fetch is reported as `Unknown`.
    pub fn delete_all_items(&self) -> ExportKitResult<()> {
        let items = self
            .ctx
            .catalog()
            .get_by_predicate(&ItemPredicate::All)
            .map_err(|_| ExportKitError::Unknown)?;
        for item in &items {
            self.ctx
                .store()
                .delete(RecordRef::Item(item.id))
                .map_err(|err| self.save_failure(ExportKitError::save_failed(&err)))?;
        }
        self.save()?;
        info!(
            "event=items_delete_all module=item_service status=ok count={}",
            items.len()
        );
        Ok(())
    }

    fn save_failure(&self, err: ExportKitError) -> ExportKitError {
        error!("event=item_save module=item_service status=error error={err}");
        self.ctx.notify(&err.to_string());
        err
    }
}

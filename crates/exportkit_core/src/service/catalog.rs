//! Export catalog: unified listing of items and groups.
//!
//! # Responsibility
//! - Merge item and group records into one `ExportableEntry` list.
//! - Provide item lookups by id and by predicate.
//!
//! # Invariants
//! - Items come first, then groups, each in store fetch order.
//! - Malformed rows are skipped silently; they are never errors.
//! - `list_all` fails only when both underlying fetches fail.
//! - Group children are never fetched here.

use crate::context::ExportKitContext;
use crate::error::{ExportKitError, ExportKitResult};
use crate::model::entry::ExportableEntry;
use crate::model::group::ItemGroup;
use crate::model::item::{Item, ItemId};
use crate::store::{ItemPredicate, RecordStore};
use log::{debug, warn};

/// Read-side catalog over one context.
pub struct ExportCatalog<'ctx, S: RecordStore> {
    ctx: &'ctx ExportKitContext<S>,
}

impl<'ctx, S: RecordStore> ExportCatalog<'ctx, S> {
    pub fn new(ctx: &'ctx ExportKitContext<S>) -> Self {
        Self { ctx }
    }

    /// Lists every item and group as exportable entries.
    ///
    /// # Errors
    /// - Returns the item fetch failure when the group fetch fails too.
    pub fn list_all(&self) -> ExportKitResult<Vec<ExportableEntry>> {
        let items = self.fetch_items(&ItemPredicate::All);
        let groups = self.fetch_groups();

        let (items, groups) = match (items, groups) {
            (Err(err), Err(_)) => return Err(err),
            (Ok(items), Err(err)) => {
                warn!("event=catalog_list module=catalog status=partial missing=groups error={err}");
                (items, Vec::new())
            }
            (Err(err), Ok(groups)) => {
                warn!("event=catalog_list module=catalog status=partial missing=items error={err}");
                (Vec::new(), groups)
            }
            (Ok(items), Ok(groups)) => (items, groups),
        };

        let mut entries = Vec::with_capacity(items.len() + groups.len());
        entries.extend(items.into_iter().map(ExportableEntry::Single));
        entries.extend(groups.into_iter().map(ExportableEntry::group));
        Ok(entries)
    }

    /// Returns the single item with `id`.
    ///
    /// # Errors
    /// - `NotFound` when zero or more than one valid row matches.
    pub fn get_by_id(&self, id: ItemId) -> ExportKitResult<Item> {
        let mut items = self.fetch_items(&ItemPredicate::IdEquals(id))?;
        if items.len() != 1 {
            return Err(ExportKitError::NotFound);
        }
        items.pop().ok_or(ExportKitError::NotFound)
    }

    /// Returns valid items matching `predicate`, in fetch order.
    pub fn get_by_predicate(&self, predicate: &ItemPredicate) -> ExportKitResult<Vec<Item>> {
        self.fetch_items(predicate)
    }

    fn fetch_items(&self, predicate: &ItemPredicate) -> ExportKitResult<Vec<Item>> {
        let records = self.ctx.store().fetch_items(predicate).map_err(|err| {
            let err = ExportKitError::fetch_failed(&err);
            self.ctx.notify(&err.to_string());
            err
        })?;

        let total = records.len();
        let items: Vec<Item> = records
            .into_iter()
            .filter_map(|record| record.into_item())
            .collect();
        if items.len() != total {
            debug!(
                "event=catalog_skip module=catalog kind=item skipped={}",
                total - items.len()
            );
        }
        Ok(items)
    }

    fn fetch_groups(&self) -> ExportKitResult<Vec<ItemGroup>> {
        let records = self.ctx.store().fetch_groups().map_err(|err| {
            let err = ExportKitError::fetch_failed(&err);
            self.ctx.notify(&err.to_string());
            err
        })?;

        let total = records.len();
        let groups: Vec<ItemGroup> = records
            .into_iter()
            .filter_map(|record| record.into_group())
            .collect();
        if groups.len() != total {
            debug!(
                "event=catalog_skip module=catalog kind=group skipped={}",
                total - groups.len()
            );
        }
        Ok(groups)
    }
}

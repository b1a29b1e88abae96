#![allow(dead_code)]

use exportkit_core::{
    BatchInsertResult, ExportKitConfig, ExportKitContext, GroupedItem, Item, ItemGroup,
    ItemGroupId, ItemGroupRecord, ItemPredicate, ItemRecord, RecordRef, RecordStore,
    SqliteRecordStore, StoreError, StoreResult,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub const APP_ID: &str = "com.example.exporter";

pub fn memory_ctx() -> ExportKitContext {
    ExportKitContext::open(ExportKitConfig::in_memory(APP_ID)).unwrap()
}

pub fn flaky_ctx() -> ExportKitContext<FlakyStore> {
    let store = FlakyStore::new(SqliteRecordStore::open_in_memory(APP_ID).unwrap());
    ExportKitContext::new(ExportKitConfig::in_memory(APP_ID), store)
}

/// Collects every message sent to a log sink.
pub fn message_log() -> (Rc<RefCell<Vec<String>>>, impl Fn(&str) + 'static) {
    let messages = Rc::new(RefCell::new(Vec::new()));
    let sink_messages = Rc::clone(&messages);
    let sink = move |message: &str| sink_messages.borrow_mut().push(message.to_string());
    (messages, sink)
}

pub fn count_rows(conn: &rusqlite::Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

/// SQLite store with switchable failure injection and a call counter.
pub struct FlakyStore {
    pub inner: SqliteRecordStore,
    pub fail_fetch_items: Cell<bool>,
    pub fail_fetch_groups: Cell<bool>,
    pub fail_fetch_children: Cell<bool>,
    pub fail_stage: Cell<bool>,
    pub fail_batch: Cell<bool>,
    pub fail_save: Cell<bool>,
    pub calls: Cell<usize>,
}

impl FlakyStore {
    pub fn new(inner: SqliteRecordStore) -> Self {
        Self {
            inner,
            fail_fetch_items: Cell::new(false),
            fail_fetch_groups: Cell::new(false),
            fail_fetch_children: Cell::new(false),
            fail_stage: Cell::new(false),
            fail_batch: Cell::new(false),
            fail_save: Cell::new(false),
            calls: Cell::new(0),
        }
    }

    fn enter(&self, flag: &Cell<bool>, operation: &str) -> StoreResult<()> {
        self.calls.set(self.calls.get() + 1);
        if flag.get() {
            return Err(StoreError::InvalidData(format!("injected {operation} failure")));
        }
        Ok(())
    }
}

impl RecordStore for FlakyStore {
    fn stage_item(&self, item: &Item) -> StoreResult<()> {
        self.enter(&self.fail_stage, "stage")?;
        self.inner.stage_item(item)
    }

    fn stage_group(&self, group: &ItemGroup) -> StoreResult<()> {
        self.enter(&self.fail_stage, "stage")?;
        self.inner.stage_group(group)
    }

    fn fetch_items(&self, predicate: &ItemPredicate) -> StoreResult<Vec<ItemRecord>> {
        self.enter(&self.fail_fetch_items, "item fetch")?;
        self.inner.fetch_items(predicate)
    }

    fn fetch_groups(&self) -> StoreResult<Vec<ItemGroupRecord>> {
        self.enter(&self.fail_fetch_groups, "group fetch")?;
        self.inner.fetch_groups()
    }

    fn fetch_grouped_items(&self, group_id: ItemGroupId) -> StoreResult<Vec<GroupedItem>> {
        self.enter(&self.fail_fetch_children, "children fetch")?;
        self.inner.fetch_grouped_items(group_id)
    }

    fn delete(&self, record: RecordRef) -> StoreResult<()> {
        self.enter(&Cell::new(false), "delete")?;
        self.inner.delete(record)
    }

    fn batch_insert_grouped_items(
        &self,
        count: usize,
        fill: &mut dyn FnMut(usize) -> GroupedItem,
    ) -> StoreResult<BatchInsertResult> {
        self.enter(&self.fail_batch, "batch insert")?;
        self.inner.batch_insert_grouped_items(count, fill)
    }

    fn save(&self) -> StoreResult<()> {
        self.enter(&self.fail_save, "save")?;
        self.inner.save()
    }

    fn discard(&self) -> StoreResult<()> {
        self.enter(&Cell::new(false), "discard")?;
        self.inner.discard()
    }
}

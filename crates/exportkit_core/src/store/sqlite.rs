//! SQLite-backed record store.
//!
//! # Responsibility
//! - Implement `RecordStore` over the `items`, `item_groups` and
//!   `grouped_items` tables.
//! - Emulate a unit of work with one lazily opened transaction.
//!
//! # Invariants
//! - The first staged write opens `BEGIN IMMEDIATE`; `save` commits it.
//! - Batch inserts run inside a savepoint nested in the unit of work.
//! - Fetch order is insertion order (`row_id ASC`).
//! - A cell of the wrong storage class reads as missing; one bad row never
//!   fails a whole fetch.

use super::{BatchInsertResult, ItemPredicate, RecordRef, RecordStore, StoreError, StoreResult};
use crate::db::schema::SCHEMA_VERSION;
use crate::db::{open_db, open_db_in_memory, DbResult};
use crate::model::group::{GroupedItem, ItemGroup, ItemGroupId, ItemGroupRecord};
use crate::model::item::{Item, ItemRecord};
use log::{debug, warn};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};
use std::path::Path;
use uuid::Uuid;

const BATCH_SAVEPOINT: &str = "grouped_items_batch";
const REQUIRED_TABLES: [&str; 4] = ["store_meta", "items", "item_groups", "grouped_items"];

/// Record store owning one SQLite connection.
pub struct SqliteRecordStore {
    conn: Connection,
}

impl SqliteRecordStore {
    /// Opens (or creates) a file-backed store for `app_id`.
    pub fn open(path: impl AsRef<Path>, app_id: &str) -> Result<Self, StoreError> {
        Self::try_new(open_db(path, app_id)?)
    }

    /// Opens a fresh in-memory store for `app_id`.
    pub fn open_in_memory(app_id: &str) -> Result<Self, StoreError> {
        Self::try_new(open_db_in_memory(app_id)?)
    }

    /// Wraps an already bootstrapped connection.
    ///
    /// # Errors
    /// - `InvalidData` when the schema version or tables do not match.
    pub fn try_new(conn: Connection) -> Result<Self, StoreError> {
        ensure_store_connection_ready(&conn)?;
        Ok(Self { conn })
    }

    /// Underlying connection, for diagnostics and tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Whether staged writes are waiting for `save`.
    pub fn has_pending_changes(&self) -> bool {
        !self.conn.is_autocommit()
    }

    fn begin_unit_of_work(&self) -> StoreResult<()> {
        if self.conn.is_autocommit() {
            self.conn.execute_batch("BEGIN IMMEDIATE;")?;
        }
        Ok(())
    }

    fn insert_batch_rows(
        &self,
        count: usize,
        fill: &mut dyn FnMut(usize) -> GroupedItem,
    ) -> StoreResult<usize> {
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO grouped_items (id, item_group_id, payload) VALUES (?1, ?2, ?3);",
        )?;
        let mut inserted = 0;
        for index in 0..count {
            let child = fill(index);
            inserted += stmt.execute(params![
                child.id().to_string(),
                child.item_group_id().to_string(),
                child.payload(),
            ])?;
        }
        Ok(inserted)
    }
}

impl RecordStore for SqliteRecordStore {
    fn stage_item(&self, item: &Item) -> StoreResult<()> {
        self.begin_unit_of_work()?;
        self.conn.execute(
            "INSERT INTO items (id, name, timestamp) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                timestamp = excluded.timestamp;",
            params![item.id.to_string(), item.name.as_str(), item.timestamp],
        )?;
        Ok(())
    }

    fn stage_group(&self, group: &ItemGroup) -> StoreResult<()> {
        self.begin_unit_of_work()?;
        self.conn.execute(
            "INSERT INTO item_groups (id, name, start_timestamp) VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                start_timestamp = excluded.start_timestamp;",
            params![
                group.id.to_string(),
                group.name.as_str(),
                group.start_timestamp
            ],
        )?;
        Ok(())
    }

    fn fetch_items(&self, predicate: &ItemPredicate) -> StoreResult<Vec<ItemRecord>> {
        let mut clause = String::new();
        let mut bind_values: Vec<Value> = Vec::new();
        push_predicate(predicate, &mut clause, &mut bind_values);

        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, name, timestamp FROM items WHERE {clause} ORDER BY row_id ASC;"
        ))?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(ItemRecord {
                id: text_column(row.get("id")?),
                name: text_column(row.get("name")?),
                timestamp: integer_column(row.get("timestamp")?),
            });
        }
        Ok(records)
    }

    fn fetch_groups(&self) -> StoreResult<Vec<ItemGroupRecord>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, start_timestamp FROM item_groups ORDER BY row_id ASC;")?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(ItemGroupRecord {
                id: text_column(row.get("id")?),
                name: text_column(row.get("name")?),
                start_timestamp: integer_column(row.get("start_timestamp")?),
            });
        }
        Ok(records)
    }

    fn fetch_grouped_items(&self, group_id: ItemGroupId) -> StoreResult<Vec<GroupedItem>> {
        let mut stmt = self.conn.prepare_cached(
            "SELECT id, payload
             FROM grouped_items
             WHERE item_group_id = ?1
             ORDER BY row_id ASC;",
        )?;
        let mut rows = stmt.query([group_id.to_string()])?;
        let mut children = Vec::new();
        let mut skipped = 0_usize;
        while let Some(row) = rows.next()? {
            let id = text_column(row.get("id")?).and_then(|text| Uuid::parse_str(&text).ok());
            let payload = match row.get::<_, Value>("payload")? {
                Value::Blob(bytes) => Some(bytes),
                _ => None,
            };
            match (id, payload) {
                (Some(id), Some(payload)) => {
                    children.push(GroupedItem::with_id(id, group_id, payload));
                }
                _ => skipped += 1,
            }
        }
        if skipped > 0 {
            debug!(
                "event=fetch_children module=store status=partial group_id={group_id} skipped={skipped}"
            );
        }
        Ok(children)
    }

    fn delete(&self, record: RecordRef) -> StoreResult<()> {
        self.begin_unit_of_work()?;
        let (sql, id) = match record {
            RecordRef::Item(id) => ("DELETE FROM items WHERE id = ?1;", id),
            RecordRef::ItemGroup(id) => ("DELETE FROM item_groups WHERE id = ?1;", id),
            RecordRef::GroupedItem(id) => ("DELETE FROM grouped_items WHERE id = ?1;", id),
        };
        self.conn.execute(sql, [id.to_string()])?;
        Ok(())
    }

    fn batch_insert_grouped_items(
        &self,
        count: usize,
        fill: &mut dyn FnMut(usize) -> GroupedItem,
    ) -> StoreResult<BatchInsertResult> {
        self.begin_unit_of_work()?;
        self.conn
            .execute_batch(&format!("SAVEPOINT {BATCH_SAVEPOINT};"))?;

        match self.insert_batch_rows(count, fill) {
            Ok(inserted) => {
                self.conn
                    .execute_batch(&format!("RELEASE {BATCH_SAVEPOINT};"))?;
                debug!("event=batch_insert module=store status=ok requested={count} inserted={inserted}");
                Ok(BatchInsertResult {
                    requested: count,
                    inserted,
                })
            }
            Err(err) => {
                if let Err(rollback_err) = self.conn.execute_batch(&format!(
                    "ROLLBACK TO {BATCH_SAVEPOINT}; RELEASE {BATCH_SAVEPOINT};"
                )) {
                    warn!(
                        "event=batch_insert module=store status=error error_code=rollback_failed error={rollback_err}"
                    );
                }
                Err(err)
            }
        }
    }

    fn save(&self) -> StoreResult<()> {
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("COMMIT;")?;
        }
        Ok(())
    }

    fn discard(&self) -> StoreResult<()> {
        if !self.conn.is_autocommit() {
            self.conn.execute_batch("ROLLBACK;")?;
        }
        Ok(())
    }
}

fn push_predicate(predicate: &ItemPredicate, sql: &mut String, bind_values: &mut Vec<Value>) {
    match predicate {
        ItemPredicate::All => sql.push_str("1 = 1"),
        ItemPredicate::IdEquals(id) => {
            sql.push_str("id = ?");
            bind_values.push(Value::Text(id.to_string()));
        }
        ItemPredicate::NameEquals(name) => {
            sql.push_str("name = ?");
            bind_values.push(Value::Text(name.clone()));
        }
        ItemPredicate::NameContains(fragment) => {
            sql.push_str("instr(name, ?) > 0");
            bind_values.push(Value::Text(fragment.clone()));
        }
        ItemPredicate::TimestampBetween { from, to } => {
            sql.push_str("(1 = 1");
            if let Some(from) = from {
                sql.push_str(" AND timestamp >= ?");
                bind_values.push(Value::Integer(*from));
            }
            if let Some(to) = to {
                sql.push_str(" AND timestamp <= ?");
                bind_values.push(Value::Integer(*to));
            }
            sql.push(')');
        }
        ItemPredicate::And(inner) => {
            sql.push_str("(1 = 1");
            for predicate in inner {
                sql.push_str(" AND (");
                push_predicate(predicate, sql, bind_values);
                sql.push(')');
            }
            sql.push(')');
        }
    }
}

/// Type-mismatched cells read as missing so only that row is dropped.
fn text_column(value: Value) -> Option<String> {
    match value {
        Value::Text(text) => Some(text),
        _ => None,
    }
}

fn integer_column(value: Value) -> Option<i64> {
    match value {
        Value::Integer(number) => Some(number),
        _ => None,
    }
}

fn ensure_store_connection_ready(conn: &Connection) -> StoreResult<()> {
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != SCHEMA_VERSION {
        return Err(StoreError::InvalidData(format!(
            "record store requires schema version {SCHEMA_VERSION}, got {actual_version}"
        )));
    }

    for table in REQUIRED_TABLES {
        if !table_exists(conn, table)? {
            return Err(StoreError::InvalidData(format!(
                "record store requires table `{table}`"
            )));
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

#[cfg(test)]
mod tests {
    use super::{integer_column, push_predicate, text_column};
    use crate::store::ItemPredicate;
    use rusqlite::types::Value;

    #[test]
    fn mismatched_cell_types_read_as_missing() {
        assert_eq!(text_column(Value::Text("a".to_string())), Some("a".to_string()));
        assert_eq!(text_column(Value::Integer(7)), None);
        assert_eq!(integer_column(Value::Integer(7)), Some(7));
        assert_eq!(integer_column(Value::Text("yesterday".to_string())), None);
        assert_eq!(integer_column(Value::Null), None);
    }

    #[test]
    fn nested_predicates_bind_in_order() {
        let predicate = ItemPredicate::And(vec![
            ItemPredicate::NameContains("log".to_string()),
            ItemPredicate::TimestampBetween {
                from: Some(10),
                to: None,
            },
        ]);
        let mut sql = String::new();
        let mut binds = Vec::new();
        push_predicate(&predicate, &mut sql, &mut binds);

        assert_eq!(
            sql,
            "(1 = 1 AND (instr(name, ?) > 0) AND ((1 = 1 AND timestamp >= ?)))"
        );
        assert_eq!(
            binds,
            vec![Value::Text("log".to_string()), Value::Integer(10)]
        );
    }
}

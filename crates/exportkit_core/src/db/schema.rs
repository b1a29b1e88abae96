//! Fixed schema bootstrap for export stores.
//!
//! # Responsibility
//! - Create the record tables on first open.
//! - Bind a store file to the host application that created it.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - Stores written by a newer schema are rejected, never downgraded.
//! - `store_meta.app_id` never changes after creation.

use crate::db::{DbError, DbResult};
use rusqlite::{params, Connection, OptionalExtension};

/// Schema version written by this crate.
pub const SCHEMA_VERSION: u32 = 1;

const SCHEMA_SQL: &str = include_str!("schema.sql");
const META_APP_ID: &str = "app_id";
const META_CREATED_BY: &str = "created_by_version";

/// Creates the schema when missing and verifies the owning application.
pub fn apply_schema(conn: &mut Connection, app_id: &str) -> DbResult<()> {
    let current_version = current_user_version(conn)?;
    if current_version > SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: SCHEMA_VERSION,
        });
    }

    if current_version < SCHEMA_VERSION {
        let tx = conn.transaction()?;
        tx.execute_batch(SCHEMA_SQL)?;
        tx.execute(
            "INSERT OR IGNORE INTO store_meta (key, value) VALUES (?1, ?2), (?3, ?4);",
            params![
                META_APP_ID,
                app_id,
                META_CREATED_BY,
                env!("CARGO_PKG_VERSION")
            ],
        )?;
        tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
        tx.commit()?;
    }

    match stored_app_id(conn)? {
        Some(found) if found == app_id => Ok(()),
        Some(found) => Err(DbError::AppMismatch {
            expected: app_id.to_string(),
            found,
        }),
        None => Err(DbError::AppMismatch {
            expected: app_id.to_string(),
            found: String::new(),
        }),
    }
}

/// Returns the application id recorded in the store, if any.
pub fn stored_app_id(conn: &Connection) -> DbResult<Option<String>> {
    let value = conn
        .query_row(
            "SELECT value FROM store_meta WHERE key = ?1;",
            [META_APP_ID],
            |row| row.get(0),
        )
        .optional()?;
    Ok(value)
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

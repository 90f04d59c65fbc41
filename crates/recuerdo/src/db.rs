//! SQLite storage backend
//!
//! Values live in a single `kv` table as JSON text. The schema is created by
//! embedded migrations tracked in `schema_migrations`.

use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::store::Storage;

/// Database file name inside the data directory
pub const DB_FILE: &str = "recuerdo.db";

/// Ordered (version, sql) pairs
const MIGRATIONS: &[(&str, &str)] = &[(
    "001_kv",
    "CREATE TABLE kv (
        key        TEXT PRIMARY KEY,
        value      TEXT NOT NULL,
        updated_at TEXT NOT NULL DEFAULT (datetime('now'))
    );",
)];

pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Open (or create) the database at `db_path`, running pending migrations
    pub fn open(db_path: &Path) -> StoreResult<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(db_path)?;
        Self::from_connection(conn)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> StoreResult<Self> {
        let count = run_migrations(&conn)?;
        if count > 0 {
            info!(count = count, "Applied migrations");
        }
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        // Poisoning only means another request panicked; the connection is still usable
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Apply every migration not yet recorded. Returns how many ran.
pub fn run_migrations(conn: &Connection) -> StoreResult<usize> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version    TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL
        );",
    )?;

    let mut applied = 0;

    for &(version, sql) in MIGRATIONS {
        let already_applied: bool = conn.query_row(
            "SELECT COUNT(*) > 0 FROM schema_migrations WHERE version = ?1",
            [version],
            |row| row.get(0),
        )?;

        if already_applied {
            continue;
        }

        conn.execute_batch(sql)
            .map_err(|source| StoreError::Migration { version, source })?;

        conn.execute(
            "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, datetime('now'))",
            [version],
        )?;

        debug!(version = %version, "Applied migration");
        applied += 1;
    }

    Ok(applied)
}

impl Storage for SqliteStorage {
    fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        let text: Option<String> = self
            .conn()
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;

        match text {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &Value) -> StoreResult<()> {
        let text = serde_json::to_string(value)?;
        self.conn().execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = datetime('now')",
            params![key, text],
        )?;
        Ok(())
    }
}

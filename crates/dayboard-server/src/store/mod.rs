//! SQLite-based entity store for tasks and events.
//!
//! The store is constructed explicitly (`Store::open` at startup,
//! `Store::in_memory` in tests) and handed to the router state; nothing in
//! here is lazily or globally initialized. Event range bounds are stored as
//! millisecond integers so overlap queries stay in SQL; audit timestamps are
//! RFC 3339 text.

mod events;
mod tasks;

use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;

/// Errors produced by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No row with the targeted identifier.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Database failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl StoreError {
    pub fn not_found(id: impl std::fmt::Display) -> Self {
        Self::NotFound(id.to_string())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Error for a column that holds a value the domain cannot parse. Corrupt
/// rows are reported, never silently patched with defaults.
pub(crate) fn corrupt_column(
    index: usize,
    message: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, message.into())
}

/// Durable keyed storage for tasks and events.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) the database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Open an in-memory database. Used by tests and ephemeral runs.
    pub fn in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// Initialize the database schema.
    fn init_schema(&self) -> anyhow::Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS tasks (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT,
                status TEXT NOT NULL DEFAULT 'todo',
                priority TEXT NOT NULL DEFAULT 'medium',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS events (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT,
                start_ms INTEGER NOT NULL,
                end_ms INTEGER NOT NULL,
                color TEXT NOT NULL DEFAULT 'blue',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_tasks_created ON tasks(created_at);
            CREATE INDEX IF NOT EXISTS idx_events_start ON events(start_ms);
            CREATE INDEX IF NOT EXISTS idx_events_end ON events(end_ms);
            "#,
        )?;
        Ok(())
    }
}

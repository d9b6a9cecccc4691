use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::task;

use super::data::{MediaType, WorkRecord};
use super::store::{FlagStore, WorkStore};
use crate::error::StoreError;

/// File name of the catalog database inside the data directory
pub const DB_FILE_NAME: &str = "gallery.db";

/// The Library manages the SQLite database behind the local work store.
/// It holds every record written by an admin plus the session flag.
///
/// The connection sits behind a mutex and every call runs on the blocking
/// pool, so clones of a `Library` can be shared between tasks.
#[derive(Clone)]
pub struct Library {
    conn: Arc<Mutex<Connection>>,
    db_path: Option<PathBuf>,
}

impl Library {
    /// Open the library inside `data_dir`, creating the directory, the
    /// database and its tables on first use. Opening an existing database
    /// reuses it and applies any additive schema upgrades.
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(data_dir)?;

        let db_path = data_dir.join(DB_FILE_NAME);
        let conn = Connection::open(&db_path)?;
        init_schema(&conn)?;

        tracing::info!("📁 Work store initialized at: {}", db_path.display());

        Ok(Library {
            conn: Arc::new(Mutex::new(conn)),
            db_path: Some(db_path),
        })
    }

    /// Open a throwaway in-memory library
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;

        Ok(Library {
            conn: Arc::new(Mutex::new(conn)),
            db_path: None,
        })
    }

    /// Get the path to the database file (`None` for in-memory libraries)
    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// Get a count of stored works
    pub async fn work_count(&self) -> Result<i64, StoreError> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM works", [], |row| row.get(0))?;
            Ok(count)
        })
        .await
    }

    /// Run `f` against the connection on the blocking pool
    async fn with_conn<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|_| StoreError::Poisoned)?;
            f(&guard)
        })
        .await?
    }
}

/// Initialize the database schema.
/// Creates all necessary tables and indexes if they don't exist.
fn init_schema(conn: &Connection) -> Result<(), StoreError> {
    // One row per work; tools are kept as a JSON array
    conn.execute(
        "CREATE TABLE IF NOT EXISTS works (
            id              TEXT PRIMARY KEY,
            title           TEXT NOT NULL,
            description     TEXT NOT NULL,
            media_type      TEXT NOT NULL,
            media_url       TEXT NOT NULL,
            tools_json      TEXT NOT NULL DEFAULT '[]',
            created_at      INTEGER NOT NULL,
            cover_url       TEXT,
            prompt          TEXT
        )",
        [],
    )?;

    // Databases created before cover/prompt existed; older rows read them as NULL
    add_column_if_missing(conn, "works", "cover_url", "TEXT")?;
    add_column_if_missing(conn, "works", "prompt", "TEXT")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_works_created_at
         ON works(created_at DESC)",
        [],
    )?;

    // Session flags live apart from the records
    conn.execute(
        "CREATE TABLE IF NOT EXISTS flags (
            key             TEXT PRIMARY KEY,
            value           TEXT NOT NULL
        )",
        [],
    )?;

    tracing::debug!("Work store schema initialized");

    Ok(())
}

/// Returns whether the column had to be added
fn add_column_if_missing(
    conn: &Connection,
    table: &str,
    column: &str,
    definition: &str,
) -> Result<bool, StoreError> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let names = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for name in names {
        if name? == column {
            return Ok(false);
        }
    }

    conn.execute(
        &format!("ALTER TABLE {table} ADD COLUMN {column} {definition}"),
        [],
    )?;
    tracing::info!("🔧 Added column {}.{}", table, column);

    Ok(true)
}

/// Raw column values of a `works` row before decoding
struct WorkRow {
    id: String,
    title: String,
    description: String,
    media_type: String,
    media_url: String,
    tools_json: String,
    created_at: i64,
    cover_url: Option<String>,
    prompt: Option<String>,
}

impl WorkRow {
    fn into_record(self) -> Result<WorkRecord, StoreError> {
        let media_type = MediaType::parse(&self.media_type).ok_or_else(|| StoreError::Corrupt {
            id: self.id.clone(),
            reason: format!("unknown media type '{}'", self.media_type),
        })?;

        let tools: Vec<String> =
            serde_json::from_str(&self.tools_json).map_err(|e| StoreError::Corrupt {
                id: self.id.clone(),
                reason: format!("bad tools column: {e}"),
            })?;

        Ok(WorkRecord {
            id: self.id,
            title: self.title,
            description: self.description,
            media_url: self.media_url,
            cover_url: self.cover_url,
            media_type,
            prompt: self.prompt,
            tools,
            created_at: self.created_at,
        })
    }
}

fn put_work(conn: &Connection, record: &WorkRecord) -> Result<(), StoreError> {
    let tools_json = serde_json::to_string(&record.tools).map_err(|e| StoreError::Corrupt {
        id: record.id.clone(),
        reason: e.to_string(),
    })?;

    // REPLACE deletes the old row first, so nothing from it survives
    conn.execute(
        "INSERT OR REPLACE INTO works
            (id, title, description, media_type, media_url, tools_json, created_at, cover_url, prompt)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            record.id,
            record.title,
            record.description,
            record.media_type.as_str(),
            record.media_url,
            tools_json,
            record.created_at,
            record.cover_url,
            record.prompt,
        ],
    )?;

    Ok(())
}

fn get_all_works(conn: &Connection) -> Result<Vec<WorkRecord>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT id, title, description, media_type, media_url, tools_json, created_at, cover_url, prompt
         FROM works",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(WorkRow {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            media_type: row.get(3)?,
            media_url: row.get(4)?,
            tools_json: row.get(5)?,
            created_at: row.get(6)?,
            cover_url: row.get(7)?,
            prompt: row.get(8)?,
        })
    })?;

    let mut works = Vec::new();
    for row in rows {
        works.push(row?.into_record()?);
    }

    Ok(works)
}

#[async_trait]
impl WorkStore for Library {
    async fn put(&self, record: &WorkRecord) -> Result<(), StoreError> {
        let record = record.clone();
        self.with_conn(move |conn| put_work(conn, &record)).await
    }

    async fn get_all(&self) -> Result<Vec<WorkRecord>, StoreError> {
        self.with_conn(get_all_works).await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let id = id.to_string();
        self.with_conn(move |conn| {
            conn.execute("DELETE FROM works WHERE id = ?1", params![id])?;
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl FlagStore for Library {
    async fn read_flag(&self, key: &str) -> Result<Option<String>, StoreError> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            let value = conn
                .query_row("SELECT value FROM flags WHERE key = ?1", params![key], |row| {
                    row.get(0)
                })
                .optional()?;
            Ok(value)
        })
        .await
    }

    async fn write_flag(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let key = key.to_string();
        let value = value.to_string();
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT OR REPLACE INTO flags (key, value) VALUES (?1, ?2)",
                params![key, value],
            )?;
            Ok(())
        })
        .await
    }

    async fn clear_flag(&self, key: &str) -> Result<(), StoreError> {
        let key = key.to_string();
        self.with_conn(move |conn| {
            conn.execute("DELETE FROM flags WHERE key = ?1", params![key])?;
            Ok(())
        })
        .await
    }
}

// Implement Debug for better error messages
impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("db_path", &self.db_path)
            .finish()
    }
}

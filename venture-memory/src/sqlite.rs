//! SQLite-backed key-value storage.
//!
//! A single `kv_store` table; each call opens its own connection so the
//! backend can be shared across threads without a lock.

use std::path::{Path, PathBuf};

use rusqlite::{params, Connection, OptionalExtension};
use venture_common::Result;

use crate::traits::{persistence_error, Storage};

pub struct SqliteStorage {
    db_path: PathBuf,
}

impl SqliteStorage {
    /// Open (creating if needed) the database at `db_path`.
    pub fn open(db_path: &Path) -> Result<Self> {
        let location = db_path.display().to_string();
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| persistence_error("create directory for", &location, e))?;
        }

        let conn = Connection::open(db_path).map_err(|e| persistence_error("open", &location, e))?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| persistence_error("initialize", &location, e))?;

        Ok(Self {
            db_path: db_path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn connect(&self, key: &str) -> Result<Connection> {
        Connection::open(&self.db_path).map_err(|e| persistence_error("connect for", key, e))
    }
}

impl Storage for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let conn = self.connect(key)?;
        conn.query_row(
            "SELECT value FROM kv_store WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| persistence_error("read", key, e))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let conn = self.connect(key)?;
        let now = chrono::Utc::now().to_rfc3339();
        conn.execute(
            "INSERT OR REPLACE INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)",
            params![key, value, now],
        )
        .map_err(|e| persistence_error("write", key, e))?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let conn = self.connect(key)?;
        conn.execute("DELETE FROM kv_store WHERE key = ?1", params![key])
            .map_err(|e| persistence_error("remove", key, e))?;
        Ok(())
    }
}

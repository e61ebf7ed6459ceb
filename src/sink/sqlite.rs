// ABOUTME: Result sink persisting copy results into a SQLite `results` table
// ABOUTME: The table is created on open if it does not exist yet

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, Connection};

use super::ResultSink;
use crate::error::{CopyError, Result};
use crate::remote::CopyResult;

pub struct SqliteResultSink {
    conn: Mutex<Connection>,
}

impl SqliteResultSink {
    pub fn open(path: &Path) -> Result<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS results (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                source_db_uri TEXT NOT NULL,
                target_db_uri TEXT NOT NULL,
                runtime TEXT NOT NULL,
                recorded_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// All stored results, oldest first.
    pub fn results(&self) -> Result<Vec<CopyResult>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT source_db_uri, target_db_uri, runtime FROM results ORDER BY id",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(CopyResult {
                source_db_uri: row.get(0)?,
                target_db_uri: row.get(1)?,
                runtime: row.get(2)?,
            })
        })?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| CopyError::Sink("results database lock poisoned".to_string()))
    }
}

impl ResultSink for SqliteResultSink {
    fn write_result(&self, result: &CopyResult) -> Result<()> {
        self.lock()?.execute(
            "INSERT INTO results (source_db_uri, target_db_uri, runtime) VALUES (?1, ?2, ?3)",
            params![result.source_db_uri, result.target_db_uri, result.runtime],
        )?;
        Ok(())
    }
}

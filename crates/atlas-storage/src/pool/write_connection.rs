//! Single write connection behind a `std::sync::Mutex`. Safe to call from
//! inside an async runtime; the lock is never held across an await.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use atlas_core::config::StorageConfig;
use atlas_core::AtlasResult;

use super::pragmas::apply_pragmas;
use crate::to_storage_err;

pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    pub fn open(path: &Path, config: &StorageConfig) -> AtlasResult<Self> {
        let conn = Connection::open(path).map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn, &config.writer)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory(config: &StorageConfig) -> AtlasResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| to_storage_err(e.to_string()))?;
        apply_pragmas(&conn, &config.writer)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Execute a closure with exclusive access to the writer.
    pub fn with_conn<F, T>(&self, f: F) -> AtlasResult<T>
    where
        F: FnOnce(&Connection) -> AtlasResult<T>,
    {
        let guard = self
            .conn
            .lock()
            .map_err(|e| to_storage_err(format!("write connection lock poisoned: {e}")))?;
        f(&guard)
    }
}

//! PRAGMAs for the writer and the pooled readers.

use rusqlite::Connection;

use atlas_core::config::{ReaderPragmas, WriterPragmas};
use atlas_core::AtlasResult;

use crate::to_storage_err;

/// Writer pragmas. Journal mode is a property of the file, so only the
/// writer sets it.
pub fn apply_pragmas(conn: &Connection, pragmas: &WriterPragmas) -> AtlasResult<()> {
    let journal = if pragmas.wal_mode { "WAL" } else { "DELETE" };
    conn.execute_batch(&format!(
        "
        PRAGMA journal_mode = {journal};
        PRAGMA synchronous = NORMAL;
        PRAGMA cache_size = -{cache};
        PRAGMA busy_timeout = {busy};
        PRAGMA foreign_keys = ON;
        ",
        cache = pragmas.cache_kib,
        busy = pragmas.busy_timeout_ms,
    ))
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Pooled readers never write.
pub fn apply_read_pragmas(conn: &Connection, pragmas: &ReaderPragmas) -> AtlasResult<()> {
    conn.execute_batch(&format!(
        "
        PRAGMA query_only = ON;
        PRAGMA cache_size = -{cache};
        PRAGMA busy_timeout = {busy};
        PRAGMA temp_store = MEMORY;
        ",
        cache = pragmas.cache_kib,
        busy = pragmas.busy_timeout_ms,
    ))
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Verify that WAL mode is active on a connection.
pub fn verify_wal_mode(conn: &Connection) -> AtlasResult<bool> {
    let mode: String = conn
        .pragma_query_value(None, "journal_mode", |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(mode.eq_ignore_ascii_case("wal"))
}

//! Schema migrations using PRAGMA user_version.

pub mod v001_ledger;
pub mod v002_correlation;

use rusqlite::Connection;

use atlas_core::errors::StorageError;
use atlas_core::AtlasResult;

/// Run all pending migrations.
pub fn run_migrations(conn: &Connection) -> AtlasResult<()> {
    let current = current_version(conn)?;

    let migrations: &[(&str, u32)] = &[
        (v001_ledger::MIGRATION_SQL, 1),
        (v002_correlation::MIGRATION_SQL, 2),
    ];

    for (sql, version) in migrations {
        if current < *version {
            conn.execute_batch(sql)
                .map_err(|e| StorageError::MigrationFailed {
                    version: *version,
                    reason: e.to_string(),
                })?;
            conn.pragma_update(None, "user_version", version)
                .map_err(|e| StorageError::MigrationFailed {
                    version: *version,
                    reason: e.to_string(),
                })?;
            tracing::info!(version = version, "applied migration");
        }
    }
    Ok(())
}

/// Get the current schema version.
pub fn current_version(conn: &Connection) -> AtlasResult<u32> {
    let version = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;
    Ok(version)
}

/// Highest version known to this build.
pub const LATEST_VERSION: u32 = 2;

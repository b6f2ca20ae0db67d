//! # atlas-storage
//!
//! SQLite persistence: one write connection behind a mutex, a round-robin
//! read pool, `PRAGMA user_version` migrations, and free query functions
//! over `&Connection`. [`StorageEngine`] implements the ledger, geography
//! and correlation-store traits on top of them.

pub mod engine;
pub mod migrations;
pub mod pool;
pub mod queries;

pub use engine::StorageEngine;

use atlas_core::errors::{AtlasError, StorageError};

/// Convert a SQLite-level message into the workspace error type.
pub fn to_storage_err(message: String) -> AtlasError {
    StorageError::SqliteError { message }.into()
}

use serde::{Deserialize, Serialize};

use super::defaults;

/// `[storage]`: where the SQLite database lives and how its connections are
/// tuned.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Database file holding the investment ledger, the province distance
    /// table and the correlation pairs.
    pub db_path: String,
    /// Read-only connections opened for a file-backed database.
    pub read_pool_size: usize,
    /// `[storage.writer]`
    pub writer: WriterPragmas,
    /// `[storage.reader]`
    pub reader: ReaderPragmas,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: defaults::DEFAULT_DB_FILENAME.to_string(),
            read_pool_size: defaults::DEFAULT_READ_POOL_SIZE,
            writer: WriterPragmas::default(),
            reader: ReaderPragmas::default(),
        }
    }
}

/// Pragmas for the single write connection. Journal mode is set here only;
/// readers inherit it from the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterPragmas {
    pub wal_mode: bool,
    /// Page cache per connection, in KiB.
    pub cache_kib: u32,
    pub busy_timeout_ms: u32,
}

impl Default for WriterPragmas {
    fn default() -> Self {
        Self {
            wal_mode: defaults::DEFAULT_WAL_MODE,
            cache_kib: defaults::DEFAULT_WRITER_CACHE_KIB,
            busy_timeout_ms: defaults::DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

/// Pragmas for each pooled read connection. Readers are always
/// `query_only` with in-memory temp storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderPragmas {
    pub cache_kib: u32,
    pub busy_timeout_ms: u32,
}

impl Default for ReaderPragmas {
    fn default() -> Self {
        Self {
            cache_kib: defaults::DEFAULT_READER_CACHE_KIB,
            busy_timeout_ms: defaults::DEFAULT_BUSY_TIMEOUT_MS,
        }
    }
}

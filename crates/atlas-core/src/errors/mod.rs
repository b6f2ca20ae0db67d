//! Error types for every Atlas subsystem.

mod config_error;
mod job_error;
mod storage_error;

pub use config_error::ConfigError;
pub use job_error::JobError;
pub use storage_error::StorageError;

/// Top-level error for the Atlas engine.
#[derive(Debug, thiserror::Error)]
pub enum AtlasError {
    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("config error: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("job error: {0}")]
    JobError(#[from] JobError),

    #[error("ledger error: {reason}")]
    LedgerError { reason: String },

    #[error("province not found: {code}")]
    ProvinceNotFound { code: String },

    #[error("invalid province pair: {a} / {b}")]
    InvalidPair { a: String, b: String },

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Convenience alias used across the workspace.
pub type AtlasResult<T> = Result<T, AtlasError>;

/// Batch recalculation errors that abort a whole run.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("a recalculation is already in progress")]
    AlreadyRunning,

    #[error("gather phase failed: {reason}")]
    GatherFailed { reason: String },

    #[error("clear phase failed: {reason}")]
    ClearFailed { reason: String },
}

//! Structured log events for key engine operations.

/// A recalculation run finished.
pub fn recalculation_completed(provinces: usize, persisted: usize, failed: usize, duration_ms: u64) {
    tracing::info!(
        event = "recalculation_completed",
        provinces = provinces,
        persisted = persisted,
        failed = failed,
        duration_ms = duration_ms,
        "recalculation completed"
    );
}

/// One pair could not be scored or persisted.
pub fn pair_failed(source: &str, target: &str, error: &str) {
    tracing::warn!(
        event = "pair_failed",
        source = %source,
        target = %target,
        error = %error,
        "pair computation failed"
    );
}

/// A propagation pass finished.
pub fn propagation_completed(examined: usize, updated: usize, cleared: usize, failed: usize) {
    tracing::info!(
        event = "propagation_completed",
        examined = examined,
        updated = updated,
        cleared = cleared,
        failed = failed,
        "propagation completed"
    );
}

/// A record's related-provinces write failed.
pub fn propagation_write_failed(record_id: i64, error: &str) {
    tracing::warn!(
        event = "propagation_write_failed",
        record_id = record_id,
        error = %error,
        "related provinces write failed"
    );
}

/// Query cache entries were dropped.
pub fn cache_invalidated(scope: &str) {
    tracing::debug!(event = "cache_invalidated", scope = %scope, "query cache invalidated");
}

/// Weight profiles were replaced.
pub fn profiles_reloaded(names: &[String]) {
    tracing::info!(event = "profiles_reloaded", profiles = ?names, "weight profiles reloaded");
}

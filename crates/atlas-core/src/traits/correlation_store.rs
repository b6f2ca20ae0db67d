use crate::errors::AtlasResult;
use crate::models::CorrelationPair;

/// Persisted pairwise correlation results.
///
/// Every list is ordered by score descending, then `(source, target)`.
pub trait ICorrelationStore: Send + Sync {
    // --- Writes ---
    /// Insert or replace the row for `pair.key`.
    fn upsert(&self, pair: &CorrelationPair) -> AtlasResult<()>;
    /// Delete every row. Returns the number deleted.
    fn clear(&self) -> AtlasResult<usize>;

    // --- Point reads ---
    /// Look up a pair in either argument order.
    fn get_pair(&self, a: &str, b: &str) -> AtlasResult<Option<CorrelationPair>>;

    // --- Ranked reads ---
    /// Top `n` pairs naming `province`, score > 0.
    fn top_n(&self, province: &str, n: usize) -> AtlasResult<Vec<CorrelationPair>>;
    /// Top `n` pairs overall.
    fn top_overall(&self, n: usize) -> AtlasResult<Vec<CorrelationPair>>;
    /// Pairs with score inside the inclusive bounds.
    fn all(&self, min: Option<f64>, max: Option<f64>) -> AtlasResult<Vec<CorrelationPair>>;

    // --- Search ---
    fn by_common_concept(&self, needle: &str) -> AtlasResult<Vec<CorrelationPair>>;
    fn by_common_industry(&self, needle: &str) -> AtlasResult<Vec<CorrelationPair>>;

    // --- Aggregation ---
    fn count(&self) -> AtlasResult<usize>;
}

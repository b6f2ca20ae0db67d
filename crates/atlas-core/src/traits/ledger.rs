use crate::errors::AtlasResult;
use crate::models::InvestmentRecord;

/// Read and narrow write access to the investment ledger.
///
/// Only active records are returned by the read methods.
pub trait IInvestmentLedger: Send + Sync {
    /// Distinct province codes across active records, including codes that
    /// only appear in related-province lists. Sorted ascending.
    fn all_distinct_provinces(&self) -> AtlasResult<Vec<String>>;

    /// Records whose home province is `code` or whose related list names it.
    fn records_for_province(&self, code: &str) -> AtlasResult<Vec<InvestmentRecord>>;

    /// Records attributable to both `a` and `b`.
    fn joint_records(&self, a: &str, b: &str) -> AtlasResult<Vec<InvestmentRecord>>;

    /// Up to `k` records homed in `code` with a known ten-day change,
    /// highest change first.
    fn top_k_by_momentum(&self, code: &str, k: usize) -> AtlasResult<Vec<InvestmentRecord>>;

    fn active_records(&self) -> AtlasResult<Vec<InvestmentRecord>>;

    fn get_record(&self, id: i64) -> AtlasResult<Option<InvestmentRecord>>;

    /// Overwrite the derived related-provinces field. `None` clears it.
    fn update_related_provinces(&self, id: i64, value: Option<&str>) -> AtlasResult<()>;

    /// Insert a record and return its assigned id.
    fn insert_record(&self, record: &InvestmentRecord) -> AtlasResult<i64>;
}

//! Writes each active record's top related provinces back to the ledger.

use std::collections::BTreeMap;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::warn;

use atlas_core::constants::MAX_TOP_N;
use atlas_core::models::{join_list, InvestmentRecord, PropagationReport};
use atlas_core::traits::{ICorrelationStore, IInvestmentLedger};
use atlas_core::AtlasResult;
use atlas_observability::propagation_span;
use atlas_observability::tracing_setup::events;

/// What happened to one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteOutcome {
    Updated,
    Cleared,
    Unchanged,
    Failed,
}

/// Propagation step over the whole ledger.
pub struct Propagator {
    ledger: Arc<dyn IInvestmentLedger>,
    store: Arc<dyn ICorrelationStore>,
    default_top_n: usize,
}

impl Propagator {
    pub fn new(
        ledger: Arc<dyn IInvestmentLedger>,
        store: Arc<dyn ICorrelationStore>,
        default_top_n: usize,
    ) -> Self {
        Self {
            ledger,
            store,
            default_top_n,
        }
    }

    /// `None` or 0 selects the configured default. Capped at `MAX_TOP_N`.
    pub fn effective_top_n(&self, top_n: Option<usize>) -> usize {
        match top_n {
            Some(n) if n > 0 => n.min(MAX_TOP_N),
            _ => self.default_top_n.min(MAX_TOP_N),
        }
    }

    /// Run one pass. Only a failure to list the active records aborts;
    /// per-province and per-record failures are counted.
    pub fn propagate(&self, top_n: Option<usize>) -> AtlasResult<PropagationReport> {
        let n = self.effective_top_n(top_n);
        let span = propagation_span!(n);
        let _enter = span.enter();

        let by_province = partition_by_province(self.ledger.active_records()?);
        let report = by_province
            .par_iter()
            .map(|(province, records)| self.propagate_province(province, records, n))
            .reduce(PropagationReport::default, |mut acc, part| {
                acc.merge(&part);
                acc
            });

        events::propagation_completed(
            report.examined,
            report.updated,
            report.cleared,
            report.failed,
        );
        Ok(report)
    }

    fn propagate_province(
        &self,
        province: &str,
        records: &[InvestmentRecord],
        n: usize,
    ) -> PropagationReport {
        let mut report = PropagationReport {
            examined: records.len(),
            ..Default::default()
        };
        let related = match self.store.top_n(province, n) {
            Ok(pairs) => related_codes(province, &pairs),
            Err(e) => {
                warn!(province = %province, error = %e, "top-n lookup failed, province skipped");
                report.failed = records.len();
                return report;
            }
        };

        for record in records {
            match self.write_record(record, &related) {
                WriteOutcome::Updated => report.updated += 1,
                WriteOutcome::Cleared => report.cleared += 1,
                WriteOutcome::Unchanged => report.unchanged += 1,
                WriteOutcome::Failed => report.failed += 1,
            }
        }
        report
    }

    fn write_record(&self, record: &InvestmentRecord, related: &str) -> WriteOutcome {
        let current = record.related_provinces.as_deref().unwrap_or("");
        let (value, outcome) = if related.is_empty() {
            if current.is_empty() {
                return WriteOutcome::Unchanged;
            }
            (None, WriteOutcome::Cleared)
        } else if current == related {
            return WriteOutcome::Unchanged;
        } else {
            (Some(related), WriteOutcome::Updated)
        };

        match self.ledger.update_related_provinces(record.id, value) {
            Ok(()) => outcome,
            Err(e) => {
                events::propagation_write_failed(record.id, &e.to_string());
                WriteOutcome::Failed
            }
        }
    }
}

/// Active records grouped by home province; records without one are dropped.
fn partition_by_province(records: Vec<InvestmentRecord>) -> BTreeMap<String, Vec<InvestmentRecord>> {
    let mut groups: BTreeMap<String, Vec<InvestmentRecord>> = BTreeMap::new();
    for record in records {
        if let Some(home) = record.home_province().map(str::to_string) {
            groups.entry(home).or_default().push(record);
        }
    }
    groups
}

/// The other province of each pair, in store order, joined with `,`.
fn related_codes(province: &str, pairs: &[atlas_core::CorrelationPair]) -> String {
    let others: Vec<&str> = pairs.iter().filter_map(|p| p.key.other(province)).collect();
    join_list(&others)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_without_home_province_are_dropped() {
        let records = vec![
            InvestmentRecord {
                id: 1,
                province: Some("粤".to_string()),
                ..Default::default()
            },
            InvestmentRecord {
                id: 2,
                province: Some("  ".to_string()),
                ..Default::default()
            },
            InvestmentRecord {
                id: 3,
                province: None,
                ..Default::default()
            },
            InvestmentRecord {
                id: 4,
                province: Some("粤".to_string()),
                ..Default::default()
            },
        ];
        let groups = partition_by_province(records);
        assert_eq!(groups.len(), 1);
        let ids: Vec<i64> = groups["粤"].iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 4]);
    }
}

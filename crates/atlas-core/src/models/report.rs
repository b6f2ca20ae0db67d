use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::correlation::CalculationMethod;

/// Outcome of one recalculation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecalculationReport {
    pub provinces: usize,
    pub pairs_evaluated: usize,
    pub persisted: usize,
    pub below_threshold: usize,
    /// Pairs for which no strategy applied.
    pub skipped: usize,
    pub failed: usize,
    pub by_method: BTreeMap<String, usize>,
    pub duration_ms: u64,
    pub propagation: Option<PropagationReport>,
}

impl RecalculationReport {
    pub fn record_method(&mut self, method: CalculationMethod) {
        *self.by_method.entry(method.as_str().to_string()).or_insert(0) += 1;
    }

    pub fn method_count(&self, method: CalculationMethod) -> usize {
        self.by_method.get(method.as_str()).copied().unwrap_or(0)
    }
}

/// Outcome of one propagation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropagationReport {
    pub examined: usize,
    pub updated: usize,
    pub cleared: usize,
    pub unchanged: usize,
    pub failed: usize,
}

impl PropagationReport {
    pub fn merge(&mut self, other: &PropagationReport) {
        self.examined += other.examined;
        self.updated += other.updated;
        self.cleared += other.cleared;
        self.unchanged += other.unchanged;
        self.failed += other.failed;
    }

    /// Records whose stored value was rewritten (updated or cleared).
    pub fn writes(&self) -> usize {
        self.updated + self.cleared
    }
}

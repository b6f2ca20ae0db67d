//! RecalculationJob: single-flight all-pairs recomputation.
//!
//! Gather the distinct provinces, clear the store, score every unordered
//! pair in parallel, persist those above their strategy's threshold, then
//! propagate. Only one run (or standalone propagation) executes at a time.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info};

use atlas_core::config::ThresholdConfig;
use atlas_core::errors::JobError;
use atlas_core::models::{CalculationMethod, PropagationReport, RecalculationReport};
use atlas_core::traits::{ICorrelationStore, IInvestmentLedger};
use atlas_core::AtlasResult;
use atlas_observability::tracing_setup::events;
use atlas_observability::{pair_span, recalculation_span};
use atlas_scoring::ProfileRegistry;

use crate::calculator::{PairCalculator, PairOutcome};
use crate::propagation::Propagator;
use crate::{snapshot, SharedProfiles};

/// Per-pair result folded into the report.
#[derive(Debug, Clone, Copy)]
enum PairResult {
    Persisted(CalculationMethod),
    BelowThreshold,
    Skipped,
    Failed,
}

/// Releases the single-flight flag on every exit path.
struct RunGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> RunGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> AtlasResult<Self> {
        if flag
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(JobError::AlreadyRunning.into());
        }
        Ok(Self { flag })
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// The batch recalculation job.
pub struct RecalculationJob {
    /// Guard: only one run can execute at a time.
    is_running: Arc<AtomicBool>,
    ledger: Arc<dyn IInvestmentLedger>,
    store: Arc<dyn ICorrelationStore>,
    calculator: PairCalculator,
    propagator: Propagator,
    profiles: SharedProfiles,
    thresholds: ThresholdConfig,
}

impl RecalculationJob {
    pub fn new(
        ledger: Arc<dyn IInvestmentLedger>,
        store: Arc<dyn ICorrelationStore>,
        calculator: PairCalculator,
        propagator: Propagator,
        profiles: SharedProfiles,
        thresholds: ThresholdConfig,
    ) -> Self {
        Self {
            is_running: Arc::new(AtomicBool::new(false)),
            ledger,
            store,
            calculator,
            propagator,
            profiles,
            thresholds,
        }
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Relaxed)
    }

    /// Full run: recompute, then propagate with the default top-N.
    pub fn run(&self) -> AtlasResult<RecalculationReport> {
        let _guard = RunGuard::acquire(&self.is_running)?;
        let mut report = self.recompute_locked()?;
        report.propagation = Some(self.propagator.propagate(None)?);
        Ok(report)
    }

    /// Gather, clear, score and persist. No propagation.
    pub fn recompute(&self) -> AtlasResult<RecalculationReport> {
        let _guard = RunGuard::acquire(&self.is_running)?;
        self.recompute_locked()
    }

    /// Standalone propagation, under the same guard as a run.
    pub fn propagate(&self, top_n: Option<usize>) -> AtlasResult<PropagationReport> {
        let _guard = RunGuard::acquire(&self.is_running)?;
        self.propagator.propagate(top_n)
    }

    fn recompute_locked(&self) -> AtlasResult<RecalculationReport> {
        let started = Instant::now();
        let profiles = snapshot(&self.profiles);

        let provinces = self
            .ledger
            .all_distinct_provinces()
            .map_err(|e| JobError::GatherFailed {
                reason: e.to_string(),
            })?;
        let span = recalculation_span!(provinces.len());
        let _enter = span.enter();

        let cleared = self.store.clear().map_err(|e| JobError::ClearFailed {
            reason: e.to_string(),
        })?;
        debug!(cleared, "correlation table cleared");

        let pairs = enumerate_pairs(&provinces);
        let results: Vec<PairResult> = pairs
            .par_iter()
            .map(|(a, b)| self.evaluate(a, b, &profiles))
            .collect();

        let mut report = RecalculationReport {
            provinces: provinces.len(),
            pairs_evaluated: pairs.len(),
            ..Default::default()
        };
        for result in results {
            match result {
                PairResult::Persisted(method) => {
                    report.persisted += 1;
                    report.record_method(method);
                }
                PairResult::BelowThreshold => report.below_threshold += 1,
                PairResult::Skipped => report.skipped += 1,
                PairResult::Failed => report.failed += 1,
            }
        }
        report.duration_ms = started.elapsed().as_millis() as u64;

        info!(
            pairs = report.pairs_evaluated,
            below_threshold = report.below_threshold,
            skipped = report.skipped,
            "pairs evaluated"
        );
        events::recalculation_completed(
            report.provinces,
            report.persisted,
            report.failed,
            report.duration_ms,
        );
        Ok(report)
    }

    fn evaluate(&self, a: &str, b: &str, profiles: &ProfileRegistry) -> PairResult {
        let span = pair_span!(a, b);
        let _enter = span.enter();

        let pair = match self.calculator.calculate(a, b, profiles) {
            Ok(PairOutcome::Scored(pair)) => pair,
            Ok(PairOutcome::Skipped) => return PairResult::Skipped,
            Err(e) => {
                events::pair_failed(a, b, &e.to_string());
                return PairResult::Failed;
            }
        };
        if pair.score <= self.threshold(pair.method) {
            return PairResult::BelowThreshold;
        }
        match self.store.upsert(&pair) {
            Ok(()) => PairResult::Persisted(pair.method),
            Err(e) => {
                events::pair_failed(a, b, &e.to_string());
                PairResult::Failed
            }
        }
    }

    fn threshold(&self, method: CalculationMethod) -> f64 {
        match method {
            CalculationMethod::Comprehensive => self.thresholds.comprehensive,
            CalculationMethod::Momentum => self.thresholds.momentum,
            CalculationMethod::GeographyOnly => self.thresholds.geography_only,
        }
    }
}

/// Every unordered pair `(provinces[i], provinces[j])` with `i < j`.
fn enumerate_pairs(provinces: &[String]) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(provinces.len() * provinces.len().saturating_sub(1) / 2);
    for (i, a) in provinces.iter().enumerate() {
        for b in &provinces[i + 1..] {
            pairs.push((a.clone(), b.clone()));
        }
    }
    pairs
}

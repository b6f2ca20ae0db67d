//! Batch recalculation: counts, thresholds, failure handling, idempotence
//! and the single-flight guard.

use std::sync::{Arc, Barrier, RwLock};

use atlas_core::errors::JobError;
use atlas_core::models::{CalculationMethod, InvestmentRecord, PairKey};
use atlas_core::traits::{ICorrelationStore, IGeographyTable, IInvestmentLedger};
use atlas_core::{AtlasConfig, AtlasError, AtlasResult, GeoDistance};
use atlas_engine::{PairCalculator, Propagator, RecalculationJob, SharedProfiles};
use atlas_scoring::ProfileRegistry;
use atlas_storage::StorageEngine;
use test_fixtures::{
    load_distances, load_ledger, memory_geography, MemoryGeography, MemoryLedger, MemoryStore,
    RecordBuilder,
};

fn build_job(
    ledger: Arc<dyn IInvestmentLedger>,
    geography: Arc<dyn IGeographyTable>,
    store: Arc<dyn ICorrelationStore>,
    config: &AtlasConfig,
) -> RecalculationJob {
    let profiles: SharedProfiles = Arc::new(RwLock::new(Arc::new(
        ProfileRegistry::from_config(config).unwrap(),
    )));
    RecalculationJob::new(
        Arc::clone(&ledger),
        Arc::clone(&store),
        PairCalculator::new(Arc::clone(&ledger), geography, config.scoring.clone()),
        Propagator::new(ledger, store, config.propagation.default_top_n),
        profiles,
        config.thresholds.clone(),
    )
}

fn regional() -> (Arc<MemoryLedger>, Arc<MemoryStore>, RecalculationJob) {
    let ledger = Arc::new(MemoryLedger::with_records(load_ledger("regional")));
    let store = Arc::new(MemoryStore::new());
    let job = build_job(
        ledger.clone(),
        Arc::new(memory_geography()),
        store.clone(),
        &AtlasConfig::default(),
    );
    (ledger, store, job)
}

/// 京 has one leader, 沪 two; only the company-type bucket overlaps, half.
fn ten_percent_momentum() -> Vec<InvestmentRecord> {
    vec![
        RecordBuilder::new(1, "京")
            .company("甲")
            .industry("电子")
            .investment_type("12")
            .concepts(&["芯片"])
            .momentum(5.0)
            .build(),
        RecordBuilder::new(2, "沪")
            .company("乙")
            .industry("电力")
            .investment_type("12")
            .concepts(&["光伏"])
            .momentum(4.0)
            .build(),
        RecordBuilder::new(3, "沪")
            .company("丙")
            .industry("电力")
            .investment_type("30")
            .concepts(&["光伏"])
            .momentum(3.0)
            .build(),
    ]
}

#[test]
fn full_run_scores_persists_and_propagates() {
    let (ledger, store, job) = regional();
    let report = job.run().unwrap();

    assert_eq!(report.provinces, 5);
    assert_eq!(report.pairs_evaluated, 10);
    assert_eq!(report.persisted, 5);
    assert_eq!(report.below_threshold, 2);
    assert_eq!(report.skipped, 3);
    assert_eq!(report.failed, 0);
    assert_eq!(report.method_count(CalculationMethod::Comprehensive), 1);
    assert_eq!(report.method_count(CalculationMethod::Momentum), 3);
    assert_eq!(report.method_count(CalculationMethod::GeographyOnly), 1);
    assert_eq!(store.count().unwrap(), 5);

    let propagation = report.propagation.unwrap();
    assert_eq!(propagation.examined, 7);
    assert_eq!(propagation.updated, 7);
    assert_eq!(propagation.failed, 0);

    let related = |id: i64| ledger.get_record(id).unwrap().unwrap().related_provinces;
    assert_eq!(related(5).as_deref(), Some("川,沪,粤"));
    assert_eq!(related(1).as_deref(), Some("沪,京"));
    assert_eq!(related(7).as_deref(), Some("川"));
    // Inactive records are never touched.
    assert_eq!(related(8).as_deref(), Some("湘"));
    assert!(!job.is_running());
}

#[test]
fn recompute_does_not_propagate() {
    let (ledger, _store, job) = regional();
    let report = job.recompute().unwrap();
    assert!(report.propagation.is_none());
    assert_eq!(ledger.update_count(), 0);
}

#[test]
fn clear_removes_rows_from_previous_runs() {
    let (_ledger, store, job) = regional();
    store
        .upsert(&test_fixtures::momentum_pair("湘", "赣", 0.9, &[], &[]))
        .unwrap();
    job.recompute().unwrap();
    assert!(store.get_pair("湘", "赣").unwrap().is_none());
    assert_eq!(store.count().unwrap(), 5);
}

#[test]
fn momentum_below_threshold_is_not_persisted() {
    let mut config = AtlasConfig::default();
    config.thresholds.momentum = 0.15;
    let store = Arc::new(MemoryStore::new());
    let job = build_job(
        Arc::new(MemoryLedger::with_records(ten_percent_momentum())),
        Arc::new(MemoryGeography::new()),
        store.clone(),
        &config,
    );

    let report = job.recompute().unwrap();
    assert_eq!(report.pairs_evaluated, 1);
    assert_eq!(report.below_threshold, 1);
    assert_eq!(report.persisted, 0);
    assert_eq!(store.count().unwrap(), 0);
}

#[test]
fn momentum_above_default_threshold_is_persisted() {
    let store = Arc::new(MemoryStore::new());
    let job = build_job(
        Arc::new(MemoryLedger::with_records(ten_percent_momentum())),
        Arc::new(MemoryGeography::new()),
        store.clone(),
        &AtlasConfig::default(),
    );

    job.recompute().unwrap();
    let pair = store.get_pair("沪", "京").unwrap().unwrap();
    assert_eq!(pair.method, CalculationMethod::Momentum);
    assert_eq!(pair.score, 0.1);
}

#[test]
fn failed_persist_is_counted_and_the_batch_continues() {
    let (_ledger, store, job) = regional();
    store.fail_upsert_for(PairKey::new("京", "川").unwrap());

    let report = job.recompute().unwrap();
    assert_eq!(report.failed, 1);
    assert_eq!(report.persisted, 4);
    assert!(store.get_pair("京", "川").unwrap().is_none());
    assert!(store.get_pair("京", "沪").unwrap().is_some());
}

#[test]
fn gather_failure_aborts_and_releases_the_guard() {
    let (ledger, store, job) = regional();
    ledger.set_fail_reads(true);
    let err = job.run().unwrap_err();
    assert!(matches!(err, AtlasError::JobError(JobError::GatherFailed { .. })));
    assert!(!job.is_running());
    assert_eq!(store.count().unwrap(), 0);

    ledger.set_fail_reads(false);
    assert!(job.run().is_ok());
}

#[test]
fn clear_failure_aborts() {
    let (_ledger, store, job) = regional();
    store.set_fail_clear(true);
    let err = job.recompute().unwrap_err();
    assert!(matches!(err, AtlasError::JobError(JobError::ClearFailed { .. })));
    assert!(!job.is_running());
}

#[test]
fn recompute_is_idempotent_on_sqlite() {
    let engine = Arc::new(StorageEngine::open_in_memory().unwrap());
    for record in load_ledger("regional") {
        engine.insert_record(&record).unwrap();
    }
    for d in load_distances() {
        engine
            .upsert_distance(
                &d.a,
                &d.b,
                GeoDistance {
                    km: d.km,
                    is_neighbor: d.is_neighbor,
                },
            )
            .unwrap();
    }
    let job = build_job(
        engine.clone(),
        engine.clone(),
        engine.clone(),
        &AtlasConfig::default(),
    );

    let snapshot = || {
        engine
            .all(None, None)
            .unwrap()
            .into_iter()
            .map(|p| (p.key.clone(), p.score, p.method, p.dimensions.clone()))
            .collect::<Vec<_>>()
    };
    let first_report = job.recompute().unwrap();
    let first = snapshot();
    let second_report = job.recompute().unwrap();
    let second = snapshot();

    assert_eq!(first.len(), 5);
    assert_eq!(first, second);
    assert_eq!(first_report.persisted, second_report.persisted);
}

/// Ledger whose gather step blocks until the test releases it.
struct GatedLedger {
    inner: MemoryLedger,
    entered: Barrier,
    release: Barrier,
}

impl IInvestmentLedger for GatedLedger {
    fn all_distinct_provinces(&self) -> AtlasResult<Vec<String>> {
        self.entered.wait();
        self.release.wait();
        self.inner.all_distinct_provinces()
    }
    fn records_for_province(&self, code: &str) -> AtlasResult<Vec<InvestmentRecord>> {
        self.inner.records_for_province(code)
    }
    fn joint_records(&self, a: &str, b: &str) -> AtlasResult<Vec<InvestmentRecord>> {
        self.inner.joint_records(a, b)
    }
    fn top_k_by_momentum(&self, code: &str, k: usize) -> AtlasResult<Vec<InvestmentRecord>> {
        self.inner.top_k_by_momentum(code, k)
    }
    fn active_records(&self) -> AtlasResult<Vec<InvestmentRecord>> {
        self.inner.active_records()
    }
    fn get_record(&self, id: i64) -> AtlasResult<Option<InvestmentRecord>> {
        self.inner.get_record(id)
    }
    fn update_related_provinces(&self, id: i64, value: Option<&str>) -> AtlasResult<()> {
        self.inner.update_related_provinces(id, value)
    }
    fn insert_record(&self, record: &InvestmentRecord) -> AtlasResult<i64> {
        self.inner.insert_record(record)
    }
}

#[test]
fn concurrent_trigger_fails_fast() {
    let ledger = Arc::new(GatedLedger {
        inner: MemoryLedger::with_records(load_ledger("regional")),
        entered: Barrier::new(2),
        release: Barrier::new(2),
    });
    let job = build_job(
        ledger.clone(),
        Arc::new(memory_geography()),
        Arc::new(MemoryStore::new()),
        &AtlasConfig::default(),
    );

    std::thread::scope(|s| {
        let first = s.spawn(|| job.run());
        ledger.entered.wait();

        assert!(job.is_running());
        assert!(matches!(
            job.run(),
            Err(AtlasError::JobError(JobError::AlreadyRunning))
        ));
        assert!(matches!(
            job.propagate(None),
            Err(AtlasError::JobError(JobError::AlreadyRunning))
        ));

        ledger.release.wait();
        let report = first.join().unwrap().unwrap();
        assert_eq!(report.persisted, 5);
    });
    assert!(!job.is_running());
}

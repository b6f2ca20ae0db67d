//! Propagation writes each record's top related provinces, and only when
//! the value changes.

use std::sync::Arc;

use atlas_core::traits::IInvestmentLedger;
use atlas_engine::Propagator;
use test_fixtures::{momentum_pair, MemoryLedger, MemoryStore, RecordBuilder};

/// 粤 paired with 沪 0.8, 京 0.6, 川 0.4, 湘 0.3.
fn ranked_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_pairs(vec![
        momentum_pair("粤", "沪", 0.8, &[], &[]),
        momentum_pair("粤", "京", 0.6, &[], &[]),
        momentum_pair("粤", "川", 0.4, &[], &[]),
        momentum_pair("粤", "湘", 0.3, &[], &[]),
    ]))
}

fn related(ledger: &MemoryLedger, id: i64) -> Option<String> {
    ledger.get_record(id).unwrap().unwrap().related_provinces
}

#[test]
fn top_three_are_joined_in_score_order() {
    let ledger = Arc::new(MemoryLedger::with_records(vec![
        RecordBuilder::new(1, "粤").build(),
    ]));
    let propagator = Propagator::new(ledger.clone(), ranked_store(), 5);

    let report = propagator.propagate(Some(3)).unwrap();
    assert_eq!(report.examined, 1);
    assert_eq!(report.updated, 1);
    assert_eq!(related(&ledger, 1).as_deref(), Some("沪,京,川"));
}

#[test]
fn unchanged_value_is_not_written() {
    let ledger = Arc::new(MemoryLedger::with_records(vec![
        RecordBuilder::new(1, "粤").build(),
        RecordBuilder::new(2, "粤").related("沪,京,川").build(),
    ]));
    let propagator = Propagator::new(ledger.clone(), ranked_store(), 5);

    let first = propagator.propagate(Some(3)).unwrap();
    assert_eq!(first.updated, 1);
    assert_eq!(first.unchanged, 1);
    assert_eq!(ledger.update_count(), 1);

    let second = propagator.propagate(Some(3)).unwrap();
    assert_eq!(second.writes(), 0);
    assert_eq!(second.unchanged, 2);
    assert_eq!(ledger.update_count(), 1);
}

#[test]
fn stale_values_are_cleared_only_when_present() {
    let ledger = Arc::new(MemoryLedger::with_records(vec![
        RecordBuilder::new(1, "藏").related("川").build(),
        RecordBuilder::new(2, "藏").build(),
    ]));
    let propagator = Propagator::new(ledger.clone(), ranked_store(), 5);

    let report = propagator.propagate(None).unwrap();
    assert_eq!(report.cleared, 1);
    assert_eq!(report.unchanged, 1);
    assert_eq!(ledger.update_count(), 1);
    assert_eq!(related(&ledger, 1), None);
}

#[test]
fn zero_top_n_uses_the_default() {
    let ledger = Arc::new(MemoryLedger::with_records(vec![
        RecordBuilder::new(1, "粤").build(),
    ]));
    let propagator = Propagator::new(ledger.clone(), ranked_store(), 2);

    assert_eq!(propagator.effective_top_n(Some(0)), 2);
    propagator.propagate(Some(0)).unwrap();
    assert_eq!(related(&ledger, 1).as_deref(), Some("沪,京"));
}

#[test]
fn write_failure_is_counted_and_others_continue() {
    let ledger = Arc::new(MemoryLedger::with_records(vec![
        RecordBuilder::new(1, "粤").build(),
        RecordBuilder::new(2, "粤").build(),
        RecordBuilder::new(3, "沪").build(),
    ]));
    ledger.fail_updates_for(2);
    let propagator = Propagator::new(ledger.clone(), ranked_store(), 5);

    let report = propagator.propagate(Some(1)).unwrap();
    assert_eq!(report.examined, 3);
    assert_eq!(report.failed, 1);
    assert_eq!(report.updated, 2);
    assert_eq!(related(&ledger, 1).as_deref(), Some("沪"));
    assert_eq!(related(&ledger, 2), None);
    assert_eq!(related(&ledger, 3).as_deref(), Some("粤"));
}

#[test]
fn store_failure_fails_the_province_partition() {
    let ledger = Arc::new(MemoryLedger::with_records(vec![
        RecordBuilder::new(1, "粤").build(),
        RecordBuilder::new(2, "沪").build(),
    ]));
    let store = ranked_store();
    store.set_fail_reads(true);
    let propagator = Propagator::new(ledger.clone(), store, 5);

    let report = propagator.propagate(None).unwrap();
    assert_eq!(report.failed, 2);
    assert_eq!(ledger.update_count(), 0);
}

#[test]
fn inactive_and_homeless_records_are_ignored() {
    let mut homeless = RecordBuilder::new(2, "粤").build();
    homeless.province = None;
    let ledger = Arc::new(MemoryLedger::with_records(vec![
        RecordBuilder::new(1, "粤").inactive().build(),
        homeless,
    ]));
    let propagator = Propagator::new(ledger.clone(), ranked_store(), 5);

    let report = propagator.propagate(None).unwrap();
    assert_eq!(report.examined, 0);
    assert_eq!(ledger.update_count(), 0);
}

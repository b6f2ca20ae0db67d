//! Correlation store behavior against an in-memory database.

use std::collections::BTreeMap;

use chrono::Utc;
use atlas_core::models::*;
use atlas_core::traits::ICorrelationStore;
use atlas_core::AtlasError;
use atlas_storage::migrations;
use atlas_storage::StorageEngine;

fn make_pair(a: &str, b: &str, score: f64, concepts: &[&str], industries: &[&str]) -> CorrelationPair {
    let now = Utc::now();
    let mut weights = BTreeMap::new();
    weights.insert(Dimension::ConceptOverlap, 0.5);
    weights.insert(Dimension::IndustryFrequency, 0.3);
    weights.insert(Dimension::CompanyTypeOverlap, 0.2);
    CorrelationPair {
        key: PairKey::new(a, b).unwrap(),
        score,
        method: CalculationMethod::Momentum,
        dimensions: DimensionScores::new()
            .with(Dimension::ConceptOverlap, 0.4)
            .with(Dimension::IndustryFrequency, 0.2),
        weights,
        reason: CorrelationReason::SharedMomentum {
            common_concepts: concepts.iter().map(|s| s.to_string()).collect(),
            common_industries: industries.iter().map(|s| s.to_string()).collect(),
            concept_families: vec![],
            source_leaders: vec!["甲公司".to_string()],
            target_leaders: vec!["乙公司".to_string()],
            summary: format!("{a}-{b}"),
        },
        joint_record_count: 0,
        source_record_count: 5,
        target_record_count: 5,
        total_amount: 0.0,
        distance_km: Some(640),
        related_record_ids: vec![3, 7],
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn migrations_reach_latest_version_and_are_idempotent() {
    let engine = StorageEngine::open_in_memory().unwrap();
    engine
        .pool()
        .writer
        .with_conn(|conn| {
            assert_eq!(migrations::current_version(conn)?, migrations::LATEST_VERSION);
            migrations::run_migrations(conn)?;
            assert_eq!(migrations::current_version(conn)?, migrations::LATEST_VERSION);
            Ok(())
        })
        .unwrap();
}

#[test]
fn pair_round_trips_and_is_found_in_either_order() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let pair = make_pair("粤", "湘", 0.42, &["芯片"], &["半导体"]);
    engine.upsert(&pair).unwrap();

    let found = engine.get_pair("湘", "粤").unwrap().unwrap();
    assert_eq!(found, pair);
    assert_eq!(engine.get_pair("粤", "湘").unwrap().unwrap(), pair);
    assert!(engine.get_pair("粤", "京").unwrap().is_none());
}

#[test]
fn get_pair_rejects_identical_codes() {
    let engine = StorageEngine::open_in_memory().unwrap();
    assert!(matches!(
        engine.get_pair("粤", "粤"),
        Err(AtlasError::InvalidPair { .. })
    ));
}

#[test]
fn upsert_replaces_scores_and_keeps_created_at() {
    let engine = StorageEngine::open_in_memory().unwrap();
    let first = make_pair("粤", "湘", 0.42, &[], &[]);
    engine.upsert(&first).unwrap();

    let mut second = make_pair("粤", "湘", 0.8, &[], &[]);
    second.created_at = first.created_at + chrono::Duration::seconds(60);
    engine.upsert(&second).unwrap();

    let stored = engine.get_pair("粤", "湘").unwrap().unwrap();
    assert_eq!(stored.score, 0.8);
    assert_eq!(stored.created_at, first.created_at);
    assert_eq!(engine.count().unwrap(), 1);
}

#[test]
fn top_n_orders_by_score_then_other_code() {
    let engine = StorageEngine::open_in_memory().unwrap();
    engine.upsert(&make_pair("A", "B", 0.8, &[], &[])).unwrap();
    engine.upsert(&make_pair("A", "C", 0.6, &[], &[])).unwrap();
    engine.upsert(&make_pair("A", "D", 0.6, &[], &[])).unwrap();
    engine.upsert(&make_pair("A", "E", 0.3, &[], &[])).unwrap();
    engine.upsert(&make_pair("A", "F", 0.0, &[], &[])).unwrap();
    engine.upsert(&make_pair("B", "C", 0.9, &[], &[])).unwrap();

    let top: Vec<String> = engine
        .top_n("A", 10)
        .unwrap()
        .iter()
        .map(|p| p.key.other("A").unwrap().to_string())
        .collect();
    assert_eq!(top, vec!["B", "C", "D", "E"]);

    assert_eq!(engine.top_n("A", 2).unwrap().len(), 2);
    assert_eq!(engine.top_overall(1).unwrap()[0].key, PairKey::new("B", "C").unwrap());
}

#[test]
fn score_range_is_inclusive_and_descending() {
    let engine = StorageEngine::open_in_memory().unwrap();
    engine.upsert(&make_pair("A", "B", 0.8, &[], &[])).unwrap();
    engine.upsert(&make_pair("A", "C", 0.5, &[], &[])).unwrap();
    engine.upsert(&make_pair("A", "D", 0.2, &[], &[])).unwrap();

    let scores: Vec<f64> = engine
        .all(Some(0.2), Some(0.5))
        .unwrap()
        .iter()
        .map(|p| p.score)
        .collect();
    assert_eq!(scores, vec![0.5, 0.2]);
    assert_eq!(engine.all(None, None).unwrap().len(), 3);
    assert_eq!(engine.all(Some(0.6), None).unwrap().len(), 1);
}

#[test]
fn substring_search_matches_common_elements() {
    let engine = StorageEngine::open_in_memory().unwrap();
    engine
        .upsert(&make_pair("粤", "湘", 0.5, &["人工智能", "芯片"], &["半导体"]))
        .unwrap();
    engine
        .upsert(&make_pair("京", "沪", 0.7, &["新能源"], &["电力设备"]))
        .unwrap();

    let by_concept = engine.by_common_concept("智能").unwrap();
    assert_eq!(by_concept.len(), 1);
    assert_eq!(by_concept[0].key, PairKey::new("粤", "湘").unwrap());

    assert_eq!(engine.by_common_industry("电力").unwrap().len(), 1);
    assert!(engine.by_common_industry("银行").unwrap().is_empty());
    assert!(engine.by_common_concept("  ").unwrap().is_empty());
}

#[test]
fn clear_removes_every_row() {
    let engine = StorageEngine::open_in_memory().unwrap();
    engine.upsert(&make_pair("A", "B", 0.8, &[], &[])).unwrap();
    engine.upsert(&make_pair("A", "C", 0.5, &[], &[])).unwrap();
    assert_eq!(engine.clear().unwrap(), 2);
    assert_eq!(engine.count().unwrap(), 0);
    assert_eq!(engine.clear().unwrap(), 0);
}

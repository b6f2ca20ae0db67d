use std::collections::{BTreeMap, BTreeSet};

use atlas_core::models::{CalculationMethod, Dimension, DimensionScores};
use atlas_scoring::dimensions::{categorical, frequency, geography, joint_activity, magnitude};
use atlas_scoring::{aggregate, WeightProfile};
use proptest::prelude::*;

fn arb_labels() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set("[a-f]", 0..6)
}

fn arb_frequencies() -> impl Strategy<Value = BTreeMap<String, usize>> {
    prop::collection::btree_map("[a-f]", 0usize..20, 0..6)
}

fn arb_dimension() -> impl Strategy<Value = Dimension> {
    prop::sample::select(Dimension::ALL.to_vec())
}

// ── Bounded 0.0–1.0 ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn joint_activity_bounded(a in 0usize..50, b in 0usize..50, joint in 0usize..50) {
        let joint = joint.min(a).min(b);
        let score = joint_activity::calculate(a, b, joint);
        prop_assert!((0.0..=1.0).contains(&score), "out of bounds: {}", score);
    }

    #[test]
    fn jaccard_bounded_and_symmetric(a in arb_labels(), b in arb_labels()) {
        let ab = categorical::jaccard(&a, &b);
        let ba = categorical::jaccard(&b, &a);
        prop_assert!((0.0..=1.0).contains(&ab));
        prop_assert!((ab - ba).abs() < 1e-12);
    }

    #[test]
    fn cosine_bounded_and_symmetric(a in arb_frequencies(), b in arb_frequencies()) {
        let ab = frequency::cosine_similarity(&a, &b);
        let ba = frequency::cosine_similarity(&b, &a);
        prop_assert!((0.0..=1.0).contains(&ab));
        prop_assert!((ab - ba).abs() < 1e-12);
    }

    #[test]
    fn magnitude_bounded(amount in -1e9f64..1e9, cap in 1.0f64..1e9) {
        let score = magnitude::calculate(amount, cap);
        prop_assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn aggregate_bounded(
        weights in prop::collection::btree_map(arb_dimension(), 0.0f64..2.0, 1..7),
        scores in prop::collection::btree_map(arb_dimension(), 0.0f64..=1.0, 0..7),
    ) {
        let profile = WeightProfile::new("random", weights).unwrap();
        let scores: DimensionScores = scores.into_iter().collect();
        let result = aggregate(&profile, &scores, CalculationMethod::Comprehensive);
        prop_assert!((0.0..=1.0).contains(&result.score), "out of bounds: {}", result.score);
    }
}

// ── Set identities ──────────────────────────────────────────────────────

proptest! {
    #[test]
    fn identical_sets_score_one(n in 1usize..50) {
        prop_assert_eq!(joint_activity::calculate(n, n, n), 1.0);
    }

    #[test]
    fn disjoint_sets_score_zero(a in 1usize..50, b in 1usize..50) {
        prop_assert_eq!(joint_activity::calculate(a, b, 0), 0.0);
    }

    #[test]
    fn identical_nonempty_label_sets_score_one(a in prop::collection::btree_set("[a-f]", 1..6)) {
        prop_assert_eq!(categorical::jaccard(&a, &a), 1.0);
    }
}

// ── Geography decay ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn geography_strictly_decreasing(
        near in 0.0f64..50_000.0,
        gap in 1.0f64..50_000.0,
        scale in 100.0f64..10_000.0,
    ) {
        let closer = geography::calculate(near, scale);
        let farther = geography::calculate(near + gap, scale);
        prop_assert!(closer > farther, "{} <= {}", closer, farther);
        prop_assert!(farther > 0.0 && closer <= 1.0);
    }

    #[test]
    fn geography_zero_distance_is_one(scale in 1.0f64..10_000.0) {
        prop_assert_eq!(geography::calculate(0.0, scale), 1.0);
    }
}

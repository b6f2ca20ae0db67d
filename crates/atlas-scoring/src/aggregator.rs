use std::collections::BTreeMap;

use atlas_core::constants::SCORE_PRECISION;
use atlas_core::models::{CalculationMethod, Dimension, DimensionScores};

use crate::profile::WeightProfile;

/// Combined score plus what produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateScore {
    pub score: f64,
    pub method: CalculationMethod,
    pub weights: BTreeMap<Dimension, f64>,
}

/// Weighted sum over the profile's dimensions.
///
/// Dimensions without a score contribute 0. Result is clamped to
/// [0.0, 1.0] and rounded half-up to six places.
pub fn aggregate(
    profile: &WeightProfile,
    scores: &DimensionScores,
    method: CalculationMethod,
) -> AggregateScore {
    let raw: f64 = profile
        .weights()
        .iter()
        .map(|(dimension, weight)| weight * scores.get(*dimension).unwrap_or(0.0))
        .sum();
    AggregateScore {
        score: round_score(raw),
        method,
        weights: profile.weights().clone(),
    }
}

/// Geography-only fallback: the geography score times the profile's
/// geography weight, not renormalized.
pub fn geography_only(profile: &WeightProfile, geography: f64) -> AggregateScore {
    let weight = profile.weight(Dimension::Geography);
    let mut weights = BTreeMap::new();
    weights.insert(Dimension::Geography, weight);
    AggregateScore {
        score: round_score(weight * geography),
        method: CalculationMethod::GeographyOnly,
        weights,
    }
}

/// Clamp to [0.0, 1.0] and round half-up to the persisted precision.
/// Non-finite input maps to 0.
pub fn round_score(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let factor = 10f64.powi(SCORE_PRECISION as i32);
    ((value.clamp(0.0, 1.0) * factor).round() / factor).clamp(0.0, 1.0)
}

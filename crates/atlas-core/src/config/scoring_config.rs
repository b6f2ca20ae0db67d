use serde::{Deserialize, Serialize};

use super::defaults;

/// Dimension scorer parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Distance at which the geography score halves.
    pub geography_decay_km: f64,
    /// Joint amount (万元) that maps to a magnitude score of 1.
    pub magnitude_cap: f64,
    /// Leader records per province considered by the momentum strategy.
    /// 0 disables the strategy.
    pub momentum_top_k: usize,
    /// Leader company names kept per side in momentum reasons.
    pub leaders_per_province: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            geography_decay_km: defaults::DEFAULT_GEOGRAPHY_DECAY_KM,
            magnitude_cap: defaults::DEFAULT_MAGNITUDE_CAP,
            momentum_top_k: defaults::DEFAULT_MOMENTUM_TOP_K,
            leaders_per_province: defaults::DEFAULT_LEADERS_PER_PROVINCE,
        }
    }
}

/// Per-strategy persistence thresholds. A pair is stored only when its
/// score is strictly greater than its strategy's threshold.
///
/// Momentum scores run lower than comprehensive ones, so its threshold is
/// meant to stay at or below the others. The defaults are all 0.0, the
/// floor, which keeps every positive score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub comprehensive: f64,
    pub momentum: f64,
    pub geography_only: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            comprehensive: defaults::DEFAULT_COMPREHENSIVE_THRESHOLD,
            momentum: defaults::DEFAULT_MOMENTUM_THRESHOLD,
            geography_only: defaults::DEFAULT_GEOGRAPHY_ONLY_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PropagationConfig {
    /// Related provinces written per record.
    pub default_top_n: usize,
}

impl Default for PropagationConfig {
    fn default() -> Self {
        Self {
            default_top_n: defaults::DEFAULT_PROPAGATION_TOP_N,
        }
    }
}

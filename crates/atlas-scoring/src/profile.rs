//! Named weight profiles, one per scoring strategy.

use std::collections::BTreeMap;

use atlas_core::config::defaults::{COMPREHENSIVE_PROFILE, MOMENTUM_PROFILE};
use atlas_core::config::ProfileWeights;
use atlas_core::errors::ConfigError;
use atlas_core::models::Dimension;
use atlas_core::{AtlasConfig, AtlasResult};

/// Immutable map of dimension to weight. Weights need not sum to 1.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightProfile {
    name: String,
    weights: BTreeMap<Dimension, f64>,
}

impl WeightProfile {
    pub fn new(name: impl Into<String>, weights: BTreeMap<Dimension, f64>) -> AtlasResult<Self> {
        let name = name.into();
        for (dimension, weight) in &weights {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(ConfigError::ValidationFailed {
                    field: format!("profiles.{name}.{dimension}"),
                    message: "weight must be finite and non-negative".to_string(),
                }
                .into());
            }
        }
        Ok(Self { name, weights })
    }

    /// Build from the raw name-keyed table found in configuration.
    pub fn from_config(name: &str, raw: &ProfileWeights) -> AtlasResult<Self> {
        let mut weights = BTreeMap::new();
        for (dimension, weight) in raw {
            weights.insert(dimension.parse::<Dimension>()?, *weight);
        }
        Self::new(name, weights)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Weight of a dimension; 0.0 when the profile does not use it.
    pub fn weight(&self, dimension: Dimension) -> f64 {
        self.weights.get(&dimension).copied().unwrap_or(0.0)
    }

    pub fn weights(&self) -> &BTreeMap<Dimension, f64> {
        &self.weights
    }

    pub fn sum(&self) -> f64 {
        self.weights.values().sum()
    }
}

/// The set of profiles in force. Swapped as a whole on reload.
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    comprehensive: WeightProfile,
    momentum: WeightProfile,
    extra: BTreeMap<String, WeightProfile>,
}

impl ProfileRegistry {
    pub fn from_config(config: &AtlasConfig) -> AtlasResult<Self> {
        let required = |name: &str| -> AtlasResult<WeightProfile> {
            let raw = config.profiles.get(name).ok_or_else(|| ConfigError::ValidationFailed {
                field: format!("profiles.{name}"),
                message: "profile is required".to_string(),
            })?;
            WeightProfile::from_config(name, raw)
        };
        let comprehensive = required(COMPREHENSIVE_PROFILE)?;
        let momentum = required(MOMENTUM_PROFILE)?;

        let mut extra = BTreeMap::new();
        for (name, raw) in &config.profiles {
            if name != COMPREHENSIVE_PROFILE && name != MOMENTUM_PROFILE {
                extra.insert(name.clone(), WeightProfile::from_config(name, raw)?);
            }
        }
        Ok(Self {
            comprehensive,
            momentum,
            extra,
        })
    }

    pub fn comprehensive(&self) -> &WeightProfile {
        &self.comprehensive
    }

    pub fn momentum(&self) -> &WeightProfile {
        &self.momentum
    }

    pub fn get(&self, name: &str) -> Option<&WeightProfile> {
        match name {
            COMPREHENSIVE_PROFILE => Some(&self.comprehensive),
            MOMENTUM_PROFILE => Some(&self.momentum),
            other => self.extra.get(other),
        }
    }

    pub fn names(&self) -> Vec<String> {
        let mut names = vec![
            COMPREHENSIVE_PROFILE.to_string(),
            MOMENTUM_PROFILE.to_string(),
        ];
        names.extend(self.extra.keys().cloned());
        names
    }
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        let raw = atlas_core::config::default_profiles();
        let build = |name: &str| {
            let weights = raw
                .get(name)
                .map(|w| {
                    w.iter()
                        .filter_map(|(d, v)| d.parse::<Dimension>().ok().map(|d| (d, *v)))
                        .collect()
                })
                .unwrap_or_default();
            WeightProfile {
                name: name.to_string(),
                weights,
            }
        };
        Self {
            comprehensive: build(COMPREHENSIVE_PROFILE),
            momentum: build(MOMENTUM_PROFILE),
            extra: BTreeMap::new(),
        }
    }
}

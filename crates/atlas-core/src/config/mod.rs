//! TOML configuration. Every section is optional and falls back to the
//! compiled defaults in [`defaults`].

pub mod cache_config;
pub mod defaults;
pub mod observability_config;
pub mod scoring_config;
pub mod storage_config;

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub use cache_config::CacheConfig;
pub use observability_config::ObservabilityConfig;
pub use scoring_config::{PropagationConfig, ScoringConfig, ThresholdConfig};
pub use storage_config::{ReaderPragmas, StorageConfig, WriterPragmas};

use crate::errors::ConfigError;
use crate::models::Dimension;

/// Raw weight table of one profile, keyed by dimension name.
pub type ProfileWeights = BTreeMap<String, f64>;

/// Top-level configuration aggregating all sub-configs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AtlasConfig {
    pub storage: StorageConfig,
    pub scoring: ScoringConfig,
    pub thresholds: ThresholdConfig,
    pub propagation: PropagationConfig,
    pub cache: CacheConfig,
    pub observability: ObservabilityConfig,
    /// Weight profiles by name. Profiles missing from a file keep their
    /// defaults.
    pub profiles: BTreeMap<String, ProfileWeights>,
}

impl Default for AtlasConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            scoring: ScoringConfig::default(),
            thresholds: ThresholdConfig::default(),
            propagation: PropagationConfig::default(),
            cache: CacheConfig::default(),
            observability: ObservabilityConfig::default(),
            profiles: default_profiles(),
        }
    }
}

/// The built-in comprehensive and momentum profiles.
pub fn default_profiles() -> BTreeMap<String, ProfileWeights> {
    let to_weights = |table: &[(&str, f64)]| -> ProfileWeights {
        table.iter().map(|(d, w)| (d.to_string(), *w)).collect()
    };
    let mut profiles = BTreeMap::new();
    profiles.insert(
        defaults::COMPREHENSIVE_PROFILE.to_string(),
        to_weights(&defaults::DEFAULT_COMPREHENSIVE_WEIGHTS),
    );
    profiles.insert(
        defaults::MOMENTUM_PROFILE.to_string(),
        to_weights(&defaults::DEFAULT_MOMENTUM_WEIGHTS),
    );
    profiles
}

impl AtlasConfig {
    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Self::parse(toml_str, "<string>")
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        Self::parse(&content, &path.display().to_string())
    }

    fn parse(toml_str: &str, origin: &str) -> Result<Self, ConfigError> {
        let mut config: AtlasConfig =
            toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
                path: origin.to_string(),
                message: e.to_string(),
            })?;
        for (name, weights) in default_profiles() {
            config.profiles.entry(name).or_insert(weights);
        }
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply `ATLAS_*` environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("ATLAS_DB_PATH") {
            if !path.trim().is_empty() {
                self.storage.db_path = path;
            }
        }
        if let Ok(level) = std::env::var("ATLAS_LOG_LEVEL") {
            if !level.trim().is_empty() {
                self.observability.log_level = level;
            }
        }
    }

    /// Validate the configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("scoring.geography_decay_km", self.scoring.geography_decay_km),
            ("scoring.magnitude_cap", self.scoring.magnitude_cap),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must be a finite number greater than 0".to_string(),
                });
            }
        }

        let thresholds = [
            ("thresholds.comprehensive", self.thresholds.comprehensive),
            ("thresholds.momentum", self.thresholds.momentum),
            ("thresholds.geography_only", self.thresholds.geography_only),
        ];
        for (field, value) in thresholds {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must be between 0.0 and 1.0".to_string(),
                });
            }
        }

        if self.propagation.default_top_n == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "propagation.default_top_n".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if self.cache.max_entries == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "cache.max_entries".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if self.storage.read_pool_size == 0 {
            return Err(ConfigError::ValidationFailed {
                field: "storage.read_pool_size".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }

        for required in [defaults::COMPREHENSIVE_PROFILE, defaults::MOMENTUM_PROFILE] {
            if !self.profiles.contains_key(required) {
                return Err(ConfigError::ValidationFailed {
                    field: format!("profiles.{required}"),
                    message: "profile is required".to_string(),
                });
            }
        }
        for (name, weights) in &self.profiles {
            if weights.is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: format!("profiles.{name}"),
                    message: "profile has no weights".to_string(),
                });
            }
            for (dimension, weight) in weights {
                if dimension.parse::<Dimension>().is_err() {
                    return Err(ConfigError::ValidationFailed {
                        field: format!("profiles.{name}.{dimension}"),
                        message: "unknown dimension".to_string(),
                    });
                }
                if !weight.is_finite() || *weight < 0.0 {
                    return Err(ConfigError::ValidationFailed {
                        field: format!("profiles.{name}.{dimension}"),
                        message: "weight must be finite and non-negative".to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

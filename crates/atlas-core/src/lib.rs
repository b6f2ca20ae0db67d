//! # atlas-core
//!
//! Foundation crate for the Atlas province correlation engine.
//! Defines all types, traits, errors, config, constants and the province
//! reference table. Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod province;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::AtlasConfig;
pub use errors::{AtlasError, AtlasResult};
pub use models::{
    CalculationMethod, CorrelationPair, CorrelationReason, Dimension, DimensionScores,
    GeoDistance, InvestmentRecord, PairKey,
};
pub use province::{Province, ProvinceTable};

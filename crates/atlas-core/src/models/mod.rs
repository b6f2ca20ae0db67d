//! Shared data models.

pub mod correlation;
pub mod dimension;
pub mod geography;
pub mod investment;
pub mod reason;
pub mod report;

pub use correlation::{CalculationMethod, CorrelationPair, PairKey};
pub use dimension::{Dimension, DimensionScores};
pub use geography::GeoDistance;
pub use investment::{distinct_provinces, join_list, split_list, InvestmentRecord};
pub use reason::CorrelationReason;
pub use report::{PropagationReport, RecalculationReport};

//! # atlas-scoring
//!
//! Pure scoring functions. Every dimension scorer returns a value in
//! [0.0, 1.0] and degrades to 0.0 on missing data. The aggregator combines
//! dimension scores through a named [`WeightProfile`].

pub mod aggregator;
pub mod buckets;
pub mod concept_families;
pub mod dimensions;
pub mod extract;
pub mod profile;

pub use aggregator::{aggregate, round_score, AggregateScore};
pub use buckets::CompanyType;
pub use profile::{ProfileRegistry, WeightProfile};

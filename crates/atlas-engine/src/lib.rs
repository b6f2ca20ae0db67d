//! # atlas-engine
//!
//! Orchestration for the province correlation engine.
//!
//! - [`PairCalculator`]: picks a strategy per pair and builds the row.
//! - [`RecalculationJob`]: single-flight all-pairs pass, then propagation.
//! - [`Propagator`]: writes each record's top related provinces back.
//! - [`QueryCache`]: read-through cache in front of store queries.
//! - [`CorrelationService`]: the facade callers use.

pub mod cache;
pub mod calculator;
pub mod job;
pub mod propagation;
pub mod reason;
pub mod service;

use std::sync::{Arc, RwLock};

use atlas_scoring::ProfileRegistry;

pub use cache::QueryCache;
pub use calculator::{PairCalculator, PairOutcome};
pub use job::RecalculationJob;
pub use propagation::Propagator;
pub use service::{CorrelationService, RelatedProvince};

/// Profile registry shared between the service and the job. Replaced
/// wholesale on reload; each run works from the snapshot it started with.
pub type SharedProfiles = Arc<RwLock<Arc<ProfileRegistry>>>;

/// Current registry snapshot. A poisoned lock still holds a complete
/// registry, so it is read through.
pub(crate) fn snapshot(profiles: &SharedProfiles) -> Arc<ProfileRegistry> {
    match profiles.read() {
        Ok(guard) => Arc::clone(&guard),
        Err(poisoned) => Arc::clone(&poisoned.into_inner()),
    }
}

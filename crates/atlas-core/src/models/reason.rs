use serde::{Deserialize, Serialize};

/// Why two provinces are related. Serialized to JSON only at the storage
/// boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CorrelationReason {
    /// Jointly linked investment records exist.
    SharedActivity {
        common_industries: Vec<String>,
        common_investment_types: Vec<String>,
        summary: String,
    },
    /// Derived from each province's highest-momentum records.
    SharedMomentum {
        common_concepts: Vec<String>,
        common_industries: Vec<String>,
        /// Concept families both sides touch when no exact concept is shared.
        concept_families: Vec<String>,
        source_leaders: Vec<String>,
        target_leaders: Vec<String>,
        summary: String,
    },
    /// Only geographic proximity is known.
    Proximity {
        distance_km: u32,
        is_neighbor: bool,
        summary: String,
    },
}

impl CorrelationReason {
    pub fn summary(&self) -> &str {
        match self {
            CorrelationReason::SharedActivity { summary, .. }
            | CorrelationReason::SharedMomentum { summary, .. }
            | CorrelationReason::Proximity { summary, .. } => summary,
        }
    }

    pub fn common_industries(&self) -> &[String] {
        match self {
            CorrelationReason::SharedActivity {
                common_industries, ..
            }
            | CorrelationReason::SharedMomentum {
                common_industries, ..
            } => common_industries,
            CorrelationReason::Proximity { .. } => &[],
        }
    }

    pub fn common_concepts(&self) -> &[String] {
        match self {
            CorrelationReason::SharedMomentum {
                common_concepts, ..
            } => common_concepts,
            _ => &[],
        }
    }
}

//! Terse constructors for records and pairs.

use std::collections::BTreeMap;

use chrono::Utc;

use atlas_core::models::{
    CalculationMethod, CorrelationPair, CorrelationReason, Dimension, DimensionScores,
    InvestmentRecord, PairKey,
};

/// Builder for an active [`InvestmentRecord`].
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    record: InvestmentRecord,
}

impl RecordBuilder {
    pub fn new(id: i64, province: &str) -> Self {
        Self {
            record: InvestmentRecord {
                id,
                title: format!("record-{id}"),
                province: Some(province.to_string()),
                active: true,
                ..Default::default()
            },
        }
    }

    pub fn company(mut self, name: &str) -> Self {
        self.record.company_name = Some(name.to_string());
        self
    }

    pub fn industry(mut self, industry: &str) -> Self {
        self.record.industry = Some(industry.to_string());
        self
    }

    pub fn investment_type(mut self, label: &str) -> Self {
        self.record.investment_type = Some(label.to_string());
        self
    }

    pub fn concepts(mut self, concepts: &[&str]) -> Self {
        self.record.concepts = concepts.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn amount(mut self, amount: f64) -> Self {
        self.record.amount = amount;
        self
    }

    pub fn momentum(mut self, ten_day_change: f64) -> Self {
        self.record.ten_day_change = Some(ten_day_change);
        self
    }

    pub fn related(mut self, codes: &str) -> Self {
        self.record.related_provinces = Some(codes.to_string());
        self
    }

    pub fn inactive(mut self) -> Self {
        self.record.active = false;
        self
    }

    pub fn build(self) -> InvestmentRecord {
        self.record
    }
}

/// A momentum pair with the given score and shared tags.
///
/// # Panics
/// Panics if `a` and `b` do not form a valid pair.
pub fn momentum_pair(a: &str, b: &str, score: f64, concepts: &[&str], industries: &[&str]) -> CorrelationPair {
    let now = Utc::now();
    let weights: BTreeMap<Dimension, f64> = [
        (Dimension::ConceptOverlap, 0.5),
        (Dimension::IndustryFrequency, 0.3),
        (Dimension::CompanyTypeOverlap, 0.2),
    ]
    .into_iter()
    .collect();
    CorrelationPair {
        key: PairKey::new(a, b).unwrap_or_else(|e| panic!("fixture pair {a}/{b}: {e}")),
        score,
        method: CalculationMethod::Momentum,
        dimensions: DimensionScores::new().with(Dimension::ConceptOverlap, score),
        weights,
        reason: CorrelationReason::SharedMomentum {
            common_concepts: concepts.iter().map(|s| s.to_string()).collect(),
            common_industries: industries.iter().map(|s| s.to_string()).collect(),
            concept_families: Vec::new(),
            source_leaders: Vec::new(),
            target_leaders: Vec::new(),
            summary: String::new(),
        },
        joint_record_count: 0,
        source_record_count: 1,
        target_record_count: 1,
        total_amount: 0.0,
        distance_km: None,
        related_record_ids: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}

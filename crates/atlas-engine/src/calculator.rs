//! Per-pair strategy selection and scoring.
//!
//! Strategies are tried in order: comprehensive when jointly linked records
//! exist, momentum when both provinces have leader records, geography-only
//! when their distance is known. A pair none of them applies to is skipped.

use std::sync::Arc;

use chrono::Utc;

use atlas_core::config::ScoringConfig;
use atlas_core::models::{
    CalculationMethod, CorrelationPair, CorrelationReason, Dimension, DimensionScores,
    GeoDistance, InvestmentRecord, PairKey,
};
use atlas_core::traits::{IGeographyTable, IInvestmentLedger};
use atlas_core::{AtlasResult, ProvinceTable};
use atlas_scoring::aggregator::geography_only;
use atlas_scoring::buckets::company_type_set;
use atlas_scoring::dimensions::{categorical, frequency, geography, joint_activity, magnitude};
use atlas_scoring::{aggregate, concept_families, extract, AggregateScore, ProfileRegistry};

use crate::reason;

/// Result of evaluating one pair.
#[derive(Debug, Clone, PartialEq)]
pub enum PairOutcome {
    Scored(Box<CorrelationPair>),
    /// No strategy had data for this pair.
    Skipped,
}

/// Scores province pairs against the ledger and geography table.
pub struct PairCalculator {
    ledger: Arc<dyn IInvestmentLedger>,
    geography: Arc<dyn IGeographyTable>,
    scoring: ScoringConfig,
    provinces: ProvinceTable,
}

impl PairCalculator {
    pub fn new(
        ledger: Arc<dyn IInvestmentLedger>,
        geography: Arc<dyn IGeographyTable>,
        scoring: ScoringConfig,
    ) -> Self {
        Self {
            ledger,
            geography,
            scoring,
            provinces: ProvinceTable::standard(),
        }
    }

    /// Evaluate one unordered pair. Argument order does not matter.
    pub fn calculate(
        &self,
        a: &str,
        b: &str,
        profiles: &ProfileRegistry,
    ) -> AtlasResult<PairOutcome> {
        let key = PairKey::new(a, b)?;
        let distance = self.geography.distance(key.source(), key.target())?;

        let joint = self.ledger.joint_records(key.source(), key.target())?;
        if !joint.is_empty() {
            return self.comprehensive(key, joint, distance, profiles);
        }

        let k = self.scoring.momentum_top_k;
        if k > 0 {
            let source_leaders = self.ledger.top_k_by_momentum(key.source(), k)?;
            if !source_leaders.is_empty() {
                let target_leaders = self.ledger.top_k_by_momentum(key.target(), k)?;
                if !target_leaders.is_empty() {
                    return Ok(self.momentum(key, source_leaders, target_leaders, distance, profiles));
                }
            }
        }

        match distance {
            Some(distance) => Ok(self.proximity(key, distance, profiles)),
            None => Ok(PairOutcome::Skipped),
        }
    }

    fn comprehensive(
        &self,
        key: PairKey,
        joint: Vec<InvestmentRecord>,
        distance: Option<GeoDistance>,
        profiles: &ProfileRegistry,
    ) -> AtlasResult<PairOutcome> {
        let source_records = self.ledger.records_for_province(key.source())?;
        let target_records = self.ledger.records_for_province(key.target())?;
        let joint_amount = extract::total_amount(&joint);

        let geo_score = distance
            .map(|d| geography::calculate(f64::from(d.km), self.scoring.geography_decay_km))
            .unwrap_or(0.0);
        let dimensions = DimensionScores::new()
            .with(
                Dimension::JointActivity,
                joint_activity::calculate(source_records.len(), target_records.len(), joint.len()),
            )
            .with(
                Dimension::IndustryFrequency,
                frequency::cosine_similarity(
                    &extract::industry_frequencies(&source_records),
                    &extract::industry_frequencies(&target_records),
                ),
            )
            .with(
                Dimension::InvestmentTypeOverlap,
                categorical::jaccard(
                    &extract::investment_type_set(&source_records),
                    &extract::investment_type_set(&target_records),
                ),
            )
            .with(Dimension::Geography, geo_score)
            .with(
                Dimension::Magnitude,
                magnitude::calculate(joint_amount, self.scoring.magnitude_cap),
            );
        let aggregate_score = aggregate(
            profiles.comprehensive(),
            &dimensions,
            CalculationMethod::Comprehensive,
        );

        let common_industries = extract::common_elements(
            &extract::industry_set(&source_records),
            &extract::industry_set(&target_records),
        );
        let common_investment_types = extract::common_elements(
            &extract::investment_type_set(&source_records),
            &extract::investment_type_set(&target_records),
        );
        let summary = reason::shared_activity_summary(
            &self.provinces,
            &key,
            joint.len(),
            joint_amount,
            &common_industries,
        );

        Ok(PairOutcome::Scored(Box::new(build_pair(
            key,
            aggregate_score,
            dimensions,
            CorrelationReason::SharedActivity {
                common_industries,
                common_investment_types,
                summary,
            },
            PairCounts {
                joint: joint.len(),
                source: source_records.len(),
                target: target_records.len(),
                total_amount: joint_amount,
            },
            distance,
            joint.iter().map(|r| r.id).collect(),
        ))))
    }

    fn momentum(
        &self,
        key: PairKey,
        source_leaders: Vec<InvestmentRecord>,
        target_leaders: Vec<InvestmentRecord>,
        distance: Option<GeoDistance>,
        profiles: &ProfileRegistry,
    ) -> PairOutcome {
        let source_concepts = extract::concept_set(&source_leaders);
        let target_concepts = extract::concept_set(&target_leaders);

        let dimensions = DimensionScores::new()
            .with(
                Dimension::ConceptOverlap,
                categorical::jaccard(&source_concepts, &target_concepts),
            )
            .with(
                Dimension::IndustryFrequency,
                frequency::cosine_similarity(
                    &extract::industry_frequencies(&source_leaders),
                    &extract::industry_frequencies(&target_leaders),
                ),
            )
            .with(
                Dimension::CompanyTypeOverlap,
                categorical::jaccard(
                    &company_type_set(&source_leaders),
                    &company_type_set(&target_leaders),
                ),
            );
        let aggregate_score = aggregate(profiles.momentum(), &dimensions, CalculationMethod::Momentum);

        let common_concepts = extract::common_elements(&source_concepts, &target_concepts);
        let common_industries = extract::common_elements(
            &extract::industry_set(&source_leaders),
            &extract::industry_set(&target_leaders),
        );
        let concept_families = if common_concepts.is_empty() {
            concept_families::shared_families(&source_concepts, &target_concepts)
        } else {
            Vec::new()
        };
        let keep = self.scoring.leaders_per_province;
        let source_names = leader_names(&source_leaders, keep);
        let target_names = leader_names(&target_leaders, keep);
        let summary = reason::momentum_summary(
            &self.provinces,
            &key,
            &source_names,
            &target_names,
            &common_concepts,
            &common_industries,
            &concept_families,
        );

        PairOutcome::Scored(Box::new(build_pair(
            key,
            aggregate_score,
            dimensions,
            CorrelationReason::SharedMomentum {
                common_concepts,
                common_industries,
                concept_families,
                source_leaders: source_names,
                target_leaders: target_names,
                summary,
            },
            PairCounts {
                joint: 0,
                source: source_leaders.len(),
                target: target_leaders.len(),
                total_amount: 0.0,
            },
            distance,
            Vec::new(),
        )))
    }

    fn proximity(
        &self,
        key: PairKey,
        distance: GeoDistance,
        profiles: &ProfileRegistry,
    ) -> PairOutcome {
        let geo_score = geography::calculate(f64::from(distance.km), self.scoring.geography_decay_km);
        let aggregate_score = geography_only(profiles.comprehensive(), geo_score);
        let dimensions = DimensionScores::new().with(Dimension::Geography, geo_score);
        let summary = reason::proximity_summary(&self.provinces, &key, distance);

        PairOutcome::Scored(Box::new(build_pair(
            key,
            aggregate_score,
            dimensions,
            CorrelationReason::Proximity {
                distance_km: distance.km,
                is_neighbor: distance.is_neighbor,
                summary,
            },
            PairCounts::default(),
            Some(distance),
            Vec::new(),
        )))
    }
}

#[derive(Debug, Default)]
struct PairCounts {
    joint: usize,
    source: usize,
    target: usize,
    total_amount: f64,
}

fn build_pair(
    key: PairKey,
    aggregate_score: AggregateScore,
    dimensions: DimensionScores,
    reason: CorrelationReason,
    counts: PairCounts,
    distance: Option<GeoDistance>,
    related_record_ids: Vec<i64>,
) -> CorrelationPair {
    let now = Utc::now();
    CorrelationPair {
        key,
        score: aggregate_score.score,
        method: aggregate_score.method,
        dimensions,
        weights: aggregate_score.weights,
        reason,
        joint_record_count: counts.joint,
        source_record_count: counts.source,
        target_record_count: counts.target,
        total_amount: counts.total_amount,
        distance_km: distance.map(|d| d.km),
        related_record_ids,
        created_at: now,
        updated_at: now,
    }
}

/// Company names of the first `keep` leaders that carry one.
pub(crate) fn leader_names(leaders: &[InvestmentRecord], keep: usize) -> Vec<String> {
    leaders
        .iter()
        .filter_map(|r| r.company_name.as_deref().map(str::trim))
        .filter(|name| !name.is_empty())
        .take(keep)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leader_names_skip_records_without_company() {
        let leaders = vec![
            InvestmentRecord {
                title: "光伏组件扩产".to_string(),
                company_name: Some("  ".to_string()),
                ..Default::default()
            },
            InvestmentRecord {
                company_name: Some("隆基绿能".to_string()),
                ..Default::default()
            },
            InvestmentRecord {
                title: "no company".to_string(),
                ..Default::default()
            },
            InvestmentRecord {
                company_name: Some("通威股份".to_string()),
                ..Default::default()
            },
        ];
        assert_eq!(leader_names(&leaders, 3), vec!["隆基绿能", "通威股份"]);
        assert_eq!(leader_names(&leaders, 1), vec!["隆基绿能"]);
        assert!(leader_names(&leaders, 0).is_empty());
    }
}

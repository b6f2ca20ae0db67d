//! Human-readable reason summaries.
//!
//! The momentum layout is three lines: each province's full name with up to
//! three leader companies, then `关联原因：` followed by the shared concepts,
//! else shared industries, else shared concept families, else a generic
//! fallback.

use atlas_core::constants::DEFAULT_DETAIL_LEADERS;
use atlas_core::models::{GeoDistance, PairKey};
use atlas_core::ProvinceTable;

const NAME_SEPARATOR: &str = "、";
const REASON_PREFIX: &str = "关联原因：";
const FALLBACK_REASON: &str = "行业分布、地域特征";
const MAX_CONCEPTS_SHOWN: usize = 3;
const MAX_INDUSTRIES_SHOWN: usize = 2;

/// Shared tags between two provinces, in display priority order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SharedTags<'a> {
    pub concepts: &'a [String],
    pub industries: &'a [String],
    pub families: &'a [String],
}

/// Summary for a momentum pair.
pub fn momentum_summary(
    provinces: &ProvinceTable,
    key: &PairKey,
    source_leaders: &[String],
    target_leaders: &[String],
    common_concepts: &[String],
    common_industries: &[String],
    concept_families: &[String],
) -> String {
    describe(
        provinces,
        (key.source(), source_leaders),
        (key.target(), target_leaders),
        SharedTags {
            concepts: common_concepts,
            industries: common_industries,
            families: concept_families,
        },
    )
}

/// Leader lines followed by the reason line. Sides without leader names
/// get no line.
pub fn describe(
    provinces: &ProvinceTable,
    first: (&str, &[String]),
    second: (&str, &[String]),
    shared: SharedTags<'_>,
) -> String {
    let mut lines = Vec::with_capacity(3);
    for (code, leaders) in [first, second] {
        if let Some(line) = leader_line(provinces, code, leaders) {
            lines.push(line);
        }
    }
    lines.push(format!("{REASON_PREFIX}{}", reason_text(shared)));
    lines.join("\n")
}

/// Summary for a pair with jointly linked records.
pub fn shared_activity_summary(
    provinces: &ProvinceTable,
    key: &PairKey,
    joint_count: usize,
    joint_amount: f64,
    common_industries: &[String],
) -> String {
    let mut summary = format!(
        "{}与{}共有{}个联合投资项目，合计{:.2}万元",
        provinces.full_name(key.source()),
        provinces.full_name(key.target()),
        joint_count,
        joint_amount,
    );
    if !common_industries.is_empty() {
        summary.push_str("；共同行业：");
        summary.push_str(&truncated(common_industries, MAX_INDUSTRIES_SHOWN));
    }
    summary
}

/// Summary for a geography-only pair.
pub fn proximity_summary(provinces: &ProvinceTable, key: &PairKey, distance: GeoDistance) -> String {
    let mut summary = format!(
        "{}与{}相距约{}公里",
        provinces.full_name(key.source()),
        provinces.full_name(key.target()),
        distance.km,
    );
    if distance.is_neighbor {
        summary.push_str("，地理相邻");
    }
    summary
}

fn leader_line(provinces: &ProvinceTable, code: &str, leaders: &[String]) -> Option<String> {
    if leaders.is_empty() {
        return None;
    }
    let shown: Vec<&str> = leaders
        .iter()
        .take(DEFAULT_DETAIL_LEADERS)
        .map(String::as_str)
        .collect();
    Some(format!(
        "{}：{}",
        provinces.full_name(code),
        shown.join(NAME_SEPARATOR)
    ))
}

fn reason_text(shared: SharedTags<'_>) -> String {
    if !shared.concepts.is_empty() {
        truncated(shared.concepts, MAX_CONCEPTS_SHOWN)
    } else if !shared.industries.is_empty() {
        truncated(shared.industries, MAX_INDUSTRIES_SHOWN)
    } else if !shared.families.is_empty() {
        format!("{}等概念题材", shared.families.join(NAME_SEPARATOR))
    } else {
        FALLBACK_REASON.to_string()
    }
}

/// First `limit` items joined, with `等` appended when some were dropped.
fn truncated(items: &[String], limit: usize) -> String {
    let shown: Vec<&str> = items.iter().take(limit).map(String::as_str).collect();
    let mut text = shown.join(NAME_SEPARATOR);
    if items.len() > limit {
        text.push('等');
    }
    text
}

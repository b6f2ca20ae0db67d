//! Correlation pair persistence and ranked reads.
//!
//! Every list is ordered by score descending with a deterministic
//! tie-break, so repeated reads of an unchanged table agree.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use atlas_core::errors::StorageError;
use atlas_core::models::{
    join_list, split_list, CalculationMethod, CorrelationPair, CorrelationReason, Dimension,
    DimensionScores, PairKey,
};
use atlas_core::AtlasResult;

use crate::to_storage_err;

const PAIR_COLUMNS: &str = "source_province, target_province, score, method,
     joint_activity_score, industry_frequency_score, investment_type_score,
     geography_score, magnitude_score, concept_score, company_type_score,
     reason, weight_config, joint_record_count, source_record_count,
     target_record_count, total_amount, distance_km, related_record_ids,
     created_at, updated_at";

/// Per-dimension columns, in `PAIR_COLUMNS` order starting at index 4.
const DIMENSION_COLUMNS: [Dimension; 7] = [
    Dimension::JointActivity,
    Dimension::IndustryFrequency,
    Dimension::InvestmentTypeOverlap,
    Dimension::Geography,
    Dimension::Magnitude,
    Dimension::ConceptOverlap,
    Dimension::CompanyTypeOverlap,
];

const DIMENSION_OFFSET: usize = 4;

/// Insert or replace the row for `pair.key`. `created_at` survives updates.
pub fn upsert_pair(conn: &Connection, pair: &CorrelationPair) -> AtlasResult<()> {
    let reason_json = serde_json::to_string(&pair.reason)?;
    let weights_json = serde_json::to_string(&pair.weights)?;
    let dims: Vec<Option<f64>> = DIMENSION_COLUMNS
        .iter()
        .map(|d| pair.dimensions.get(*d))
        .collect();
    let related_ids: Vec<String> = pair.related_record_ids.iter().map(i64::to_string).collect();

    conn.execute(
        "INSERT INTO correlation_pairs (
            source_province, target_province, score, method,
            joint_activity_score, industry_frequency_score, investment_type_score,
            geography_score, magnitude_score, concept_score, company_type_score,
            reason, summary, common_industries, common_concepts, weight_config,
            joint_record_count, source_record_count, target_record_count,
            total_amount, distance_km, related_record_ids, created_at, updated_at
        ) VALUES (
            ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
            ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24
        )
        ON CONFLICT(source_province, target_province) DO UPDATE SET
            score = excluded.score,
            method = excluded.method,
            joint_activity_score = excluded.joint_activity_score,
            industry_frequency_score = excluded.industry_frequency_score,
            investment_type_score = excluded.investment_type_score,
            geography_score = excluded.geography_score,
            magnitude_score = excluded.magnitude_score,
            concept_score = excluded.concept_score,
            company_type_score = excluded.company_type_score,
            reason = excluded.reason,
            summary = excluded.summary,
            common_industries = excluded.common_industries,
            common_concepts = excluded.common_concepts,
            weight_config = excluded.weight_config,
            joint_record_count = excluded.joint_record_count,
            source_record_count = excluded.source_record_count,
            target_record_count = excluded.target_record_count,
            total_amount = excluded.total_amount,
            distance_km = excluded.distance_km,
            related_record_ids = excluded.related_record_ids,
            updated_at = excluded.updated_at",
        params![
            pair.source(),
            pair.target(),
            pair.score,
            pair.method.as_str(),
            dims[0],
            dims[1],
            dims[2],
            dims[3],
            dims[4],
            dims[5],
            dims[6],
            reason_json,
            pair.reason.summary(),
            join_list(pair.reason.common_industries()),
            join_list(pair.reason.common_concepts()),
            weights_json,
            pair.joint_record_count as i64,
            pair.source_record_count as i64,
            pair.target_record_count as i64,
            pair.total_amount,
            pair.distance_km,
            join_list(&related_ids),
            pair.created_at.to_rfc3339(),
            pair.updated_at.to_rfc3339(),
        ],
    )
    .map_err(|e| to_storage_err(format!("upsert_pair {}: {e}", pair.key)))?;
    Ok(())
}

/// Delete every row. Returns the number deleted.
pub fn clear_pairs(conn: &Connection) -> AtlasResult<usize> {
    conn.execute("DELETE FROM correlation_pairs", [])
        .map_err(|e| to_storage_err(format!("clear_pairs: {e}")))
}

pub fn get_pair(conn: &Connection, key: &PairKey) -> AtlasResult<Option<CorrelationPair>> {
    conn.query_row(
        &format!(
            "SELECT {PAIR_COLUMNS} FROM correlation_pairs
             WHERE source_province = ?1 AND target_province = ?2"
        ),
        params![key.source(), key.target()],
        |row| Ok(row_to_pair(row)),
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))?
    .transpose()
}

/// Top `n` pairs naming `province` with a positive score. Ties are broken
/// by the other province's code.
pub fn top_for_province(
    conn: &Connection,
    province: &str,
    n: usize,
) -> AtlasResult<Vec<CorrelationPair>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {PAIR_COLUMNS} FROM correlation_pairs
             WHERE (source_province = ?1 OR target_province = ?1) AND score > 0
             ORDER BY score DESC,
                      CASE WHEN source_province = ?1 THEN target_province
                           ELSE source_province END ASC
             LIMIT ?2"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    collect_pairs(&mut stmt, params![province, n as i64])
}

pub fn top_overall(conn: &Connection, n: usize) -> AtlasResult<Vec<CorrelationPair>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {PAIR_COLUMNS} FROM correlation_pairs
             ORDER BY score DESC, source_province ASC, target_province ASC
             LIMIT ?1"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    collect_pairs(&mut stmt, params![n as i64])
}

/// Pairs whose score lies within the inclusive bounds. Missing bounds are
/// open.
pub fn by_score_range(
    conn: &Connection,
    min: Option<f64>,
    max: Option<f64>,
) -> AtlasResult<Vec<CorrelationPair>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {PAIR_COLUMNS} FROM correlation_pairs
             WHERE (?1 IS NULL OR score >= ?1) AND (?2 IS NULL OR score <= ?2)
             ORDER BY score DESC, source_province ASC, target_province ASC"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    collect_pairs(&mut stmt, params![min, max])
}

pub fn by_common_concept(conn: &Connection, needle: &str) -> AtlasResult<Vec<CorrelationPair>> {
    search_column(conn, "common_concepts", needle)
}

pub fn by_common_industry(conn: &Connection, needle: &str) -> AtlasResult<Vec<CorrelationPair>> {
    search_column(conn, "common_industries", needle)
}

pub fn count_pairs(conn: &Connection) -> AtlasResult<usize> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM correlation_pairs", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count as usize)
}

/// Substring match on one of the comma-joined search columns. A blank
/// needle matches nothing.
fn search_column(
    conn: &Connection,
    column: &'static str,
    needle: &str,
) -> AtlasResult<Vec<CorrelationPair>> {
    let needle = needle.trim();
    if needle.is_empty() {
        return Ok(Vec::new());
    }
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {PAIR_COLUMNS} FROM correlation_pairs
             WHERE instr({column}, ?1) > 0
             ORDER BY score DESC, source_province ASC, target_province ASC"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    collect_pairs(&mut stmt, params![needle])
}

fn collect_pairs(
    stmt: &mut rusqlite::Statement<'_>,
    params: &[&dyn rusqlite::types::ToSql],
) -> AtlasResult<Vec<CorrelationPair>> {
    let rows = stmt
        .query_map(params, |row| Ok(row_to_pair(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(results)
}

fn row_to_pair(row: &rusqlite::Row<'_>) -> AtlasResult<CorrelationPair> {
    let get_err = |e: rusqlite::Error| to_storage_err(e.to_string());
    let malformed = |reason: String| StorageError::MalformedRow {
        table: "correlation_pairs".to_string(),
        reason,
    };

    let source: String = row.get(0).map_err(get_err)?;
    let target: String = row.get(1).map_err(get_err)?;
    let method: String = row.get(3).map_err(get_err)?;

    let mut dimensions = DimensionScores::new();
    for (i, dimension) in DIMENSION_COLUMNS.iter().enumerate() {
        let value: Option<f64> = row.get(DIMENSION_OFFSET + i).map_err(get_err)?;
        if let Some(value) = value {
            dimensions.set(*dimension, value);
        }
    }

    let reason_json: String = row.get(11).map_err(get_err)?;
    let reason: CorrelationReason = serde_json::from_str(&reason_json)
        .map_err(|e| malformed(format!("parse reason: {e}")))?;
    let weights_json: String = row.get(12).map_err(get_err)?;
    let weights: BTreeMap<Dimension, f64> = serde_json::from_str(&weights_json)
        .map_err(|e| malformed(format!("parse weight_config: {e}")))?;

    let related_raw: String = row.get(18).map_err(get_err)?;
    let related_record_ids = split_list(&related_raw)
        .iter()
        .map(|id| {
            id.parse::<i64>()
                .map_err(|e| malformed(format!("parse related record id '{id}': {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let parse_dt = |s: String| -> AtlasResult<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| malformed(format!("parse datetime '{s}': {e}")).into())
    };

    Ok(CorrelationPair {
        key: PairKey::new(&source, &target)?,
        score: row.get(2).map_err(get_err)?,
        method: method.parse()?,
        dimensions,
        weights,
        reason,
        joint_record_count: row.get::<_, i64>(13).map_err(get_err)? as usize,
        source_record_count: row.get::<_, i64>(14).map_err(get_err)? as usize,
        target_record_count: row.get::<_, i64>(15).map_err(get_err)? as usize,
        total_amount: row.get(16).map_err(get_err)?,
        distance_km: row.get(17).map_err(get_err)?,
        related_record_ids,
        created_at: parse_dt(row.get(19).map_err(get_err)?)?,
        updated_at: parse_dt(row.get(20).map_err(get_err)?)?,
    })
}

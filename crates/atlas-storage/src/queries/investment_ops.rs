//! Investment ledger reads and the narrow writes the engine performs.

use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use atlas_core::errors::AtlasError;
use atlas_core::models::{join_list, split_list, InvestmentRecord};
use atlas_core::AtlasResult;

use crate::to_storage_err;

const RECORD_COLUMNS: &str = "id, title, company_name, province, industry, investment_type,
     concepts, amount, ten_day_change, investment_date, related_provinces, active";

/// Insert a record and return its rowid. The record's own `id` is ignored.
pub fn insert_record(conn: &Connection, record: &InvestmentRecord) -> AtlasResult<i64> {
    conn.execute(
        "INSERT INTO investment_records (
            title, company_name, province, industry, investment_type, concepts,
            amount, ten_day_change, investment_date, related_provinces, active
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            record.title,
            record.company_name,
            record.home_province(),
            record.industry,
            record.investment_type,
            join_list(&record.concepts),
            record.amount,
            record.ten_day_change,
            record.investment_date.map(|d| d.format("%Y-%m-%d").to_string()),
            record.related_provinces,
            record.active as i32,
        ],
    )
    .map_err(|e| to_storage_err(format!("insert_record: {e}")))?;
    Ok(conn.last_insert_rowid())
}

pub fn get_record(conn: &Connection, id: i64) -> AtlasResult<Option<InvestmentRecord>> {
    conn.query_row(
        &format!("SELECT {RECORD_COLUMNS} FROM investment_records WHERE id = ?1"),
        params![id],
        |row| Ok(row_to_record(row)),
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))?
    .transpose()
}

pub fn active_records(conn: &Connection) -> AtlasResult<Vec<InvestmentRecord>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM investment_records WHERE active = 1 ORDER BY id"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    collect_records(&mut stmt, params![])
}

/// Active records homed in `code` or naming it in their related list.
pub fn records_for_province(conn: &Connection, code: &str) -> AtlasResult<Vec<InvestmentRecord>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM investment_records
             WHERE active = 1
               AND (province = ?1 OR instr(IFNULL(related_provinces, ''), ?1) > 0)
             ORDER BY id"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let candidates = collect_records(&mut stmt, params![code])?;
    // instr() is a substring prefilter; exact list membership is decided here.
    Ok(candidates
        .into_iter()
        .filter(|r| r.is_linked_to(code))
        .collect())
}

/// Active records attributable to both provinces.
pub fn joint_records(conn: &Connection, a: &str, b: &str) -> AtlasResult<Vec<InvestmentRecord>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM investment_records
             WHERE active = 1
               AND related_provinces IS NOT NULL
               AND (instr(related_provinces, ?1) > 0 OR instr(related_provinces, ?2) > 0)
             ORDER BY id"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    let candidates = collect_records(&mut stmt, params![a, b])?;
    Ok(candidates.into_iter().filter(|r| r.is_joint(a, b)).collect())
}

/// Up to `k` active records homed in `code` with a known ten-day change,
/// highest first.
pub fn top_k_by_momentum(
    conn: &Connection,
    code: &str,
    k: usize,
) -> AtlasResult<Vec<InvestmentRecord>> {
    if k == 0 {
        return Ok(Vec::new());
    }
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM investment_records
             WHERE active = 1 AND province = ?1 AND ten_day_change IS NOT NULL
             ORDER BY ten_day_change DESC, id ASC
             LIMIT ?2"
        ))
        .map_err(|e| to_storage_err(e.to_string()))?;
    collect_records(&mut stmt, params![code, k as i64])
}

/// Overwrite the derived related-provinces column. `None` stores NULL.
pub fn update_related_provinces(
    conn: &Connection,
    id: i64,
    value: Option<&str>,
) -> AtlasResult<()> {
    let changed = conn
        .execute(
            "UPDATE investment_records
             SET related_provinces = ?2, updated_at = ?3
             WHERE id = ?1",
            params![id, value, Utc::now().to_rfc3339()],
        )
        .map_err(|e| to_storage_err(format!("update_related_provinces: {e}")))?;
    if changed == 0 {
        return Err(AtlasError::LedgerError {
            reason: format!("investment record {id} not found"),
        });
    }
    Ok(())
}

fn collect_records(
    stmt: &mut rusqlite::Statement<'_>,
    params: &[&dyn rusqlite::types::ToSql],
) -> AtlasResult<Vec<InvestmentRecord>> {
    let rows = stmt
        .query_map(params, |row| Ok(row_to_record(row)))
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row.map_err(|e| to_storage_err(e.to_string()))??);
    }
    Ok(results)
}

fn row_to_record(row: &rusqlite::Row<'_>) -> AtlasResult<InvestmentRecord> {
    let get_err = |e: rusqlite::Error| to_storage_err(e.to_string());
    let concepts: String = row.get(6).map_err(get_err)?;
    let date: Option<String> = row.get(9).map_err(get_err)?;
    let investment_date = date
        .as_deref()
        .filter(|d| !d.trim().is_empty())
        .map(|d| {
            NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d")
                .map_err(|e| to_storage_err(format!("parse investment_date '{d}': {e}")))
        })
        .transpose()?;

    Ok(InvestmentRecord {
        id: row.get(0).map_err(get_err)?,
        title: row.get(1).map_err(get_err)?,
        company_name: row.get(2).map_err(get_err)?,
        province: row.get(3).map_err(get_err)?,
        industry: row.get(4).map_err(get_err)?,
        investment_type: row.get(5).map_err(get_err)?,
        concepts: split_list(&concepts),
        amount: row.get(7).map_err(get_err)?,
        ten_day_change: row.get(8).map_err(get_err)?,
        investment_date,
        related_provinces: row.get(10).map_err(get_err)?,
        active: row.get::<_, i32>(11).map_err(get_err)? != 0,
    })
}

//! Province distance reference data. Rows are stored once per unordered
//! pair with `province_a < province_b`.

use rusqlite::{params, Connection, OptionalExtension};

use atlas_core::models::{GeoDistance, PairKey};
use atlas_core::AtlasResult;

use crate::to_storage_err;

pub fn upsert_distance(
    conn: &Connection,
    a: &str,
    b: &str,
    distance: GeoDistance,
) -> AtlasResult<()> {
    let key = PairKey::new(a, b)?;
    conn.execute(
        "INSERT INTO province_distances (province_a, province_b, distance_km, is_neighbor)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(province_a, province_b) DO UPDATE SET
             distance_km = excluded.distance_km,
             is_neighbor = excluded.is_neighbor",
        params![
            key.source(),
            key.target(),
            distance.km,
            distance.is_neighbor as i32
        ],
    )
    .map_err(|e| to_storage_err(format!("upsert_distance: {e}")))?;
    Ok(())
}

/// Distance between two provinces in either order. Identical or blank
/// codes have no distance.
pub fn get_distance(conn: &Connection, a: &str, b: &str) -> AtlasResult<Option<GeoDistance>> {
    let Ok(key) = PairKey::new(a, b) else {
        return Ok(None);
    };
    conn.query_row(
        "SELECT distance_km, is_neighbor FROM province_distances
         WHERE province_a = ?1 AND province_b = ?2",
        params![key.source(), key.target()],
        |row| {
            Ok(GeoDistance {
                km: row.get(0)?,
                is_neighbor: row.get::<_, i32>(1)? != 0,
            })
        },
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

/// Every known distance from `province`, nearest first, as
/// `(other province, distance)`.
pub fn distances_from(conn: &Connection, province: &str) -> AtlasResult<Vec<(String, GeoDistance)>> {
    let mut stmt = conn
        .prepare(
            "SELECT CASE WHEN province_a = ?1 THEN province_b ELSE province_a END,
                    distance_km, is_neighbor
             FROM province_distances
             WHERE province_a = ?1 OR province_b = ?1
             ORDER BY distance_km ASC, 1 ASC",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params![province], |row| {
            Ok((
                row.get::<_, String>(0)?,
                GeoDistance {
                    km: row.get(1)?,
                    is_neighbor: row.get::<_, i32>(2)? != 0,
                },
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Neighboring provinces of `province`, nearest first.
pub fn neighbors(conn: &Connection, province: &str) -> AtlasResult<Vec<String>> {
    Ok(distances_from(conn, province)?
        .into_iter()
        .filter(|(_, d)| d.is_neighbor)
        .map(|(code, _)| code)
        .collect())
}

pub fn count_distances(conn: &Connection) -> AtlasResult<usize> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM province_distances", [], |row| row.get(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(count as usize)
}

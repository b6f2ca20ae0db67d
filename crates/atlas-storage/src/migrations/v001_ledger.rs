//! V001: investment ledger and province distance reference data.

pub const MIGRATION_SQL: &str = r#"
-- Investment records. related_provinces is derived and rewritten by
-- propagation only.
CREATE TABLE IF NOT EXISTS investment_records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    company_name TEXT,
    province TEXT,
    industry TEXT,
    investment_type TEXT,
    concepts TEXT NOT NULL DEFAULT '',
    amount REAL NOT NULL DEFAULT 0,
    ten_day_change REAL,
    investment_date TEXT,
    related_provinces TEXT,
    active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE INDEX IF NOT EXISTS idx_investment_province
    ON investment_records(province) WHERE active = 1;
CREATE INDEX IF NOT EXISTS idx_investment_momentum
    ON investment_records(province, ten_day_change DESC)
    WHERE active = 1 AND ten_day_change IS NOT NULL;

-- Symmetric distances, stored once with province_a < province_b.
CREATE TABLE IF NOT EXISTS province_distances (
    province_a TEXT NOT NULL,
    province_b TEXT NOT NULL,
    distance_km INTEGER NOT NULL CHECK (distance_km >= 0),
    is_neighbor INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (province_a, province_b),
    CHECK (province_a < province_b)
);
"#;

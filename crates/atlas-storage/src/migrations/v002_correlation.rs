//! V002: correlation pairs with per-dimension breakdown.

pub const MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS correlation_pairs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    source_province TEXT NOT NULL,
    target_province TEXT NOT NULL,
    score REAL NOT NULL CHECK (score >= 0.0 AND score <= 1.0),
    method TEXT NOT NULL,
    joint_activity_score REAL,
    industry_frequency_score REAL,
    investment_type_score REAL,
    geography_score REAL,
    magnitude_score REAL,
    concept_score REAL,
    company_type_score REAL,
    -- Tagged CorrelationReason as JSON.
    reason TEXT NOT NULL,
    summary TEXT NOT NULL DEFAULT '',
    -- Comma-joined copies for substring search.
    common_industries TEXT NOT NULL DEFAULT '',
    common_concepts TEXT NOT NULL DEFAULT '',
    weight_config TEXT NOT NULL,
    joint_record_count INTEGER NOT NULL DEFAULT 0,
    source_record_count INTEGER NOT NULL DEFAULT 0,
    target_record_count INTEGER NOT NULL DEFAULT 0,
    total_amount REAL NOT NULL DEFAULT 0,
    distance_km INTEGER,
    related_record_ids TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE (source_province, target_province),
    CHECK (source_province < target_province)
);

CREATE INDEX IF NOT EXISTS idx_correlation_source
    ON correlation_pairs(source_province, score DESC);
CREATE INDEX IF NOT EXISTS idx_correlation_target
    ON correlation_pairs(target_province, score DESC);
CREATE INDEX IF NOT EXISTS idx_correlation_score
    ON correlation_pairs(score DESC);
"#;

// Single source of truth for all default values.

// --- Storage ---
pub const DEFAULT_DB_FILENAME: &str = "atlas.db";
pub const DEFAULT_WAL_MODE: bool = true;
pub const DEFAULT_WRITER_CACHE_KIB: u32 = 32_000;
pub const DEFAULT_READER_CACHE_KIB: u32 = 16_000;
pub const DEFAULT_BUSY_TIMEOUT_MS: u32 = 5_000;
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

// --- Scoring ---
pub const DEFAULT_GEOGRAPHY_DECAY_KM: f64 = 2_000.0;
pub const DEFAULT_MAGNITUDE_CAP: f64 = 1_000_000.0; // 万元
pub const DEFAULT_MOMENTUM_TOP_K: usize = 5;
pub const DEFAULT_LEADERS_PER_PROVINCE: usize = 3;

// --- Thresholds ---
// All three sit at the floor, so any positive score is kept and momentum
// is never stricter than the other strategies.
pub const DEFAULT_COMPREHENSIVE_THRESHOLD: f64 = 0.0;
pub const DEFAULT_MOMENTUM_THRESHOLD: f64 = 0.0;
pub const DEFAULT_GEOGRAPHY_ONLY_THRESHOLD: f64 = 0.0;

// --- Propagation ---
pub const DEFAULT_PROPAGATION_TOP_N: usize = 5;

// --- Cache ---
pub const DEFAULT_CACHE_TTL_SECS: u64 = 600;
pub const DEFAULT_CACHE_MAX_ENTRIES: u64 = 10_000;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;

// --- Profiles ---
pub const COMPREHENSIVE_PROFILE: &str = "comprehensive";
pub const MOMENTUM_PROFILE: &str = "momentum";

pub const DEFAULT_COMPREHENSIVE_WEIGHTS: [(&str, f64); 5] = [
    ("joint_activity", 0.4),
    ("industry_frequency", 0.2),
    ("investment_type_overlap", 0.15),
    ("geography", 0.1),
    ("magnitude", 0.15),
];

pub const DEFAULT_MOMENTUM_WEIGHTS: [(&str, f64); 3] = [
    ("concept_overlap", 0.5),
    ("industry_frequency", 0.3),
    ("company_type_overlap", 0.2),
];

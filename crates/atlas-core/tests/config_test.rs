use atlas_core::config::*;
use atlas_core::errors::ConfigError;

#[test]
fn config_loads_from_empty_toml_with_all_defaults() {
    let config = AtlasConfig::from_toml("").unwrap();

    // Storage defaults
    assert!(config.storage.writer.wal_mode);
    assert_eq!(config.storage.writer.busy_timeout_ms, 5_000);
    assert_eq!(config.storage.reader.busy_timeout_ms, 5_000);
    assert!(config.storage.reader.cache_kib < config.storage.writer.cache_kib);
    assert_eq!(config.storage.read_pool_size, 4);

    // Scoring defaults
    assert_eq!(config.scoring.geography_decay_km, 2_000.0);
    assert_eq!(config.scoring.magnitude_cap, 1_000_000.0);
    assert_eq!(config.scoring.momentum_top_k, 5);
    assert_eq!(config.scoring.leaders_per_province, 3);

    // Thresholds
    assert_eq!(config.thresholds.comprehensive, 0.0);
    assert_eq!(config.thresholds.momentum, 0.0);
    assert_eq!(config.thresholds.geography_only, 0.0);
    assert!(config.thresholds.momentum <= config.thresholds.comprehensive);
    assert!(config.thresholds.momentum <= config.thresholds.geography_only);

    assert_eq!(config.propagation.default_top_n, 5);
    assert_eq!(config.cache.ttl_secs, 600);
    assert_eq!(config.cache.max_entries, 10_000);

    // Both strategy profiles are present with their default weights.
    let comprehensive = &config.profiles["comprehensive"];
    assert_eq!(comprehensive["joint_activity"], 0.4);
    assert_eq!(comprehensive["geography"], 0.1);
    assert_eq!(comprehensive.len(), 5);
    let momentum = &config.profiles["momentum"];
    assert_eq!(momentum["concept_overlap"], 0.5);
    assert_eq!(momentum.len(), 3);
}

#[test]
fn config_loads_partial_toml_with_overrides() {
    let toml = r#"
[scoring]
momentum_top_k = 10

[thresholds]
momentum = 0.15

[profiles.momentum]
concept_overlap = 0.6
industry_frequency = 0.4
"#;
    let config = AtlasConfig::from_toml(toml).unwrap();
    assert_eq!(config.scoring.momentum_top_k, 10);
    // Non-overridden fields keep defaults
    assert_eq!(config.scoring.geography_decay_km, 2_000.0);
    assert_eq!(config.thresholds.momentum, 0.15);
    assert_eq!(config.thresholds.comprehensive, 0.0);

    assert_eq!(config.profiles["momentum"].len(), 2);
    assert_eq!(config.profiles["momentum"]["concept_overlap"], 0.6);
    // A profile absent from the file keeps its defaults.
    assert_eq!(config.profiles["comprehensive"].len(), 5);
}

#[test]
fn writer_and_reader_pragmas_are_configured_separately() {
    let toml = r#"
[storage]
db_path = "/var/lib/atlas/atlas.db"

[storage.writer]
wal_mode = false

[storage.reader]
cache_kib = 4000
"#;
    let config = AtlasConfig::from_toml(toml).unwrap();
    assert_eq!(config.storage.db_path, "/var/lib/atlas/atlas.db");
    assert!(!config.storage.writer.wal_mode);
    assert_eq!(config.storage.writer.cache_kib, 32_000);
    assert_eq!(config.storage.reader.cache_kib, 4_000);
    assert_eq!(config.storage.reader.busy_timeout_ms, 5_000);
}

#[test]
fn negative_weight_is_rejected() {
    let toml = r#"
[profiles.comprehensive]
joint_activity = -0.4
"#;
    let err = AtlasConfig::from_toml(toml).unwrap_err();
    match err {
        ConfigError::ValidationFailed { field, .. } => {
            assert_eq!(field, "profiles.comprehensive.joint_activity");
        }
        other => panic!("expected ValidationFailed, got {other:?}"),
    }
}

#[test]
fn unknown_dimension_is_rejected() {
    let toml = r#"
[profiles.momentum]
sentiment = 0.5
"#;
    assert!(matches!(
        AtlasConfig::from_toml(toml),
        Err(ConfigError::ValidationFailed { .. })
    ));
}

#[test]
fn out_of_range_threshold_is_rejected() {
    let toml = r#"
[thresholds]
geography_only = 1.5
"#;
    assert!(matches!(
        AtlasConfig::from_toml(toml),
        Err(ConfigError::ValidationFailed { .. })
    ));
}

#[test]
fn zero_decay_scale_is_rejected() {
    let toml = r#"
[scoring]
geography_decay_km = 0.0
"#;
    assert!(AtlasConfig::from_toml(toml).is_err());
}

#[test]
fn invalid_toml_is_a_parse_error() {
    assert!(matches!(
        AtlasConfig::from_toml("[scoring\nfoo = "),
        Err(ConfigError::ParseError { .. })
    ));
}

#[test]
fn config_loads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("atlas.toml");
    std::fs::write(&path, "[propagation]\ndefault_top_n = 3\n").unwrap();
    let config = AtlasConfig::from_file(&path).unwrap();
    assert_eq!(config.propagation.default_top_n, 3);
}

#[test]
fn missing_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    assert!(matches!(
        AtlasConfig::from_file(&path),
        Err(ConfigError::FileNotFound { .. })
    ));
}

#[test]
fn default_config_validates() {
    AtlasConfig::default().validate().unwrap();
}

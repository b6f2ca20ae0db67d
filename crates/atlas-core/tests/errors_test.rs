use atlas_core::errors::*;

#[test]
fn nested_errors_convert_into_atlas_error() {
    let err: AtlasError = JobError::AlreadyRunning.into();
    assert!(matches!(err, AtlasError::JobError(JobError::AlreadyRunning)));
    assert_eq!(
        err.to_string(),
        "job error: a recalculation is already in progress"
    );

    let err: AtlasError = StorageError::SqliteError {
        message: "disk I/O error".to_string(),
    }
    .into();
    assert_eq!(err.to_string(), "storage error: SQLite error: disk I/O error");
}

#[test]
fn config_error_display_names_the_field() {
    let err = ConfigError::ValidationFailed {
        field: "thresholds.momentum".to_string(),
        message: "must be between 0.0 and 1.0".to_string(),
    };
    assert!(err.to_string().contains("thresholds.momentum"));
}

#[test]
fn serde_json_errors_convert() {
    let parse: Result<serde_json::Value, _> = serde_json::from_str("{");
    let err: AtlasError = parse.unwrap_err().into();
    assert!(matches!(err, AtlasError::SerializationError(_)));
}

#[test]
fn invalid_pair_display() {
    let err = AtlasError::InvalidPair {
        a: "粤".to_string(),
        b: "粤".to_string(),
    };
    assert_eq!(err.to_string(), "invalid province pair: 粤 / 粤");
}

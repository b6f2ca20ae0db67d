//! Shared test support for the Atlas workspace: golden JSON datasets,
//! record and pair builders, and in-memory doubles of the storage traits.

pub mod builders;
pub mod memory;

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use atlas_core::models::InvestmentRecord;

pub use builders::{momentum_pair, RecordBuilder};
pub use memory::{MemoryGeography, MemoryLedger, MemoryStore};

/// Root directory of the golden datasets.
pub fn fixtures_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("golden")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixture_path(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

/// All JSON files in a fixture subdirectory, sorted by name.
pub fn list_fixtures(subdir: &str) -> Vec<PathBuf> {
    let dir = fixtures_root().join(subdir);
    if !dir.exists() {
        return Vec::new();
    }
    let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)
        .unwrap_or_else(|e| panic!("Failed to read directory {}: {}", dir.display(), e))
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            path.extension().is_some_and(|ext| ext == "json").then_some(path)
        })
        .collect();
    files.sort();
    files
}

/// One row of `geography/distances.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct DistanceFixture {
    pub a: String,
    pub b: String,
    pub km: u32,
    pub is_neighbor: bool,
}

/// Investment records from `ledger/{name}.json`.
pub fn load_ledger(name: &str) -> Vec<InvestmentRecord> {
    load_fixture(&format!("ledger/{name}.json"))
}

pub fn load_distances() -> Vec<DistanceFixture> {
    load_fixture("geography/distances.json")
}

/// In-memory geography table over `geography/distances.json`.
pub fn memory_geography() -> MemoryGeography {
    let geography = MemoryGeography::new();
    for d in load_distances() {
        geography.insert(&d.a, &d.b, d.km, d.is_neighbor);
    }
    geography
}

//! Mutex-backed in-memory implementations of the engine's storage traits.
//!
//! Orderings and filters match the SQLite engine so engine tests can run
//! against either. Each double can be told to fail specific operations.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use atlas_core::errors::StorageError;
use atlas_core::models::{distinct_provinces, CorrelationPair, GeoDistance, InvestmentRecord, PairKey};
use atlas_core::traits::{ICorrelationStore, IGeographyTable, IInvestmentLedger};
use atlas_core::{AtlasError, AtlasResult};

fn injected(operation: &str) -> AtlasError {
    StorageError::SqliteError {
        message: format!("injected failure: {operation}"),
    }
    .into()
}

// --- Ledger ---

#[derive(Default)]
pub struct MemoryLedger {
    records: Mutex<BTreeMap<i64, InvestmentRecord>>,
    fail_reads: AtomicBool,
    failing_updates: Mutex<BTreeSet<i64>>,
    updates: AtomicUsize,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ledger holding `records` under their own ids.
    pub fn with_records(records: Vec<InvestmentRecord>) -> Self {
        let ledger = Self::new();
        {
            let mut map = ledger.lock();
            for record in records {
                map.insert(record.id, record);
            }
        }
        ledger
    }

    /// Make every read fail until reset.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make `update_related_provinces` fail for `id`.
    pub fn fail_updates_for(&self, id: i64) {
        self.failing_updates
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id);
    }

    /// Successful `update_related_provinces` calls so far.
    pub fn update_count(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Vec<InvestmentRecord> {
        self.lock().values().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<i64, InvestmentRecord>> {
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn read(&self) -> AtlasResult<Vec<InvestmentRecord>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(injected("ledger read"));
        }
        Ok(self.lock().values().filter(|r| r.active).cloned().collect())
    }
}

impl IInvestmentLedger for MemoryLedger {
    fn all_distinct_provinces(&self) -> AtlasResult<Vec<String>> {
        Ok(distinct_provinces(&self.read()?).into_iter().collect())
    }

    fn records_for_province(&self, code: &str) -> AtlasResult<Vec<InvestmentRecord>> {
        Ok(self.read()?.into_iter().filter(|r| r.is_linked_to(code)).collect())
    }

    fn joint_records(&self, a: &str, b: &str) -> AtlasResult<Vec<InvestmentRecord>> {
        Ok(self.read()?.into_iter().filter(|r| r.is_joint(a, b)).collect())
    }

    fn top_k_by_momentum(&self, code: &str, k: usize) -> AtlasResult<Vec<InvestmentRecord>> {
        let mut leaders: Vec<InvestmentRecord> = self
            .read()?
            .into_iter()
            .filter(|r| r.province.as_deref() == Some(code) && r.ten_day_change.is_some())
            .collect();
        leaders.sort_by(|x, y| {
            let (cx, cy) = (x.ten_day_change.unwrap_or(0.0), y.ten_day_change.unwrap_or(0.0));
            cy.total_cmp(&cx).then(x.id.cmp(&y.id))
        });
        leaders.truncate(k);
        Ok(leaders)
    }

    fn active_records(&self) -> AtlasResult<Vec<InvestmentRecord>> {
        self.read()
    }

    fn get_record(&self, id: i64) -> AtlasResult<Option<InvestmentRecord>> {
        Ok(self.lock().get(&id).cloned())
    }

    fn update_related_provinces(&self, id: i64, value: Option<&str>) -> AtlasResult<()> {
        if self
            .failing_updates
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&id)
        {
            return Err(injected("update_related_provinces"));
        }
        let mut records = self.lock();
        let record = records.get_mut(&id).ok_or_else(|| AtlasError::LedgerError {
            reason: format!("investment record {id} not found"),
        })?;
        record.related_provinces = value.map(str::to_string);
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn insert_record(&self, record: &InvestmentRecord) -> AtlasResult<i64> {
        let mut records = self.lock();
        let id = records.keys().next_back().copied().unwrap_or(0) + 1;
        let mut stored = record.clone();
        stored.id = id;
        records.insert(id, stored);
        Ok(id)
    }
}

// --- Geography ---

#[derive(Default)]
pub struct MemoryGeography {
    distances: Mutex<BTreeMap<PairKey, GeoDistance>>,
}

impl MemoryGeography {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_distances(entries: &[(&str, &str, u32, bool)]) -> Self {
        let geography = Self::new();
        for (a, b, km, is_neighbor) in entries {
            geography.insert(a, b, *km, *is_neighbor);
        }
        geography
    }

    /// Ignores identical or blank codes.
    pub fn insert(&self, a: &str, b: &str, km: u32, is_neighbor: bool) {
        if let Ok(key) = PairKey::new(a, b) {
            self.distances
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .insert(key, GeoDistance { km, is_neighbor });
        }
    }
}

impl IGeographyTable for MemoryGeography {
    fn distance(&self, a: &str, b: &str) -> AtlasResult<Option<GeoDistance>> {
        let Ok(key) = PairKey::new(a, b) else {
            return Ok(None);
        };
        Ok(self
            .distances
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(&key)
            .copied())
    }
}

// --- Correlation store ---

#[derive(Default)]
pub struct MemoryStore {
    pairs: Mutex<BTreeMap<PairKey, CorrelationPair>>,
    failing_upserts: Mutex<BTreeSet<PairKey>>,
    fail_clear: AtomicBool,
    fail_reads: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pairs(pairs: Vec<CorrelationPair>) -> Self {
        let store = Self::new();
        {
            let mut map = store.lock();
            for pair in pairs {
                map.insert(pair.key.clone(), pair);
            }
        }
        store
    }

    pub fn fail_upsert_for(&self, key: PairKey) {
        self.failing_upserts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key);
    }

    pub fn set_fail_clear(&self, fail: bool) {
        self.fail_clear.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> Vec<CorrelationPair> {
        self.lock().values().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<PairKey, CorrelationPair>> {
        self.pairs.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn read(&self) -> AtlasResult<Vec<CorrelationPair>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(injected("store read"));
        }
        let mut pairs: Vec<CorrelationPair> = self.lock().values().cloned().collect();
        pairs.sort_by(|x, y| y.score.total_cmp(&x.score).then_with(|| x.key.cmp(&y.key)));
        Ok(pairs)
    }
}

impl ICorrelationStore for MemoryStore {
    fn upsert(&self, pair: &CorrelationPair) -> AtlasResult<()> {
        if self
            .failing_upserts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&pair.key)
        {
            return Err(injected("upsert"));
        }
        let mut pairs = self.lock();
        let mut stored = pair.clone();
        if let Some(existing) = pairs.get(&pair.key) {
            stored.created_at = existing.created_at;
        }
        pairs.insert(pair.key.clone(), stored);
        Ok(())
    }

    fn clear(&self) -> AtlasResult<usize> {
        if self.fail_clear.load(Ordering::SeqCst) {
            return Err(injected("clear"));
        }
        let mut pairs = self.lock();
        let removed = pairs.len();
        pairs.clear();
        Ok(removed)
    }

    fn get_pair(&self, a: &str, b: &str) -> AtlasResult<Option<CorrelationPair>> {
        let key = PairKey::new(a, b)?;
        Ok(self.lock().get(&key).cloned())
    }

    fn top_n(&self, province: &str, n: usize) -> AtlasResult<Vec<CorrelationPair>> {
        let mut pairs: Vec<CorrelationPair> = self
            .read()?
            .into_iter()
            .filter(|p| p.key.contains(province) && p.score > 0.0)
            .collect();
        pairs.sort_by(|x, y| {
            y.score
                .total_cmp(&x.score)
                .then_with(|| x.key.other(province).cmp(&y.key.other(province)))
        });
        pairs.truncate(n);
        Ok(pairs)
    }

    fn top_overall(&self, n: usize) -> AtlasResult<Vec<CorrelationPair>> {
        let mut pairs = self.read()?;
        pairs.truncate(n);
        Ok(pairs)
    }

    fn all(&self, min: Option<f64>, max: Option<f64>) -> AtlasResult<Vec<CorrelationPair>> {
        Ok(self
            .read()?
            .into_iter()
            .filter(|p| min.map_or(true, |m| p.score >= m) && max.map_or(true, |m| p.score <= m))
            .collect())
    }

    fn by_common_concept(&self, needle: &str) -> AtlasResult<Vec<CorrelationPair>> {
        if needle.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .read()?
            .into_iter()
            .filter(|p| p.reason.common_concepts().join(",").contains(needle))
            .collect())
    }

    fn by_common_industry(&self, needle: &str) -> AtlasResult<Vec<CorrelationPair>> {
        if needle.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .read()?
            .into_iter()
            .filter(|p| p.reason.common_industries().join(",").contains(needle))
            .collect())
    }

    fn count(&self) -> AtlasResult<usize> {
        Ok(self.lock().len())
    }
}

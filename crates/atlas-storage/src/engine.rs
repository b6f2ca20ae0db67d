//! StorageEngine: owns the ConnectionPool and implements the ledger,
//! geography and correlation-store traits.

use std::path::Path;

use atlas_core::config::StorageConfig;
use atlas_core::models::{CorrelationPair, GeoDistance, InvestmentRecord, PairKey};
use atlas_core::traits::{ICorrelationStore, IGeographyTable, IInvestmentLedger};
use atlas_core::{models, AtlasResult};

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries::{correlation_ops, distance_ops, investment_ops};

pub struct StorageEngine {
    pool: ConnectionPool,
    /// File-backed mode reads through the read pool. In-memory mode routes
    /// reads through the writer because pooled in-memory connections are
    /// separate databases.
    use_read_pool: bool,
}

impl StorageEngine {
    /// Open a storage engine backed by a file on disk.
    pub fn open(path: &Path, config: &StorageConfig) -> AtlasResult<Self> {
        let pool = ConnectionPool::open(path, config)?;
        let engine = Self {
            pool,
            use_read_pool: true,
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// Open an in-memory storage engine.
    pub fn open_in_memory() -> AtlasResult<Self> {
        let pool = ConnectionPool::open_in_memory(&StorageConfig::default())?;
        let engine = Self {
            pool,
            use_read_pool: false,
        };
        engine.initialize()?;
        Ok(engine)
    }

    fn initialize(&self) -> AtlasResult<()> {
        self.pool
            .writer
            .with_conn(migrations::run_migrations)
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    fn with_reader<F, T>(&self, f: F) -> AtlasResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> AtlasResult<T>,
    {
        if self.use_read_pool {
            self.pool.readers.with_conn(f)
        } else {
            self.pool.writer.with_conn(f)
        }
    }

    // --- Geography reference data ---

    pub fn upsert_distance(&self, a: &str, b: &str, distance: GeoDistance) -> AtlasResult<()> {
        self.pool
            .writer
            .with_conn(|conn| distance_ops::upsert_distance(conn, a, b, distance))
    }

    pub fn distances_from(&self, province: &str) -> AtlasResult<Vec<(String, GeoDistance)>> {
        self.with_reader(|conn| distance_ops::distances_from(conn, province))
    }

    pub fn neighbors(&self, province: &str) -> AtlasResult<Vec<String>> {
        self.with_reader(|conn| distance_ops::neighbors(conn, province))
    }

    pub fn distance_count(&self) -> AtlasResult<usize> {
        self.with_reader(distance_ops::count_distances)
    }
}

impl IInvestmentLedger for StorageEngine {
    fn all_distinct_provinces(&self) -> AtlasResult<Vec<String>> {
        let records = self.active_records()?;
        Ok(models::distinct_provinces(&records).into_iter().collect())
    }

    fn records_for_province(&self, code: &str) -> AtlasResult<Vec<InvestmentRecord>> {
        self.with_reader(|conn| investment_ops::records_for_province(conn, code))
    }

    fn joint_records(&self, a: &str, b: &str) -> AtlasResult<Vec<InvestmentRecord>> {
        self.with_reader(|conn| investment_ops::joint_records(conn, a, b))
    }

    fn top_k_by_momentum(&self, code: &str, k: usize) -> AtlasResult<Vec<InvestmentRecord>> {
        self.with_reader(|conn| investment_ops::top_k_by_momentum(conn, code, k))
    }

    fn active_records(&self) -> AtlasResult<Vec<InvestmentRecord>> {
        self.with_reader(investment_ops::active_records)
    }

    fn get_record(&self, id: i64) -> AtlasResult<Option<InvestmentRecord>> {
        self.with_reader(|conn| investment_ops::get_record(conn, id))
    }

    fn update_related_provinces(&self, id: i64, value: Option<&str>) -> AtlasResult<()> {
        self.pool
            .writer
            .with_conn(|conn| investment_ops::update_related_provinces(conn, id, value))
    }

    fn insert_record(&self, record: &InvestmentRecord) -> AtlasResult<i64> {
        self.pool
            .writer
            .with_conn(|conn| investment_ops::insert_record(conn, record))
    }
}

impl IGeographyTable for StorageEngine {
    fn distance(&self, a: &str, b: &str) -> AtlasResult<Option<GeoDistance>> {
        self.with_reader(|conn| distance_ops::get_distance(conn, a, b))
    }
}

impl ICorrelationStore for StorageEngine {
    fn upsert(&self, pair: &CorrelationPair) -> AtlasResult<()> {
        self.pool
            .writer
            .with_conn(|conn| correlation_ops::upsert_pair(conn, pair))
    }

    fn clear(&self) -> AtlasResult<usize> {
        self.pool.writer.with_conn(correlation_ops::clear_pairs)
    }

    fn get_pair(&self, a: &str, b: &str) -> AtlasResult<Option<CorrelationPair>> {
        let key = PairKey::new(a, b)?;
        self.with_reader(|conn| correlation_ops::get_pair(conn, &key))
    }

    fn top_n(&self, province: &str, n: usize) -> AtlasResult<Vec<CorrelationPair>> {
        self.with_reader(|conn| correlation_ops::top_for_province(conn, province, n))
    }

    fn top_overall(&self, n: usize) -> AtlasResult<Vec<CorrelationPair>> {
        self.with_reader(|conn| correlation_ops::top_overall(conn, n))
    }

    fn all(&self, min: Option<f64>, max: Option<f64>) -> AtlasResult<Vec<CorrelationPair>> {
        self.with_reader(|conn| correlation_ops::by_score_range(conn, min, max))
    }

    fn by_common_concept(&self, needle: &str) -> AtlasResult<Vec<CorrelationPair>> {
        self.with_reader(|conn| correlation_ops::by_common_concept(conn, needle))
    }

    fn by_common_industry(&self, needle: &str) -> AtlasResult<Vec<CorrelationPair>> {
        self.with_reader(|conn| correlation_ops::by_common_industry(conn, needle))
    }

    fn count(&self) -> AtlasResult<usize> {
        self.with_reader(correlation_ops::count_pairs)
    }
}

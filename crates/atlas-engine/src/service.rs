//! CorrelationService: the facade wiring ledger, geography, store, weight
//! profiles, the query cache and the recalculation job.
//!
//! Province arguments accept any spelling the [`ProvinceTable`] knows and
//! are normalized to codes before they reach the store or the cache.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{Arc, RwLock};

use serde::Serialize;
use tokio::task::JoinHandle;

use atlas_core::constants::{DEFAULT_DETAIL_LEADERS, MAX_TOP_N};
use atlas_core::errors::JobError;
use atlas_core::models::{
    join_list, split_list, CalculationMethod, CorrelationPair, CorrelationReason,
    InvestmentRecord, PairKey, PropagationReport, RecalculationReport,
};
use atlas_core::traits::{ICorrelationStore, IGeographyTable, IInvestmentLedger};
use atlas_core::{AtlasConfig, AtlasError, AtlasResult, ProvinceTable};
use atlas_observability::query_span;
use atlas_observability::tracing_setup::events;
use atlas_scoring::{extract, ProfileRegistry};
use atlas_storage::StorageEngine;

use crate::cache::QueryCache;
use crate::calculator::{leader_names, PairCalculator};
use crate::job::RecalculationJob;
use crate::propagation::Propagator;
use crate::reason::{self, SharedTags};
use crate::{snapshot, SharedProfiles};

/// One related province with its leaders and a readable explanation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelatedProvince {
    pub code: String,
    pub full_name: String,
    pub score: f64,
    pub method: CalculationMethod,
    /// The related province's top records by ten-day change.
    pub leaders: Vec<InvestmentRecord>,
    pub summary: String,
}

pub struct CorrelationService {
    ledger: Arc<dyn IInvestmentLedger>,
    store: Arc<dyn ICorrelationStore>,
    profiles: SharedProfiles,
    cache: QueryCache,
    job: RecalculationJob,
    provinces: ProvinceTable,
    default_top_n: usize,
}

impl CorrelationService {
    pub fn new(
        ledger: Arc<dyn IInvestmentLedger>,
        geography: Arc<dyn IGeographyTable>,
        store: Arc<dyn ICorrelationStore>,
        config: &AtlasConfig,
    ) -> AtlasResult<Self> {
        config.validate()?;
        let profiles: SharedProfiles =
            Arc::new(RwLock::new(Arc::new(ProfileRegistry::from_config(config)?)));
        let calculator = PairCalculator::new(
            Arc::clone(&ledger),
            geography,
            config.scoring.clone(),
        );
        let propagator = Propagator::new(
            Arc::clone(&ledger),
            Arc::clone(&store),
            config.propagation.default_top_n,
        );
        let job = RecalculationJob::new(
            Arc::clone(&ledger),
            Arc::clone(&store),
            calculator,
            propagator,
            Arc::clone(&profiles),
            config.thresholds.clone(),
        );
        Ok(Self {
            ledger,
            store,
            profiles,
            cache: QueryCache::new(&config.cache),
            job,
            provinces: ProvinceTable::standard(),
            default_top_n: config.propagation.default_top_n,
        })
    }

    /// Service over a SQLite database at `config.storage.db_path`, which
    /// backs the ledger, the geography table and the store.
    pub fn open(config: &AtlasConfig) -> AtlasResult<Self> {
        let engine = Arc::new(StorageEngine::open(
            Path::new(&config.storage.db_path),
            &config.storage,
        )?);
        Self::with_engine(engine, config)
    }

    pub fn open_in_memory(config: &AtlasConfig) -> AtlasResult<Self> {
        Self::with_engine(Arc::new(StorageEngine::open_in_memory()?), config)
    }

    fn with_engine(engine: Arc<StorageEngine>, config: &AtlasConfig) -> AtlasResult<Self> {
        let ledger: Arc<dyn IInvestmentLedger> = engine.clone();
        let geography: Arc<dyn IGeographyTable> = engine.clone();
        let store: Arc<dyn ICorrelationStore> = engine;
        Self::new(ledger, geography, store, config)
    }

    // --- Queries ---

    /// Top related pairs for a province. `limit` 0 selects the default;
    /// larger values are capped at `MAX_TOP_N`.
    pub fn top_related(&self, province: &str, limit: usize) -> AtlasResult<Vec<CorrelationPair>> {
        let span = query_span!("top_related");
        let _enter = span.enter();

        let code = self.provinces.normalize(province);
        let limit = self.effective_limit(limit);
        let pairs = self
            .cache
            .get_or_load(QueryCache::top_related_key(&code, limit), || {
                self.store.top_n(&code, limit)
            })?;
        Ok(pairs.as_ref().clone())
    }

    /// The pair row for two provinces in either order.
    pub fn pair(&self, a: &str, b: &str) -> AtlasResult<Option<CorrelationPair>> {
        let span = query_span!("pair");
        let _enter = span.enter();

        let key = PairKey::new(&self.provinces.normalize(a), &self.provinces.normalize(b))?;
        let found = self.cache.get_or_load(QueryCache::pair_key(&key), || {
            Ok(self
                .store
                .get_pair(key.source(), key.target())?
                .into_iter()
                .collect())
        })?;
        Ok(found.first().cloned())
    }

    /// Every pair with a score inside the inclusive bounds.
    pub fn all_pairs(&self, min: Option<f64>, max: Option<f64>) -> AtlasResult<Vec<CorrelationPair>> {
        let span = query_span!("all_pairs");
        let _enter = span.enter();

        let pairs = self
            .cache
            .get_or_load(QueryCache::range_key(min, max), || self.store.all(min, max))?;
        Ok(pairs.as_ref().clone())
    }

    pub fn top_pairs(&self, limit: usize) -> AtlasResult<Vec<CorrelationPair>> {
        let span = query_span!("top_pairs");
        let _enter = span.enter();

        let limit = self.effective_limit(limit);
        let pairs = self
            .cache
            .get_or_load(QueryCache::top_overall_key(limit), || self.store.top_overall(limit))?;
        Ok(pairs.as_ref().clone())
    }

    /// Pairs whose shared concepts contain `needle`.
    pub fn by_concept(&self, needle: &str) -> AtlasResult<Vec<CorrelationPair>> {
        let span = query_span!("by_concept");
        let _enter = span.enter();

        let needle = needle.trim();
        let pairs = self
            .cache
            .get_or_load(QueryCache::concept_key(needle), || self.store.by_common_concept(needle))?;
        Ok(pairs.as_ref().clone())
    }

    /// Pairs whose shared industries contain `needle`.
    pub fn by_industry(&self, needle: &str) -> AtlasResult<Vec<CorrelationPair>> {
        let span = query_span!("by_industry");
        let _enter = span.enter();

        let needle = needle.trim();
        let pairs = self
            .cache
            .get_or_load(QueryCache::industry_key(needle), || self.store.by_common_industry(needle))?;
        Ok(pairs.as_ref().clone())
    }

    /// Related provinces with leaders and a summary comparing the two
    /// sides' leaders.
    pub fn related_details(&self, province: &str, limit: usize) -> AtlasResult<Vec<RelatedProvince>> {
        let code = self.provinces.normalize(province);
        let pairs = self.top_related(&code, limit)?;
        if pairs.is_empty() {
            return Ok(Vec::new());
        }
        let home_leaders = self.ledger.top_k_by_momentum(&code, DEFAULT_DETAIL_LEADERS)?;
        let home_names = leader_names(&home_leaders, DEFAULT_DETAIL_LEADERS);

        let mut details = Vec::with_capacity(pairs.len());
        for pair in pairs {
            let Some(other) = pair.key.other(&code).map(str::to_string) else {
                continue;
            };
            let leaders = self.ledger.top_k_by_momentum(&other, DEFAULT_DETAIL_LEADERS)?;
            let other_names = leader_names(&leaders, DEFAULT_DETAIL_LEADERS);

            let mut concepts = pair.reason.common_concepts().to_vec();
            if concepts.is_empty() {
                concepts = extract::common_elements(
                    &extract::concept_set(&home_leaders),
                    &extract::concept_set(&leaders),
                );
            }
            let families: &[String] = match &pair.reason {
                CorrelationReason::SharedMomentum {
                    concept_families, ..
                } => concept_families.as_slice(),
                _ => &[],
            };
            let summary = reason::describe(
                &self.provinces,
                (code.as_str(), home_names.as_slice()),
                (other.as_str(), other_names.as_slice()),
                SharedTags {
                    concepts: &concepts,
                    industries: pair.reason.common_industries(),
                    families,
                },
            );

            details.push(RelatedProvince {
                full_name: self.provinces.full_name(&other).to_string(),
                code: other,
                score: pair.score,
                method: pair.method,
                leaders,
                summary,
            });
        }
        Ok(details)
    }

    // --- Commands ---

    /// Full recalculation plus propagation. The cache is cleared once the
    /// run returns, whether or not it succeeded.
    pub fn trigger_recalculate(&self) -> AtlasResult<RecalculationReport> {
        let result = self.job.run();
        if !is_already_running(&result) {
            self.cache.invalidate_all();
            events::cache_invalidated("all");
        }
        result
    }

    /// Propagation only. `None` or 0 uses the configured default top-N.
    pub fn trigger_propagate(&self, top_n: Option<usize>) -> AtlasResult<PropagationReport> {
        let result = self.job.propagate(top_n);
        if !is_already_running(&result) {
            self.cache.invalidate_all();
            events::cache_invalidated("all");
        }
        result
    }

    /// Run [`trigger_recalculate`](Self::trigger_recalculate) on tokio's
    /// blocking pool. Must be called from within a tokio runtime.
    pub fn spawn_recalculate(self: &Arc<Self>) -> JoinHandle<AtlasResult<RecalculationReport>> {
        let service = Arc::clone(self);
        tokio::task::spawn_blocking(move || service.trigger_recalculate())
    }

    /// Insert a record with its home and related provinces normalized to
    /// codes, then drop cached results for every province it names.
    pub fn record_investment(&self, record: &InvestmentRecord) -> AtlasResult<i64> {
        let mut record = record.clone();
        record.province = record.province.map(|p| self.provinces.normalize(&p));
        record.related_provinces = record.related_provinces.and_then(|raw| {
            let codes: Vec<String> = split_list(&raw)
                .iter()
                .map(|entry| self.provinces.normalize(entry))
                .collect();
            (!codes.is_empty()).then(|| join_list(&codes))
        });
        let id = self.ledger.insert_record(&record)?;

        let mut touched: BTreeSet<String> = record.related_province_codes().into_iter().collect();
        if let Some(home) = record.home_province() {
            touched.insert(home.to_string());
        }
        for code in &touched {
            self.cache.invalidate_province(code);
            events::cache_invalidated(code);
        }
        Ok(id)
    }

    /// Validate `config`'s profiles and swap them in. Runs already in
    /// progress keep the registry they started with.
    pub fn reload_profiles(&self, config: &AtlasConfig) -> AtlasResult<()> {
        config.validate()?;
        let registry = Arc::new(ProfileRegistry::from_config(config)?);
        let names = registry.names();
        match self.profiles.write() {
            Ok(mut guard) => *guard = registry,
            Err(poisoned) => *poisoned.into_inner() = registry,
        }
        events::profiles_reloaded(&names);
        Ok(())
    }

    // --- Accessors ---

    pub fn profiles(&self) -> Arc<ProfileRegistry> {
        snapshot(&self.profiles)
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn store(&self) -> &Arc<dyn ICorrelationStore> {
        &self.store
    }

    pub fn ledger(&self) -> &Arc<dyn IInvestmentLedger> {
        &self.ledger
    }

    pub fn is_running(&self) -> bool {
        self.job.is_running()
    }

    fn effective_limit(&self, limit: usize) -> usize {
        if limit == 0 {
            self.default_top_n.min(MAX_TOP_N)
        } else {
            limit.min(MAX_TOP_N)
        }
    }
}

fn is_already_running<T>(result: &AtlasResult<T>) -> bool {
    matches!(result, Err(AtlasError::JobError(JobError::AlreadyRunning)))
}

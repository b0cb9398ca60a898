//! Probability service: cache-or-compute front of the estimator

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use lr_core::LrResult;

use crate::cache::{CacheKey, ProbabilityCache};
use crate::config::RewardsConfig;
use crate::estimator::{EstimateMethod, EstimateOptions, ProbabilityEstimator, ProbabilityTable};
use crate::store::ConfigStore;
use crate::variant::{GameVariant, SchemeLoader};

/// Warm-up summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WarmUpReport {
    pub computed: usize,
    pub already_cached: usize,
    pub failed: usize,
}

/// Serves probability tables from the injected cache, computing on miss
pub struct ProbabilityService<S: ConfigStore> {
    store: S,
    cache: ProbabilityCache,
    estimator: ProbabilityEstimator,
    warm_up_method: EstimateMethod,
    computations: AtomicU64,
}

impl<S: ConfigStore> ProbabilityService<S> {
    pub fn new(store: S, cache: ProbabilityCache, config: &RewardsConfig) -> LrResult<Self> {
        Ok(Self {
            store,
            cache,
            estimator: ProbabilityEstimator::new(config)?,
            warm_up_method: config.warm_up_method,
            computations: AtomicU64::new(0),
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn cache(&self) -> &ProbabilityCache {
        &self.cache
    }

    pub fn estimator(&self) -> &ProbabilityEstimator {
        &self.estimator
    }

    /// Table for a (weights, scheme, method) triple, lenient `any`
    pub fn table(
        &self,
        weight_config_id: u64,
        scheme_id: u64,
        method: EstimateMethod,
    ) -> LrResult<Arc<ProbabilityTable>> {
        self.table_for(CacheKey::new(weight_config_id, scheme_id, method))
    }

    /// Table for the configuration bound to a variant
    pub fn table_for_variant(
        &self,
        variant: GameVariant,
        method: EstimateMethod,
    ) -> LrResult<Arc<ProbabilityTable>> {
        let binding = self.store.get_variant_binding(variant)?;
        self.table_for(binding.pair().key(method))
    }

    /// Cached table for `key`, computing and caching it on a miss
    pub fn table_for(&self, key: CacheKey) -> LrResult<Arc<ProbabilityTable>> {
        if let Some(table) = self.cache.get(&key) {
            log::debug!("[ProbabilityService] Cache hit {}", key);
            return Ok(table);
        }
        log::debug!("[ProbabilityService] Cache miss {}", key);

        let table = Arc::new(self.compute(key)?);
        self.cache.put(key, Arc::clone(&table));
        Ok(table)
    }

    fn compute(&self, key: CacheKey) -> LrResult<ProbabilityTable> {
        let weights = self.store.get_weight_config(key.weight_config_id)?;
        let scheme = self.store.load_scheme(key.scheme_id)?;
        let options = EstimateOptions::new().strict(key.strict_any_mode);
        let table = self
            .estimator
            .estimate_with(&weights, &scheme, key.method, options)?;
        self.computations.fetch_add(1, Ordering::Relaxed);
        Ok(table)
    }

    /// Drop every cached table; call after any configuration edit
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Precompute tables for every live variant
    pub fn warm_up(&self) -> WarmUpReport {
        let mut report = WarmUpReport::default();
        for pair in SchemeLoader::new(&self.store).live_pairs() {
            let key = pair.key(self.warm_up_method);
            if self.cache.contains(&key) {
                report.already_cached += 1;
                continue;
            }
            match self.table_for(key) {
                Ok(_) => report.computed += 1,
                Err(e) => {
                    log::warn!("[ProbabilityService] Warm-up failed for {}: {}", key, e);
                    report.failed += 1;
                }
            }
        }

        log::info!(
            "[ProbabilityService] Warm-up: {} computed, {} cached, {} failed",
            report.computed,
            report.already_cached,
            report.failed
        );
        report
    }

    /// Tables computed (not served from cache) since creation
    pub fn computations(&self) -> u64 {
        self.computations.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EstimatorConfig;
    use crate::store::MemoryConfigStore;
    use crate::variant::VariantBinding;

    fn service(store: MemoryConfigStore) -> ProbabilityService<MemoryConfigStore> {
        let config = RewardsConfig {
            estimator: EstimatorConfig::quick(17),
            ..Default::default()
        };
        ProbabilityService::new(store, ProbabilityCache::new(), &config).unwrap()
    }

    #[test]
    fn test_second_request_served_from_cache() {
        let svc = service(MemoryConfigStore::standard().unwrap());
        let first = svc.table(1, 1, EstimateMethod::Fast).unwrap();
        let second = svc.table(1, 1, EstimateMethod::Fast).unwrap();
        assert_eq!(svc.computations(), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_invalidate_forces_recompute() {
        let svc = service(MemoryConfigStore::standard().unwrap());
        svc.table(1, 1, EstimateMethod::Fast).unwrap();
        svc.invalidate_all();
        assert!(svc.cache().is_empty());
        svc.table(1, 1, EstimateMethod::Fast).unwrap();
        assert_eq!(svc.computations(), 2);
    }

    #[test]
    fn test_missing_config_not_cached() {
        let svc = service(MemoryConfigStore::new());
        assert!(svc.table(1, 1, EstimateMethod::Fast).is_err());
        assert!(svc.cache().is_empty());
        assert_eq!(svc.computations(), 0);
    }

    #[test]
    fn test_warm_up_dedupes_pairs() {
        let store = MemoryConfigStore::standard().unwrap();
        store.bind_variant(VariantBinding::new(GameVariant::Supreme, 9, 1));
        let svc = service(store);

        let report = svc.warm_up();
        // supreme now points at weights that do not exist
        assert_eq!(report.computed, 2);
        assert_eq!(report.failed, 1);

        let again = svc.warm_up();
        assert_eq!(again.computed, 0);
        assert_eq!(again.already_cached, 2);
        assert_eq!(svc.computations(), 2);
    }
}

//! Permanent probability-table cache
//!
//! Entries never expire; the only way out is `invalidate_all`, called
//! whenever weights, rules or tiers are edited.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::estimator::{EstimateMethod, ProbabilityTable};

// ============ Cache Key ============

/// Identifies one cached table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub weight_config_id: u64,
    pub scheme_id: u64,
    pub method: EstimateMethod,
    /// Tables differ between lenient and strict `any` resolution
    pub strict_any_mode: bool,
}

impl CacheKey {
    /// Key for lenient `any` resolution
    pub fn new(weight_config_id: u64, scheme_id: u64, method: EstimateMethod) -> Self {
        Self {
            weight_config_id,
            scheme_id,
            method,
            strict_any_mode: false,
        }
    }

    /// Builder: set strictness
    pub fn strict(mut self, strict_any_mode: bool) -> Self {
        self.strict_any_mode = strict_any_mode;
        self
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "w{}/s{}/{}{}",
            self.weight_config_id,
            self.scheme_id,
            self.method,
            if self.strict_any_mode { "/strict" } else { "" }
        )
    }
}

// ============ Probability Cache ============

/// Shared handle; clones see the same entries
#[derive(Clone, Default)]
pub struct ProbabilityCache {
    inner: Arc<RwLock<CacheInner>>,
}

#[derive(Default)]
struct CacheInner {
    tables: HashMap<CacheKey, Arc<ProbabilityTable>>,
    hits: u64,
    misses: u64,
}

impl ProbabilityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get cached table
    pub fn get(&self, key: &CacheKey) -> Option<Arc<ProbabilityTable>> {
        let mut inner = self.inner.write();
        match inner.tables.get(key).cloned() {
            Some(table) => {
                inner.hits += 1;
                Some(table)
            }
            None => {
                inner.misses += 1;
                None
            }
        }
    }

    /// Store a table, replacing any previous entry
    pub fn put(&self, key: CacheKey, table: Arc<ProbabilityTable>) {
        self.inner.write().tables.insert(key, table);
    }

    /// Check if a key is cached (does not count as a lookup)
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.inner.read().tables.contains_key(key)
    }

    /// Drop every entry
    pub fn invalidate_all(&self) {
        let mut inner = self.inner.write();
        let dropped = inner.tables.len();
        inner.tables.clear();
        log::info!("[ProbabilityCache] Invalidated {} tables", dropped);
    }

    pub fn len(&self) -> usize {
        self.inner.read().tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().tables.is_empty()
    }

    /// Cached keys, unordered
    pub fn keys(&self) -> Vec<CacheKey> {
        self.inner.read().tables.keys().copied().collect()
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.read();
        CacheStats {
            entries: inner.tables.len(),
            hits: inner.hits,
            misses: inner.misses,
        }
    }
}

// ============ Cache Stats ============

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    /// Lookup hit percentage
    pub fn hit_percentage(&self) -> f64 {
        let lookups = self.hits + self.misses;
        if lookups == 0 {
            0.0
        } else {
            self.hits as f64 / lookups as f64 * 100.0
        }
    }
}

// ============ Tests ============

//! Configuration store: read-only access to weights, rules, tiers and bindings

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::RwLock;

use lr_core::{ConfigKind, LrError, LrResult, WeightConfig};

use crate::parser::{ParsedConfig, RowParser};
use crate::presets;
use crate::rules::{PunishmentTier, RewardRule, RewardScheme};
use crate::variant::{GameVariant, VariantBinding};

/// Read-only configuration source
///
/// Rule and tier lookups return active rows only, rules in store order.
pub trait ConfigStore {
    fn get_weight_config(&self, id: u64) -> LrResult<WeightConfig>;

    fn get_active_rules(&self, scheme_id: u64) -> LrResult<Vec<RewardRule>>;

    fn get_active_punishment_tiers(&self, scheme_id: u64) -> LrResult<Vec<PunishmentTier>>;

    fn get_variant_binding(&self, variant: GameVariant) -> LrResult<VariantBinding>;

    /// All bindings, live or not
    fn variant_bindings(&self) -> Vec<VariantBinding>;

    /// Build a validated scheme from the active rows
    fn load_scheme(&self, scheme_id: u64) -> LrResult<RewardScheme> {
        let rules = self.get_active_rules(scheme_id)?;
        let tiers = self.get_active_punishment_tiers(scheme_id)?;
        RewardScheme::new(scheme_id, rules, tiers)
    }
}

impl<S: ConfigStore + ?Sized> ConfigStore for &S {
    fn get_weight_config(&self, id: u64) -> LrResult<WeightConfig> {
        (**self).get_weight_config(id)
    }

    fn get_active_rules(&self, scheme_id: u64) -> LrResult<Vec<RewardRule>> {
        (**self).get_active_rules(scheme_id)
    }

    fn get_active_punishment_tiers(&self, scheme_id: u64) -> LrResult<Vec<PunishmentTier>> {
        (**self).get_active_punishment_tiers(scheme_id)
    }

    fn get_variant_binding(&self, variant: GameVariant) -> LrResult<VariantBinding> {
        (**self).get_variant_binding(variant)
    }

    fn variant_bindings(&self) -> Vec<VariantBinding> {
        (**self).variant_bindings()
    }
}

impl<S: ConfigStore + ?Sized> ConfigStore for Arc<S> {
    fn get_weight_config(&self, id: u64) -> LrResult<WeightConfig> {
        (**self).get_weight_config(id)
    }

    fn get_active_rules(&self, scheme_id: u64) -> LrResult<Vec<RewardRule>> {
        (**self).get_active_rules(scheme_id)
    }

    fn get_active_punishment_tiers(&self, scheme_id: u64) -> LrResult<Vec<PunishmentTier>> {
        (**self).get_active_punishment_tiers(scheme_id)
    }

    fn get_variant_binding(&self, variant: GameVariant) -> LrResult<VariantBinding> {
        (**self).get_variant_binding(variant)
    }

    fn variant_bindings(&self) -> Vec<VariantBinding> {
        (**self).variant_bindings()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// IN-MEMORY STORE
// ═══════════════════════════════════════════════════════════════════════════════

/// In-process store fed from typed rows or a parsed JSON document
#[derive(Default)]
pub struct MemoryConfigStore {
    inner: RwLock<StoreInner>,
}

#[derive(Default)]
struct StoreInner {
    weights: HashMap<u64, WeightConfig>,
    /// Known scheme ids, including schemes with no rows yet
    schemes: HashSet<u64>,
    rules: HashMap<u64, Vec<RewardRule>>,
    tiers: HashMap<u64, Vec<PunishmentTier>>,
    bindings: HashMap<GameVariant, VariantBinding>,
}

impl MemoryConfigStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard weights and scheme (both id 1) bound to every variant
    pub fn standard() -> LrResult<Self> {
        let store = Self::new();
        store.insert_weight_config(WeightConfig::standard(1));
        // validate before storing
        presets::standard_scheme(1)?;
        store.declare_scheme(1);
        for rule in presets::standard_rules() {
            store.insert_rule(1, rule);
        }
        for tier in presets::standard_tiers() {
            store.insert_tier(1, tier);
        }
        for variant in GameVariant::ALL {
            store.bind_variant(VariantBinding::new(variant, 1, 1));
        }
        Ok(store)
    }

    /// Create from a JSON configuration document
    pub fn from_json(json: &str) -> LrResult<Self> {
        let store = Self::new();
        store.load_json(json)?;
        Ok(store)
    }

    /// Merge a JSON configuration document into the store
    pub fn load_json(&self, json: &str) -> LrResult<()> {
        let parsed = RowParser::new().parse_json(json)?;
        self.load_parsed(parsed);
        Ok(())
    }

    /// Merge parsed rows into the store
    pub fn load_parsed(&self, parsed: ParsedConfig) {
        let (weights, rules, tiers, bindings) = (
            parsed.weights.len(),
            parsed.rules.len(),
            parsed.tiers.len(),
            parsed.bindings.len(),
        );
        for config in parsed.weights {
            self.insert_weight_config(config);
        }
        for (scheme_id, rule) in parsed.rules {
            self.insert_rule(scheme_id, rule);
        }
        for (scheme_id, tier) in parsed.tiers {
            self.insert_tier(scheme_id, tier);
        }
        for binding in parsed.bindings {
            self.bind_variant(binding);
        }
        log::info!(
            "[ConfigStore] Loaded {} weight configs, {} rules ({} skipped), {} tiers, {} bindings",
            weights,
            rules,
            parsed.skipped_rules,
            tiers,
            bindings
        );
    }

    /// Insert or replace a weight config
    pub fn insert_weight_config(&self, config: WeightConfig) {
        self.inner.write().weights.insert(config.id, config);
    }

    /// Register a scheme id with no rows
    pub fn declare_scheme(&self, scheme_id: u64) {
        self.inner.write().schemes.insert(scheme_id);
    }

    /// Append a rule to a scheme (replaces a rule with the same id)
    pub fn insert_rule(&self, scheme_id: u64, rule: RewardRule) {
        let mut inner = self.inner.write();
        inner.schemes.insert(scheme_id);
        let rules = inner.rules.entry(scheme_id).or_default();
        match rules.iter_mut().find(|r| r.id == rule.id) {
            Some(existing) => *existing = rule,
            None => rules.push(rule),
        }
    }

    /// Add a tier to a scheme
    pub fn insert_tier(&self, scheme_id: u64, tier: PunishmentTier) {
        let mut inner = self.inner.write();
        inner.schemes.insert(scheme_id);
        inner.tiers.entry(scheme_id).or_default().push(tier);
    }

    /// Bind (or rebind) a variant
    pub fn bind_variant(&self, binding: VariantBinding) {
        self.inner.write().bindings.insert(binding.variant, binding);
    }

    /// Remove a scheme and all its rows
    pub fn remove_scheme(&self, scheme_id: u64) {
        let mut inner = self.inner.write();
        inner.schemes.remove(&scheme_id);
        inner.rules.remove(&scheme_id);
        inner.tiers.remove(&scheme_id);
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get_weight_config(&self, id: u64) -> LrResult<WeightConfig> {
        self.inner
            .read()
            .weights
            .get(&id)
            .cloned()
            .ok_or_else(|| LrError::missing(ConfigKind::WeightConfig, id))
    }

    fn get_active_rules(&self, scheme_id: u64) -> LrResult<Vec<RewardRule>> {
        let inner = self.inner.read();
        if !inner.schemes.contains(&scheme_id) {
            return Err(LrError::missing(ConfigKind::RewardScheme, scheme_id));
        }
        Ok(inner
            .rules
            .get(&scheme_id)
            .map(|rules| rules.iter().filter(|r| r.active).cloned().collect())
            .unwrap_or_default())
    }

    fn get_active_punishment_tiers(&self, scheme_id: u64) -> LrResult<Vec<PunishmentTier>> {
        let inner = self.inner.read();
        if !inner.schemes.contains(&scheme_id) {
            return Err(LrError::missing(ConfigKind::RewardScheme, scheme_id));
        }
        Ok(inner
            .tiers
            .get(&scheme_id)
            .map(|tiers| tiers.iter().filter(|t| t.active).cloned().collect())
            .unwrap_or_default())
    }

    fn get_variant_binding(&self, variant: GameVariant) -> LrResult<VariantBinding> {
        self.inner
            .read()
            .bindings
            .get(&variant)
            .cloned()
            .ok_or_else(|| LrError::missing(ConfigKind::GameVariant, variant))
    }

    fn variant_bindings(&self) -> Vec<VariantBinding> {
        let mut bindings: Vec<_> = self.inner.read().bindings.values().cloned().collect();
        bindings.sort_by_key(|b| b.variant);
        bindings
    }
}

//! Game variants and the scheme loader
//!
//! Each variant (normal / advanced / supreme) is bound to one weight config
//! and one reward scheme. The loader resolves a variant to its typed
//! configuration and lists the pairs warm-up should precompute.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use lr_core::{LrError, LrResult, WeightConfig};

use crate::cache::CacheKey;
use crate::estimator::EstimateMethod;
use crate::rules::RewardScheme;
use crate::store::ConfigStore;

/// Playable game variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameVariant {
    Normal,
    Advanced,
    Supreme,
}

impl GameVariant {
    pub const ALL: [GameVariant; 3] = [Self::Normal, Self::Advanced, Self::Supreme];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Advanced => "advanced",
            Self::Supreme => "supreme",
        }
    }

    /// Strictness used when a binding does not say
    pub fn default_strict_any_mode(&self) -> bool {
        !matches!(self, Self::Normal)
    }
}

impl std::fmt::Display for GameVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GameVariant {
    type Err = LrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "advanced" => Ok(Self::Advanced),
            "supreme" => Ok(Self::Supreme),
            other => Err(LrError::InvalidParam(format!("unknown game variant '{}'", other))),
        }
    }
}

/// Which configuration a variant plays with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantBinding {
    pub variant: GameVariant,
    pub weight_config_id: u64,
    pub scheme_id: u64,
    pub strict_any_mode: bool,
    /// Variant is open for play (and warmed up)
    pub live: bool,
}

impl VariantBinding {
    /// Live binding with the variant's default strictness
    pub fn new(variant: GameVariant, weight_config_id: u64, scheme_id: u64) -> Self {
        Self {
            variant,
            weight_config_id,
            scheme_id,
            strict_any_mode: variant.default_strict_any_mode(),
            live: true,
        }
    }

    /// Builder: override strictness
    pub fn with_strict_any_mode(mut self, strict_any_mode: bool) -> Self {
        self.strict_any_mode = strict_any_mode;
        self
    }

    /// Builder: set live flag
    pub fn with_live(mut self, live: bool) -> Self {
        self.live = live;
        self
    }

    pub fn pair(&self) -> ConfigPair {
        ConfigPair {
            weight_config_id: self.weight_config_id,
            scheme_id: self.scheme_id,
            strict_any_mode: self.strict_any_mode,
        }
    }
}

/// Distinct configuration a table is computed for
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConfigPair {
    pub weight_config_id: u64,
    pub scheme_id: u64,
    pub strict_any_mode: bool,
}

impl ConfigPair {
    pub fn key(&self, method: EstimateMethod) -> CacheKey {
        CacheKey::new(self.weight_config_id, self.scheme_id, method).strict(self.strict_any_mode)
    }
}

/// Everything needed to play or estimate one variant
#[derive(Debug, Clone)]
pub struct LoadedVariant {
    pub binding: VariantBinding,
    pub weights: WeightConfig,
    pub scheme: RewardScheme,
}

/// Resolves variants against a configuration store
pub struct SchemeLoader<'a, S: ConfigStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: ConfigStore + ?Sized> SchemeLoader<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Load the typed configuration bound to `variant`
    pub fn load(&self, variant: GameVariant) -> LrResult<LoadedVariant> {
        let binding = self.store.get_variant_binding(variant)?;
        let weights = self.store.get_weight_config(binding.weight_config_id)?;
        let scheme = self.store.load_scheme(binding.scheme_id)?;
        Ok(LoadedVariant {
            binding,
            weights,
            scheme,
        })
    }

    /// Distinct pairs referenced by live variants
    pub fn live_pairs(&self) -> Vec<ConfigPair> {
        self.store
            .variant_bindings()
            .iter()
            .filter(|b| b.live)
            .map(VariantBinding::pair)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

//! Weight configuration: integer draw weights per symbol

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{LrError, LrResult};
use crate::symbols::SymbolKind;

/// Named table of draw weights
///
/// Kinds missing from `weights` have weight 0. The map is ordered by
/// `SymbolKind`, which makes iteration follow the canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightConfig {
    /// Configuration row id
    pub id: u64,
    /// Operator-facing name
    #[serde(default)]
    pub name: String,
    /// Weight per symbol kind
    pub weights: BTreeMap<SymbolKind, u32>,
}

impl WeightConfig {
    /// Create an empty config
    pub fn new(id: u64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            weights: BTreeMap::new(),
        }
    }

    /// Builder: set the weight of one kind
    pub fn with_weight(mut self, kind: SymbolKind, weight: u32) -> Self {
        self.set(kind, weight);
        self
    }

    /// Create from (kind, weight) pairs
    pub fn from_pairs(
        id: u64,
        name: impl Into<String>,
        pairs: impl IntoIterator<Item = (SymbolKind, u32)>,
    ) -> Self {
        let mut config = Self::new(id, name);
        for (kind, weight) in pairs {
            config.set(kind, weight);
        }
        config
    }

    /// Standard table: total 825 with the punishment symbol at 25
    pub fn standard(id: u64) -> Self {
        use SymbolKind::*;
        Self::from_pairs(
            id,
            "standard",
            [
                (J, 110),
                (N, 110),
                (T, 110),
                (M, 110),
                (Backdrop, 85),
                (CenterPart, 85),
                (Overalls, 85),
                (Basketball, 85),
                (Man, 20),
                (LawyerLetter, 25),
            ],
        )
    }

    /// Uniform table: every kind at weight 1
    pub fn uniform(id: u64) -> Self {
        Self::from_pairs(id, "uniform", SymbolKind::ALL.into_iter().map(|k| (k, 1)))
    }

    /// Set weight for a kind
    pub fn set(&mut self, kind: SymbolKind, weight: u32) {
        self.weights.insert(kind, weight);
    }

    /// Weight for a kind (0 when absent)
    pub fn weight(&self, kind: SymbolKind) -> u32 {
        self.weights.get(&kind).copied().unwrap_or(0)
    }

    /// Sum of all weights
    pub fn total(&self) -> u64 {
        self.weights.values().map(|&w| w as u64).sum()
    }

    /// Draw probability of a kind in [0, 1]
    pub fn probability(&self, kind: SymbolKind) -> LrResult<f64> {
        let total = self.ensure_drawable()?;
        Ok(self.weight(kind) as f64 / total as f64)
    }

    /// Total weight, or `DegenerateWeights` when it is 0
    pub fn ensure_drawable(&self) -> LrResult<u64> {
        match self.total() {
            0 => Err(LrError::DegenerateWeights(self.id)),
            total => Ok(total),
        }
    }

    /// (kind, weight) pairs in canonical order, zero weights included
    pub fn iter_canonical(&self) -> impl Iterator<Item = (SymbolKind, u32)> + '_ {
        SymbolKind::ALL.into_iter().map(|k| (k, self.weight(k)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_total() {
        let weights = WeightConfig::standard(1);
        assert_eq!(weights.total(), 825);
        assert_eq!(weights.weight(SymbolKind::LawyerLetter), 25);
    }

    #[test]
    fn test_missing_kind_has_zero_weight() {
        let weights = WeightConfig::new(2, "sparse").with_weight(SymbolKind::J, 5);
        assert_eq!(weights.weight(SymbolKind::N), 0);
        assert_eq!(weights.total(), 5);
        assert_eq!(weights.probability(SymbolKind::J).unwrap(), 1.0);
    }

    #[test]
    fn test_degenerate_weights_fail_fast() {
        let weights = WeightConfig::new(3, "empty").with_weight(SymbolKind::J, 0);
        assert!(matches!(
            weights.probability(SymbolKind::J),
            Err(LrError::DegenerateWeights(3))
        ));
    }

    #[test]
    fn test_iter_canonical_covers_catalogue() {
        let weights = WeightConfig::new(4, "x").with_weight(SymbolKind::LawyerLetter, 7);
        let all: Vec<_> = weights.iter_canonical().collect();
        assert_eq!(all.len(), SymbolKind::COUNT);
        assert_eq!(all[0], (SymbolKind::J, 0));
        assert_eq!(all[9], (SymbolKind::LawyerLetter, 7));
    }

    #[test]
    fn test_json_shape() {
        let json = r#"{"id": 9, "weights": {"J": 3, "LSH": 1}}"#;
        let weights: WeightConfig = serde_json::from_str(json).unwrap();
        assert_eq!(weights.total(), 4);
        assert_eq!(weights.name, "");
    }
}

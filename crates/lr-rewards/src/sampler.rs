//! Weighted symbol sampler

use rand::Rng;

use lr_core::{LrResult, OUTCOME_LEN, Outcome, SymbolKind, WeightConfig};

/// Draws symbols from a validated weight table
///
/// The table is walked in canonical order on every draw; with ten kinds a
/// linear walk is cheaper than building an alias table.
#[derive(Debug, Clone)]
pub struct SymbolSampler {
    cumulative: [u64; SymbolKind::COUNT],
    total: u64,
}

impl SymbolSampler {
    /// Validate `weights` once; fails with `DegenerateWeights` on a zero total
    pub fn new(weights: &WeightConfig) -> LrResult<Self> {
        let total = weights.ensure_drawable()?;
        let mut cumulative = [0u64; SymbolKind::COUNT];
        let mut running = 0u64;
        for (kind, weight) in weights.iter_canonical() {
            running += weight as u64;
            cumulative[kind.index()] = running;
        }
        Ok(Self { cumulative, total })
    }

    /// Total weight of the table
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Draw one symbol
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SymbolKind {
        let draw = rng.random_range(0..self.total);
        // first kind whose cumulative weight exceeds the draw
        let idx = self
            .cumulative
            .iter()
            .position(|&c| c > draw)
            .unwrap_or(SymbolKind::COUNT - 1);
        SymbolKind::ALL[idx]
    }

    /// Draw four independent symbols
    pub fn sample_outcome<R: Rng + ?Sized>(&self, rng: &mut R) -> Outcome {
        let mut symbols = [SymbolKind::J; OUTCOME_LEN];
        for slot in &mut symbols {
            *slot = self.sample(rng);
        }
        Outcome::new(symbols)
    }
}

/// Draw one symbol from `weights`
pub fn sample<R: Rng + ?Sized>(weights: &WeightConfig, rng: &mut R) -> LrResult<SymbolKind> {
    Ok(SymbolSampler::new(weights)?.sample(rng))
}

/// Draw a four-symbol outcome from `weights`
pub fn sample_outcome<R: Rng + ?Sized>(weights: &WeightConfig, rng: &mut R) -> LrResult<Outcome> {
    Ok(SymbolSampler::new(weights)?.sample_outcome(rng))
}

//! Reward engine configuration

use serde::{Deserialize, Serialize};

use lr_core::{LrError, LrResult, SymbolKind};

use crate::estimator::EstimateMethod;

/// Fixed constants used by the resolver's static steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Symbol whose runs multiply other payouts
    pub bonus_symbol: SymbolKind,
    /// Symbol whose count selects a punishment tier
    pub punishment_symbol: SymbolKind,
    /// Bonus multiplier by longest bonus run (index 0..=3)
    pub bonus_levels: [f64; 4],
    /// Payout for four bonus symbols
    pub bonus_jackpot_multiplier: f64,
    /// Payout for the static ABBA override
    pub symmetric_multiplier: f64,
    /// Applied on top of `symmetric_multiplier` when the middle pair is the bonus symbol
    pub symmetric_bonus_factor: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            bonus_symbol: SymbolKind::Man,
            punishment_symbol: SymbolKind::LawyerLetter,
            bonus_levels: [1.0, 2.5, 5.0, 10.0],
            bonus_jackpot_multiplier: 100.0,
            symmetric_multiplier: 5.0,
            symmetric_bonus_factor: 2.0,
        }
    }
}

impl ResolverConfig {
    /// Bonus multiplier for a longest bonus run (runs past 3 clamp to the top level)
    pub fn bonus_level(&self, run: usize) -> f64 {
        self.bonus_levels[run.min(self.bonus_levels.len() - 1)]
    }

    /// Reject configurations the resolver cannot use
    pub fn validate(&self) -> LrResult<()> {
        if self.bonus_symbol == self.punishment_symbol {
            return Err(LrError::InvalidParam(format!(
                "bonus and punishment symbol are both {}",
                self.bonus_symbol
            )));
        }
        let constants = self.bonus_levels.iter().chain([
            &self.bonus_jackpot_multiplier,
            &self.symmetric_multiplier,
            &self.symmetric_bonus_factor,
        ]);
        for value in constants {
            if !value.is_finite() || *value < 0.0 {
                return Err(LrError::InvalidParam(format!(
                    "resolver constant {} must be finite and non-negative",
                    value
                )));
            }
        }
        Ok(())
    }
}

/// Monte Carlo sizing and cadence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Draws for `EstimateMethod::Fast`
    pub fast_samples: u64,
    /// Draws for `EstimateMethod::Precise`
    pub precise_samples: u64,
    /// Draws between progress callbacks (and cancellation checks)
    pub progress_interval: u64,
    /// Fixed RNG seed; `None` seeds from the OS
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            fast_samples: 100_000,
            precise_samples: 1_000_000,
            progress_interval: 10_000,
            seed: None,
        }
    }
}

impl EstimatorConfig {
    /// Small sample counts and a fixed seed, for tests and previews
    pub fn quick(seed: u64) -> Self {
        Self {
            fast_samples: 20_000,
            precise_samples: 100_000,
            progress_interval: 5_000,
            seed: Some(seed),
        }
    }

    /// Builder: fix the seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Draw count for a method
    pub fn samples_for(&self, method: EstimateMethod) -> u64 {
        match method {
            EstimateMethod::Fast => self.fast_samples,
            EstimateMethod::Precise => self.precise_samples,
        }
    }
}

/// Operator-defined acceptable RTP window, in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RtpBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for RtpBounds {
    fn default() -> Self {
        Self {
            min: 85.0,
            max: 98.0,
        }
    }
}

impl RtpBounds {
    pub fn contains(&self, rtp: f64) -> bool {
        rtp >= self.min && rtp <= self.max
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardsConfig {
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub estimator: EstimatorConfig,
    #[serde(default)]
    pub rtp_bounds: RtpBounds,
    /// Method used by warm-up
    #[serde(default)]
    pub warm_up_method: EstimateMethod,
}

impl RewardsConfig {
    /// Import config from JSON
    pub fn from_json(json: &str) -> LrResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| LrError::Serialization(format!("Invalid config: {}", e)))?;
        config.resolver.validate()?;
        Ok(config)
    }

    /// Export config as JSON
    pub fn to_json(&self) -> LrResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| LrError::Serialization(e.to_string()))
    }
}

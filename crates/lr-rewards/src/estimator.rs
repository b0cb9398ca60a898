//! Probability estimator: RTP tables for a (weights, scheme) pair
//!
//! Punishment tiers are closed-form: each reel draws the punishment symbol
//! independently with probability p, so exactly k of four is binomial.
//! Everything else is tabulated from seeded Monte Carlo draws resolved by
//! [`RewardResolver::evaluate`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use lr_core::{LrError, LrResult, OUTCOME_LEN, WeightConfig};

use crate::config::{EstimatorConfig, RewardsConfig, RtpBounds};
use crate::resolver::{
    BONUS_JACKPOT_NAME, BONUS_ONLY_NAME, NO_WIN_NAME, ResolvedKind, RewardResolver, SYMMETRIC_NAME,
};
use crate::rules::RewardScheme;
use crate::sampler::SymbolSampler;

// ═══════════════════════════════════════════════════════════════════════════════
// METHOD / TABLE
// ═══════════════════════════════════════════════════════════════════════════════

/// Sample size class
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimateMethod {
    #[default]
    Fast,
    Precise,
}

impl EstimateMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Precise => "precise",
        }
    }
}

impl std::fmt::Display for EstimateMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an entry's probability was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntrySource {
    Exact,
    Sampled,
}

/// One row of a probability table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableEntry {
    pub rule_name: String,
    pub kind: ResolvedKind,
    /// Base multiplier of the rule or tier
    pub multiplier: f64,
    /// Realised mean multiplier (differs from `multiplier` when bonus stacked)
    pub mean_multiplier: f64,
    /// Probability in percent (0-100)
    pub probability: f64,
    /// Expected value in percent of stake
    pub expected_value: f64,
    /// Simulated draws resolved to this entry
    pub hits: u64,
    pub source: EntrySource,
}

/// Full RTP breakdown for one configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityTable {
    pub weight_config_id: u64,
    pub scheme_id: u64,
    pub method: EstimateMethod,
    pub strict_any_mode: bool,
    pub entries: Vec<TableEntry>,
    /// Return to player (%)
    pub rtp: f64,
    /// 100 - RTP
    pub house_edge: f64,
    /// Probability of a positive payout (%)
    pub hit_rate: f64,
    pub samples: u64,
    pub duration_ms: u64,
    /// RTP lies within the configured operator bounds
    pub within_bounds: bool,
}

impl ProbabilityTable {
    /// Entry by reported name
    pub fn entry(&self, rule_name: &str) -> Option<&TableEntry> {
        self.entries.iter().find(|e| e.rule_name == rule_name)
    }

    /// Entry by result kind
    pub fn entry_for(&self, kind: ResolvedKind) -> Option<&TableEntry> {
        self.entries.iter().find(|e| e.kind == kind)
    }

    /// Sum of all entry probabilities; converges to 100
    pub fn total_probability(&self) -> f64 {
        self.entries.iter().map(|e| e.probability).sum()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PROGRESS / CANCELLATION
// ═══════════════════════════════════════════════════════════════════════════════

/// Progress report for a running estimate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub completed: u64,
    pub total: u64,
    /// 0.0 - 100.0
    pub percentage: f64,
}

/// Shared flag for cancelling a running estimate
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    /// Check if cancelled
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Per-call estimation options
#[derive(Default)]
pub struct EstimateOptions<'a> {
    pub strict_any_mode: bool,
    pub progress: Option<&'a mut dyn FnMut(Progress)>,
    pub cancel: Option<&'a CancelToken>,
}

impl<'a> EstimateOptions<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: resolve `any` rules as run matches
    pub fn strict(mut self, strict_any_mode: bool) -> Self {
        self.strict_any_mode = strict_any_mode;
        self
    }

    /// Builder: progress callback
    pub fn on_progress(mut self, callback: &'a mut dyn FnMut(Progress)) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Builder: cancellation token
    pub fn cancel_with(mut self, token: &'a CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// P(exactly k successes in n trials)
pub fn binomial_probability(n: u32, k: u32, p: f64) -> f64 {
    if k > n {
        return 0.0;
    }
    let k_small = k.min(n - k);
    let mut choose = 1.0f64;
    for i in 0..k_small {
        choose = choose * (n - i) as f64 / (i + 1) as f64;
    }
    choose * p.powi(k as i32) * (1.0 - p).powi((n - k) as i32)
}

// ═══════════════════════════════════════════════════════════════════════════════
// ESTIMATOR
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    hits: u64,
    multiplier_sum: f64,
}

/// Pre-seeded table row under construction
struct Slot {
    name: String,
    kind: ResolvedKind,
    multiplier: f64,
    tally: Tally,
    /// Exact probability (fraction), punishment tiers only
    exact: Option<f64>,
}

impl Slot {
    fn sampled(name: impl Into<String>, kind: ResolvedKind, multiplier: f64) -> Self {
        Self {
            name: name.into(),
            kind,
            multiplier,
            tally: Tally::default(),
            exact: None,
        }
    }
}

/// Computes probability tables
#[derive(Debug, Clone)]
pub struct ProbabilityEstimator {
    resolver: RewardResolver,
    config: EstimatorConfig,
    bounds: RtpBounds,
}

impl ProbabilityEstimator {
    /// Create from a validated engine config
    pub fn new(config: &RewardsConfig) -> LrResult<Self> {
        Ok(Self {
            resolver: RewardResolver::new(config.resolver.clone())?,
            config: config.estimator.clone(),
            bounds: config.rtp_bounds,
        })
    }

    pub fn resolver(&self) -> &RewardResolver {
        &self.resolver
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    /// Estimate with default options (lenient `any`, no progress)
    pub fn estimate(
        &self,
        weights: &WeightConfig,
        scheme: &RewardScheme,
        method: EstimateMethod,
    ) -> LrResult<ProbabilityTable> {
        self.estimate_with(weights, scheme, method, EstimateOptions::default())
    }

    /// Estimate with progress, cancellation and strictness options
    pub fn estimate_with(
        &self,
        weights: &WeightConfig,
        scheme: &RewardScheme,
        method: EstimateMethod,
        mut options: EstimateOptions<'_>,
    ) -> LrResult<ProbabilityTable> {
        let started = Instant::now();
        let sampler = SymbolSampler::new(weights)?;
        let total = self.config.samples_for(method);
        if total == 0 {
            return Err(LrError::InvalidParam(format!("{} estimate with zero samples", method)));
        }

        let resolver_config = self.resolver.config();
        let p_punish = weights.probability(resolver_config.punishment_symbol)?;

        // ── pre-seed every reachable entry ──
        let mut slots: Vec<Slot> = Vec::with_capacity(scheme.rules().len() + 8);
        let jackpot_slot = slots.len();
        slots.push(Slot::sampled(
            BONUS_JACKPOT_NAME,
            ResolvedKind::BonusJackpot,
            resolver_config.bonus_jackpot_multiplier,
        ));
        let symmetric_slot = if scheme.has_symmetric_rule() {
            None
        } else {
            slots.push(Slot::sampled(
                SYMMETRIC_NAME,
                ResolvedKind::Symmetric,
                resolver_config.symmetric_multiplier,
            ));
            Some(slots.len() - 1)
        };
        let rule_base = slots.len();
        for rule in scheme.rules() {
            slots.push(Slot::sampled(
                rule.name.clone(),
                ResolvedKind::Rule { rule_id: rule.id },
                rule.multiplier,
            ));
        }
        let bonus_slot = slots.len();
        slots.push(Slot::sampled(
            BONUS_ONLY_NAME,
            ResolvedKind::BonusOnly,
            resolver_config.bonus_level(1),
        ));
        let no_win_slot = slots.len();
        slots.push(Slot::sampled(NO_WIN_NAME, ResolvedKind::NoWin, 0.0));
        let tier_base = slots.len();
        for tier in scheme.tiers() {
            slots.push(Slot {
                name: tier.rule_name(),
                kind: ResolvedKind::Punishment { count: tier.count },
                multiplier: tier.signed_multiplier(),
                tally: Tally::default(),
                exact: Some(binomial_probability(
                    OUTCOME_LEN as u32,
                    tier.count as u32,
                    p_punish,
                )),
            });
        }

        // ── simulate ──
        let mut rng = match self.config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_os_rng(),
        };
        let interval = self.config.progress_interval;
        let mut wins = 0u64;

        if options.cancel.is_some_and(|c| c.is_cancelled()) {
            return Err(LrError::Cancelled { completed: 0 });
        }

        for done in 1..=total {
            let outcome = sampler.sample_outcome(&mut rng);
            let resolution = self
                .resolver
                .evaluate(&outcome, scheme, options.strict_any_mode);

            if resolution.multiplier > 0.0 {
                wins += 1;
            }

            let slot = match resolution.kind {
                ResolvedKind::BonusJackpot => Some(jackpot_slot),
                ResolvedKind::Symmetric => symmetric_slot,
                ResolvedKind::Rule { .. } => resolution.rule_index.map(|i| rule_base + i),
                ResolvedKind::BonusOnly => Some(bonus_slot),
                ResolvedKind::NoWin => Some(no_win_slot),
                // tallied for reference only, probability is exact
                ResolvedKind::Punishment { count } => slots[tier_base..]
                    .iter()
                    .position(|s| s.kind == ResolvedKind::Punishment { count })
                    .map(|i| tier_base + i),
            };
            if let Some(slot) = slot {
                let tally = &mut slots[slot].tally;
                tally.hits += 1;
                tally.multiplier_sum += resolution.multiplier;
            }

            if interval > 0 && (done % interval == 0 || done == total) {
                if let Some(callback) = options.progress.as_deref_mut() {
                    callback(Progress {
                        completed: done,
                        total,
                        percentage: done as f64 / total as f64 * 100.0,
                    });
                }
                if options.cancel.is_some_and(|c| c.is_cancelled()) {
                    log::info!("[Estimator] Cancelled after {}/{} draws", done, total);
                    return Err(LrError::Cancelled { completed: done });
                }
            }
        }

        // ── build table ──
        let n = total as f64;
        let entries: Vec<TableEntry> = slots
            .into_iter()
            .map(|slot| {
                let mean_multiplier = if slot.tally.hits > 0 && slot.exact.is_none() {
                    slot.tally.multiplier_sum / slot.tally.hits as f64
                } else {
                    slot.multiplier
                };
                let (probability, expected_value, source) = match slot.exact {
                    Some(p) => (p * 100.0, p * slot.multiplier * 100.0, EntrySource::Exact),
                    None => (
                        slot.tally.hits as f64 / n * 100.0,
                        slot.tally.multiplier_sum / n * 100.0,
                        EntrySource::Sampled,
                    ),
                };
                TableEntry {
                    rule_name: slot.name,
                    kind: slot.kind,
                    multiplier: slot.multiplier,
                    mean_multiplier,
                    probability,
                    expected_value,
                    hits: slot.tally.hits,
                    source,
                }
            })
            .collect();

        let rtp: f64 = entries.iter().map(|e| e.expected_value).sum();
        let within_bounds = self.bounds.contains(rtp);
        let duration_ms = started.elapsed().as_millis() as u64;

        log::info!(
            "[Estimator] {} estimate weights #{} scheme #{}: RTP {:.2}% ({} draws, {} ms)",
            method,
            weights.id,
            scheme.id,
            rtp,
            total,
            duration_ms
        );
        if !within_bounds {
            log::warn!(
                "[Estimator] RTP {:.2}% for weights #{} scheme #{} outside {:.1}%..{:.1}%",
                rtp,
                weights.id,
                scheme.id,
                self.bounds.min,
                self.bounds.max
            );
        }

        Ok(ProbabilityTable {
            weight_config_id: weights.id,
            scheme_id: scheme.id,
            method,
            strict_any_mode: options.strict_any_mode,
            entries,
            rtp,
            house_edge: 100.0 - rtp,
            hit_rate: wins as f64 / n * 100.0,
            samples: total,
            duration_ms,
            within_bounds,
        })
    }
}

//! Reward resolver: turns an outcome into exactly one payout result
//!
//! Evaluation order (first applicable step wins):
//!
//! ```text
//! 1. four bonus symbols        → bonus jackpot (terminal)
//!    otherwise longest bonus run → carried bonus multiplier
//! 2. punishment count with an active tier → negative multiplier + ban
//! 3. ABBA shape, no explicit symmetric rule → static symmetric payout
//! 4. scheme rules by priority   → first match, bonus stacked where allowed
//! 5. carried bonus > 1          → bonus-only payout
//! 6. otherwise                  → no win
//! ```

use serde::{Deserialize, Serialize};

use lr_core::{LrResult, OUTCOME_LEN, Outcome};

use crate::config::ResolverConfig;
use crate::matcher::{is_symmetric, matches};
use crate::pattern::MatchPattern;
use crate::rules::RewardScheme;

pub const BONUS_JACKPOT_NAME: &str = "bonus jackpot";
pub const SYMMETRIC_NAME: &str = "symmetric";
pub const BONUS_ONLY_NAME: &str = "bonus";
pub const NO_WIN_NAME: &str = "no win";

/// Which step produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolvedKind {
    BonusJackpot,
    Punishment { count: u8 },
    Symmetric,
    Rule { rule_id: u64 },
    BonusOnly,
    NoWin,
}

/// Compact resolution, no allocation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub kind: ResolvedKind,
    /// Index into `RewardScheme::rules()` for `ResolvedKind::Rule`
    pub rule_index: Option<usize>,
    /// Signed payout multiplier
    pub multiplier: f64,
    /// Bonus multiplier carried from step 1
    pub bonus_multiplier: f64,
    /// Bonus multiplier was folded into a rule payout
    pub stacked: bool,
}

impl Resolution {
    fn fixed(kind: ResolvedKind, multiplier: f64, bonus_multiplier: f64) -> Self {
        Self {
            kind,
            rule_index: None,
            multiplier,
            bonus_multiplier,
            stacked: false,
        }
    }
}

/// Ban side effect of a punishment result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunishmentHit {
    pub count: u8,
    pub ban_hours: u32,
}

/// Named result handed to the record writer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedOutcome {
    pub rule_name: String,
    pub kind: ResolvedKind,
    /// Signed payout multiplier (negative = penalty)
    pub multiplier: f64,
    pub bonus_spin: bool,
    pub bonus_multiplier: f64,
    pub punishment: Option<PunishmentHit>,
}

impl ResolvedOutcome {
    /// Check if this pays out
    pub fn is_win(&self) -> bool {
        self.multiplier > 0.0
    }

    /// Check if this deducts
    pub fn is_penalty(&self) -> bool {
        self.multiplier < 0.0
    }
}

/// Stateless resolver over a fixed set of constants
#[derive(Debug, Clone)]
pub struct RewardResolver {
    config: ResolverConfig,
}

impl RewardResolver {
    /// Create with validated constants
    pub fn new(config: ResolverConfig) -> LrResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve an outcome to a named result
    pub fn resolve(
        &self,
        outcome: &Outcome,
        scheme: &RewardScheme,
        strict_any_mode: bool,
    ) -> ResolvedOutcome {
        let resolution = self.evaluate(outcome, scheme, strict_any_mode);
        self.describe(&resolution, scheme)
    }

    /// Resolve without building names
    pub fn evaluate(
        &self,
        outcome: &Outcome,
        scheme: &RewardScheme,
        strict_any_mode: bool,
    ) -> Resolution {
        let cfg = &self.config;

        // ── 1. bonus accumulation ──
        if outcome.count(cfg.bonus_symbol) == OUTCOME_LEN {
            return Resolution::fixed(ResolvedKind::BonusJackpot, cfg.bonus_jackpot_multiplier, 1.0);
        }
        let bonus_run = outcome.longest_run_of(cfg.bonus_symbol);
        let bonus_multiplier = cfg.bonus_level(bonus_run);

        // ── 2. punishment ──
        let punished = outcome.count(cfg.punishment_symbol);
        if let Some(tier) = scheme.tier_for(punished) {
            return Resolution::fixed(
                ResolvedKind::Punishment { count: tier.count },
                tier.signed_multiplier(),
                bonus_multiplier,
            );
        }

        // ── 3. static symmetric ──
        if is_symmetric(outcome) && !scheme.has_symmetric_rule() {
            let mut multiplier = cfg.symmetric_multiplier;
            if outcome.at(1) == cfg.bonus_symbol {
                multiplier *= cfg.symmetric_bonus_factor;
            }
            return Resolution::fixed(ResolvedKind::Symmetric, multiplier, bonus_multiplier);
        }

        // ── 4. scheme rules ──
        for (index, rule) in scheme.rules().iter().enumerate() {
            if !matches(outcome, rule, strict_any_mode) {
                continue;
            }
            let stackable = rule.pattern.stacks_bonus(strict_any_mode)
                || (rule.pattern == MatchPattern::DoublePair && bonus_run == 2);
            let stacked = stackable && bonus_multiplier > 1.0 && !rule.isolates(cfg.bonus_symbol);
            let multiplier = if stacked {
                rule.multiplier * bonus_multiplier
            } else {
                rule.multiplier
            };
            return Resolution {
                kind: ResolvedKind::Rule { rule_id: rule.id },
                rule_index: Some(index),
                multiplier,
                bonus_multiplier,
                stacked,
            };
        }

        // ── 5/6. residual bonus or nothing ──
        if bonus_multiplier > 1.0 {
            Resolution::fixed(ResolvedKind::BonusOnly, bonus_multiplier, bonus_multiplier)
        } else {
            Resolution::fixed(ResolvedKind::NoWin, 0.0, bonus_multiplier)
        }
    }

    /// Attach names and side effects to a resolution produced against `scheme`
    pub fn describe(&self, resolution: &Resolution, scheme: &RewardScheme) -> ResolvedOutcome {
        let mut resolved = ResolvedOutcome {
            rule_name: String::new(),
            kind: resolution.kind,
            multiplier: resolution.multiplier,
            bonus_spin: false,
            bonus_multiplier: resolution.bonus_multiplier,
            punishment: None,
        };

        match resolution.kind {
            ResolvedKind::BonusJackpot => resolved.rule_name = BONUS_JACKPOT_NAME.to_string(),
            ResolvedKind::Punishment { count } => {
                let tier = scheme.tier_for(count as usize);
                resolved.rule_name = tier
                    .map(|t| t.rule_name())
                    .unwrap_or_else(|| format!("punishment x{}", count));
                resolved.punishment = Some(PunishmentHit {
                    count,
                    ban_hours: tier.map(|t| t.ban_hours).unwrap_or(0),
                });
            }
            ResolvedKind::Symmetric => resolved.rule_name = SYMMETRIC_NAME.to_string(),
            ResolvedKind::Rule { rule_id } => {
                let rule = resolution
                    .rule_index
                    .and_then(|i| scheme.rules().get(i))
                    .filter(|r| r.id == rule_id)
                    .or_else(|| scheme.rules().iter().find(|r| r.id == rule_id));
                if let Some(rule) = rule {
                    resolved.bonus_spin = rule.bonus_spin;
                    resolved.rule_name = if resolution.stacked {
                        format!("{} + bonus x{}", rule.name, resolution.bonus_multiplier)
                    } else {
                        rule.name.clone()
                    };
                } else {
                    resolved.rule_name = format!("rule #{}", rule_id);
                }
            }
            ResolvedKind::BonusOnly => resolved.rule_name = BONUS_ONLY_NAME.to_string(),
            ResolvedKind::NoWin => resolved.rule_name = NO_WIN_NAME.to_string(),
        }

        resolved
    }
}

impl Default for RewardResolver {
    fn default() -> Self {
        Self {
            config: ResolverConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{PunishmentTier, RewardRule};
    use lr_core::SymbolKind::{self, *};

    fn o(symbols: [SymbolKind; 4]) -> Outcome {
        Outcome::new(symbols)
    }

    fn scheme(rules: Vec<RewardRule>, tiers: Vec<PunishmentTier>) -> RewardScheme {
        RewardScheme::new(1, rules, tiers).unwrap()
    }

    #[test]
    fn test_four_bonus_is_terminal() {
        let resolver = RewardResolver::default();
        let s = scheme(
            vec![RewardRule::new(1, "four", MatchPattern::Consecutive { run: 4 }, 32.0)],
            vec![],
        );
        let r = resolver.resolve(&o([Man, Man, Man, Man]), &s, false);
        assert_eq!(r.kind, ResolvedKind::BonusJackpot);
        assert_eq!(r.multiplier, 100.0);
        assert_eq!(r.rule_name, BONUS_JACKPOT_NAME);
    }

    #[test]
    fn test_punishment_beats_rules() {
        let resolver = RewardResolver::default();
        let s = scheme(
            vec![RewardRule::new(1, "double", MatchPattern::Any { count: 2 }, 2.0).with_priority(99)],
            vec![PunishmentTier::new(2, 2.0, 0)],
        );
        let r = resolver.resolve(&o([LawyerLetter, LawyerLetter, M, T]), &s, false);
        assert_eq!(r.kind, ResolvedKind::Punishment { count: 2 });
        assert_eq!(r.multiplier, -2.0);
        assert_eq!(r.punishment, Some(PunishmentHit { count: 2, ban_hours: 0 }));
        assert!(r.is_penalty());
    }

    #[test]
    fn test_punishment_without_tier_falls_through() {
        let resolver = RewardResolver::default();
        let s = scheme(
            vec![RewardRule::new(1, "double", MatchPattern::Any { count: 2 }, 2.0)],
            vec![PunishmentTier::new(1, 1.0, 0)],
        );
        let r = resolver.resolve(&o([LawyerLetter, LawyerLetter, M, T]), &s, false);
        assert_eq!(r.kind, ResolvedKind::Rule { rule_id: 1 });
        assert_eq!(r.multiplier, 2.0);
    }

    #[test]
    fn test_static_symmetric() {
        let resolver = RewardResolver::default();
        let s = scheme(vec![], vec![]);
        let r = resolver.resolve(&o([J, N, N, J]), &s, false);
        assert_eq!(r.kind, ResolvedKind::Symmetric);
        assert_eq!(r.multiplier, 5.0);

        // bonus symbol as the middle pair doubles it
        let r = resolver.resolve(&o([J, Man, Man, J]), &s, false);
        assert_eq!(r.multiplier, 10.0);
    }

    #[test]
    fn test_explicit_symmetric_rule_replaces_static() {
        let resolver = RewardResolver::default();
        let s = scheme(
            vec![RewardRule::new(4, "mirror", MatchPattern::Symmetric, 7.0)],
            vec![],
        );
        let r = resolver.resolve(&o([J, N, N, J]), &s, false);
        assert_eq!(r.kind, ResolvedKind::Rule { rule_id: 4 });
        assert_eq!(r.multiplier, 7.0);
        assert_eq!(r.rule_name, "mirror");
    }

    #[test]
    fn test_bonus_stacks_on_consecutive() {
        let resolver = RewardResolver::default();
        let s = scheme(
            vec![RewardRule::new(1, "three", MatchPattern::Consecutive { run: 3 }, 4.0)],
            vec![],
        );
        let r = resolver.resolve(&o([Basketball, Basketball, Basketball, Man]), &s, false);
        assert_eq!(r.multiplier, 10.0);
        assert_eq!(r.rule_name, "three + bonus x2.5");
    }

    #[test]
    fn test_bonus_not_stacked_on_any_when_lenient() {
        let resolver = RewardResolver::default();
        let s = scheme(
            vec![RewardRule::new(1, "three", MatchPattern::Any { count: 3 }, 4.0)],
            vec![],
        );
        let outcome = o([Basketball, Basketball, Man, Basketball]);
        assert_eq!(resolver.resolve(&outcome, &s, false).multiplier, 4.0);
    }

    #[test]
    fn test_isolating_rule_exempt_from_stacking() {
        let resolver = RewardResolver::default();
        let s = scheme(
            vec![
                RewardRule::new(1, "man run", MatchPattern::Consecutive { run: 3 }, 6.0)
                    .with_required([Man]),
            ],
            vec![],
        );
        let r = resolver.resolve(&o([Man, Man, Man, J]), &s, false);
        assert_eq!(r.multiplier, 6.0);
        assert_eq!(r.rule_name, "man run");
    }

    #[test]
    fn test_double_pair_stacks_with_bonus_pair() {
        let resolver = RewardResolver::default();
        let s = scheme(
            vec![RewardRule::new(1, "pairs", MatchPattern::DoublePair, 3.0)],
            vec![],
        );
        let r = resolver.resolve(&o([Man, Man, Overalls, Overalls]), &s, false);
        assert_eq!(r.multiplier, 15.0);
        let plain = resolver.resolve(&o([J, J, Overalls, Overalls]), &s, false);
        assert_eq!(plain.multiplier, 3.0);
    }

    #[test]
    fn test_residual_bonus_and_no_win() {
        let resolver = RewardResolver::default();
        let s = scheme(vec![], vec![]);
        let r = resolver.resolve(&o([J, Man, N, T]), &s, false);
        assert_eq!(r.kind, ResolvedKind::BonusOnly);
        assert_eq!(r.multiplier, 2.5);

        let r = resolver.resolve(&o([J, N, T, M]), &s, false);
        assert_eq!(r.kind, ResolvedKind::NoWin);
        assert_eq!(r.multiplier, 0.0);
        assert_eq!(r.rule_name, NO_WIN_NAME);
    }

    #[test]
    fn test_bonus_spin_copied_from_rule() {
        let resolver = RewardResolver::default();
        let s = scheme(
            vec![
                RewardRule::new(1, "four", MatchPattern::Consecutive { run: 4 }, 32.0)
                    .with_bonus_spin(true),
            ],
            vec![],
        );
        let r = resolver.resolve(&o([Basketball; 4]), &s, false);
        assert!(r.bonus_spin);
        assert_eq!(r.multiplier, 32.0);
    }
}

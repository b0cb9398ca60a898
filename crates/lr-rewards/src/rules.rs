//! Reward rules, punishment tiers and the scheme that groups them

use serde::{Deserialize, Serialize};

use lr_core::{LrError, LrResult, OUTCOME_LEN, SymbolKind};

use crate::pattern::MatchPattern;

/// One prioritized payout rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardRule {
    /// Configuration row id
    pub id: u64,
    /// Rule name reported on a match
    pub name: String,
    /// Match pattern
    pub pattern: MatchPattern,
    /// Required / target symbols; empty means no constraint
    #[serde(default)]
    pub required: Vec<SymbolKind>,
    /// Payout multiplier (fractional allowed)
    pub multiplier: f64,
    /// Grants a bonus spin
    #[serde(default)]
    pub bonus_spin: bool,
    /// Higher is evaluated first
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl RewardRule {
    /// Create an active rule with no required symbols
    pub fn new(id: u64, name: impl Into<String>, pattern: MatchPattern, multiplier: f64) -> Self {
        Self {
            id,
            name: name.into(),
            pattern,
            required: Vec::new(),
            multiplier,
            bonus_spin: false,
            priority: 0,
            active: true,
        }
    }

    /// Builder: set required symbols
    pub fn with_required(mut self, required: impl Into<Vec<SymbolKind>>) -> Self {
        self.required = required.into();
        self
    }

    /// Builder: set priority
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Builder: grant a bonus spin
    pub fn with_bonus_spin(mut self, bonus_spin: bool) -> Self {
        self.bonus_spin = bonus_spin;
        self
    }

    /// Builder: set active flag
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Rule's own required list names this symbol
    pub fn isolates(&self, kind: SymbolKind) -> bool {
        self.required.contains(&kind)
    }
}

/// Penalty applied for an exact punishment-symbol count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PunishmentTier {
    /// Punishment symbols in the outcome (1..=4)
    pub count: u8,
    /// Stake multiple deducted (positive; reported negated)
    pub deduct_multiplier: f64,
    /// Play ban after this result, in hours (0 = none)
    #[serde(default)]
    pub ban_hours: u32,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl PunishmentTier {
    pub fn new(count: u8, deduct_multiplier: f64, ban_hours: u32) -> Self {
        Self {
            count,
            deduct_multiplier,
            ban_hours,
            active: true,
        }
    }

    /// Builder: set active flag
    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Signed multiplier reported for this tier
    pub fn signed_multiplier(&self) -> f64 {
        -self.deduct_multiplier.abs()
    }

    /// Name reported for this tier
    pub fn rule_name(&self) -> String {
        format!("punishment x{}", self.count)
    }
}

/// Validated, ready-to-resolve rule set
///
/// Only active rows survive construction. Rules are kept in descending
/// priority; equal priorities keep their input order. Deserialization goes
/// through [`RewardScheme::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SchemeRows", into = "SchemeRows")]
pub struct RewardScheme {
    pub id: u64,
    rules: Vec<RewardRule>,
    /// Tier by punishment count, index = count - 1
    tiers: [Option<PunishmentTier>; OUTCOME_LEN],
}

impl RewardScheme {
    /// Build a scheme from rule and tier rows
    pub fn new(
        id: u64,
        rules: impl IntoIterator<Item = RewardRule>,
        tiers: impl IntoIterator<Item = PunishmentTier>,
    ) -> LrResult<Self> {
        let invalid = |reason: String| LrError::InvalidScheme {
            scheme_id: id,
            reason,
        };

        let mut rules: Vec<RewardRule> = rules.into_iter().filter(|r| r.active).collect();
        for rule in &rules {
            if !rule.multiplier.is_finite() {
                return Err(invalid(format!("rule '{}' has a non-finite multiplier", rule.name)));
            }
        }
        // stable sort keeps store order among equal priorities
        rules.sort_by(|a, b| b.priority.cmp(&a.priority));

        let mut slots: [Option<PunishmentTier>; OUTCOME_LEN] = Default::default();
        for tier in tiers.into_iter().filter(|t| t.active) {
            if tier.count == 0 || tier.count as usize > OUTCOME_LEN {
                return Err(invalid(format!(
                    "punishment tier count {} outside 1..={}",
                    tier.count, OUTCOME_LEN
                )));
            }
            if !tier.deduct_multiplier.is_finite() {
                return Err(invalid(format!(
                    "punishment tier {} has a non-finite multiplier",
                    tier.count
                )));
            }
            let slot = &mut slots[tier.count as usize - 1];
            if slot.is_some() {
                return Err(invalid(format!(
                    "two active punishment tiers for count {}",
                    tier.count
                )));
            }
            *slot = Some(tier);
        }

        Ok(Self {
            id,
            rules,
            tiers: slots,
        })
    }

    /// Active rules, highest priority first
    pub fn rules(&self) -> &[RewardRule] {
        &self.rules
    }

    /// Active tier for an exact punishment count
    pub fn tier_for(&self, count: usize) -> Option<&PunishmentTier> {
        count
            .checked_sub(1)
            .and_then(|i| self.tiers.get(i))
            .and_then(|t| t.as_ref())
    }

    /// All active tiers, ascending count
    pub fn tiers(&self) -> impl Iterator<Item = &PunishmentTier> {
        self.tiers.iter().flatten()
    }

    /// Scheme defines its own active `symmetric` rule
    pub fn has_symmetric_rule(&self) -> bool {
        self.rules
            .iter()
            .any(|r| r.pattern == MatchPattern::Symmetric)
    }
}

/// Serialized form of a scheme
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SchemeRows {
    id: u64,
    rules: Vec<RewardRule>,
    #[serde(default)]
    tiers: Vec<PunishmentTier>,
}

impl TryFrom<SchemeRows> for RewardScheme {
    type Error = LrError;

    fn try_from(rows: SchemeRows) -> LrResult<Self> {
        RewardScheme::new(rows.id, rows.rules, rows.tiers)
    }
}

impl From<RewardScheme> for SchemeRows {
    fn from(scheme: RewardScheme) -> Self {
        Self {
            id: scheme.id,
            rules: scheme.rules,
            tiers: scheme.tiers.into_iter().flatten().collect(),
        }
    }
}

//! Built-in reward schemes

use lr_core::LrResult;
use lr_core::SymbolKind::{J, M, N, T};

use crate::pattern::MatchPattern;
use crate::rules::{PunishmentTier, RewardRule, RewardScheme};

/// House rule set paired with `WeightConfig::standard()`
pub fn standard_rules() -> Vec<RewardRule> {
    vec![
        RewardRule::new(1, "jntm", MatchPattern::Sequence, 256.0)
            .with_required([J, N, T, M])
            .with_priority(100),
        RewardRule::new(2, "four of a kind", MatchPattern::Consecutive { run: 4 }, 32.0)
            .with_bonus_spin(true)
            .with_priority(90),
        RewardRule::new(3, "jntm any order", MatchPattern::Combination, 16.0)
            .with_required([J, N, T, M])
            .with_priority(80),
        RewardRule::new(4, "three in a row", MatchPattern::Consecutive { run: 3 }, 4.0)
            .with_priority(70),
        RewardRule::new(5, "double pair", MatchPattern::DoublePair, 3.0).with_priority(60),
        RewardRule::new(6, "three of a kind", MatchPattern::Any { count: 3 }, 2.0)
            .with_priority(50),
    ]
}

/// Lawyer-letter penalties, bans from three up
pub fn standard_tiers() -> Vec<PunishmentTier> {
    vec![
        PunishmentTier::new(1, 0.5, 0),
        PunishmentTier::new(2, 2.0, 0),
        PunishmentTier::new(3, 5.0, 24),
        PunishmentTier::new(4, 10.0, 72),
    ]
}

/// Standard scheme under the given id
pub fn standard_scheme(id: u64) -> LrResult<RewardScheme> {
    RewardScheme::new(id, standard_rules(), standard_tiers())
}

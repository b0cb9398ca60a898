//! Reward resolution scenarios against the standard house configuration
//!
//! Covers precedence (bonus jackpot, punishment, static symmetric), rule
//! priority, bonus stacking, strict `any` mode and the play glue.

use approx::assert_abs_diff_eq;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use lr_core::SymbolKind::{self, *};
use lr_core::{Outcome, WeightConfig};
use lr_rewards::{
    ConfigStore, GameVariant, MatchPattern, MemoryConfigStore, PlayRecord, PunishmentHit,
    PunishmentTier, ResolvedKind, ResolverConfig, RewardResolver, RewardRule, RewardScheme,
    SlotMachine, SymbolSampler, presets,
};

// ═══════════════════════════════════════════════════════════════════════════════
// TEST FIXTURES
// ═══════════════════════════════════════════════════════════════════════════════

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn outcome(symbols: [SymbolKind; 4]) -> Outcome {
    Outcome::new(symbols)
}

fn standard() -> (RewardResolver, RewardScheme) {
    (
        RewardResolver::default(),
        presets::standard_scheme(1).unwrap(),
    )
}

// ═══════════════════════════════════════════════════════════════════════════════
// FIXED SCENARIOS
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_jntm_sequence_pays_256() {
    let (resolver, scheme) = standard();
    let resolved = resolver.resolve(&outcome([J, N, T, M]), &scheme, false);
    assert_eq!(resolved.rule_name, "jntm");
    assert_eq!(resolved.multiplier, 256.0);
    assert!(!resolved.bonus_spin);
    assert!(resolved.punishment.is_none());
}

#[test]
fn test_four_basketballs_pay_32_with_bonus_spin() {
    let (resolver, scheme) = standard();
    let resolved = resolver.resolve(&outcome([Basketball; 4]), &scheme, false);
    assert_eq!(resolved.rule_name, "four of a kind");
    assert_eq!(resolved.multiplier, 32.0);
    assert!(resolved.bonus_spin);
}

#[test]
fn test_two_lawyer_letters_deduct_two() {
    let resolver = RewardResolver::default();
    let scheme = RewardScheme::new(5, vec![], vec![PunishmentTier::new(2, 2.0, 0)]).unwrap();
    let resolved = resolver.resolve(&outcome([LawyerLetter, LawyerLetter, M, T]), &scheme, false);
    assert_eq!(resolved.multiplier, -2.0);
    assert_eq!(resolved.rule_name, "punishment x2");
    assert_eq!(
        resolved.punishment,
        Some(PunishmentHit {
            count: 2,
            ban_hours: 0
        })
    );
}

#[test]
fn test_abba_is_static_symmetric() {
    let (resolver, scheme) = standard();
    for symbols in [[J, N, N, J], [Backdrop, Overalls, Overalls, Backdrop]] {
        let resolved = resolver.resolve(&outcome(symbols), &scheme, false);
        assert_eq!(resolved.kind, ResolvedKind::Symmetric);
        assert_eq!(resolved.multiplier, 5.0);
    }
}

#[test]
fn test_four_bonus_symbols_is_jackpot() {
    let (resolver, scheme) = standard();
    let resolved = resolver.resolve(&outcome([Man; 4]), &scheme, false);
    assert_eq!(resolved.kind, ResolvedKind::BonusJackpot);
    assert_eq!(resolved.multiplier, 100.0);
    // jackpot wins over the 4-consecutive rule
    assert!(!resolved.bonus_spin);
}

// ═══════════════════════════════════════════════════════════════════════════════
// PRECEDENCE / PRIORITY
// ═══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_punishment_beats_matching_rule() {
    let (resolver, scheme) = standard();
    let draw = outcome([LawyerLetter, Basketball, Basketball, Basketball]);
    let resolved = resolver.resolve(&draw, &scheme, false);
    assert_eq!(resolved.kind, ResolvedKind::Punishment { count: 1 });
    assert_abs_diff_eq!(resolved.multiplier, -0.5);
}

#[test]
fn test_higher_priority_rule_wins_regardless_of_order() {
    let resolver = RewardResolver::default();
    let low = RewardRule::new(1, "low", MatchPattern::Any { count: 2 }, 2.0).with_priority(1);
    let high = RewardRule::new(2, "high", MatchPattern::DoublePair, 9.0).with_priority(5);
    let draw = outcome([N, N, T, T]);

    for rules in [vec![low.clone(), high.clone()], vec![high, low]] {
        let scheme = RewardScheme::new(1, rules, vec![]).unwrap();
        let resolved = resolver.resolve(&draw, &scheme, false);
        assert_eq!(resolved.rule_name, "high");
        assert_eq!(resolved.multiplier, 9.0);
    }
}

#[test]
fn test_bonus_stacks_on_run() {
    let (resolver, scheme) = standard();
    let resolved = resolver.resolve(&outcome([Basketball, Basketball, Basketball, Man]), &scheme, false);
    assert_eq!(resolved.rule_name, "three in a row + bonus x2.5");
    assert_eq!(resolved.multiplier, 10.0);
}

#[test]
fn test_strict_any_requires_run() {
    let (resolver, scheme) = standard();
    let scattered = outcome([Basketball, J, Basketball, Basketball]);

    let lenient = resolver.resolve(&scattered, &scheme, false);
    assert_eq!(lenient.rule_name, "three of a kind");

    let strict = resolver.resolve(&scattered, &scheme, true);
    assert_eq!(strict.kind, ResolvedKind::NoWin);
}

#[test]
fn test_resolve_is_pure() {
    let (resolver, scheme) = standard();
    let sampler = SymbolSampler::new(&WeightConfig::standard(1)).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    for _ in 0..2_000 {
        let draw = sampler.sample_outcome(&mut rng);
        let a = resolver.resolve(&draw, &scheme, false);
        let b = resolver.resolve(&draw, &scheme, false);
        assert_eq!(a, b);
    }
}

#[test]
fn test_custom_constants() {
    let resolver = RewardResolver::new(ResolverConfig {
        symmetric_multiplier: 7.0,
        ..Default::default()
    })
    .unwrap();
    let scheme = RewardScheme::new(1, vec![], vec![]).unwrap();
    assert_eq!(resolver.resolve(&outcome([T, M, M, T]), &scheme, false).multiplier, 7.0);
}

// ═══════════════════════════════════════════════════════════════════════════════
// STORE → PLAY
// ═══════════════════════════════════════════════════════════════════════════════

const CONFIG_JSON: &str = r#"{
    "weights": [
        { "id": 3, "name": "lq-heavy", "weights": { "LQ": 1 } }
    ],
    "rules": [
        { "id": 10, "scheme_id": 4, "name": "four lq", "pattern": "4-consecutive",
          "required_symbols": "LQ", "multiplier": 32, "bonus_spin": true, "priority": 10 },
        { "id": 11, "scheme_id": 4, "name": "broken", "pattern": "spiral", "multiplier": 99,
          "priority": 99 },
        { "id": 12, "scheme_id": 4, "name": "pairs", "pattern": "double_pair",
          "required_symbols": "[oops", "multiplier": 3, "priority": 1 }
    ],
    "tiers": [
        { "scheme_id": 4, "punishment_count": 1, "deduct_multiplier": 0.5 }
    ],
    "variants": [
        { "variant": "normal", "weight_config_id": 3, "scheme_id": 4 }
    ]
}"#;

#[test]
fn test_json_store_end_to_end() {
    init_logger();
    let store = MemoryConfigStore::from_json(CONFIG_JSON).unwrap();

    let scheme = store.load_scheme(4).unwrap();
    // unknown pattern and malformed list both skipped
    assert_eq!(scheme.rules().len(), 1);
    assert_eq!(scheme.rules()[0].name, "four lq");

    let machine = SlotMachine::new(store, ResolverConfig::default()).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let mut sink: Vec<PlayRecord> = Vec::new();
    let record = machine
        .play_and_record(GameVariant::Normal, 5, &mut rng, &mut sink)
        .unwrap();

    assert_eq!(record.rule_name, "four lq");
    assert_eq!(record.win, 160);
    assert!(record.bonus_spin);
    assert_eq!(sink, vec![record]);
}

#[test]
fn test_malformed_symbol_list_never_pays() {
    init_logger();
    let json = r#"{
        "weights": [{ "id": 1, "name": "j-heavy", "weights": { "J": 1 } }],
        "rules": [
            { "id": 1, "scheme_id": 1, "name": "man run", "pattern": "3-consecutive",
              "required_symbols": "[\"MAN\"", "multiplier": 50, "priority": 10 }
        ],
        "variants": [{ "variant": "normal", "weight_config_id": 1, "scheme_id": 1 }]
    }"#;
    let store = MemoryConfigStore::from_json(json).unwrap();
    let scheme = store.load_scheme(1).unwrap();
    assert!(scheme.rules().is_empty());

    let resolved = RewardResolver::default().resolve(&outcome([J, J, J, N]), &scheme, false);
    assert_ne!(resolved.rule_name, "man run");
    assert_eq!(resolved.multiplier, 0.0);
}

#[test]
fn test_unbound_variant_is_missing_configuration() {
    let store = MemoryConfigStore::from_json(CONFIG_JSON).unwrap();
    let machine = SlotMachine::new(store, ResolverConfig::default()).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    assert!(machine.play(GameVariant::Supreme, 5, &mut rng).is_err());
}

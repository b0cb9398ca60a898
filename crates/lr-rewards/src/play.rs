//! Play glue: one draw for a variant, resolved and handed to a record sink

use rand::Rng;
use serde::{Deserialize, Serialize};

use lr_core::{LrError, LrResult, Outcome};

use crate::config::ResolverConfig;
use crate::resolver::{PunishmentHit, ResolvedKind, RewardResolver};
use crate::sampler::SymbolSampler;
use crate::store::ConfigStore;
use crate::variant::{GameVariant, SchemeLoader};

/// Result of one play, ready for the ledger writer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayRecord {
    pub variant: GameVariant,
    pub weight_config_id: u64,
    pub scheme_id: u64,
    pub outcome: Outcome,
    pub rule_name: String,
    pub kind: ResolvedKind,
    pub multiplier: f64,
    pub bet: i64,
    /// trunc(bet × multiplier); negative is a deduction
    pub win: i64,
    pub bonus_spin: bool,
    pub punishment: Option<PunishmentHit>,
}

/// Write-only destination for play records
pub trait RecordSink {
    fn record(&mut self, record: &PlayRecord) -> LrResult<()>;
}

impl RecordSink for Vec<PlayRecord> {
    fn record(&mut self, record: &PlayRecord) -> LrResult<()> {
        self.push(record.clone());
        Ok(())
    }
}

/// Plays variants against a configuration store
pub struct SlotMachine<S: ConfigStore> {
    store: S,
    resolver: RewardResolver,
}

impl<S: ConfigStore> SlotMachine<S> {
    pub fn new(store: S, config: ResolverConfig) -> LrResult<Self> {
        Ok(Self {
            store,
            resolver: RewardResolver::new(config)?,
        })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Draw, resolve and price one play
    pub fn play<R: Rng + ?Sized>(
        &self,
        variant: GameVariant,
        bet: i64,
        rng: &mut R,
    ) -> LrResult<PlayRecord> {
        if bet <= 0 {
            return Err(LrError::InvalidParam(format!("bet must be positive, got {}", bet)));
        }

        let loaded = SchemeLoader::new(&self.store).load(variant)?;
        let outcome = SymbolSampler::new(&loaded.weights)?.sample_outcome(rng);
        let resolved = self
            .resolver
            .resolve(&outcome, &loaded.scheme, loaded.binding.strict_any_mode);

        let win = (bet as f64 * resolved.multiplier).trunc() as i64;

        Ok(PlayRecord {
            variant,
            weight_config_id: loaded.weights.id,
            scheme_id: loaded.scheme.id,
            outcome,
            rule_name: resolved.rule_name,
            kind: resolved.kind,
            multiplier: resolved.multiplier,
            bet,
            win,
            bonus_spin: resolved.bonus_spin,
            punishment: resolved.punishment,
        })
    }

    /// Play and hand the record to `sink`
    pub fn play_and_record<R: Rng + ?Sized>(
        &self,
        variant: GameVariant,
        bet: i64,
        rng: &mut R,
        sink: &mut dyn RecordSink,
    ) -> LrResult<PlayRecord> {
        let record = self.play(variant, bet, rng)?;
        sink.record(&record)?;
        Ok(record)
    }
}

/// Running totals over recorded plays
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_plays: u64,
    pub total_bet: i64,
    pub total_win: i64,
    pub wins: u64,
    pub penalties: u64,
    pub bonus_spins: u64,
    pub max_multiplier: f64,
}

impl SessionStats {
    pub fn record(&mut self, play: &PlayRecord) {
        self.total_plays += 1;
        self.total_bet += play.bet;
        self.total_win += play.win;
        if play.multiplier > 0.0 {
            self.wins += 1;
        } else if play.multiplier < 0.0 {
            self.penalties += 1;
        }
        if play.bonus_spin {
            self.bonus_spins += 1;
        }
        self.max_multiplier = self.max_multiplier.max(play.multiplier);
    }

    /// Calculate RTP
    pub fn rtp(&self) -> f64 {
        if self.total_bet > 0 {
            (self.total_win as f64 / self.total_bet as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Calculate hit rate
    pub fn hit_rate(&self) -> f64 {
        if self.total_plays > 0 {
            (self.wins as f64 / self.total_plays as f64) * 100.0
        } else {
            0.0
        }
    }
}

impl RecordSink for SessionStats {
    fn record(&mut self, record: &PlayRecord) -> LrResult<()> {
        SessionStats::record(self, record);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryConfigStore;
    use lr_core::SymbolKind;
    use lr_core::WeightConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn machine() -> SlotMachine<MemoryConfigStore> {
        SlotMachine::new(MemoryConfigStore::standard().unwrap(), ResolverConfig::default()).unwrap()
    }

    #[test]
    fn test_rejects_non_positive_bet() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(machine().play(GameVariant::Normal, 0, &mut rng).is_err());
    }

    #[test]
    fn test_win_is_truncated() {
        // only lawyer letters: every play is the x4 punishment
        let store = MemoryConfigStore::standard().unwrap();
        store.insert_weight_config(
            WeightConfig::new(1, "lsh").with_weight(SymbolKind::LawyerLetter, 1),
        );
        let machine = SlotMachine::new(store, ResolverConfig::default()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let record = machine.play(GameVariant::Normal, 15, &mut rng).unwrap();
        assert_eq!(record.win, -150);
        assert_eq!(record.punishment.unwrap().ban_hours, 72);
    }

    #[test]
    fn test_fractional_multiplier_truncates() {
        let store = MemoryConfigStore::standard().unwrap();
        store.insert_weight_config(
            WeightConfig::new(1, "lsh-j")
                .with_weight(SymbolKind::LawyerLetter, 1)
                .with_weight(SymbolKind::J, 1_000_000),
        );
        let machine = SlotMachine::new(store, ResolverConfig::default()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut sink: Vec<PlayRecord> = Vec::new();
        for _ in 0..50 {
            machine
                .play_and_record(GameVariant::Normal, 3, &mut rng, &mut sink)
                .unwrap();
        }
        assert_eq!(sink.len(), 50);
        for record in &sink {
            assert_eq!(record.win, (3.0 * record.multiplier).trunc() as i64);
        }
    }

    #[test]
    fn test_session_stats() {
        let machine = machine();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut stats = SessionStats::default();
        for _ in 0..1_000 {
            machine
                .play_and_record(GameVariant::Advanced, 10, &mut rng, &mut stats)
                .unwrap();
        }
        assert_eq!(stats.total_plays, 1_000);
        assert_eq!(stats.total_bet, 10_000);
        assert!(stats.hit_rate() > 0.0);
    }
}

//! Row parser: persisted configuration rows into typed entities
//!
//! Rows arrive loosely typed: symbol lists are stored as text (a JSON array
//! or comma-separated codes), patterns as names. Everything is checked here
//! once so the resolver only ever sees validated data.
//!
//! ## Recovery
//!
//! - malformed symbol list or unknown symbol code → rule skipped
//! - unknown / malformed pattern → rule skipped
//! - unknown symbol code in a weight table → entry skipped
//!
//! Each recovery logs a warning.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let parser = RowParser::new();
//! let parsed = parser.parse_json(json_string)?;
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use lr_core::{LrError, LrResult, SymbolKind, WeightConfig};

use crate::pattern::MatchPattern;
use crate::rules::{PunishmentTier, RewardRule};
use crate::variant::{GameVariant, VariantBinding};

// ═══════════════════════════════════════════════════════════════════════════════
// RAW ROWS
// ═══════════════════════════════════════════════════════════════════════════════

/// Persisted weight table, keyed by symbol code
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawWeightConfig {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    pub weights: BTreeMap<String, u32>,
}

/// Persisted reward rule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRewardRule {
    pub id: u64,
    pub scheme_id: u64,
    pub name: String,
    pub pattern: String,
    #[serde(default)]
    pub match_count: Option<u8>,
    /// JSON array text, comma-separated codes, or an inline array
    #[serde(default)]
    pub required_symbols: Option<serde_json::Value>,
    pub multiplier: f64,
    #[serde(default)]
    pub bonus_spin: bool,
    #[serde(default)]
    pub priority: i32,
    #[serde(default = "default_true")]
    pub active: bool,
}

/// Persisted punishment tier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPunishmentTier {
    pub scheme_id: u64,
    pub punishment_count: u8,
    pub deduct_multiplier: f64,
    #[serde(default)]
    pub ban_hours: u32,
    #[serde(default = "default_true")]
    pub active: bool,
}

/// Persisted variant binding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawVariantBinding {
    pub variant: String,
    pub weight_config_id: u64,
    pub scheme_id: u64,
    #[serde(default)]
    pub strict_any_mode: Option<bool>,
    #[serde(default = "default_true")]
    pub live: bool,
}

/// Complete configuration export
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawConfigDocument {
    #[serde(default)]
    pub weights: Vec<RawWeightConfig>,
    #[serde(default)]
    pub rules: Vec<RawRewardRule>,
    #[serde(default)]
    pub tiers: Vec<RawPunishmentTier>,
    #[serde(default)]
    pub variants: Vec<RawVariantBinding>,
}

fn default_true() -> bool {
    true
}

/// Typed result of parsing a document
#[derive(Debug, Clone, Default)]
pub struct ParsedConfig {
    pub weights: Vec<WeightConfig>,
    /// (scheme id, rule), store order
    pub rules: Vec<(u64, RewardRule)>,
    /// (scheme id, tier)
    pub tiers: Vec<(u64, PunishmentTier)>,
    pub bindings: Vec<VariantBinding>,
    /// Rules dropped during parsing
    pub skipped_rules: usize,
}

// ═══════════════════════════════════════════════════════════════════════════════
// PARSER
// ═══════════════════════════════════════════════════════════════════════════════

/// Parsing limits
#[derive(Debug, Clone)]
pub struct RowLimits {
    pub max_name_length: usize,
    pub max_multiplier: f64,
}

impl Default for RowLimits {
    fn default() -> Self {
        Self {
            max_name_length: 128,
            max_multiplier: 100_000.0,
        }
    }
}

/// Row parser
#[derive(Debug, Clone, Default)]
pub struct RowParser {
    pub limits: RowLimits,
}

impl RowParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create parser with custom limits
    pub fn with_limits(limits: RowLimits) -> Self {
        Self { limits }
    }

    /// Parse a JSON configuration document
    pub fn parse_json(&self, json: &str) -> LrResult<ParsedConfig> {
        let doc: RawConfigDocument = serde_json::from_str(json)
            .map_err(|e| LrError::Serialization(format!("Invalid config document: {}", e)))?;
        self.parse_document(doc)
    }

    /// Parse an already deserialized document
    pub fn parse_document(&self, doc: RawConfigDocument) -> LrResult<ParsedConfig> {
        let mut parsed = ParsedConfig::default();

        for raw in &doc.weights {
            parsed.weights.push(self.parse_weights(raw));
        }

        for raw in &doc.rules {
            match self.parse_rule(raw) {
                Ok(rule) => parsed.rules.push((raw.scheme_id, rule)),
                Err(e) => {
                    log::warn!(
                        "[Parser] Skipping rule #{} '{}' of scheme #{}: {}",
                        raw.id,
                        raw.name,
                        raw.scheme_id,
                        e
                    );
                    parsed.skipped_rules += 1;
                }
            }
        }

        for raw in &doc.tiers {
            parsed.tiers.push((raw.scheme_id, self.parse_tier(raw)?));
        }

        for raw in &doc.variants {
            parsed.bindings.push(self.parse_binding(raw)?);
        }

        Ok(parsed)
    }

    /// Typed weight table; unknown codes are dropped
    pub fn parse_weights(&self, raw: &RawWeightConfig) -> WeightConfig {
        let mut config = WeightConfig::new(raw.id, raw.name.clone());
        for (code, &weight) in &raw.weights {
            match SymbolKind::from_code(code) {
                Some(kind) => config.set(kind, weight),
                None => log::warn!(
                    "[Parser] Weight config #{}: ignoring unknown symbol '{}'",
                    raw.id,
                    code
                ),
            }
        }
        config
    }

    /// Typed rule; `Err` means the rule must be skipped
    pub fn parse_rule(&self, raw: &RawRewardRule) -> LrResult<RewardRule> {
        let malformed = |reason: String| LrError::MalformedRuleData {
            rule: raw.name.clone(),
            reason,
        };

        if raw.name.len() > self.limits.max_name_length {
            return Err(malformed(format!(
                "name too long: {} > {}",
                raw.name.len(),
                self.limits.max_name_length
            )));
        }
        if !raw.multiplier.is_finite() || raw.multiplier.abs() > self.limits.max_multiplier {
            return Err(malformed(format!("multiplier {} out of range", raw.multiplier)));
        }

        let pattern = MatchPattern::parse(&raw.pattern, raw.match_count)?;

        // an empty list widens consecutive/any rules, so a bad list drops the rule
        let required = self
            .parse_required(raw.required_symbols.as_ref())
            .map_err(|e| malformed(format!("bad required symbols: {}", e)))?;

        Ok(RewardRule {
            id: raw.id,
            name: raw.name.clone(),
            pattern,
            required,
            multiplier: raw.multiplier,
            bonus_spin: raw.bonus_spin,
            priority: raw.priority,
            active: raw.active,
        })
    }

    fn parse_required(&self, value: Option<&serde_json::Value>) -> LrResult<Vec<SymbolKind>> {
        use serde_json::Value;
        match value {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::String(text)) => parse_symbol_list(text),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(code) => code.parse::<SymbolKind>(),
                    other => Err(LrError::UnknownSymbol(other.to_string())),
                })
                .collect(),
            Some(other) => Err(LrError::MalformedRuleData {
                rule: other.to_string(),
                reason: "symbol list must be text or an array".to_string(),
            }),
        }
    }

    pub fn parse_tier(&self, raw: &RawPunishmentTier) -> LrResult<PunishmentTier> {
        if !raw.deduct_multiplier.is_finite()
            || raw.deduct_multiplier.abs() > self.limits.max_multiplier
        {
            return Err(LrError::InvalidScheme {
                scheme_id: raw.scheme_id,
                reason: format!(
                    "punishment tier {} multiplier {} out of range",
                    raw.punishment_count, raw.deduct_multiplier
                ),
            });
        }
        Ok(PunishmentTier {
            count: raw.punishment_count,
            deduct_multiplier: raw.deduct_multiplier.abs(),
            ban_hours: raw.ban_hours,
            active: raw.active,
        })
    }

    pub fn parse_binding(&self, raw: &RawVariantBinding) -> LrResult<VariantBinding> {
        let variant: GameVariant = raw.variant.parse()?;
        let mut binding = VariantBinding::new(variant, raw.weight_config_id, raw.scheme_id)
            .with_live(raw.live);
        if let Some(strict) = raw.strict_any_mode {
            binding = binding.with_strict_any_mode(strict);
        }
        Ok(binding)
    }
}

/// Parse a persisted symbol list
///
/// Accepts a JSON array (`["J","N"]`) or comma-separated codes (`J, N`).
/// Blank text, `null` and `[]` are the empty list.
pub fn parse_symbol_list(text: &str) -> LrResult<Vec<SymbolKind>> {
    let text = text.trim();
    if text.is_empty() || text.eq_ignore_ascii_case("null") {
        return Ok(Vec::new());
    }

    if text.starts_with('[') {
        let codes: Vec<String> = serde_json::from_str(text).map_err(|e| LrError::MalformedRuleData {
            rule: text.to_string(),
            reason: format!("bad symbol array: {}", e),
        })?;
        return codes.iter().map(|c| c.parse::<SymbolKind>()).collect();
    }

    text.split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::parse::<SymbolKind>)
        .collect()
}

//! Match pattern vocabulary

use serde::{Deserialize, Serialize};

use lr_core::{LrError, LrResult, OUTCOME_LEN};

/// How a rule inspects an outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchPattern {
    /// Outcome equals the required list, in order
    Sequence,
    /// Outcome contains every required symbol, any order
    Combination,
    /// Adjacent run of at least `run` identical symbols
    Consecutive { run: u8 },
    /// At least `count` occurrences of one symbol
    Any { count: u8 },
    /// MMNN
    DoublePair,
    /// ABBA
    Symmetric,
}

impl MatchPattern {
    /// Parse a persisted pattern name
    ///
    /// `match_count` supplies n for the bare `consecutive` / `any` names; a
    /// numeric prefix in the name (`3-consecutive`) takes precedence.
    pub fn parse(name: &str, match_count: Option<u8>) -> LrResult<Self> {
        let name = name.trim().to_ascii_lowercase();
        let (prefix, base) = match name.split_once('-') {
            Some((n, base)) => (Some(n), base),
            None => (None, name.as_str()),
        };

        let n = match prefix {
            Some(n) => Some(n.parse::<u8>().map_err(|_| LrError::UnknownPattern(name.clone()))?),
            None => match_count,
        };

        let pattern = match (base, prefix) {
            ("sequence", None) => Self::Sequence,
            ("combination", None) => Self::Combination,
            ("double_pair", None) => Self::DoublePair,
            ("symmetric", None) => Self::Symmetric,
            ("consecutive", _) => Self::Consecutive {
                run: Self::checked_n(&name, n)?,
            },
            ("any", _) => Self::Any {
                count: Self::checked_n(&name, n)?,
            },
            _ => return Err(LrError::UnknownPattern(name.clone())),
        };
        Ok(pattern)
    }

    fn checked_n(name: &str, n: Option<u8>) -> LrResult<u8> {
        match n {
            Some(n) if (1..=OUTCOME_LEN as u8).contains(&n) => Ok(n),
            Some(n) => Err(LrError::MalformedRuleData {
                rule: name.to_string(),
                reason: format!("match count {} outside 1..={}", n, OUTCOME_LEN),
            }),
            None => Err(LrError::MalformedRuleData {
                rule: name.to_string(),
                reason: "missing match count".to_string(),
            }),
        }
    }

    /// Patterns that stack the carried bonus multiplier
    ///
    /// `Any` only stacks under strict mode, where it is a run match.
    pub fn stacks_bonus(&self, strict_any_mode: bool) -> bool {
        match self {
            Self::Consecutive { .. } => true,
            Self::Any { .. } => strict_any_mode,
            Self::Sequence | Self::Combination | Self::DoublePair | Self::Symmetric => false,
        }
    }

    /// Canonical persisted name
    pub fn name(&self) -> String {
        match self {
            Self::Sequence => "sequence".to_string(),
            Self::Combination => "combination".to_string(),
            Self::Consecutive { run } => format!("{}-consecutive", run),
            Self::Any { count } => format!("{}-any", count),
            Self::DoublePair => "double_pair".to_string(),
            Self::Symmetric => "symmetric".to_string(),
        }
    }
}

impl std::fmt::Display for MatchPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}

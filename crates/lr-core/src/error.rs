//! Error types for Luckyreel

use thiserror::Error;

/// Kind of configuration row a lookup was made for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKind {
    WeightConfig,
    RewardScheme,
    GameVariant,
}

impl std::fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::WeightConfig => "weight config",
            Self::RewardScheme => "reward scheme",
            Self::GameVariant => "game variant",
        };
        f.write_str(name)
    }
}

/// Core error type
#[derive(Error, Debug)]
pub enum LrError {
    #[error("Configuration missing: {kind} {id}")]
    ConfigurationMissing { kind: ConfigKind, id: String },

    #[error("Degenerate weights: weight config {0} has total weight 0")]
    DegenerateWeights(u64),

    #[error("Malformed rule data in '{rule}': {reason}")]
    MalformedRuleData { rule: String, reason: String },

    #[error("Unknown match pattern: {0}")]
    UnknownPattern(String),

    #[error("Unknown symbol code: {0}")]
    UnknownSymbol(String),

    #[error("Invalid reward scheme {scheme_id}: {reason}")]
    InvalidScheme { scheme_id: u64, reason: String },

    #[error("Invalid parameter: {0}")]
    InvalidParam(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Estimation cancelled after {completed} draws")]
    Cancelled { completed: u64 },

    #[error("Record sink error: {0}")]
    Sink(String),
}

impl LrError {
    /// Missing-row error for a numeric id
    pub fn missing(kind: ConfigKind, id: impl ToString) -> Self {
        Self::ConfigurationMissing {
            kind,
            id: id.to_string(),
        }
    }
}

/// Result type alias
pub type LrResult<T> = Result<T, LrError>;

//! Four-symbol play outcome

use serde::{Deserialize, Serialize};

use crate::symbols::SymbolKind;

/// Number of symbols drawn per play
pub const OUTCOME_LEN: usize = 4;

/// Ordered result of one play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Outcome([SymbolKind; OUTCOME_LEN]);

impl Outcome {
    pub fn new(symbols: [SymbolKind; OUTCOME_LEN]) -> Self {
        Self(symbols)
    }

    /// Symbols in draw order
    #[inline]
    pub fn symbols(&self) -> &[SymbolKind; OUTCOME_LEN] {
        &self.0
    }

    /// Symbol at a position (0..4)
    #[inline]
    pub fn at(&self, position: usize) -> SymbolKind {
        self.0[position]
    }

    /// Number of occurrences of `kind`
    pub fn count(&self, kind: SymbolKind) -> usize {
        self.0.iter().filter(|&&s| s == kind).count()
    }

    pub fn contains(&self, kind: SymbolKind) -> bool {
        self.0.contains(&kind)
    }

    /// Longest adjacent run of `kind` (0 when absent)
    pub fn longest_run_of(&self, kind: SymbolKind) -> usize {
        let mut best = 0;
        let mut current = 0;
        for &s in &self.0 {
            if s == kind {
                current += 1;
                best = best.max(current);
            } else {
                current = 0;
            }
        }
        best
    }

    /// Longest adjacent run of any symbol, with the symbol forming it
    ///
    /// On ties the earliest run wins.
    pub fn longest_run(&self) -> (SymbolKind, usize) {
        let mut best = (self.0[0], 1);
        let mut current = 1;
        for i in 1..OUTCOME_LEN {
            if self.0[i] == self.0[i - 1] {
                current += 1;
            } else {
                current = 1;
            }
            if current > best.1 {
                best = (self.0[i], current);
            }
        }
        best
    }

    /// Highest occurrence count of any single symbol
    pub fn max_count(&self) -> usize {
        self.0.iter().map(|&s| self.count(s)).max().unwrap_or(0)
    }
}

impl From<[SymbolKind; OUTCOME_LEN]> for Outcome {
    fn from(symbols: [SymbolKind; OUTCOME_LEN]) -> Self {
        Self(symbols)
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}, {}, {}]", self.0[0], self.0[1], self.0[2], self.0[3])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SymbolKind::*;

    #[test]
    fn test_counts() {
        let o = Outcome::new([Basketball, Man, Basketball, Basketball]);
        assert_eq!(o.count(Basketball), 3);
        assert_eq!(o.count(J), 0);
        assert_eq!(o.max_count(), 3);
        assert!(o.contains(Man));
    }

    #[test]
    fn test_runs() {
        let o = Outcome::new([Basketball, Man, Man, Man]);
        assert_eq!(o.longest_run(), (Man, 3));
        assert_eq!(o.longest_run_of(Basketball), 1);
        assert_eq!(o.longest_run_of(J), 0);

        let split = Outcome::new([Man, J, Man, N]);
        assert_eq!(split.longest_run_of(Man), 1);
        assert_eq!(split.longest_run(), (Man, 1));
    }

    #[test]
    fn test_display() {
        let o = Outcome::new([J, N, T, M]);
        assert_eq!(o.to_string(), "[J, N, T, M]");
    }
}

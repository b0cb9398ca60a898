//! Rule matcher: evaluates one rule's pattern against an outcome

use lr_core::{OUTCOME_LEN, Outcome, SymbolKind};

use crate::pattern::MatchPattern;
use crate::rules::RewardRule;

/// Does `rule` match `outcome`?
///
/// Under `strict_any_mode` the `any` family requires an adjacent run instead
/// of a plain occurrence count.
pub fn matches(outcome: &Outcome, rule: &RewardRule, strict_any_mode: bool) -> bool {
    let required = rule.required.as_slice();
    match rule.pattern {
        MatchPattern::Sequence => {
            required.len() == OUTCOME_LEN && outcome.symbols().as_slice() == required
        }
        MatchPattern::Combination => {
            !required.is_empty() && required.iter().all(|&s| outcome.contains(s))
        }
        MatchPattern::Consecutive { run } => has_run(outcome, required, run as usize),
        MatchPattern::Any { count } if strict_any_mode => has_run(outcome, required, count as usize),
        MatchPattern::Any { count } => has_count(outcome, required, count as usize),
        MatchPattern::DoublePair => is_double_pair(outcome),
        MatchPattern::Symmetric => is_symmetric(outcome),
    }
}

/// Adjacent run of at least `n`, of a target symbol when targets are given
fn has_run(outcome: &Outcome, targets: &[SymbolKind], n: usize) -> bool {
    if targets.is_empty() {
        outcome.longest_run().1 >= n
    } else {
        targets.iter().any(|&t| outcome.longest_run_of(t) >= n)
    }
}

/// At least `n` occurrences, of a target symbol when targets are given
fn has_count(outcome: &Outcome, targets: &[SymbolKind], n: usize) -> bool {
    if targets.is_empty() {
        outcome.max_count() >= n
    } else {
        targets.iter().any(|&t| outcome.count(t) >= n)
    }
}

/// MMNN: both halves uniform, halves differ
pub fn is_double_pair(outcome: &Outcome) -> bool {
    let s = outcome.symbols();
    s[0] == s[1] && s[2] == s[3] && s[0] != s[2]
}

/// ABBA: palindrome with distinct halves
pub fn is_symmetric(outcome: &Outcome) -> bool {
    let s = outcome.symbols();
    s[0] == s[3] && s[1] == s[2] && s[0] != s[1]
}

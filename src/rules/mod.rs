//! Rule model, condition parsing and first-match-wins resolution
//!
//! A rule list is ordered. For every file the rules are tried top to bottom
//! and the first one whose predicate holds decides the destination folder.
//! A rule that fails to parse is treated as non-matching and reported, it
//! never stops the other rules from being tried.

pub mod condition;
pub mod matcher;
pub mod source;
pub mod types;

pub use condition::{Comparison, Predicate};
pub use matcher::{MatchOutcome, RuleMatch, RuleMatcher, SkippedRule, match_rule};
pub use source::{RuleFile, parse_rule_spec};
pub use types::{Rule, RuleError, RuleKind};

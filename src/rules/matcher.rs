//! First-match-wins rule resolution

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tracing::warn;

use super::condition::Predicate;
use super::types::{Rule, RuleError};
use crate::entry::FileEntry;

/// A rule together with the result of parsing it for the current pass
#[derive(Debug)]
struct CompiledRule<'a> {
    rule: &'a Rule,
    compiled: Result<(Predicate, PathBuf), RuleError>,
}

/// A rule that could not be evaluated for a file because it failed to parse
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRule {
    /// Zero-based position of the rule in the list
    pub index: usize,
    pub error: RuleError,
}

/// Result of matching one file against the rule list
#[derive(Debug, Clone, PartialEq)]
pub struct RuleMatch<'a> {
    pub index: usize,
    pub rule: &'a Rule,
    /// Destination folder, relative to the output folder
    pub destination: PathBuf,
}

#[derive(Debug, Default)]
pub struct MatchOutcome<'a> {
    pub matched: Option<RuleMatch<'a>>,
    /// Malformed rules that were reached before the match (or before giving up)
    pub skipped: Vec<SkippedRule>,
}

/// Rule list parsed for a single classification pass.
///
/// Parsing happens once per pass, so every file in the pass sees the same
/// predicates and the same reference instant for age conditions.
#[derive(Debug)]
pub struct RuleMatcher<'a> {
    rules: Vec<CompiledRule<'a>>,
}

impl<'a> RuleMatcher<'a> {
    pub fn compile(rules: &'a [Rule], now: DateTime<Utc>) -> Self {
        let rules = rules
            .iter()
            .enumerate()
            .map(|(index, rule)| {
                let compiled = Predicate::parse(rule.kind, &rule.condition, now)
                    .and_then(|predicate| Ok((predicate, rule.destination_path()?)));
                if let Err(error) = &compiled {
                    warn!(rule = index + 1, %error, "Rule cannot be evaluated and will never match");
                }
                CompiledRule { rule, compiled }
            })
            .collect();

        Self { rules }
    }

    /// Walk the rules in order and stop at the first predicate that holds
    pub fn match_file(&self, file: &FileEntry) -> MatchOutcome<'a> {
        let mut outcome = MatchOutcome::default();

        for (index, compiled) in self.rules.iter().enumerate() {
            match &compiled.compiled {
                Ok((predicate, destination)) => {
                    if predicate.matches(file) {
                        outcome.matched = Some(RuleMatch {
                            index,
                            rule: compiled.rule,
                            destination: destination.clone(),
                        });
                        break;
                    }
                }
                Err(error) => outcome.skipped.push(SkippedRule {
                    index,
                    error: error.clone(),
                }),
            }
        }

        outcome
    }

    /// Parse errors for every rule, in list order
    pub fn errors(&self) -> impl Iterator<Item = (usize, &RuleError)> {
        self.rules
            .iter()
            .enumerate()
            .filter_map(|(index, compiled)| compiled.compiled.as_ref().err().map(|e| (index, e)))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Return the first rule in `rules` that matches `file`
pub fn match_rule<'a>(file: &FileEntry, rules: &'a [Rule], now: DateTime<Utc>) -> Option<&'a Rule> {
    RuleMatcher::compile(rules, now)
        .match_file(file)
        .matched
        .map(|found| found.rule)
}

//! Arguments shared by several commands

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, ValueEnum};
use serde::Serialize;

use crate::classify::{DirectoryPolicy, OnError};
use crate::config::SorterConfig;
use crate::rules::{Predicate, Rule, RuleFile, parse_rule_spec};

/// Where the rule list comes from
#[derive(Args, Debug, Default, Clone)]
pub struct RuleArgs {
    /// Rules file (TOML, JSON or YAML) replacing the configured rules
    #[arg(long = "rules", value_name = "FILE")]
    pub rules_file: Option<PathBuf>,

    /// Extra rule as TYPE:CONDITION:DESTINATION, e.g. "size:> 10:Large" (repeatable)
    #[arg(long = "rule", value_name = "SPEC")]
    pub rule: Vec<String>,
}

impl RuleArgs {
    /// Configured (or file) rules followed by the `--rule` flags in order
    pub fn resolve(&self, config: &SorterConfig) -> Result<Vec<Rule>> {
        let mut rules = match &self.rules_file {
            Some(path) => RuleFile::load(path)?.rules,
            None => config.rules.clone(),
        };

        // Flags are checked up front; rules from files are only reported when reached
        let now = Utc::now();
        for spec in &self.rule {
            let rule = parse_rule_spec(spec)
                .and_then(|rule| Predicate::parse(rule.kind, &rule.condition, now).map(|_| rule))
                .with_context(|| format!("Invalid --rule '{spec}'"))?;
            rules.push(rule);
        }

        tracing::debug!(count = rules.len(), "Resolved rules");
        Ok(rules)
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human readable output
    #[default]
    Text,
    /// JSON report on stdout
    Json,
}

/// Command-line values that override the layered configuration
#[derive(Debug, Default, Serialize)]
pub struct CliOverrides {
    organize: OrganizeOverrides,
}

#[derive(Debug, Default, Serialize)]
struct OrganizeOverrides {
    directories: Option<DirectoryPolicy>,
    on_error: Option<OnError>,
}

impl CliOverrides {
    pub fn new(include_directories: bool, continue_on_error: bool) -> Self {
        Self {
            organize: OrganizeOverrides {
                directories: include_directories.then_some(DirectoryPolicy::Classify),
                on_error: continue_on_error.then_some(OnError::Continue),
            },
        }
    }
}

/// Load the layered configuration and apply its presentation settings
pub fn load_config(custom_config: Option<&Path>, overrides: Option<CliOverrides>) -> Result<SorterConfig> {
    let config = SorterConfig::load(custom_config, overrides)?;
    if !config.general.color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleKind;

    #[test]
    fn test_rule_flags_are_appended_after_config_rules() -> Result<()> {
        let config = SorterConfig {
            rules: vec![Rule::new(RuleKind::Extension, ".pdf", "Documents")?],
            ..Default::default()
        };
        let args = RuleArgs {
            rules_file: None,
            rule: vec!["size:> 10:Large".to_string(), "date:> 30:Archive".to_string()],
        };

        let rules = args.resolve(&config)?;
        let destinations: Vec<_> = rules.iter().map(|r| r.destination.as_str()).collect();
        assert_eq!(destinations, vec!["Documents", "Large", "Archive"]);
        Ok(())
    }

    #[test]
    fn test_bad_rule_flag_is_an_error() {
        for spec in ["colour:red:Reds", "size:>10:Large", "date:< 7:/tmp"] {
            let args = RuleArgs {
                rules_file: None,
                rule: vec![spec.to_string()],
            };
            assert!(args.resolve(&SorterConfig::default()).is_err(), "{spec} should be rejected");
        }
    }

    #[test]
    fn test_overrides_only_carry_set_flags() -> Result<()> {
        let value = serde_json::to_value(CliOverrides::new(true, false))?;
        assert_eq!(value["organize"]["directories"], "classify");
        assert!(value["organize"]["on_error"].is_null());
        Ok(())
    }
}

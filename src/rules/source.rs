//! Where rules come from: rule files and `TYPE:CONDITION:DESTINATION` specs

use std::path::Path;

use anyhow::{Context, Result};
use figment::Figment;
use serde::{Deserialize, Serialize};

use super::types::{Rule, RuleError, RuleKind};
use crate::config::smart_load;

/// On-disk rule file shape: a `rules` array in TOML, JSON or YAML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFile {
    #[serde(default)]
    pub rules: Vec<Rule>,
}

impl RuleFile {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            anyhow::bail!("Rules file not found: {}", path.display());
        }

        Figment::new()
            .merge(smart_load::auto(path))
            .extract()
            .with_context(|| format!("Failed to parse rules file: {}", path.display()))
    }

    /// Starter rule set written by `rules init`
    pub fn starter() -> Self {
        let rule = |kind, condition: &str, destination: &str| Rule {
            kind,
            condition: condition.to_string(),
            destination: destination.to_string(),
        };

        Self {
            rules: vec![
                rule(RuleKind::Extension, ".pdf", "Documents"),
                rule(RuleKind::Extension, ".doc", "Documents"),
                rule(RuleKind::Extension, ".txt", "Documents"),
                rule(RuleKind::Extension, ".jpg", "Images"),
                rule(RuleKind::Extension, ".png", "Images"),
                rule(RuleKind::Size, "> 100", "Large"),
                rule(RuleKind::Date, "> 90", "Archive"),
            ],
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize rules")
    }
}

/// Parse a command-line rule of the form `TYPE:CONDITION:DESTINATION`.
///
/// The condition grammar never contains `:`, so the first two colons split
/// the argument; the destination is validated like any other rule.
pub fn parse_rule_spec(spec: &str) -> Result<Rule, RuleError> {
    let mut parts = spec.splitn(3, ':');
    let (Some(kind), Some(condition), Some(destination)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(RuleError::InvalidSpec {
            spec: spec.to_string(),
        });
    };

    Rule::new(kind.parse()?, condition.trim(), destination.trim())
}

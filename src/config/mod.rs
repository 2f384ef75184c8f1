//! Configuration management for filesorter
//!
//! Settings are layered with figment (see [`SorterConfig::load`]) and can be
//! written in TOML, JSON or YAML. Besides behaviour switches, a config file
//! may carry a default `rules` list.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::classify::{ClassifyOptions, DirectoryPolicy, OnError};
use crate::rules::Rule;

pub mod core;
pub mod overrides;
pub mod smart_load;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SorterConfig {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub organize: OrganizeConfig,

    /// Default rules, tried in order
    #[serde(default)]
    pub rules: Vec<Rule>,
}

/// Terminal presentation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Styled output
    #[serde(default = "default_color")]
    pub color: bool,
}

fn default_color() -> bool {
    true
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self { color: default_color() }
    }
}

/// How a classification pass treats the input folder
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrganizeConfig {
    /// Folders found inside the input folder
    #[serde(default)]
    pub directories: DirectoryPolicy,

    /// Behaviour when a move fails
    #[serde(default)]
    pub on_error: OnError,

    /// Entry names (glob patterns) that are never touched
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl SorterConfig {
    /// Check the settings that make a whole pass impossible.
    ///
    /// Rules are not checked here: like rules from a rule file, a malformed
    /// rule is reported for each file that reaches it during a pass.
    pub fn validate(&self) -> Result<()> {
        self.classify_options()
            .build_exclude()
            .context("Invalid organize.exclude pattern")?;

        Ok(())
    }

    pub fn classify_options(&self) -> ClassifyOptions {
        ClassifyOptions {
            directories: self.organize.directories,
            on_error: self.organize.on_error,
            exclude: self.organize.exclude.clone(),
        }
    }
}

use std::path::Path;

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::Serialize;

use super::overrides::prune_unset;
use super::smart_load;
use super::SorterConfig;

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

impl SorterConfig {
    /// Load the layered configuration.
    ///
    /// Priority, lowest first: embedded defaults, user config, project config,
    /// `custom_config`, `FILESORTER_*` environment, CLI overrides.
    pub fn load<T: Serialize>(custom_config: Option<&Path>, cli_overrides: Option<T>) -> Result<Self> {
        tracing::trace!("CONFIG LOAD: Starting");

        let user_base = Self::user_config_base_path();
        let mut figment = Figment::new()
            .merge(Toml::string(DEFAULT_CONFIG))
            // User config - support multiple formats
            .merge(Toml::file(format!("{user_base}.toml")))
            .merge(Json::file(format!("{user_base}.json")))
            .merge(Yaml::file(format!("{user_base}.yaml")))
            .merge(Yaml::file(format!("{user_base}.yml")))
            // Project config - support multiple formats
            .merge(Toml::file("filesorter.toml"))
            .merge(Json::file("filesorter.json"))
            .merge(Yaml::file("filesorter.yaml"))
            .merge(Yaml::file("filesorter.yml"));

        if let Some(path) = custom_config {
            if !path.is_file() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            figment = figment.merge(smart_load::auto(path));
        }

        // Environment variables override files
        figment = figment.merge(Env::prefixed("FILESORTER_").split("__"));

        if let Some(cli) = cli_overrides {
            tracing::trace!("CONFIG LOAD: Applying CLI overrides");
            figment = figment.merge(Serialized::defaults(prune_unset(cli)));
        }

        let config: SorterConfig = figment.extract().context("Invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn user_config_base_path() -> String {
        match std::env::var("HOME") {
            Ok(home) => format!("{}/.config/filesorter/config", home),
            Err(_) => "~/.config/filesorter/config".to_string(),
        }
    }
}

use std::path::Path;

use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};

use crate::cli::args::load_config;

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Display current merged configuration
    Show {
        /// Output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ConfigFormat,
    },
    /// Validate the merged configuration
    Validate,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

pub async fn execute(args: ConfigArgs, custom_config: Option<&Path>) -> Result<()> {
    let config = load_config(custom_config, None)?;

    match args.command {
        ConfigCommand::Show { format } => {
            let rendered = match format {
                ConfigFormat::Json => serde_json::to_string_pretty(&config)?,
                ConfigFormat::Toml => toml::to_string_pretty(&config)?,
            };
            println!("{rendered}");
        }
        ConfigCommand::Validate => {
            // Loading already validated everything
            println!(
                "Configuration is valid ({} rule(s), {} exclude pattern(s))",
                config.rules.len(),
                config.organize.exclude.len()
            );
        }
    }

    Ok(())
}

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Subcommand};
use serde::Serialize;

use crate::cli::Output;
use crate::cli::args::{OutputFormat, RuleArgs, load_config};
use crate::rules::{Predicate, Rule, RuleFile};

#[derive(Args)]
pub struct RulesArgs {
    #[command(subcommand)]
    pub command: RulesCommand,
}

#[derive(Subcommand)]
pub enum RulesCommand {
    /// Parse every rule and report whether it is usable
    Check {
        #[command(flatten)]
        rules: RuleArgs,

        /// Output format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
    /// Write a starter rules file
    Init {
        /// File to create
        #[arg(value_name = "PATH", default_value = "filesorter-rules.toml")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Debug, Serialize)]
struct RuleStatus<'a> {
    index: usize,
    #[serde(flatten)]
    rule: &'a Rule,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    meaning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub async fn execute(args: RulesArgs, custom_config: Option<&Path>, output: &Output) -> Result<()> {
    match args.command {
        RulesCommand::Check { rules, format } => check(&rules, format, custom_config, output),
        RulesCommand::Init { path, force } => init(&path, force, output).await,
    }
}

fn check(args: &RuleArgs, format: OutputFormat, custom_config: Option<&Path>, output: &Output) -> Result<()> {
    let config = load_config(custom_config, None)?;
    let rules = args.resolve(&config)?;
    let statuses = evaluate(&rules);
    let invalid = statuses.iter().filter(|status| !status.valid).count();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&statuses)?),
        OutputFormat::Text => {
            output.header(&format!("{} rule(s)", statuses.len()));
            for status in &statuses {
                let label = format!("{}. {}", status.index, status.rule);
                match (&status.meaning, &status.error) {
                    (Some(meaning), _) => output.action_result(&label, meaning, true),
                    (None, Some(error)) => output.action_result(&label, error, false),
                    (None, None) => {}
                }
            }
            output.blank_line();
            if invalid == 0 {
                output.success("All rules are valid");
            }
        }
    }

    if invalid > 0 {
        anyhow::bail!("{invalid} of {} rule(s) are invalid", statuses.len());
    }
    Ok(())
}

fn evaluate(rules: &[Rule]) -> Vec<RuleStatus<'_>> {
    let now = Utc::now();
    rules
        .iter()
        .enumerate()
        .map(|(index, rule)| {
            let parsed = Predicate::parse(rule.kind, &rule.condition, now)
                .and_then(|predicate| rule.destination_path().map(|dest| (predicate, dest)));
            match parsed {
                Ok((predicate, destination)) => RuleStatus {
                    index: index + 1,
                    rule,
                    valid: true,
                    meaning: Some(format!("{predicate} → {}", destination.display())),
                    error: None,
                },
                Err(error) => RuleStatus {
                    index: index + 1,
                    rule,
                    valid: false,
                    meaning: None,
                    error: Some(error.to_string()),
                },
            }
        })
        .collect()
}

async fn init(path: &Path, force: bool, output: &Output) -> Result<()> {
    if tokio::fs::try_exists(path).await.unwrap_or(false) && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }

    let contents = RuleFile::starter().to_toml()?;
    tokio::fs::write(path, contents)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    output.success(&format!("Created {}", path.display()));
    output.info("Edit the rules, then run 'filesorter preview <INPUT> --rules <FILE>'");
    Ok(())
}

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use super::preview::render_report;
use crate::classify::{ClassifyError, Classifier};
use crate::cli::Output;
use crate::cli::args::{CliOverrides, OutputFormat, RuleArgs, load_config};

#[derive(Args)]
pub struct OrganizeArgs {
    /// Folder whose files are moved
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Folder receiving the destination folders
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    #[command(flatten)]
    pub rules: RuleArgs,

    /// Classify folders found in INPUT instead of skipping them
    #[arg(long)]
    pub include_directories: bool,

    /// Keep going when a file cannot be moved
    #[arg(long)]
    pub continue_on_error: bool,

    /// Show what would be moved without moving anything
    #[arg(long)]
    pub dry_run: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

pub async fn execute(args: OrganizeArgs, custom_config: Option<&Path>, output: &Output) -> Result<()> {
    let overrides = CliOverrides::new(args.include_directories, args.continue_on_error);
    let config = load_config(custom_config, Some(overrides))?;
    let rules = args.rules.resolve(&config)?;
    if rules.is_empty() {
        output.warning("No rules configured; nothing will be moved");
    }

    let classifier = Classifier::new(config.classify_options())?;
    let result = if args.dry_run {
        classifier.preview_organize(&args.input, &args.output, &rules).await
    } else {
        classifier.organize(&args.input, &args.output, &rules).await
    };

    if let Err(ClassifyError::Move { diagnostics, .. }) = &result {
        for diagnostic in diagnostics {
            output.warning(&diagnostic.to_string());
        }
    }
    let report = result.with_context(|| format!("Cannot organize {}", args.input.display()))?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            let title = if args.dry_run { "Dry run" } else { "Organized" };
            output.header(&format!("{title}: {} → {}", args.input.display(), args.output.display()));
            render_report(&report, output);
            output.blank_line();
            if args.dry_run {
                output.info(&format!("{} file(s) would be moved", report.results.len()));
            } else {
                output.success(&format!("{} file(s) moved", report.results.len()));
            }
        }
    }

    if !report.failures.is_empty() {
        anyhow::bail!("{} file(s) could not be moved", report.failures.len());
    }

    Ok(())
}

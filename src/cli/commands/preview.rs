use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use crate::classify::{ClassificationReport, Classifier};
use crate::cli::Output;
use crate::cli::args::{CliOverrides, OutputFormat, RuleArgs, load_config};

#[derive(Args)]
pub struct PreviewArgs {
    /// Folder whose files are classified
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    #[command(flatten)]
    pub rules: RuleArgs,

    /// Classify folders found in INPUT instead of skipping them
    #[arg(long)]
    pub include_directories: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

pub async fn execute(args: PreviewArgs, custom_config: Option<&Path>, output: &Output) -> Result<()> {
    let config = load_config(custom_config, Some(CliOverrides::new(args.include_directories, false)))?;
    let rules = args.rules.resolve(&config)?;
    if rules.is_empty() {
        output.warning("No rules configured; nothing will match");
    }

    let classifier = Classifier::new(config.classify_options())?;
    let report = classifier
        .preview(&args.input, &rules)
        .await
        .with_context(|| format!("Cannot preview {}", args.input.display()))?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            output.header(&format!("Preview of {}", args.input.display()));
            render_report(&report, output);
            output.blank_line();
            output.success(&format!("{} file(s) would be moved", report.results.len()));
        }
    }

    Ok(())
}

/// Text rendering shared by preview and organize
pub(super) fn render_report(report: &ClassificationReport, output: &Output) {
    for result in &report.results {
        output.mapping(&result.file, &result.destination);
    }

    if !report.unmatched.is_empty() {
        output.category("Unmatched", report.unmatched.len());
        if !output.is_quiet() {
            for file in &report.unmatched {
                output.list_item(file);
            }
        }
    }

    if !report.excluded.is_empty() {
        output.verbose(&format!("Excluded: {}", report.excluded.join(", ")));
    }

    for diagnostic in &report.diagnostics {
        output.warning(&diagnostic.to_string());
    }

    for failure in &report.failures {
        output.error(&format!(
            "{} could not be moved to {}: {}",
            failure.file, failure.destination, failure.error
        ));
    }
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::classify::list_directory;
use crate::cli::Output;
use crate::cli::args::OutputFormat;

#[derive(Args)]
pub struct ListArgs {
    /// Folder to list
    #[arg(value_name = "DIR")]
    pub path: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

pub async fn execute(args: ListArgs, output: &Output) -> Result<()> {
    let names = list_directory(&args.path)
        .await
        .with_context(|| format!("Cannot list {}", args.path.display()))?;

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&names)?),
        OutputFormat::Text => {
            for name in &names {
                println!("{name}");
            }
            output.verbose(&format!("{} entries in {}", names.len(), args.path.display()));
        }
    }

    Ok(())
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};

use crate::cli::Output;

pub mod config;
pub mod list;
pub mod organize;
pub mod preview;
pub mod rules;
pub mod version;

#[derive(Parser)]
#[command(
    name = "filesorter",
    version = env!("CARGO_PKG_VERSION"),
    about = "Sort the files of a folder into subfolders by extension, size or age",
    long_about = "filesorter matches every file directly inside a folder against an ordered \
                  list of rules (extension, size or age) and moves it into the destination \
                  folder of the first rule that matches. Preview first, then organize."
)]
pub struct Cli {
    /// Run as if started in <DIR> instead of current working directory
    #[arg(short = 'C', long = "directory", global = true)]
    pub directory: Option<PathBuf>,

    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use custom configuration file
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the entries of a folder
    List(list::ListArgs),
    /// Show where each file would be moved, without moving anything
    Preview(preview::PreviewArgs),
    /// Move matching files into their destination folders
    Organize(organize::OrganizeArgs),
    /// Check or create rule files
    Rules(rules::RulesArgs),
    /// Configuration management
    Config(config::ConfigArgs),
    /// Show version information
    Version(version::VersionArgs),
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        // Change directory if specified
        if let Some(dir) = &self.directory {
            std::env::set_current_dir(dir)
                .with_context(|| format!("Cannot change directory to {}", dir.display()))?;
        }

        // Set up logging based on verbosity
        setup_logging(self.verbose, self.quiet);

        let output = Output::new(self.verbose > 0, self.quiet);
        let custom_config = self.config.as_deref();

        match self.command {
            Some(Commands::List(args)) => list::execute(args, &output).await,
            Some(Commands::Preview(args)) => preview::execute(args, custom_config, &output).await,
            Some(Commands::Organize(args)) => organize::execute(args, custom_config, &output).await,
            Some(Commands::Rules(args)) => rules::execute(args, custom_config, &output).await,
            Some(Commands::Config(args)) => config::execute(args, custom_config).await,
            Some(Commands::Version(args)) => version::execute(args).await,
            None => {
                Cli::command().print_help()?;
                Ok(())
            }
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => tracing_subscriber::EnvFilter::new("warn"),
        1 => tracing_subscriber::EnvFilter::new("info,globset=warn"),
        2 => tracing_subscriber::EnvFilter::new("debug,globset=warn"),
        _ => tracing_subscriber::EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

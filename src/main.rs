use anyhow::Result;
use clap::Parser;
use filesorter::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run().await
}

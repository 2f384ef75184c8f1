use anyhow::Result;
use clap::Args;

#[derive(Args)]
pub struct VersionArgs {
    /// Show detailed version information
    #[arg(long)]
    pub detailed: bool,
}

pub async fn execute(args: VersionArgs) -> Result<()> {
    println!("filesorter {}", env!("CARGO_PKG_VERSION"));

    if args.detailed {
        println!("Rust Edition: 2024");
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        println!("Description: {}", env!("CARGO_PKG_DESCRIPTION"));
        println!("Target: {}-{}", std::env::consts::ARCH, std::env::consts::OS);
    }
    Ok(())
}

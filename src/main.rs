use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = poolcreds::cli::Cli::parse();
    cli.run()
}

use anyhow::Result;
use clap::Parser;
use fimon::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}

use anyhow::Result;
use clap::Parser;
use passbook::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = pam_onboard::cli::Cli::parse();
    cli.run()
}

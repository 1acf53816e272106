//! CLI routing and command dispatch.

use crate::constants;
use crate::models::config::{self, DefaultsSection};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod generate;
pub mod probe;
pub mod shred;

/// Shared context passed to all command handlers.
pub struct CliContext {
    pub defaults: DefaultsSection,
    pub non_interactive: bool,
    pub defaults_warning: Option<String>,
}

#[derive(Parser, Debug)]
#[command(
    name = "pam-onboard",
    version,
    about = "Generate Keeper PAM import records and onboarding commands offline"
)]
pub struct Cli {
    /// Defaults file (default: ./onboard.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Run in non-interactive mode (no prompts, suitable for automation)
    #[arg(long, global = true, env = "PAM_ONBOARD_NON_INTERACTIVE")]
    pub non_interactive: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        // Load site defaults if present (best-effort). A broken defaults
        // file degrades to built-in defaults with a warning.
        let defaults_path = self
            .config
            .clone()
            .unwrap_or_else(|| PathBuf::from(constants::DEFAULTS_FILE));
        let mut defaults_warning = None;
        let defaults = if defaults_path.exists() {
            match config::load_defaults(&defaults_path) {
                Ok(file) => file.defaults,
                Err(err) => {
                    defaults_warning = Some(format!(
                        "cannot read defaults from {}: {}",
                        defaults_path.display(),
                        err
                    ));
                    DefaultsSection::default()
                }
            }
        } else {
            DefaultsSection::default()
        };

        let ctx = CliContext {
            defaults,
            non_interactive: self.non_interactive,
            defaults_warning,
        };

        match self.command {
            Commands::Generate(args) => generate::run(&ctx, args),
            Commands::Probe(args) => probe::run(&ctx, args),
            Commands::Shred(args) => shred::run(&ctx, args),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the import batch and command script from a CSV
    Generate(generate::GenerateArgs),
    /// Probe host reachability without generating anything
    Probe(probe::ProbeArgs),
    /// Securely erase input or artifact files
    Shred(shred::ShredArgs),
}

//! Standalone secure deletion of inputs and consumed artifacts.

use crate::cli::CliContext;
use crate::core::runlog::RunLog;
use crate::core::shred as eraser;
use anyhow::{bail, Context, Result};
use clap::Args;
use dialoguer::Confirm;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct ShredArgs {
    /// Files to overwrite and remove
    #[arg(required = true, value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Skip the confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

pub fn run(ctx: &CliContext, args: ShredArgs) -> Result<()> {
    if !args.yes {
        if ctx.non_interactive {
            bail!("--non-interactive requires --yes for shred");
        }
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Shred {} file(s)? This cannot be undone",
                args.paths.len()
            ))
            .default(false)
            .interact()
            .context("read shred confirmation")?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let mut log = RunLog::create(Path::new("."))?;
    let shredded = eraser::shred_files(&args.paths, &mut log);
    println!("Shredded {}/{} files.", shredded, args.paths.len());
    log.finish()
}

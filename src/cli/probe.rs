//! Standalone reachability report.

use crate::cli::CliContext;
use crate::constants;
use crate::core::runlog::RunLog;
use crate::core::{loader, prober};
use anyhow::{bail, Result};
use clap::Args;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, Table};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// CSV with hostname,initial_admin_user,initial_admin_password rows
    #[arg(long, value_name = "PATH", default_value = constants::DEFAULT_CSV)]
    pub csv: PathBuf,

    /// TCP port to probe
    #[arg(long, default_value_t = constants::DEFAULT_PROBE_PORT)]
    pub port: u16,

    /// Concurrent probe workers
    #[arg(long, default_value_t = constants::DEFAULT_PROBE_WORKERS)]
    pub workers: usize,

    /// Per-probe timeout in seconds
    #[arg(long, default_value_t = constants::DEFAULT_PROBE_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

pub fn run(ctx: &CliContext, args: ProbeArgs) -> Result<()> {
    let mut log = RunLog::create(Path::new("."))?;
    if let Some(warning) = &ctx.defaults_warning {
        log.warn(warning);
    }

    let entries = loader::load_entries(&args.csv, &mut log)?;
    if entries.is_empty() {
        bail!("no usable rows in {}", args.csv.display());
    }

    let hostnames: Vec<String> = entries.iter().map(|e| e.hostname.clone()).collect();
    log.info(&format!(
        "best-effort tcp/{} probe on {} hosts",
        args.port,
        hostnames.len()
    ));

    let cfg = prober::ProbeConfig {
        port: args.port,
        timeout: Duration::from_secs(args.timeout_secs),
        workers: args.workers.clamp(1, constants::MAX_PROBE_WORKERS),
    };
    let reachable: HashSet<String> = prober::filter_reachable(entries, &cfg, &mut log)
        .into_iter()
        .map(|entry| entry.hostname)
        .collect();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        Cell::new("Host").add_attribute(Attribute::Bold),
        Cell::new("Status").add_attribute(Attribute::Bold),
    ]);
    let mut up = 0usize;
    for host in &hostnames {
        let status = if reachable.contains(host) {
            up += 1;
            Cell::new("reachable").fg(Color::Green)
        } else {
            Cell::new("unreachable").fg(Color::Red)
        };
        table.add_row(vec![Cell::new(host), status]);
    }
    println!("{}", table);
    println!("\n{}/{} hosts reachable on tcp/{}.", up, hostnames.len(), args.port);

    log.finish()
}

//! The generation pipeline: load, probe, generate, compose, write, shred.

use crate::cli::CliContext;
use crate::constants;
use crate::core::prober::ProbeConfig;
use crate::core::runlog::RunLog;
use crate::core::{loader, prober, records, script, shred, writer};
use crate::models::config::{GenerateConfig, Protocol};
use crate::models::entry::HostCredentialEntry;
use crate::models::record::admin_title;
use anyhow::{bail, ensure, Context, Result};
use clap::Args;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Table};
use dialoguer::Confirm;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Gateway the PAM configuration binds to (UID or name)
    #[arg(long, env = "PAM_ONBOARD_GATEWAY", value_name = "REF")]
    pub gateway: Option<String>,

    /// CSV with hostname,initial_admin_user,initial_admin_password rows
    #[arg(long, value_name = "PATH", default_value = constants::DEFAULT_CSV)]
    pub csv: PathBuf,

    /// Shared folder for credential records
    #[arg(long, value_name = "NAME")]
    pub user_folder: Option<String>,

    /// Shared folder for resource records
    #[arg(long, value_name = "NAME")]
    pub resource_folder: Option<String>,

    /// Existing parent folder to nest both folders under
    #[arg(long, value_name = "NAME")]
    pub parent_folder: Option<String>,

    /// Connection protocol (sets the default port)
    #[arg(long, value_enum)]
    pub protocol: Option<Protocol>,

    /// Port override; defaults to the protocol's conventional port
    #[arg(long)]
    pub port: Option<u16>,

    /// Operating-system tag stored on resource records
    #[arg(long)]
    pub os: Option<String>,

    /// Enable SSL verification on resource records
    #[arg(long)]
    pub ssl_verification: bool,

    /// Enable session recording on connections
    #[arg(long)]
    pub recording: bool,

    /// Credential performing rotations (self-administered when absent)
    #[arg(long, value_name = "REF")]
    pub rotation_admin: Option<String>,

    /// Rotation schedule JSON, passed through verbatim
    #[arg(long, value_name = "JSON")]
    pub schedule_json: Option<String>,

    /// Skip the configuration-binding stage (folders already bound)
    #[arg(long)]
    pub skip_config: bool,

    /// Probe TCP reachability and drop dead hosts before generating
    #[arg(long)]
    pub connectivity_check: bool,

    /// Port probed by --connectivity-check
    #[arg(long, default_value_t = constants::DEFAULT_PROBE_PORT)]
    pub probe_port: u16,

    /// Concurrent probe workers
    #[arg(long, default_value_t = constants::DEFAULT_PROBE_WORKERS)]
    pub workers: usize,

    /// Per-probe timeout in seconds
    #[arg(long, default_value_t = constants::DEFAULT_PROBE_TIMEOUT_SECS)]
    pub probe_timeout_secs: u64,

    /// Log what would be written without touching the filesystem
    #[arg(long)]
    pub dry_run: bool,

    /// Securely erase the input CSV after a successful run
    #[arg(long)]
    pub shred_input: bool,

    /// Output path for the record batch
    #[arg(long, value_name = "PATH", default_value = constants::DEFAULT_RECORDS_FILE)]
    pub records_out: PathBuf,

    /// Output path for the command script
    #[arg(long, value_name = "PATH", default_value = constants::DEFAULT_COMMANDS_FILE)]
    pub commands_out: PathBuf,
}

pub fn run(ctx: &CliContext, args: GenerateArgs) -> Result<()> {
    let mut log = RunLog::create(Path::new("."))?;
    if let Some(warning) = &ctx.defaults_warning {
        log.warn(warning);
    }

    let cfg = resolve_config(ctx, &args)?;

    let mut entries = loader::load_entries(&args.csv, &mut log)?;
    if entries.is_empty() {
        bail!("no usable rows in {}", args.csv.display());
    }

    if args.connectivity_check {
        log.info(&format!(
            "best-effort tcp/{} probe on {} hosts",
            args.probe_port,
            entries.len()
        ));
        let probe_cfg = ProbeConfig {
            port: args.probe_port,
            timeout: Duration::from_secs(args.probe_timeout_secs),
            workers: args.workers.clamp(1, constants::MAX_PROBE_WORKERS),
        };
        entries = prober::filter_reachable(entries, &probe_cfg, &mut log);
        if entries.is_empty() {
            bail!("no reachable hosts - nothing to generate");
        }
    }

    log.info(&format!("processing {} servers", entries.len()));

    let batch = records::generate_batch(&entries, &cfg);
    ensure!(
        records::verify_links(&batch),
        "internal error: resource record without matching credential"
    );
    let commands = script::compose(&entries, &cfg);

    writer::write_artifacts(
        &batch,
        &commands,
        &args.records_out,
        &args.commands_out,
        args.dry_run,
        &mut log,
    )?;

    print_summary(&entries, &cfg);

    if args.shred_input && !args.dry_run {
        if confirm_shred(ctx, &args.csv)? {
            shred::shred_files(&[args.csv.clone()], &mut log);
        } else {
            log.info("input shred declined - keeping CSV");
        }
    }

    if args.dry_run {
        println!("\nNo changes made (dry-run). Log: {}", log.path().display());
    } else {
        println!(
            "\nWrote {} and {}. Log: {}",
            args.records_out.display(),
            args.commands_out.display(),
            log.path().display()
        );
    }
    log.finish()
}

/// Merge CLI flags over file defaults over built-ins.
fn resolve_config(ctx: &CliContext, args: &GenerateArgs) -> Result<GenerateConfig> {
    let defaults = &ctx.defaults;

    let Some(gateway) = args.gateway.clone().or_else(|| defaults.gateway.clone()) else {
        bail!(
            "no gateway configured: pass --gateway or set one in {}",
            constants::DEFAULTS_FILE
        );
    };

    let protocol = args
        .protocol
        .or(defaults.protocol)
        .unwrap_or(Protocol::Rdp);

    Ok(GenerateConfig {
        gateway,
        user_folder: pick(
            &args.user_folder,
            &defaults.user_folder,
            constants::DEFAULT_USER_FOLDER,
        ),
        resource_folder: pick(
            &args.resource_folder,
            &defaults.resource_folder,
            constants::DEFAULT_RESOURCE_FOLDER,
        ),
        parent_folder: args
            .parent_folder
            .clone()
            .or_else(|| defaults.parent_folder.clone()),
        protocol,
        port: args.port.unwrap_or_else(|| protocol.default_port()),
        os: pick(&args.os, &defaults.os, constants::DEFAULT_OS),
        ssl_verification: args.ssl_verification,
        recording: args.recording,
        rotation_admin: args
            .rotation_admin
            .clone()
            .or_else(|| defaults.rotation_admin.clone()),
        schedule_json: pick(
            &args.schedule_json,
            &defaults.schedule_json,
            constants::DEFAULT_SCHEDULE_JSON,
        ),
        skip_config: args.skip_config,
        records_file: args.records_out.display().to_string(),
    })
}

fn pick(flag: &Option<String>, file_default: &Option<String>, builtin: &str) -> String {
    flag.clone()
        .or_else(|| file_default.clone())
        .unwrap_or_else(|| builtin.to_string())
}

fn confirm_shred(ctx: &CliContext, path: &Path) -> Result<bool> {
    if ctx.non_interactive {
        // --shred-input is the explicit consent in automation
        return Ok(true);
    }
    Confirm::new()
        .with_prompt(format!("Shred input file {}?", path.display()))
        .default(false)
        .interact()
        .context("read shred confirmation")
}

fn print_summary(entries: &[HostCredentialEntry], cfg: &GenerateConfig) {
    let user_root = script::folder_path(cfg.parent_folder.as_deref(), &cfg.user_folder);

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        Cell::new("Host").add_attribute(Attribute::Bold),
        Cell::new("Login").add_attribute(Attribute::Bold),
        Cell::new("Credential Record").add_attribute(Attribute::Bold),
        Cell::new("Port").add_attribute(Attribute::Bold),
    ]);
    for entry in entries {
        table.add_row(vec![
            entry.hostname.clone(),
            entry.username.clone(),
            format!("{}/{}", user_root, admin_title(&entry.hostname)),
            cfg.port.to_string(),
        ]);
    }
    println!("{}", table);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::DefaultsSection;

    fn bare_args() -> GenerateArgs {
        GenerateArgs {
            gateway: Some("GW1".into()),
            csv: PathBuf::from("servers.csv"),
            user_folder: None,
            resource_folder: None,
            parent_folder: None,
            protocol: None,
            port: None,
            os: None,
            ssl_verification: false,
            recording: false,
            rotation_admin: None,
            schedule_json: None,
            skip_config: false,
            connectivity_check: false,
            probe_port: constants::DEFAULT_PROBE_PORT,
            workers: constants::DEFAULT_PROBE_WORKERS,
            probe_timeout_secs: constants::DEFAULT_PROBE_TIMEOUT_SECS,
            dry_run: false,
            shred_input: false,
            records_out: PathBuf::from(constants::DEFAULT_RECORDS_FILE),
            commands_out: PathBuf::from(constants::DEFAULT_COMMANDS_FILE),
        }
    }

    fn bare_ctx() -> CliContext {
        CliContext {
            defaults: DefaultsSection::default(),
            non_interactive: true,
            defaults_warning: None,
        }
    }

    #[test]
    fn test_resolve_builtin_defaults() {
        let cfg = resolve_config(&bare_ctx(), &bare_args()).unwrap();
        assert_eq!(cfg.gateway, "GW1");
        assert_eq!(cfg.user_folder, constants::DEFAULT_USER_FOLDER);
        assert_eq!(cfg.resource_folder, constants::DEFAULT_RESOURCE_FOLDER);
        assert_eq!(cfg.protocol, Protocol::Rdp);
        assert_eq!(cfg.port, 3389);
        assert_eq!(cfg.os, constants::DEFAULT_OS);
        assert_eq!(cfg.schedule_json, constants::DEFAULT_SCHEDULE_JSON);
        assert!(cfg.rotation_admin.is_none());
    }

    #[test]
    fn test_resolve_missing_gateway_fails() {
        let mut args = bare_args();
        args.gateway = None;
        assert!(resolve_config(&bare_ctx(), &args).is_err());
    }

    #[test]
    fn test_resolve_gateway_from_defaults_file() {
        let mut args = bare_args();
        args.gateway = None;
        let mut ctx = bare_ctx();
        ctx.defaults.gateway = Some("GW-FILE".into());
        let cfg = resolve_config(&ctx, &args).unwrap();
        assert_eq!(cfg.gateway, "GW-FILE");
    }

    #[test]
    fn test_resolve_flag_beats_defaults_file() {
        let mut args = bare_args();
        args.os = Some("Ubuntu".into());
        let mut ctx = bare_ctx();
        ctx.defaults.os = Some("Debian".into());
        let cfg = resolve_config(&ctx, &args).unwrap();
        assert_eq!(cfg.os, "Ubuntu");
    }

    #[test]
    fn test_resolve_protocol_sets_port() {
        let mut args = bare_args();
        args.protocol = Some(Protocol::Ssh);
        let cfg = resolve_config(&bare_ctx(), &args).unwrap();
        assert_eq!(cfg.port, 22);
    }

    #[test]
    fn test_resolve_port_override_beats_protocol() {
        let mut args = bare_args();
        args.protocol = Some(Protocol::Ssh);
        args.port = Some(2222);
        let cfg = resolve_config(&bare_ctx(), &args).unwrap();
        assert_eq!(cfg.port, 2222);
    }

    #[test]
    fn test_records_file_follows_output_path() {
        let mut args = bare_args();
        args.records_out = PathBuf::from("custom.json");
        let cfg = resolve_config(&bare_ctx(), &args).unwrap();
        assert_eq!(cfg.records_file, "custom.json");
    }
}

//! Artifact serialization.

use crate::core::runlog::RunLog;
use crate::core::script::CommandScript;
use crate::models::record::{ImportBatch, ImportRecord};
use crate::util::fs as onboard_fs;
use anyhow::{Context, Result};
use chrono::Utc;
use std::path::Path;

/// Serialize both artifacts, or only log them under preview mode.
///
/// Writes are atomic per artifact; an I/O failure is fatal since every
/// downstream step depends on the files being present and intact.
pub fn write_artifacts(
    batch: &ImportBatch,
    script: &CommandScript,
    records_path: &Path,
    commands_path: &Path,
    dry_run: bool,
    log: &mut RunLog,
) -> Result<()> {
    let records_json = serde_json::to_string_pretty(batch).context("serialize record batch")?;
    let commands_text = script.render(Utc::now());

    if dry_run {
        log.info(&format!(
            "[dry-run] would write {} ({} records)",
            records_path.display(),
            batch.records.len()
        ));
        for record in &batch.records {
            log.info(&format!("[dry-run]   {}", describe_record(record)));
        }
        log.info(&format!(
            "[dry-run] would write {} ({} commands)",
            commands_path.display(),
            script.command_count()
        ));
        for line in commands_text.lines() {
            log.info(&format!("[dry-run]   {}", line));
        }
        return Ok(());
    }

    onboard_fs::atomic_write(records_path, records_json.as_bytes())
        .with_context(|| format!("write record batch {}", records_path.display()))?;
    log.info(&format!(
        "wrote {} ({} records)",
        records_path.display(),
        batch.records.len()
    ));

    onboard_fs::atomic_write(commands_path, commands_text.as_bytes())
        .with_context(|| format!("write command script {}", commands_path.display()))?;
    log.info(&format!(
        "wrote {} ({} commands)",
        commands_path.display(),
        script.command_count()
    ));

    Ok(())
}

/// One-line masked description of a record; secrets never appear.
fn describe_record(record: &ImportRecord) -> String {
    match record {
        ImportRecord::Credential(cred) => format!(
            "pamUser \"{}\" (login {}, password ***, uid {})",
            cred.title, cred.login, cred.uid
        ),
        ImportRecord::Resource(res) => format!(
            "pamMachine \"{}\" (port {}, links {})",
            res.title,
            res.custom_fields.hostname.port,
            res.links.join(",")
        ),
    }
}

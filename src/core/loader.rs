//! Input loading, validation, and deduplication.

use crate::core::runlog::RunLog;
use crate::models::entry::HostCredentialEntry;
use anyhow::{bail, Context, Result};
use std::collections::HashSet;
use std::path::Path;
use zeroize::Zeroizing;

/// Load and validate the input CSV.
///
/// Columns are fixed: hostname, initial_admin_user, initial_admin_password.
/// A header row is optional and auto-detected. Rows with any empty field
/// are skipped with a warning naming the row (the secret column is never
/// echoed). The first occurrence of a hostname wins; later occurrences are
/// dropped with a warning. Row order is preserved. A missing or unreadable
/// file is fatal.
pub fn load_entries(path: &Path, log: &mut RunLog) -> Result<Vec<HostCredentialEntry>> {
    if !path.is_file() {
        bail!("input file not found: {}", path.display());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("open input file {}", path.display()))?;

    let mut entries = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for (idx, result) in reader.records().enumerate() {
        let row = idx + 1;
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                log.warn(&format!("row {} unreadable - skipped ({})", row, err));
                continue;
            }
        };

        // Header row is optional; recognize it by the first column's name.
        if idx == 0
            && record
                .get(0)
                .is_some_and(|field| field.eq_ignore_ascii_case("hostname"))
        {
            continue;
        }

        let hostname = record.get(0).unwrap_or("");
        let username = record.get(1).unwrap_or("");
        let password = record.get(2).unwrap_or("");

        if hostname.is_empty() || username.is_empty() || password.is_empty() {
            if hostname.is_empty() {
                log.warn(&format!("row {} incomplete - skipped", row));
            } else {
                log.warn(&format!("row {} ({}) incomplete - skipped", row, hostname));
            }
            continue;
        }

        if !seen.insert(hostname.to_string()) {
            log.warn(&format!(
                "duplicate hostname {} - skipped (first occurrence kept)",
                hostname
            ));
            continue;
        }

        entries.push(HostCredentialEntry {
            hostname: hostname.to_string(),
            username: username.to_string(),
            password: Zeroizing::new(password.to_string()),
        });
    }

    Ok(entries)
}

//! Per-run durable log trail.

use crate::constants;
use anyhow::{Context, Result};
use chrono::Utc;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Explicit logging context for one run.
///
/// Opened before any pipeline work so a failed run is always diagnosable
/// from the file alone; every line is mirrored to stderr.
pub struct RunLog {
    path: PathBuf,
    file: File,
    warnings: usize,
}

impl RunLog {
    /// Open a fresh `bulk_onboard_<UTC stamp>.log` in `dir`.
    pub fn create(dir: &Path) -> Result<Self> {
        let stamp = Utc::now().format("%Y%m%dT%H%M%SZ");
        let path = dir.join(format!("{}{}.log", constants::RUN_LOG_PREFIX, stamp));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("open run log {}", path.display()))?;
        Ok(Self {
            path,
            file,
            warnings: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Warnings emitted so far.
    pub fn warnings(&self) -> usize {
        self.warnings
    }

    pub fn info(&mut self, msg: &str) {
        self.write("INFO", msg);
    }

    pub fn warn(&mut self, msg: &str) {
        self.warnings += 1;
        self.write("WARNING", msg);
    }

    pub fn error(&mut self, msg: &str) {
        self.write("ERROR", msg);
    }

    fn write(&mut self, level: &str, msg: &str) {
        let line = format!(
            "{} | {:<8} | {}",
            Utc::now().format("%Y-%m-%d %H:%M:%S"),
            level,
            msg
        );
        eprintln!("{}", line);
        // trail failures never abort the run; the console line already went out
        if writeln!(self.file, "{}", line).is_err() {
            eprintln!("warning: run log write failed: {}", self.path.display());
        }
    }

    /// Flush the trail at end of run.
    pub fn finish(mut self) -> Result<()> {
        self.file
            .flush()
            .with_context(|| format!("flush run log {}", self.path.display()))?;
        Ok(())
    }
}

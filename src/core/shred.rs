//! Best-effort secure deletion.

use crate::constants;
use crate::core::runlog::RunLog;
use anyhow::{Context, Result};
use rand::rngs::OsRng;
use rand::RngCore;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Overwrite `path` with random bytes, force it to disk, and remove it.
///
/// Advisory only: wear-leveling media and snapshots can retain old blocks.
pub fn shred_file(path: &Path) -> Result<()> {
    let len = fs::metadata(path)
        .with_context(|| format!("stat {}", path.display()))?
        .len() as usize;

    let mut file = OpenOptions::new()
        .write(true)
        .open(path)
        .with_context(|| format!("open {} for overwrite", path.display()))?;

    let mut chunk = vec![0u8; constants::SHRED_CHUNK.min(len.max(1))];
    let mut remaining = len;
    while remaining > 0 {
        let n = chunk.len().min(remaining);
        OsRng.fill_bytes(&mut chunk[..n]);
        file.write_all(&chunk[..n])
            .with_context(|| format!("overwrite {}", path.display()))?;
        remaining -= n;
    }
    file.sync_all()
        .with_context(|| format!("sync {}", path.display()))?;
    drop(file);

    fs::remove_file(path).with_context(|| format!("remove {}", path.display()))?;
    Ok(())
}

/// Shred every existing file in `paths`.
///
/// Per-file failures are logged as errors and do not stop the remaining
/// files. Returns the number of files actually shredded.
pub fn shred_files(paths: &[PathBuf], log: &mut RunLog) -> usize {
    let mut shredded = 0usize;
    for path in paths {
        if !path.is_file() {
            continue;
        }
        match shred_file(path) {
            Ok(()) => {
                log.info(&format!("shredded {}", path.display()));
                shredded += 1;
            }
            Err(err) => {
                log.error(&format!("failed to shred {}: {:#}", path.display(), err));
            }
        }
    }
    shredded
}

//! Run-scoped identifier generation.

use rand::rngs::OsRng;
use rand::RngCore;

/// Fresh collision-resistant identifier: 128 random bits as lowercase hex.
///
/// Only cross-references records within one generated batch; the value has
/// no meaning once the downstream import completes.
pub fn run_uid() -> String {
    let mut bytes = [0u8; 16];
    OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

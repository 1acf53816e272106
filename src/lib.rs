//! Offline bulk-onboarding generator for Keeper PAM.
//!
//! Turns a CSV of host/credential rows into a reviewable record-import batch
//! and an ordered Commander command script, without ever contacting the
//! vault itself.
//!
//! ## Modules
//! - `cli` — Command-line handlers
//! - `core` — Pipeline stages (load, probe, generate, compose, write, shred)
//! - `models` — Data structures
//! - `util` — Helpers (fs, identifiers)

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod util;

//! Centralized constants for file names, defaults, and limits.

/// Default input CSV path.
pub const DEFAULT_CSV: &str = "servers_to_import.csv";

/// Default path for the generated record-import batch.
pub const DEFAULT_RECORDS_FILE: &str = "pam_records_import.json";

/// Default path for the generated command script.
pub const DEFAULT_COMMANDS_FILE: &str = "pam_onboard_commands.txt";

/// Default shared folder for credential (pamUser) records.
pub const DEFAULT_USER_FOLDER: &str = "PAM_Users";

/// Default shared folder for resource (pamMachine) records.
pub const DEFAULT_RESOURCE_FOLDER: &str = "PAM_Resources";

/// Default operating-system tag on resource records.
pub const DEFAULT_OS: &str = "Windows";

/// Default rotation schedule, daily at 02:00 UTC.
pub const DEFAULT_SCHEDULE_JSON: &str = r#"{"type":"DAILY","time":"02:00","tz":"UTC"}"#;

/// Title suffix for credential records ("<hostname> Local Admin").
pub const ADMIN_TITLE_SUFFIX: &str = "Local Admin";

/// Default TCP port probed during connectivity checks (WinRM over HTTPS).
pub const DEFAULT_PROBE_PORT: u16 = 5986;

/// Default per-probe timeout in seconds.
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 3;

/// Default number of concurrent probe workers.
pub const DEFAULT_PROBE_WORKERS: usize = 16;

/// Upper bound on the probe worker pool, whatever the caller asks for.
pub const MAX_PROBE_WORKERS: usize = 32;

/// Prefix for the per-run log file.
pub const RUN_LOG_PREFIX: &str = "bulk_onboard_";

/// Defaults file consulted when present in the working directory.
pub const DEFAULTS_FILE: &str = "onboard.toml";

/// Chunk size for shred overwrites.
pub const SHRED_CHUNK: usize = 64 * 1024;

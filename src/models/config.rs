//! Generation configuration and optional site defaults.

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Connection protocol for onboarded machines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Protocol {
    Rdp,
    Ssh,
    Vnc,
    Mysql,
    Postgresql,
    SqlServer,
}

impl Protocol {
    /// Conventional port used when no override is supplied.
    pub fn default_port(self) -> u16 {
        match self {
            Protocol::Rdp => 3389,
            Protocol::Ssh => 22,
            Protocol::Vnc => 5900,
            Protocol::Mysql => 3306,
            Protocol::Postgresql => 5432,
            Protocol::SqlServer => 1433,
        }
    }

    /// Spelling used in command lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Protocol::Rdp => "rdp",
            Protocol::Ssh => "ssh",
            Protocol::Vnc => "vnc",
            Protocol::Mysql => "mysql",
            Protocol::Postgresql => "postgresql",
            Protocol::SqlServer => "sql-server",
        }
    }
}

/// Fully resolved configuration for one generation run.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub gateway: String,
    pub user_folder: String,
    pub resource_folder: String,
    pub parent_folder: Option<String>,
    pub protocol: Protocol,
    pub port: u16,
    pub os: String,
    pub ssl_verification: bool,
    pub recording: bool,
    pub rotation_admin: Option<String>,
    pub schedule_json: String,
    pub skip_config: bool,
    /// Records file name referenced by the import command.
    pub records_file: String,
}

/// Optional site defaults loaded from `onboard.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsFile {
    #[serde(default)]
    pub defaults: DefaultsSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsSection {
    #[serde(default)]
    pub gateway: Option<String>,
    #[serde(default)]
    pub user_folder: Option<String>,
    #[serde(default)]
    pub resource_folder: Option<String>,
    #[serde(default)]
    pub parent_folder: Option<String>,
    #[serde(default)]
    pub protocol: Option<Protocol>,
    #[serde(default)]
    pub os: Option<String>,
    #[serde(default)]
    pub rotation_admin: Option<String>,
    #[serde(default)]
    pub schedule_json: Option<String>,
}

pub fn load_defaults(path: &Path) -> Result<DefaultsFile> {
    if !path.exists() {
        return Ok(DefaultsFile::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("read defaults file {}", path.display()))?;
    let defaults: DefaultsFile = toml::from_str(&content)
        .with_context(|| format!("parse defaults file {}", path.display()))?;
    Ok(defaults)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_ports() {
        assert_eq!(Protocol::Rdp.default_port(), 3389);
        assert_eq!(Protocol::Ssh.default_port(), 22);
        assert_eq!(Protocol::Vnc.default_port(), 5900);
        assert_eq!(Protocol::Mysql.default_port(), 3306);
        assert_eq!(Protocol::Postgresql.default_port(), 5432);
        assert_eq!(Protocol::SqlServer.default_port(), 1433);
    }

    #[test]
    fn test_protocol_spelling() {
        assert_eq!(Protocol::SqlServer.as_str(), "sql-server");
        assert_eq!(Protocol::Rdp.as_str(), "rdp");
    }

    #[test]
    fn test_load_defaults_missing_file() {
        let loaded = load_defaults(Path::new("/nonexistent/onboard.toml")).unwrap();
        assert!(loaded.defaults.gateway.is_none());
    }

    #[test]
    fn test_load_defaults_roundtrip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[defaults]
gateway = "GW-PROD"
parent_folder = "Infrastructure"
protocol = "sql-server"
os = "Windows Server 2022"
"#
        )
        .unwrap();
        file.flush().unwrap();

        let loaded = load_defaults(file.path()).unwrap();
        assert_eq!(loaded.defaults.gateway.as_deref(), Some("GW-PROD"));
        assert_eq!(loaded.defaults.parent_folder.as_deref(), Some("Infrastructure"));
        assert_eq!(loaded.defaults.protocol, Some(Protocol::SqlServer));
        assert!(loaded.defaults.user_folder.is_none());
    }

    #[test]
    fn test_load_defaults_rejects_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "not toml at all [[[").unwrap();
        file.flush().unwrap();
        assert!(load_defaults(file.path()).is_err());
    }
}

//! Serde model of the record-import batch.

use crate::constants;
use serde::Serialize;

/// Top-level wrapper consumed by `keeper import --format json`.
#[derive(Debug, Default, Serialize)]
pub struct ImportBatch {
    pub shared_folders: Vec<serde_json::Value>,
    pub records: Vec<ImportRecord>,
}

/// Either half of a generated record pair.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ImportRecord {
    Credential(CredentialRecord),
    Resource(ResourceRecord),
}

/// Privileged-account secret destined for the vault (`pamUser`).
#[derive(Debug, Serialize)]
pub struct CredentialRecord {
    #[serde(rename = "$type")]
    pub record_type: &'static str,
    /// Run-scoped identifier; meaningless once import completes.
    pub uid: String,
    pub title: String,
    pub login: String,
    pub password: String,
    pub folders: Vec<FolderPlacement>,
}

/// Managed endpoint record (`pamMachine`), linked to its credential.
#[derive(Debug, Serialize)]
pub struct ResourceRecord {
    #[serde(rename = "$type")]
    pub record_type: &'static str,
    pub title: String,
    // The import schema requires login/password on machines; the values
    // are placeholders.
    pub login: &'static str,
    pub password: &'static str,
    pub folders: Vec<FolderPlacement>,
    pub custom_fields: CustomFields,
    pub links: Vec<String>,
}

/// Where a record lands in the vault after import.
#[derive(Debug, Clone, Serialize)]
pub struct FolderPlacement {
    pub shared_folder: String,
    pub can_edit: bool,
    pub can_share: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_folder: Option<String>,
}

/// Connection custom fields on a resource record.
#[derive(Debug, Serialize)]
pub struct CustomFields {
    /// Must be present, even empty, to pass import-side schema validation.
    #[serde(rename = "$pamSettings")]
    pub settings: PamSettings,
    #[serde(rename = "$pamHostname")]
    pub hostname: PamHostname,
    /// Explicit boolean; an absent field is rejected downstream.
    #[serde(rename = "$checkbox:sslVerification")]
    pub ssl_verification: bool,
    #[serde(rename = "operatingSystem")]
    pub operating_system: String,
}

/// Placeholder settings object required by the import schema.
#[derive(Debug, Default, Serialize)]
pub struct PamSettings {
    pub connection: serde_json::Map<String, serde_json::Value>,
    #[serde(rename = "portForward")]
    pub port_forward: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct PamHostname {
    #[serde(rename = "hostName")]
    pub host_name: String,
    /// Stringly typed on the wire.
    pub port: String,
}

/// Conventional title for a host's admin credential record.
pub fn admin_title(hostname: &str) -> String {
    format!("{} {}", hostname, constants::ADMIN_TITLE_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_title() {
        assert_eq!(admin_title("web01"), "web01 Local Admin");
    }

    #[test]
    fn test_settings_placeholder_serializes_empty_objects() {
        let json = serde_json::to_value(PamSettings::default()).unwrap();
        assert_eq!(json["connection"], serde_json::json!({}));
        assert_eq!(json["portForward"], serde_json::json!({}));
    }

    #[test]
    fn test_placement_parent_omitted_when_absent() {
        let placement = FolderPlacement {
            shared_folder: "PAM_Users".into(),
            can_edit: true,
            can_share: true,
            parent_folder: None,
        };
        let json = serde_json::to_value(&placement).unwrap();
        assert!(json.get("parent_folder").is_none());
    }

    #[test]
    fn test_ssl_flag_present_when_false() {
        let fields = CustomFields {
            settings: PamSettings::default(),
            hostname: PamHostname {
                host_name: "db01".into(),
                port: "1433".into(),
            },
            ssl_verification: false,
            operating_system: "Windows".into(),
        };
        let json = serde_json::to_value(&fields).unwrap();
        assert_eq!(json["$checkbox:sslVerification"], serde_json::json!(false));
    }
}

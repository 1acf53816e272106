//! Record synthesis: one credential/resource pair per entry.

use crate::models::config::GenerateConfig;
use crate::models::entry::HostCredentialEntry;
use crate::models::record::{
    admin_title, CredentialRecord, CustomFields, FolderPlacement, ImportBatch, ImportRecord,
    PamHostname, PamSettings, ResourceRecord,
};
use crate::util::ident;
use std::collections::HashSet;

/// Build the import batch for `entries`.
///
/// Pure transformation: entries are assumed validated and deduplicated.
/// Each credential/resource pair is linked by a fresh run-scoped
/// identifier, so coinciding hostname prefixes can never alias.
pub fn generate_batch(entries: &[HostCredentialEntry], cfg: &GenerateConfig) -> ImportBatch {
    let mut records = Vec::with_capacity(entries.len() * 2);
    let port = cfg.port.to_string();

    for entry in entries {
        let uid = ident::run_uid();

        records.push(ImportRecord::Credential(CredentialRecord {
            record_type: "pamUser",
            uid: uid.clone(),
            title: admin_title(&entry.hostname),
            login: entry.username.clone(),
            password: entry.password.to_string(),
            folders: vec![placement(&cfg.user_folder, cfg.parent_folder.as_deref())],
        }));

        records.push(ImportRecord::Resource(ResourceRecord {
            record_type: "pamMachine",
            title: entry.hostname.clone(),
            login: "stub",
            password: "stub",
            folders: vec![placement(&cfg.resource_folder, cfg.parent_folder.as_deref())],
            custom_fields: CustomFields {
                settings: PamSettings::default(),
                hostname: PamHostname {
                    host_name: entry.hostname.clone(),
                    port: port.clone(),
                },
                ssl_verification: cfg.ssl_verification,
                operating_system: cfg.os.clone(),
            },
            links: vec![uid],
        }));
    }

    ImportBatch {
        shared_folders: Vec::new(),
        records,
    }
}

fn placement(folder: &str, parent: Option<&str>) -> FolderPlacement {
    FolderPlacement {
        shared_folder: folder.to_string(),
        can_edit: true,
        can_share: true,
        parent_folder: parent.map(str::to_string),
    }
}

/// Check that every resource links to exactly one credential present in the
/// same batch. A mismatch is a construction bug, not a runtime condition.
pub fn verify_links(batch: &ImportBatch) -> bool {
    let uids: HashSet<&str> = batch
        .records
        .iter()
        .filter_map(|record| match record {
            ImportRecord::Credential(cred) => Some(cred.uid.as_str()),
            ImportRecord::Resource(_) => None,
        })
        .collect();

    batch.records.iter().all(|record| match record {
        ImportRecord::Credential(_) => true,
        ImportRecord::Resource(res) => {
            res.links.len() == 1 && res.links.iter().all(|link| uids.contains(link.as_str()))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants;
    use crate::models::config::Protocol;
    use zeroize::Zeroizing;

    fn entry(hostname: &str, username: &str, password: &str) -> HostCredentialEntry {
        HostCredentialEntry {
            hostname: hostname.to_string(),
            username: username.to_string(),
            password: Zeroizing::new(password.to_string()),
        }
    }

    fn test_cfg() -> GenerateConfig {
        GenerateConfig {
            gateway: "GW1".into(),
            user_folder: "PAM_Users".into(),
            resource_folder: "PAM_Resources".into(),
            parent_folder: None,
            protocol: Protocol::Ssh,
            port: 22,
            os: "Linux".into(),
            ssl_verification: false,
            recording: false,
            rotation_admin: None,
            schedule_json: constants::DEFAULT_SCHEDULE_JSON.into(),
            skip_config: false,
            records_file: "pam_records_import.json".into(),
        }
    }

    #[test]
    fn test_one_pair_per_entry() {
        let entries = vec![entry("h1", "u1", "p1"), entry("h2", "u2", "p2")];
        let batch = generate_batch(&entries, &test_cfg());
        assert_eq!(batch.records.len(), 4);
        assert!(batch.shared_folders.is_empty());
        assert!(matches!(batch.records[0], ImportRecord::Credential(_)));
        assert!(matches!(batch.records[1], ImportRecord::Resource(_)));
    }

    #[test]
    fn test_links_resolve_within_batch() {
        let entries = vec![entry("h1", "u1", "p1"), entry("h2", "u2", "p2")];
        let batch = generate_batch(&entries, &test_cfg());
        assert!(verify_links(&batch));

        // Each resource links its own pair's credential, not a neighbor's.
        let ImportRecord::Credential(cred) = &batch.records[0] else {
            panic!("expected credential first");
        };
        let ImportRecord::Resource(res) = &batch.records[1] else {
            panic!("expected resource second");
        };
        assert_eq!(res.links, vec![cred.uid.clone()]);
    }

    #[test]
    fn test_verify_links_catches_dangling_reference() {
        let entries = vec![entry("h1", "u1", "p1")];
        let mut batch = generate_batch(&entries, &test_cfg());
        if let ImportRecord::Resource(res) = &mut batch.records[1] {
            res.links = vec!["0000000000000000".to_string()];
        }
        assert!(!verify_links(&batch));
    }

    #[test]
    fn test_uids_fresh_even_for_similar_hostnames() {
        let entries = vec![entry("web", "u", "p"), entry("web-01", "u", "p")];
        let batch = generate_batch(&entries, &test_cfg());
        let uids: Vec<&str> = batch
            .records
            .iter()
            .filter_map(|r| match r {
                ImportRecord::Credential(c) => Some(c.uid.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(uids.len(), 2);
        assert_ne!(uids[0], uids[1]);
    }

    #[test]
    fn test_credential_fields() {
        let entries = vec![entry("db01", "admin", "hunter2")];
        let batch = generate_batch(&entries, &test_cfg());
        let ImportRecord::Credential(cred) = &batch.records[0] else {
            panic!("expected credential");
        };
        assert_eq!(cred.record_type, "pamUser");
        assert_eq!(cred.title, "db01 Local Admin");
        assert_eq!(cred.login, "admin");
        assert_eq!(cred.password, "hunter2");
        assert_eq!(cred.folders[0].shared_folder, "PAM_Users");
        assert!(cred.folders[0].can_edit);
        assert!(cred.folders[0].can_share);
    }

    #[test]
    fn test_resource_wire_shape() {
        let entries = vec![entry("db01", "admin", "hunter2")];
        let batch = generate_batch(&entries, &test_cfg());
        let json = serde_json::to_value(&batch).unwrap();
        let resource = &json["records"][1];

        assert_eq!(resource["$type"], "pamMachine");
        assert_eq!(resource["title"], "db01");
        assert_eq!(resource["login"], "stub");
        assert_eq!(resource["custom_fields"]["$pamHostname"]["hostName"], "db01");
        assert_eq!(resource["custom_fields"]["$pamHostname"]["port"], "22");
        assert_eq!(
            resource["custom_fields"]["$checkbox:sslVerification"],
            serde_json::json!(false)
        );
        assert_eq!(resource["custom_fields"]["operatingSystem"], "Linux");
        // settings placeholder must be present even when empty
        assert_eq!(
            resource["custom_fields"]["$pamSettings"],
            serde_json::json!({"connection": {}, "portForward": {}})
        );
    }

    #[test]
    fn test_port_override_respected() {
        let entries = vec![entry("h1", "u", "p")];
        let mut cfg = test_cfg();
        cfg.port = 2222;
        let batch = generate_batch(&entries, &cfg);
        let json = serde_json::to_value(&batch).unwrap();
        assert_eq!(json["records"][1]["custom_fields"]["$pamHostname"]["port"], "2222");
    }

    #[test]
    fn test_parent_folder_flows_into_placements() {
        let entries = vec![entry("h1", "u", "p")];
        let mut cfg = test_cfg();
        cfg.parent_folder = Some("Infrastructure".into());
        let batch = generate_batch(&entries, &cfg);
        let json = serde_json::to_value(&batch).unwrap();
        assert_eq!(
            json["records"][0]["folders"][0]["parent_folder"],
            "Infrastructure"
        );
        assert_eq!(
            json["records"][1]["folders"][0]["parent_folder"],
            "Infrastructure"
        );
    }
}

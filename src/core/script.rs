//! Command script composition.
//!
//! Commands are assembled as typed word lists and only serialized at
//! emission, keeping the stage-ordering logic free of string formatting.
//! Stage order is fixed: import, configuration binding, connection wiring,
//! rotation scheduling. Each stage only references entities created by an
//! earlier one, addressed by vault path rather than run-scoped uid.

use crate::models::config::GenerateConfig;
use crate::models::entry::HostCredentialEntry;
use crate::models::record::admin_title;
use chrono::{DateTime, Utc};

/// One textual command, built word by word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cmd {
    words: Vec<String>,
}

impl Cmd {
    pub fn new(program: &[&str]) -> Self {
        Self {
            words: program.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Bare word: a flag without value, or an unquoted positional.
    pub fn word(mut self, word: &str) -> Self {
        self.words.push(word.to_string());
        self
    }

    /// `--flag value` with the value emitted verbatim.
    pub fn opt(mut self, flag: &str, value: &str) -> Self {
        self.words.push(flag.to_string());
        self.words.push(value.to_string());
        self
    }

    /// `--flag "value"`, for vault paths and titles.
    pub fn opt_quoted(mut self, flag: &str, value: &str) -> Self {
        self.words.push(flag.to_string());
        self.words.push(format!("\"{}\"", value));
        self
    }

    /// Quoted positional argument.
    pub fn arg_quoted(mut self, value: &str) -> Self {
        self.words.push(format!("\"{}\"", value));
        self
    }

    /// `--flag 'value'`, for JSON payloads.
    pub fn opt_json(mut self, flag: &str, value: &str) -> Self {
        self.words.push(flag.to_string());
        self.words.push(format!("'{}'", value));
        self
    }

    pub fn render(&self) -> String {
        self.words.join(" ")
    }
}

/// A named command group within the fixed stage order.
#[derive(Debug)]
pub struct Stage {
    pub title: &'static str,
    pub commands: Vec<Cmd>,
}

/// The full four-stage command sequence.
#[derive(Debug)]
pub struct CommandScript {
    pub stages: Vec<Stage>,
}

impl CommandScript {
    /// Render to text. `generated_at` appears only in the header comment,
    /// keeping the executable lines byte-for-byte reproducible.
    pub fn render(&self, generated_at: DateTime<Utc>) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "# ==== PAM onboarding commands generated {} ====\n",
            generated_at.format("%Y-%m-%dT%H:%M:%SZ")
        ));
        out.push_str("# Review carefully, then feed line by line to the Commander CLI.\n");
        for stage in &self.stages {
            out.push('\n');
            out.push_str(&format!("# ---- {} ----\n", stage.title));
            if stage.commands.is_empty() {
                out.push_str("# (skipped)\n");
            }
            for cmd in &stage.commands {
                out.push_str(&cmd.render());
                out.push('\n');
            }
        }
        out
    }

    pub fn command_count(&self) -> usize {
        self.stages.iter().map(|stage| stage.commands.len()).sum()
    }
}

/// Post-import vault path of a shared folder, accounting for the stage-2
/// folder moves when a parent is configured.
pub fn folder_path(parent: Option<&str>, folder: &str) -> String {
    match parent {
        Some(parent) => format!("/{}/{}", parent, folder),
        None => format!("/{}", folder),
    }
}

/// Compose the dependency-ordered command sequence for `entries`.
pub fn compose(entries: &[HostCredentialEntry], cfg: &GenerateConfig) -> CommandScript {
    let user_root = folder_path(cfg.parent_folder.as_deref(), &cfg.user_folder);
    let resource_root = folder_path(cfg.parent_folder.as_deref(), &cfg.resource_folder);
    let port = cfg.port.to_string();

    // Stage 1: bulk import of the generated batch.
    let import = vec![Cmd::new(&["keeper", "import"])
        .opt("--format", "json")
        .word(&cfg.records_file)];

    // Stage 2: one PAM configuration per managed folder, plus folder moves
    // when nesting under a parent (import cannot create nested shared
    // folders directly).
    let mut config = Vec::new();
    if !cfg.skip_config {
        for folder in [&cfg.user_folder, &cfg.resource_folder] {
            config.push(
                Cmd::new(&["keeper", "pam", "config", "new"])
                    .opt("--environment", "local")
                    .opt_quoted("--title", &format!("Config for {}", folder))
                    .opt_quoted("--shared-folder", folder)
                    .opt("-g", &cfg.gateway)
                    .word("--connections=on")
                    .word("--rotation=on"),
            );
        }
        if let Some(parent) = cfg.parent_folder.as_deref() {
            for folder in [&cfg.user_folder, &cfg.resource_folder] {
                config.push(
                    Cmd::new(&["keeper", "folder", "move"])
                        .arg_quoted(&format!("/{}", folder))
                        .arg_quoted(&format!("/{}/{}", parent, folder)),
                );
            }
        }
    }

    // Stage 3: attach each machine to the configuration created above.
    let mut connection = Vec::new();
    for entry in entries {
        let mut cmd = Cmd::new(&["keeper", "pam", "connection", "edit"])
            .arg_quoted(&format!("{}/{}", resource_root, entry.hostname))
            .opt_quoted("--config", &resource_root)
            .opt_quoted(
                "--admin-user",
                &format!("{}/{}", user_root, admin_title(&entry.hostname)),
            )
            .opt("--protocol", cfg.protocol.as_str())
            .opt("--connections", "on")
            .opt("--connections-override-port", &port);
        if cfg.recording {
            // downstream syntax has no disabling flag; absence means off
            cmd = cmd.opt("--recording", "on");
        }
        connection.push(cmd);
    }

    // Stage 4: unattended rotation for every credential.
    let mut rotation = Vec::new();
    for entry in entries {
        let mut cmd = Cmd::new(&["keeper", "pam", "rotation", "set"])
            .opt_quoted(
                "--record",
                &format!("{}/{}", user_root, admin_title(&entry.hostname)),
            )
            .opt_quoted("--resource", &format!("{}/{}", resource_root, entry.hostname))
            .opt_quoted("--config", &resource_root)
            .word("--enable")
            .word("--force");
        if let Some(admin) = cfg.rotation_admin.as_deref() {
            cmd = cmd.opt_quoted("--admin-user", admin);
        }
        rotation.push(cmd.opt_json("-sj", &cfg.schedule_json));
    }

    CommandScript {
        stages: vec![
            Stage {
                title: "import",
                commands: import,
            },
            Stage {
                title: "configuration binding",
                commands: config,
            },
            Stage {
                title: "connection wiring",
                commands: connection,
            },
            Stage {
                title: "rotation scheduling",
                commands: rotation,
            },
        ],
    }
}

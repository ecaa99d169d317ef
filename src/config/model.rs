// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::exec::StdioTarget;
use crate::types::ErrorPolicyKind;

/// Defaults file as read from TOML, before validation.
///
/// ```toml
/// [logging]
/// level = "debug"
///
/// [launch]
/// error_policy = "recover"
/// working_dir = "/srv/app"
/// inherit_handles = true
/// stdout = ">>/var/log/app.out"
///
/// [launch.env]
/// RUST_LOG = "info"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub logging: LoggingSection,

    #[serde(default)]
    pub launch: RawLaunchSection,
}

/// `[logging]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingSection {
    /// "error", "warn", "info", "debug" or "trace". Overridden by
    /// `--log-level` and `LAUNCHSEQ_LOG`.
    #[serde(default)]
    pub level: Option<String>,
}

/// `[launch]` section as written by the user.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLaunchSection {
    #[serde(default)]
    pub error_policy: ErrorPolicyKind,

    #[serde(default)]
    pub working_dir: Option<PathBuf>,

    /// Pass the parent's standard streams through (default: true).
    #[serde(default = "default_inherit_handles")]
    pub inherit_handles: bool,

    /// Start from an empty environment instead of the parent's.
    #[serde(default)]
    pub clear_env: bool,

    #[serde(default)]
    pub new_process_group: bool,

    #[serde(default)]
    pub env: BTreeMap<String, String>,

    #[serde(default)]
    pub unset_env: Vec<String>,

    #[serde(default)]
    pub stdin: Option<String>,

    #[serde(default)]
    pub stdout: Option<String>,

    #[serde(default)]
    pub stderr: Option<String>,
}

fn default_inherit_handles() -> bool {
    true
}

impl Default for RawLaunchSection {
    fn default() -> Self {
        Self {
            error_policy: ErrorPolicyKind::default(),
            working_dir: None,
            inherit_handles: default_inherit_handles(),
            clear_env: false,
            new_process_group: false,
            env: BTreeMap::new(),
            unset_env: Vec::new(),
            stdin: None,
            stdout: None,
            stderr: None,
        }
    }
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>` (see `validate.rs`) or
/// `Default`.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    pub log_level: Option<tracing::Level>,
    pub launch: LaunchDefaults,
}

/// `[launch]` after validation, with stdio specs parsed.
#[derive(Debug, Clone)]
pub struct LaunchDefaults {
    pub error_policy: ErrorPolicyKind,
    pub working_dir: Option<PathBuf>,
    pub inherit_handles: bool,
    pub clear_env: bool,
    pub new_process_group: bool,
    pub env: BTreeMap<String, String>,
    pub unset_env: Vec<String>,
    pub stdin: StdioTarget,
    pub stdout: StdioTarget,
    pub stderr: StdioTarget,
}

impl Default for LaunchDefaults {
    fn default() -> Self {
        Self {
            error_policy: ErrorPolicyKind::default(),
            working_dir: None,
            inherit_handles: default_inherit_handles(),
            clear_env: false,
            new_process_group: false,
            env: BTreeMap::new(),
            unset_env: Vec::new(),
            stdin: StdioTarget::Inherit,
            stdout: StdioTarget::Inherit,
            stderr: StdioTarget::Inherit,
        }
    }
}

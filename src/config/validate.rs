// src/config/validate.rs

use std::ffi::OsStr;

use crate::config::model::{ConfigFile, LaunchDefaults, RawConfigFile, RawLaunchSection};
use crate::errors::{LaunchseqError, Result};
use crate::exec::StdioTarget;
use crate::init::env::validate_env_key;
use crate::logging::parse_level_str;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::LaunchseqError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let log_level = validate_log_level(raw.logging.level.as_deref())?;
        let launch = validate_launch(raw.launch)?;
        Ok(ConfigFile { log_level, launch })
    }
}

fn validate_log_level(level: Option<&str>) -> Result<Option<tracing::Level>> {
    match level {
        None => Ok(None),
        Some(s) => parse_level_str(s).map(Some).ok_or_else(|| {
            LaunchseqError::ConfigError(format!(
                "[logging].level: unknown level '{}' (expected error, warn, info, debug or trace)",
                s
            ))
        }),
    }
}

fn validate_launch(raw: RawLaunchSection) -> Result<LaunchDefaults> {
    if let Some(dir) = &raw.working_dir {
        if dir.as_os_str().is_empty() {
            return Err(LaunchseqError::ConfigError(
                "[launch].working_dir must not be empty".to_string(),
            ));
        }
    }

    for key in raw.env.keys().chain(raw.unset_env.iter()) {
        validate_env_key(OsStr::new(key))
            .map_err(|msg| LaunchseqError::ConfigError(format!("[launch.env]: {msg}")))?;
    }

    for (key, value) in raw.env.iter() {
        if value.contains('\0') {
            return Err(LaunchseqError::ConfigError(format!(
                "[launch.env]: value of '{}' contains NUL",
                key
            )));
        }
    }

    let stdin = parse_stdio("stdin", raw.stdin.as_deref())?;
    let stdout = parse_stdio("stdout", raw.stdout.as_deref())?;
    let stderr = parse_stdio("stderr", raw.stderr.as_deref())?;

    if let StdioTarget::Append(_) = stdin {
        return Err(LaunchseqError::ConfigError(
            "[launch].stdin cannot be an append target".to_string(),
        ));
    }

    Ok(LaunchDefaults {
        error_policy: raw.error_policy,
        working_dir: raw.working_dir,
        inherit_handles: raw.inherit_handles,
        clear_env: raw.clear_env,
        new_process_group: raw.new_process_group,
        env: raw.env,
        unset_env: raw.unset_env,
        stdin,
        stdout,
        stderr,
    })
}

fn parse_stdio(field: &str, value: Option<&str>) -> Result<StdioTarget> {
    match value {
        None => Ok(StdioTarget::Inherit),
        Some(s) => s
            .parse()
            .map_err(|msg| LaunchseqError::ConfigError(format!("[launch].{field}: {msg}"))),
    }
}

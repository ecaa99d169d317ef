// src/exec/request.rs

//! The accumulating launch request.
//!
//! Every field starts unset; components fill them in during setup and the
//! native creator reads them exactly once.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::ops::BitOr;
use std::path::PathBuf;
use std::str::FromStr;

/// Parameters of the native process-creation call.
#[derive(Debug, Clone, Default)]
pub struct LaunchRequest {
    /// Program to run. Resolved through `PATH` if it has no separator.
    pub executable: Option<PathBuf>,
    /// Arguments after argv[0].
    pub args: Vec<OsString>,
    /// argv[0] override (Unix only).
    pub arg0: Option<OsString>,
    pub working_dir: Option<PathBuf>,
    /// Complete environment block. `None` inherits the parent's environment.
    pub environment: Option<Environment>,
    pub security: Option<SecurityAttributes>,
    /// Pass standard streams left at [`StdioTarget::Inherit`] through to the
    /// child. When false they are connected to the null device.
    pub inherit_handles: bool,
    pub creation_flags: CreationFlags,
    pub startup: StartupInfo,
}

/// Environment block handed to the child.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    vars: BTreeMap<OsString, OsString>,
}

impl Environment {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Snapshot of the current process environment.
    pub fn from_current() -> Self {
        Self {
            vars: std::env::vars_os().collect(),
        }
    }

    pub fn set(&mut self, key: impl Into<OsString>, value: impl Into<OsString>) {
        self.vars.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: impl AsRef<OsStr>) -> Option<OsString> {
        self.vars.remove(key.as_ref())
    }

    pub fn get(&self, key: impl AsRef<OsStr>) -> Option<&OsStr> {
        self.vars.get(key.as_ref()).map(OsString::as_os_str)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OsStr, &OsStr)> {
        self.vars.iter().map(|(k, v)| (k.as_os_str(), v.as_os_str()))
    }
}

/// Identity the child runs as. Honoured on Unix only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SecurityAttributes {
    pub uid: Option<u32>,
    pub gid: Option<u32>,
}

/// Creation flag bit set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CreationFlags(u32);

impl CreationFlags {
    pub const NONE: CreationFlags = CreationFlags(0);
    /// Start the child in its own process group.
    pub const NEW_PROCESS_GROUP: CreationFlags = CreationFlags(0x0000_0200);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn from_bits(bits: u32) -> Self {
        CreationFlags(bits)
    }

    pub const fn contains(self, other: CreationFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: CreationFlags) {
        self.0 |= other.0;
    }
}

impl BitOr for CreationFlags {
    type Output = CreationFlags;

    fn bitor(self, rhs: Self) -> Self::Output {
        CreationFlags(self.0 | rhs.0)
    }
}

/// Where a standard stream of the child goes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StdioTarget {
    #[default]
    Inherit,
    Null,
    /// Read from (stdin) or truncate-and-write to (stdout/stderr) a file.
    File(PathBuf),
    /// Append to a file. Output streams only.
    Append(PathBuf),
}

impl FromStr for StdioTarget {
    type Err = String;

    /// `"inherit"`, `"null"`, `">>path"` for append, anything else is a path.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_lowercase().as_str() {
            "" => Err("empty stdio target (expected \"inherit\", \"null\" or a path)".to_string()),
            "inherit" => Ok(StdioTarget::Inherit),
            "null" => Ok(StdioTarget::Null),
            _ => match s.strip_prefix(">>") {
                Some("") => Err("append target \">>\" needs a path".to_string()),
                Some(path) => Ok(StdioTarget::Append(PathBuf::from(path.trim_start()))),
                None => Ok(StdioTarget::File(PathBuf::from(s))),
            },
        }
    }
}

/// Standard stream wiring for the child.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartupInfo {
    pub stdin: StdioTarget,
    pub stdout: StdioTarget,
    pub stderr: StdioTarget,
}

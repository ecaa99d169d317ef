// src/errors.rs

//! Crate-wide error types.
//!
//! - [`LaunchError`] is what launch components observe in `on_error` and what
//!   the executor hands back to the caller. It is `Clone` so that every hook
//!   (and an [`crate::init::ErrorSink`]) can keep its own copy.
//! - [`LaunchseqError`] covers everything else: config loading, waiting on a
//!   process, the exit-status cell contract.

use std::io;

use thiserror::Error;

/// Code used when an io error carries no raw OS error number.
pub const UNKNOWN_OS_ERROR: i32 = -1;

/// A failed launch attempt, carrying the native OS error code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LaunchError {
    /// A component rejected the configuration before any OS resource was
    /// touched.
    #[error("launch setup failed: {} (os error {code})", describe(.message))]
    Setup { code: i32, message: Option<String> },

    /// The native creation call failed, or reported success while an error
    /// was already recorded.
    #[error("process creation failed: {} (os error {code})", describe(.message))]
    Launch { code: i32, message: Option<String> },
}

fn describe(message: &Option<String>) -> &str {
    message.as_deref().unwrap_or("no details")
}

impl LaunchError {
    pub fn setup(code: i32, message: impl Into<String>) -> Self {
        LaunchError::Setup {
            code,
            message: Some(message.into()),
        }
    }

    pub fn launch(code: i32, message: impl Into<String>) -> Self {
        LaunchError::Launch {
            code,
            message: Some(message.into()),
        }
    }

    /// Setup error with `EINVAL`, the usual verdict on a bad component value.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::setup(libc::EINVAL, message)
    }

    /// Classify an io error coming out of the native creation call.
    pub fn from_io(err: &io::Error) -> Self {
        LaunchError::Launch {
            code: err.raw_os_error().unwrap_or(UNKNOWN_OS_ERROR),
            message: Some(err.to_string()),
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            LaunchError::Setup { code, .. } | LaunchError::Launch { code, .. } => *code,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            LaunchError::Setup { message, .. } | LaunchError::Launch { message, .. } => {
                message.as_deref()
            }
        }
    }

    pub fn is_setup(&self) -> bool {
        matches!(self, LaunchError::Setup { .. })
    }

    /// The `io::ErrorKind` matching the OS code.
    pub fn kind(&self) -> io::ErrorKind {
        match self.code() {
            UNKNOWN_OS_ERROR => io::ErrorKind::Other,
            code => io::Error::from_raw_os_error(code).kind(),
        }
    }

    /// Re-stamp this error as a launch-time failure, keeping code and message.
    pub fn at_launch(self) -> Self {
        match self {
            LaunchError::Setup { code, message } => LaunchError::Launch { code, message },
            launch => launch,
        }
    }
}

#[derive(Error, Debug)]
pub enum LaunchseqError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Launch(#[from] LaunchError),

    #[error("process handle does not own a process")]
    EmptyHandle,

    #[error("exit status already published (code {0})")]
    StatusAlreadyPublished(i32),

    #[error("exit code {0} is reserved for the still-running sentinel")]
    ReservedExitCode(i32),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, LaunchseqError>;

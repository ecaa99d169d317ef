// src/process/status.rs

//! Shared exit-status cell.
//!
//! One atomic `i32` behind an `Arc`. It holds [`STILL_ACTIVE`] from
//! construction until a waiter publishes the real exit code, exactly once.
//! Every clone observes the same value, and reads never tear.

use std::sync::Arc;
use std::sync::atomic::{AtomicI32, Ordering};

use crate::errors::{LaunchseqError, Result};

/// Sentinel meaning "no exit code yet".
///
/// On Unix real exit codes are `0..=255` (signal deaths are reported as
/// `128 + signo`), so `i32::MIN` never collides with one. Windows exit codes
/// span the full `u32` range; [`exit_code`](crate::exec::native::exit_code)
/// remaps `0x8000_0000` there.
pub const STILL_ACTIVE: i32 = i32::MIN;

/// Run/exit state of a process as seen through its handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitState {
    /// The handle owns no process (a failed launch).
    Invalid,
    Running,
    Exited(i32),
}

impl ExitState {
    pub fn is_running(self) -> bool {
        self == ExitState::Running
    }

    pub fn code(self) -> Option<i32> {
        match self {
            ExitState::Exited(code) => Some(code),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExitStatusCell {
    code: Arc<AtomicI32>,
}

impl ExitStatusCell {
    /// A fresh cell holding the sentinel.
    pub fn new() -> Self {
        Self {
            code: Arc::new(AtomicI32::new(STILL_ACTIVE)),
        }
    }

    pub fn load(&self) -> ExitState {
        match self.code.load(Ordering::Acquire) {
            STILL_ACTIVE => ExitState::Running,
            code => ExitState::Exited(code),
        }
    }

    pub fn is_running(&self) -> bool {
        self.load().is_running()
    }

    /// Write the final exit code. Succeeds only for the first writer.
    pub fn publish(&self, code: i32) -> Result<()> {
        if code == STILL_ACTIVE {
            return Err(LaunchseqError::ReservedExitCode(code));
        }
        self.code
            .compare_exchange(STILL_ACTIVE, code, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(LaunchseqError::StatusAlreadyPublished)
    }

    /// Whether `other` is a clone of this cell.
    pub fn same_cell(&self, other: &ExitStatusCell) -> bool {
        Arc::ptr_eq(&self.code, &other.code)
    }
}

impl Default for ExitStatusCell {
    fn default() -> Self {
        Self::new()
    }
}

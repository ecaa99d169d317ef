// src/process/waiter.rs

//! Reaping launched processes.
//!
//! The executor never writes a final exit code. Whoever waits on the process
//! does, through these helpers, which publish into the handle's cell using
//! its write-once contract.

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::errors::{LaunchseqError, Result};
use crate::process::handle::ProcessHandle;
use crate::process::status::{ExitState, ExitStatusCell};

/// Block until the process exits, publish its code, and return it.
///
/// Waiting again after the code was published returns the stored code.
pub fn wait_blocking(handle: &mut ProcessHandle) -> Result<i32> {
    let (child, cell) = handle.parts_mut().ok_or(LaunchseqError::EmptyHandle)?;
    if let ExitState::Exited(code) = cell.load() {
        return Ok(code);
    }

    let pid = child.id();
    debug!(pid, "waiting for process");
    let code = child.wait()?;
    record(cell, pid, code)
}

/// Poll the process once without blocking.
pub fn poll(handle: &mut ProcessHandle) -> Result<ExitState> {
    let (child, cell) = handle.parts_mut().ok_or(LaunchseqError::EmptyHandle)?;
    if let state @ ExitState::Exited(_) = cell.load() {
        return Ok(state);
    }

    let pid = child.id();
    match child.try_wait()? {
        Some(code) => record(cell, pid, code).map(ExitState::Exited),
        None => Ok(ExitState::Running),
    }
}

/// Hand the process to a blocking Tokio task that reaps it.
///
/// Grab [`ProcessHandle::status_cell`] first if other parts of the program
/// need to watch the status while the waiter runs.
pub fn spawn_waiter(mut handle: ProcessHandle) -> JoinHandle<Result<i32>> {
    tokio::task::spawn_blocking(move || wait_blocking(&mut handle))
}

fn record(cell: &ExitStatusCell, pid: u32, code: i32) -> Result<i32> {
    match cell.publish(code) {
        Ok(()) => {
            info!(pid, exit_code = code, "process exited");
            Ok(code)
        }
        // Another waiter got there first with the same status.
        Err(LaunchseqError::StatusAlreadyPublished(existing)) if existing == code => Ok(code),
        Err(e) => Err(e),
    }
}

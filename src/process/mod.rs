// src/process/mod.rs

//! Launched processes and their termination state.
//!
//! - [`handle`]: the owning `ProcessHandle` returned by the executor.
//! - [`status`]: the shared write-once `ExitStatusCell` and its sentinel.
//! - [`waiter`]: helpers that reap a process and publish its exit code.

pub mod handle;
pub mod status;
pub mod waiter;

pub use handle::ProcessHandle;
pub use status::{ExitState, ExitStatusCell, STILL_ACTIVE};
pub use waiter::{poll, spawn_waiter, wait_blocking};

// src/process/handle.rs

use std::io;

use crate::exec::native::OsChild;
use crate::process::status::{ExitState, ExitStatusCell};

/// A spawned process plus its shared exit-status cell.
///
/// The default value is the empty handle returned by failed launches: it owns
/// no process and reports [`ExitState::Invalid`]. Dropping a live handle does
/// not kill the process.
#[derive(Debug, Default)]
pub struct ProcessHandle {
    child: Option<Box<dyn OsChild>>,
    status: Option<ExitStatusCell>,
}

impl ProcessHandle {
    pub(crate) fn new(child: Box<dyn OsChild>) -> Self {
        Self {
            child: Some(child),
            status: Some(ExitStatusCell::new()),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.child.is_some()
    }

    pub fn id(&self) -> Option<u32> {
        self.child.as_ref().map(|c| c.id())
    }

    /// Non-blocking read of the exit-status cell.
    pub fn status(&self) -> ExitState {
        self.status
            .as_ref()
            .map_or(ExitState::Invalid, ExitStatusCell::load)
    }

    /// A shared reference to the cell, for readers on other threads.
    pub fn status_cell(&self) -> Option<ExitStatusCell> {
        self.status.clone()
    }

    pub fn kill(&mut self) -> io::Result<()> {
        match self.child.as_mut() {
            Some(child) => child.kill(),
            None => Err(io::Error::new(
                io::ErrorKind::NotFound,
                "process handle does not own a process",
            )),
        }
    }

    /// Split borrow used by the waiter: the OS child and the cell.
    pub(crate) fn parts_mut(&mut self) -> Option<(&mut Box<dyn OsChild>, &ExitStatusCell)> {
        match (self.child.as_mut(), self.status.as_ref()) {
            (Some(child), Some(status)) => Some((child, status)),
            _ => None,
        }
    }
}

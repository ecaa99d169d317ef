// src/exec/launch.rs

use tracing::debug;

use crate::errors::LaunchError;
use crate::exec::request::LaunchRequest;

/// The in-flight launch, as seen by component hooks.
///
/// Components read and write [`request`](Self::request) directly and report
/// problems through the error slot.
#[derive(Debug, Default)]
pub struct Launch {
    pub request: LaunchRequest,
    error: Option<LaunchError>,
    recoverable: bool,
    pid: Option<u32>,
}

impl Launch {
    pub(crate) fn new(recoverable: bool) -> Self {
        Self {
            recoverable,
            ..Self::default()
        }
    }

    /// Record an error. The last write wins.
    pub fn set_error(&mut self, error: LaunchError) {
        if let Some(previous) = self.error.replace(error) {
            debug!(error = %previous, "launch error replaced by a later one");
        }
    }

    pub fn error(&self) -> Option<&LaunchError> {
        self.error.as_ref()
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub(crate) fn take_error(&mut self) -> Option<LaunchError> {
        self.error.take()
    }

    /// Whether this attempt reports failures as data (an error sink is
    /// present) rather than as `Err`.
    pub fn is_recoverable(&self) -> bool {
        self.recoverable
    }

    /// OS id of the created process; set only once the native call succeeded.
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    pub(crate) fn set_pid(&mut self, pid: u32) {
        self.pid = Some(pid);
    }
}

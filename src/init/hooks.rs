// src/init/hooks.rs

//! Closure adapters and a logging component.

use tracing::{debug, info, warn};

use crate::errors::LaunchError;
use crate::exec::Launch;
use crate::seq::Initializer;

/// Runs a closure at setup.
pub struct OnSetup<F>(pub F);

/// Runs a closure when the launch fails.
pub struct OnError<F>(pub F);

/// Runs a closure once the process is running.
pub struct OnSuccess<F>(pub F);

pub fn on_setup<F: FnMut(&mut Launch)>(f: F) -> OnSetup<F> {
    OnSetup(f)
}

pub fn on_error<F: FnMut(&mut Launch, &LaunchError)>(f: F) -> OnError<F> {
    OnError(f)
}

pub fn on_success<F: FnMut(&mut Launch)>(f: F) -> OnSuccess<F> {
    OnSuccess(f)
}

impl<F: FnMut(&mut Launch)> Initializer for OnSetup<F> {
    fn on_setup(&mut self, launch: &mut Launch) {
        (self.0)(launch)
    }

    fn name(&self) -> &str {
        "on_setup"
    }
}

impl<F: FnMut(&mut Launch, &LaunchError)> Initializer for OnError<F> {
    fn on_error(&mut self, launch: &mut Launch, error: &LaunchError) {
        (self.0)(launch, error)
    }

    fn name(&self) -> &str {
        "on_error"
    }
}

impl<F: FnMut(&mut Launch)> Initializer for OnSuccess<F> {
    fn on_success(&mut self, launch: &mut Launch) {
        (self.0)(launch)
    }

    fn name(&self) -> &str {
        "on_success"
    }
}

/// Logs each phase of the launch under a label.
#[derive(Debug, Clone)]
pub struct Trace {
    label: String,
}

impl Trace {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl Initializer for Trace {
    fn on_setup(&mut self, launch: &mut Launch) {
        debug!(
            label = %self.label,
            executable = ?launch.request.executable,
            recoverable = launch.is_recoverable(),
            "preparing launch"
        );
    }

    fn on_error(&mut self, _launch: &mut Launch, error: &LaunchError) {
        warn!(label = %self.label, %error, code = error.code(), "launch failed");
    }

    fn on_success(&mut self, launch: &mut Launch) {
        info!(
            label = %self.label,
            pid = ?launch.pid(),
            executable = ?launch.request.executable,
            "process started"
        );
    }

    fn name(&self) -> &str {
        "trace"
    }
}

// src/exec/executor.rs

//! The launch state machine.
//!
//! ```text
//! Created -> SettingUp -> Failed(setup)                          -> Done
//!                      -> Launching -> Succeeded                -> Done
//!                                   -> Succeeded -> Failed(launch) -> Done
//!                                   -> Failed(launch)           -> Done
//! ```
//!
//! Every component sees `on_setup`, then the `on_error` or `on_success`
//! pass, in sequence order. A success pass that leaves an error in the slot
//! is followed by the `on_error` pass. Only after that does the caller observe
//! the outcome, shaped by the sequence's [`ErrorPolicy`].

use std::io;

use tracing::{debug, debug_span, trace, warn};

use crate::errors::LaunchError;
use crate::exec::launch::Launch;
use crate::exec::native::{NativeCreator, OsChild, ProcessCreator};
use crate::process::ProcessHandle;
use crate::seq::{ErrorPolicy, Sequence};

/// Single-use driver for one launch attempt.
///
/// `run` consumes the executor; build a new one per attempt.
pub struct Executor<'s, 'a, P: ErrorPolicy, C: ProcessCreator = NativeCreator> {
    launch: Launch,
    seq: &'s mut Sequence<'a, P>,
    creator: C,
}

impl<'s, 'a, P: ErrorPolicy> Executor<'s, 'a, P> {
    pub fn new(seq: &'s mut Sequence<'a, P>) -> Self {
        Self::with_creator(seq, NativeCreator)
    }
}

impl<'s, 'a, P: ErrorPolicy, C: ProcessCreator> Executor<'s, 'a, P, C> {
    pub fn with_creator(seq: &'s mut Sequence<'a, P>, creator: C) -> Self {
        Self {
            launch: Launch::new(P::RECOVERABLE),
            seq,
            creator,
        }
    }

    /// Drive the sequence through setup, the native call, and the outcome
    /// hooks.
    pub fn run(mut self) -> P::Output {
        let span = debug_span!(
            "launch",
            components = self.seq.len(),
            recoverable = P::RECOVERABLE
        );
        let _guard = span.enter();

        self.seq.for_each(|component| {
            trace!(component = component.name(), "on_setup");
            component.on_setup(&mut self.launch);
        });

        if let Some(error) = self.launch.error().cloned() {
            debug!(%error, "setup failed; native call skipped");
            return self.fail(error);
        }

        let created = self.creator.create_process(&mut self.launch);
        match classify(created, &mut self.launch) {
            Ok(child) => self.succeed(child),
            Err(error) => {
                debug!(%error, code = error.code(), "launch failed");
                self.launch.set_error(error.clone());
                self.fail(error)
            }
        }
    }

    fn succeed(mut self, child: Box<dyn OsChild>) -> P::Output {
        self.launch.clear_error();
        self.launch.set_pid(child.id());

        self.seq.for_each(|component| {
            trace!(component = component.name(), "on_success");
            component.on_success(&mut self.launch);
        });

        if let Some(late) = self.launch.take_error() {
            warn!(
                pid = child.id(),
                error = %late,
                "success hook reported an error; discarding process"
            );
            discard(child);
            let error = late.at_launch();
            self.launch.set_error(error.clone());
            return self.fail(error);
        }

        let handle = ProcessHandle::new(child);
        debug!(pid = ?handle.id(), "process launched");
        P::launched(handle)
    }

    fn fail(mut self, error: LaunchError) -> P::Output {
        self.seq.for_each(|component| {
            trace!(component = component.name(), "on_error");
            component.on_error(&mut self.launch, &error);
        });
        P::failed(error)
    }
}

/// Decide what the native call's result means.
///
/// An error already sitting in the slot wins over both the call's own success
/// signal and its io error.
fn classify(
    created: io::Result<Box<dyn OsChild>>,
    launch: &mut Launch,
) -> Result<Box<dyn OsChild>, LaunchError> {
    match created {
        Ok(child) => match launch.take_error() {
            None => Ok(child),
            Some(recorded) => {
                warn!(
                    pid = child.id(),
                    error = %recorded,
                    "native call succeeded with an error recorded; discarding process"
                );
                discard(child);
                Err(recorded.at_launch())
            }
        },
        Err(err) => Err(launch
            .take_error()
            .map(LaunchError::at_launch)
            .unwrap_or_else(|| LaunchError::from_io(&err))),
    }
}

/// Kill and reap a process created by a launch that is being reported as
/// failed.
fn discard(mut child: Box<dyn OsChild>) {
    let pid = child.id();
    if let Err(e) = child.kill() {
        warn!(pid, error = %e, "failed to kill discarded process");
    }
    if let Err(e) = child.wait() {
        warn!(pid, error = %e, "failed to reap discarded process");
    }
}

/// Launch `seq` with the native creator.
pub fn spawn<P: ErrorPolicy>(seq: &mut Sequence<'_, P>) -> P::Output {
    Executor::new(seq).run()
}

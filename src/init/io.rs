// src/init/io.rs

//! Standard stream wiring, handle inheritance, and creation flags.

use std::path::PathBuf;

use crate::exec::{CreationFlags, Launch, SecurityAttributes, StdioTarget};
use crate::seq::Initializer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdin,
    Stdout,
    Stderr,
}

/// Points one standard stream of the child at a target.
///
/// Streams left at [`StdioTarget::Inherit`] still follow `inherit_handles`.
#[derive(Debug, Clone)]
pub struct Redirect {
    stream: Stream,
    target: StdioTarget,
}

impl Redirect {
    pub fn new(stream: Stream, target: StdioTarget) -> Self {
        Self { stream, target }
    }

    pub fn stdin(target: StdioTarget) -> Self {
        Self::new(Stream::Stdin, target)
    }

    pub fn stdout(target: StdioTarget) -> Self {
        Self::new(Stream::Stdout, target)
    }

    pub fn stderr(target: StdioTarget) -> Self {
        Self::new(Stream::Stderr, target)
    }

    pub fn stdout_to(path: impl Into<PathBuf>) -> Self {
        Self::stdout(StdioTarget::File(path.into()))
    }
}

impl Initializer for Redirect {
    fn on_setup(&mut self, launch: &mut Launch) {
        let startup = &mut launch.request.startup;
        let slot = match self.stream {
            Stream::Stdin => &mut startup.stdin,
            Stream::Stdout => &mut startup.stdout,
            Stream::Stderr => &mut startup.stderr,
        };
        *slot = self.target.clone();
    }

    fn name(&self) -> &str {
        match self.stream {
            Stream::Stdin => "redirect_stdin",
            Stream::Stdout => "redirect_stdout",
            Stream::Stderr => "redirect_stderr",
        }
    }
}

/// Sets the `inherit_handles` flag.
#[derive(Debug, Clone, Copy)]
pub struct InheritHandles(pub bool);

impl Initializer for InheritHandles {
    fn on_setup(&mut self, launch: &mut Launch) {
        launch.request.inherit_handles = self.0;
    }

    fn name(&self) -> &str {
        "inherit_handles"
    }
}

/// Adds creation flags.
#[derive(Debug, Clone, Copy)]
pub struct Flags(pub CreationFlags);

impl Flags {
    pub fn new_process_group() -> Self {
        Flags(CreationFlags::NEW_PROCESS_GROUP)
    }
}

impl Initializer for Flags {
    fn on_setup(&mut self, launch: &mut Launch) {
        launch.request.creation_flags.insert(self.0);
    }

    fn name(&self) -> &str {
        "creation_flags"
    }
}

/// Runs the child as another user and/or group.
#[derive(Debug, Clone, Copy, Default)]
pub struct Credentials(pub SecurityAttributes);

impl Initializer for Credentials {
    fn on_setup(&mut self, launch: &mut Launch) {
        launch.request.security = Some(self.0);
    }

    fn name(&self) -> &str {
        "credentials"
    }
}

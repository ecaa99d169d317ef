// src/init/target.rs

//! What to run: executable and arguments.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::errors::LaunchError;
use crate::exec::Launch;
use crate::seq::Initializer;

/// Sets the program to execute.
#[derive(Debug, Clone)]
pub struct Exe(pub PathBuf);

impl Exe {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Exe(path.into())
    }
}

impl Initializer for Exe {
    fn on_setup(&mut self, launch: &mut Launch) {
        if self.0.as_os_str().is_empty() {
            launch.set_error(LaunchError::invalid_argument("executable path is empty"));
            return;
        }
        launch.request.executable = Some(self.0.clone());
    }

    fn name(&self) -> &str {
        "exe"
    }
}

/// Appends arguments to the command line.
#[derive(Debug, Clone, Default)]
pub struct Args(pub Vec<OsString>);

impl Args {
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Args(args.into_iter().map(Into::into).collect())
    }
}

impl Initializer for Args {
    fn on_setup(&mut self, launch: &mut Launch) {
        launch.request.args.extend(self.0.iter().cloned());
    }

    fn name(&self) -> &str {
        "args"
    }
}

/// Overrides argv[0] as seen by the child.
#[derive(Debug, Clone)]
pub struct Arg0(pub OsString);

impl Initializer for Arg0 {
    fn on_setup(&mut self, launch: &mut Launch) {
        launch.request.arg0 = Some(self.0.clone());
    }

    fn name(&self) -> &str {
        "arg0"
    }
}

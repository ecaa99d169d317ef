use std::sync::{Arc, Mutex};

use launchseq::Initializer;
use launchseq::errors::LaunchError;
use launchseq::exec::Launch;

/// Which hook fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Setup,
    Error,
    Success,
    /// The scripted native call (recorded by `FakeCreator`).
    Create,
}

/// Shared, ordered log of `(component, phase)` entries.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<(String, Phase)>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, name: &str, phase: Phase) {
        self.entries.lock().unwrap().push((name.to_string(), phase));
    }

    pub fn entries(&self) -> Vec<(String, Phase)> {
        self.entries.lock().unwrap().clone()
    }

    /// Component names that fired `phase`, in order.
    pub fn names_for(&self, phase: Phase) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(_, p)| *p == phase)
            .map(|(n, _)| n)
            .collect()
    }

    pub fn count(&self, phase: Phase) -> usize {
        self.names_for(phase).len()
    }

    pub fn position(&self, name: &str, phase: Phase) -> Option<usize> {
        self.entries()
            .iter()
            .position(|(n, p)| n == name && *p == phase)
    }
}

/// Which hooks a [`Recorder`] implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hooks {
    pub setup: bool,
    pub error: bool,
    pub success: bool,
}

impl Hooks {
    pub const ALL: Hooks = Hooks {
        setup: true,
        error: true,
        success: true,
    };

    pub const SETUP_ONLY: Hooks = Hooks {
        setup: true,
        error: false,
        success: false,
    };
}

/// A component that logs every hook it implements.
///
/// Optionally records a setup error, and remembers the error it saw in
/// `on_error`.
#[derive(Debug, Clone)]
pub struct Recorder {
    name: String,
    log: CallLog,
    hooks: Hooks,
    fail_setup: Option<LaunchError>,
    seen_errors: Vec<LaunchError>,
}

impl Recorder {
    pub fn new(name: &str, log: &CallLog) -> Self {
        Self {
            name: name.to_string(),
            log: log.clone(),
            hooks: Hooks::ALL,
            fail_setup: None,
            seen_errors: Vec::new(),
        }
    }

    pub fn with_hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn failing_setup(mut self, error: LaunchError) -> Self {
        self.fail_setup = Some(error);
        self
    }

    pub fn seen_errors(&self) -> &[LaunchError] {
        &self.seen_errors
    }
}

impl Initializer for Recorder {
    fn on_setup(&mut self, launch: &mut Launch) {
        if !self.hooks.setup {
            return;
        }
        self.log.push(&self.name, Phase::Setup);
        if let Some(err) = &self.fail_setup {
            launch.set_error(err.clone());
        }
    }

    fn on_error(&mut self, _launch: &mut Launch, error: &LaunchError) {
        if !self.hooks.error {
            return;
        }
        self.log.push(&self.name, Phase::Error);
        self.seen_errors.push(error.clone());
    }

    fn on_success(&mut self, _launch: &mut Launch) {
        if !self.hooks.success {
            return;
        }
        self.log.push(&self.name, Phase::Success);
    }

    fn name(&self) -> &str {
        &self.name
    }
}

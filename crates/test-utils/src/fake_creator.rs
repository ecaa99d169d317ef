use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use launchseq::errors::LaunchError;
use launchseq::exec::{Launch, LaunchRequest, OsChild, ProcessCreator};

use crate::recorder::{CallLog, Phase};

/// Observable state of a [`FakeChild`], shared with the test.
#[derive(Debug, Default)]
pub struct FakeChildState {
    pub exited: AtomicBool,
    pub killed: AtomicBool,
    pub waits: AtomicUsize,
}

/// A process that never existed. It reports its fixed exit code once the
/// test sets `exited` on its state, or as soon as it is waited on.
#[derive(Debug)]
pub struct FakeChild {
    pid: u32,
    exit_code: i32,
    state: Arc<FakeChildState>,
}

impl OsChild for FakeChild {
    fn id(&self) -> u32 {
        self.pid
    }

    fn try_wait(&mut self) -> io::Result<Option<i32>> {
        if self.state.exited.load(Ordering::SeqCst) {
            Ok(Some(self.exit_code))
        } else {
            Ok(None)
        }
    }

    fn wait(&mut self) -> io::Result<i32> {
        self.state.waits.fetch_add(1, Ordering::SeqCst);
        self.state.exited.store(true, Ordering::SeqCst);
        Ok(self.exit_code)
    }

    fn kill(&mut self) -> io::Result<()> {
        self.state.killed.store(true, Ordering::SeqCst);
        self.state.exited.store(true, Ordering::SeqCst);
        Ok(())
    }
}

/// What the scripted native call does.
#[derive(Debug, Clone)]
pub enum Script {
    /// Create a fake child with this pid and eventual exit code.
    Succeed { pid: u32, exit_code: i32 },
    /// Fail with this raw OS error.
    Fail { os_error: i32 },
    /// Record `error` in the launch's error slot, fail with `os_error`.
    FailWithRecorded { os_error: i32, error: LaunchError },
    /// Record `error` in the slot from "inside" the call, then report success.
    SucceedWithRecorded { pid: u32, error: LaunchError },
}

/// A `ProcessCreator` that follows a [`Script`] and remembers what it saw.
#[derive(Debug)]
pub struct FakeCreator {
    script: Script,
    log: Option<CallLog>,
    calls: usize,
    last_request: Option<LaunchRequest>,
    child_state: Arc<FakeChildState>,
}

impl FakeCreator {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            log: None,
            calls: 0,
            last_request: None,
            child_state: Arc::new(FakeChildState::default()),
        }
    }

    pub fn succeeding(pid: u32, exit_code: i32) -> Self {
        Self::new(Script::Succeed { pid, exit_code })
    }

    pub fn failing(os_error: i32) -> Self {
        Self::new(Script::Fail { os_error })
    }

    /// Log the native call into `log` as `("create_process", Phase::Create)`.
    pub fn logging_to(mut self, log: &CallLog) -> Self {
        self.log = Some(log.clone());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls
    }

    pub fn last_request(&self) -> Option<&LaunchRequest> {
        self.last_request.as_ref()
    }

    pub fn child_state(&self) -> Arc<FakeChildState> {
        Arc::clone(&self.child_state)
    }

    fn child(&self, pid: u32, exit_code: i32) -> Box<dyn OsChild> {
        Box::new(FakeChild {
            pid,
            exit_code,
            state: Arc::clone(&self.child_state),
        })
    }
}

impl ProcessCreator for FakeCreator {
    fn create_process(&mut self, launch: &mut Launch) -> io::Result<Box<dyn OsChild>> {
        self.calls += 1;
        self.last_request = Some(launch.request.clone());
        if let Some(log) = &self.log {
            log.push("create_process", Phase::Create);
        }

        match self.script.clone() {
            Script::Succeed { pid, exit_code } => Ok(self.child(pid, exit_code)),
            Script::Fail { os_error } => Err(io::Error::from_raw_os_error(os_error)),
            Script::FailWithRecorded { os_error, error } => {
                launch.set_error(error);
                Err(io::Error::from_raw_os_error(os_error))
            }
            Script::SucceedWithRecorded { pid, error } => {
                launch.set_error(error);
                Ok(self.child(pid, 0))
            }
        }
    }
}

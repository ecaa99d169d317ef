// src/exec/native.rs

//! The native process-creation collaborator.
//!
//! The executor talks to a [`ProcessCreator`] instead of calling the OS
//! directly, so tests can swap in a scripted creator while production uses
//! [`NativeCreator`] on top of `std::process::Command`.

use std::fmt::Debug;
use std::fs::{File, OpenOptions};
use std::io;
use std::process::{Child, Command, ExitStatus, Stdio};

use tracing::trace;

use crate::exec::launch::Launch;
use crate::exec::request::{LaunchRequest, StdioTarget};
use crate::process::STILL_ACTIVE;

/// A spawned OS process the handle owns.
pub trait OsChild: Send + Debug {
    fn id(&self) -> u32;

    /// Non-blocking poll. `Ok(None)` while the process is still running.
    fn try_wait(&mut self) -> io::Result<Option<i32>>;

    /// Block until the process exits and return its exit code.
    fn wait(&mut self) -> io::Result<i32>;

    fn kill(&mut self) -> io::Result<()>;
}

impl OsChild for Child {
    fn id(&self) -> u32 {
        Child::id(self)
    }

    fn try_wait(&mut self) -> io::Result<Option<i32>> {
        Ok(Child::try_wait(self)?.map(exit_code))
    }

    fn wait(&mut self) -> io::Result<i32> {
        Child::wait(self).map(exit_code)
    }

    fn kill(&mut self) -> io::Result<()> {
        Child::kill(self)
    }
}

/// Collapse an `ExitStatus` to a single code.
///
/// Unix signal deaths map to `128 + signo`, as shells report them. On
/// Windows an exit code equal to [`STILL_ACTIVE`] (`0x8000_0000`) is
/// reported as `-1`, since the cell reserves that value.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        if cfg!(windows) && code == STILL_ACTIVE {
            return -1;
        }
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    -1
}

/// Performs the single native creation call of a launch attempt.
///
/// The creator gets the whole [`Launch`], so a callback running inside the
/// call can still record an error in the slot.
pub trait ProcessCreator {
    fn create_process(&mut self, launch: &mut Launch) -> io::Result<Box<dyn OsChild>>;
}

impl<T: ProcessCreator + ?Sized> ProcessCreator for &mut T {
    fn create_process(&mut self, launch: &mut Launch) -> io::Result<Box<dyn OsChild>> {
        (**self).create_process(launch)
    }
}

/// Production creator backed by `std::process::Command`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeCreator;

impl ProcessCreator for NativeCreator {
    fn create_process(&mut self, launch: &mut Launch) -> io::Result<Box<dyn OsChild>> {
        let mut cmd = build_command(&launch.request)?;
        trace!(command = ?cmd, "spawning");
        let child = cmd.spawn()?;
        Ok(Box::new(child))
    }
}

/// Translate a request into a `Command`.
pub fn build_command(request: &LaunchRequest) -> io::Result<Command> {
    let program = request.executable.as_ref().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "no executable configured")
    })?;

    let mut cmd = Command::new(program);
    cmd.args(&request.args);

    if let Some(dir) = &request.working_dir {
        cmd.current_dir(dir);
    }

    if let Some(env) = &request.environment {
        cmd.env_clear();
        cmd.envs(env.iter());
    }

    let inherit = request.inherit_handles;
    cmd.stdin(open_stdio(&request.startup.stdin, inherit, false)?)
        .stdout(open_stdio(&request.startup.stdout, inherit, true)?)
        .stderr(open_stdio(&request.startup.stderr, inherit, true)?);

    apply_platform(&mut cmd, request)?;

    Ok(cmd)
}

fn open_stdio(target: &StdioTarget, inherit: bool, output: bool) -> io::Result<Stdio> {
    let stdio = match target {
        StdioTarget::Inherit if inherit => Stdio::inherit(),
        StdioTarget::Inherit | StdioTarget::Null => Stdio::null(),
        StdioTarget::File(path) if output => File::create(path)?.into(),
        StdioTarget::File(path) => File::open(path)?.into(),
        StdioTarget::Append(path) if output => OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?
            .into(),
        StdioTarget::Append(path) => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cannot append-redirect stdin from {}", path.display()),
            ));
        }
    };
    Ok(stdio)
}

#[cfg(unix)]
fn apply_platform(cmd: &mut Command, request: &LaunchRequest) -> io::Result<()> {
    use std::os::unix::process::CommandExt;

    use crate::exec::request::CreationFlags;

    if let Some(arg0) = &request.arg0 {
        cmd.arg0(arg0);
    }
    if let Some(security) = request.security {
        if let Some(uid) = security.uid {
            cmd.uid(uid);
        }
        if let Some(gid) = security.gid {
            cmd.gid(gid);
        }
    }
    if request
        .creation_flags
        .contains(CreationFlags::NEW_PROCESS_GROUP)
    {
        cmd.process_group(0);
    }
    Ok(())
}

#[cfg(windows)]
fn apply_platform(cmd: &mut Command, request: &LaunchRequest) -> io::Result<()> {
    use std::os::windows::process::CommandExt;

    if request.security.is_some() {
        return Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "security attributes are not supported on this platform",
        ));
    }
    cmd.creation_flags(request.creation_flags.bits());
    Ok(())
}

#[cfg(not(any(unix, windows)))]
fn apply_platform(_cmd: &mut Command, request: &LaunchRequest) -> io::Result<()> {
    if request.security.is_some() {
        return Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "security attributes are not supported on this platform",
        ));
    }
    Ok(())
}

// src/seq/policy.rs

//! Error policies, fixed when the sequence is composed.
//!
//! A [`Sequence`](super::Sequence) starts out [`Propagating`]: a failed launch
//! comes back as `Err(LaunchError)` and the caller's control flow stops at the
//! first `?`. Adding an [`ErrorSink`](crate::init::ErrorSink) turns the type
//! into `Sequence<Recoverable>`, and the executor then returns a
//! [`Recovered`] value that carries an empty handle plus the error.
//!
//! The choice lives in the type, so the executor never branches on it at run
//! time and callers see at compile time which discipline they opted into.

use crate::errors::LaunchError;
use crate::process::ProcessHandle;

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Propagating {}
    impl Sealed for super::Recoverable {}
}

/// How the executor reports the final outcome of a launch attempt.
pub trait ErrorPolicy: sealed::Sealed {
    /// What `Executor::run` returns under this policy.
    type Output;

    /// Whether failures are returned as data rather than as `Err`.
    const RECOVERABLE: bool;

    fn launched(handle: ProcessHandle) -> Self::Output;

    fn failed(error: LaunchError) -> Self::Output;
}

/// No error-handling component present: failures abort via `Err`.
#[derive(Debug)]
pub enum Propagating {}

/// An error sink is present: failures are stored and returned as a value.
#[derive(Debug)]
pub enum Recoverable {}

impl ErrorPolicy for Propagating {
    type Output = Result<ProcessHandle, LaunchError>;

    const RECOVERABLE: bool = false;

    fn launched(handle: ProcessHandle) -> Self::Output {
        Ok(handle)
    }

    fn failed(error: LaunchError) -> Self::Output {
        Err(error)
    }
}

impl ErrorPolicy for Recoverable {
    type Output = Recovered;

    const RECOVERABLE: bool = true;

    fn launched(handle: ProcessHandle) -> Self::Output {
        Recovered {
            handle,
            error: None,
        }
    }

    fn failed(error: LaunchError) -> Self::Output {
        Recovered {
            handle: ProcessHandle::empty(),
            error: Some(error),
        }
    }
}

/// Outcome of a launch under the recoverable policy.
///
/// On failure `handle` is empty and `error` is set; on success it is the
/// other way round.
#[derive(Debug)]
pub struct Recovered {
    pub handle: ProcessHandle,
    pub error: Option<LaunchError>,
}

impl Recovered {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_result(self) -> Result<ProcessHandle, LaunchError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.handle),
        }
    }
}

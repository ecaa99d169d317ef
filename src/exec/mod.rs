// src/exec/mod.rs

//! Process launch layer.
//!
//! - [`executor`] owns the launch state machine.
//! - [`launch`] is the in-flight launch that component hooks mutate.
//! - [`request`] holds the request fields and their value types.
//! - [`native`] provides the `ProcessCreator` trait and the
//!   `std::process::Command`-backed `NativeCreator` used in production.
//!   Tests replace it with a scripted creator.

pub mod executor;
pub mod launch;
pub mod native;
pub mod request;

pub use executor::{Executor, spawn};
pub use launch::Launch;
pub use native::{NativeCreator, OsChild, ProcessCreator};
pub use request::{
    CreationFlags, Environment, LaunchRequest, SecurityAttributes, StartupInfo, StdioTarget,
};

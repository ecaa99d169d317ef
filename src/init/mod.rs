// src/init/mod.rs

//! Built-in launch components.
//!
//! Each one fills in a single part of the request. They are deliberately
//! thin; anything fancier is just another [`Initializer`](crate::seq::Initializer).

pub mod env;
pub mod error;
pub mod hooks;
pub mod io;
pub mod target;

pub use env::{Env, StartDir};
pub use error::ErrorSink;
pub use hooks::{OnError, OnSetup, OnSuccess, Trace, on_error, on_setup, on_success};
pub use io::{Credentials, Flags, InheritHandles, Redirect, Stream};
pub use target::{Arg0, Args, Exe};

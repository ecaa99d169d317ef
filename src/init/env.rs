// src/init/env.rs

//! Where and with what environment the child runs.

use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

use crate::errors::LaunchError;
use crate::exec::{Environment, Launch};
use crate::seq::Initializer;

/// Sets the child's working directory.
///
/// The path is not checked here; a missing directory surfaces as a launch
/// error from the native call.
#[derive(Debug, Clone)]
pub struct StartDir(pub PathBuf);

impl StartDir {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StartDir(path.into())
    }
}

impl Initializer for StartDir {
    fn on_setup(&mut self, launch: &mut Launch) {
        launch.request.working_dir = Some(self.0.clone());
    }

    fn name(&self) -> &str {
        "start_dir"
    }
}

#[derive(Debug, Clone)]
enum EnvOp {
    Set(OsString, OsString),
    Remove(OsString),
}

/// Edits the environment block.
///
/// Starts from the block already in the request, or from the parent's
/// environment (`Env::inherit`) / nothing (`Env::empty`) if none was set.
#[derive(Debug, Clone)]
pub struct Env {
    base_inherited: bool,
    ops: Vec<EnvOp>,
}

impl Env {
    pub fn inherit() -> Self {
        Self {
            base_inherited: true,
            ops: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self {
            base_inherited: false,
            ops: Vec::new(),
        }
    }

    pub fn set(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.ops.push(EnvOp::Set(key.into(), value.into()));
        self
    }

    pub fn remove(mut self, key: impl Into<OsString>) -> Self {
        self.ops.push(EnvOp::Remove(key.into()));
        self
    }
}

/// Reject keys the OS cannot represent in an environment block.
pub fn validate_env_key(key: &OsStr) -> Result<(), String> {
    let bytes = key.as_encoded_bytes();
    if bytes.is_empty() {
        return Err("environment variable name is empty".to_string());
    }
    if bytes.contains(&b'=') || bytes.contains(&0) {
        return Err(format!(
            "environment variable name {:?} contains '=' or NUL",
            key
        ));
    }
    Ok(())
}

impl Initializer for Env {
    fn on_setup(&mut self, launch: &mut Launch) {
        let mut env = launch.request.environment.take().unwrap_or_else(|| {
            if self.base_inherited {
                Environment::from_current()
            } else {
                Environment::empty()
            }
        });

        for op in &self.ops {
            match op {
                EnvOp::Set(key, value) => {
                    if let Err(msg) = validate_env_key(key) {
                        launch.set_error(LaunchError::invalid_argument(msg));
                        continue;
                    }
                    if value.as_encoded_bytes().contains(&0) {
                        launch.set_error(LaunchError::invalid_argument(format!(
                            "value of environment variable {:?} contains NUL",
                            key
                        )));
                        continue;
                    }
                    env.set(key.clone(), value.clone());
                }
                EnvOp::Remove(key) => {
                    env.remove(key);
                }
            }
        }

        launch.request.environment = Some(env);
    }

    fn name(&self) -> &str {
        "env"
    }
}

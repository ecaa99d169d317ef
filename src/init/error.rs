// src/init/error.rs

//! The dedicated error-handling component.

use std::sync::{Arc, Mutex, PoisonError};

use crate::errors::LaunchError;
use crate::exec::Launch;
use crate::seq::Initializer;

/// Collects the launch error instead of letting it propagate.
///
/// Added with [`Sequence::with_error_sink`](crate::seq::Sequence::with_error_sink),
/// which switches the sequence to the recoverable policy. Keep a clone to
/// read the error after the launch.
#[derive(Debug, Clone, Default)]
pub struct ErrorSink {
    slot: Arc<Mutex<Option<LaunchError>>>,
}

impl ErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self) -> Option<LaunchError> {
        self.lock().clone()
    }

    pub fn is_set(&self) -> bool {
        self.lock().is_some()
    }

    pub fn take(&self) -> Option<LaunchError> {
        self.lock().take()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<LaunchError>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn into_hook(self) -> SinkHook {
        SinkHook(self)
    }
}

/// Sequence entry for an [`ErrorSink`]. Not constructible outside the crate,
/// so a sink cannot be pushed without switching the policy.
pub(crate) struct SinkHook(ErrorSink);

impl Initializer for SinkHook {
    fn on_setup(&mut self, _launch: &mut Launch) {
        *self.0.lock() = None;
    }

    fn on_error(&mut self, _launch: &mut Launch, error: &LaunchError) {
        *self.0.lock() = Some(error.clone());
    }

    fn name(&self) -> &str {
        "error_sink"
    }
}

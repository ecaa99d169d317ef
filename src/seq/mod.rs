// src/seq/mod.rs

//! Launch components and the ordered sequence that holds them.
//!
//! - [`Initializer`] is the capability protocol: three optional hooks with
//!   no-op defaults.
//! - [`Sequence`] is the ordered, heterogeneous list an executor drives. Its
//!   type parameter is the error policy (see [`policy`]).

use std::fmt;
use std::marker::PhantomData;

use crate::errors::LaunchError;
use crate::exec::Launch;
use crate::init::ErrorSink;

pub mod policy;

pub use policy::{ErrorPolicy, Propagating, Recoverable, Recovered};

/// A unit of launch configuration.
///
/// Implement only the hooks you need. The executor calls `on_setup` on every
/// component, then `on_error` or `on_success`, always in sequence order.
/// If a success hook records an error, the process is discarded and every
/// component also gets `on_error`.
pub trait Initializer {
    /// Inspect or fill in the launch request before the native call.
    ///
    /// Record problems with [`Launch::set_error`]; the remaining components
    /// still run their setup.
    fn on_setup(&mut self, _launch: &mut Launch) {}

    /// The attempt failed, either during setup or in the native call.
    fn on_error(&mut self, _launch: &mut Launch, _error: &LaunchError) {}

    /// The process was created. `launch.pid()` is set.
    ///
    /// Recording an error here fails the launch.
    fn on_success(&mut self, _launch: &mut Launch) {}

    /// Name used in logs and dry-run output.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}

impl<T: Initializer + ?Sized> Initializer for &mut T {
    fn on_setup(&mut self, launch: &mut Launch) {
        (**self).on_setup(launch)
    }

    fn on_error(&mut self, launch: &mut Launch, error: &LaunchError) {
        (**self).on_error(launch, error)
    }

    fn on_success(&mut self, launch: &mut Launch) {
        (**self).on_success(launch)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

impl<T: Initializer + ?Sized> Initializer for Box<T> {
    fn on_setup(&mut self, launch: &mut Launch) {
        (**self).on_setup(launch)
    }

    fn on_error(&mut self, launch: &mut Launch, error: &LaunchError) {
        (**self).on_error(launch, error)
    }

    fn on_success(&mut self, launch: &mut Launch) {
        (**self).on_success(launch)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Ordered list of launch components.
///
/// Components may borrow from the caller (`'a`), which is how tests lend a
/// recorder with `seq.push(&mut recorder)` and inspect it after the launch.
pub struct Sequence<'a, P = Propagating> {
    components: Vec<Box<dyn Initializer + 'a>>,
    _policy: PhantomData<P>,
}

impl<'a> Sequence<'a, Propagating> {
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
            _policy: PhantomData,
        }
    }
}

impl Default for Sequence<'_, Propagating> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, P: ErrorPolicy> Sequence<'a, P> {
    /// Builder-style [`push`](Self::push).
    pub fn with<I: Initializer + 'a>(mut self, component: I) -> Self {
        self.push(component);
        self
    }

    /// Append a component. The policy is unchanged.
    pub fn push<I: Initializer + 'a>(&mut self, component: I) {
        self.components.push(Box::new(component));
    }

    /// Append the dedicated error-handling component.
    ///
    /// This is the only way to obtain a recoverable sequence.
    pub fn with_error_sink(self, sink: ErrorSink) -> Sequence<'a, Recoverable> {
        let mut components = self.components;
        components.push(Box::new(sink.into_hook()));
        Sequence {
            components,
            _policy: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.components.iter().map(|c| c.name()).collect()
    }

    /// Apply `f` to every component, in order.
    pub(crate) fn for_each(&mut self, mut f: impl FnMut(&mut (dyn Initializer + 'a))) {
        for component in self.components.iter_mut() {
            f(component.as_mut());
        }
    }
}

impl<P: ErrorPolicy> fmt::Debug for Sequence<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("components", &self.names())
            .field("recoverable", &P::RECOVERABLE)
            .finish()
    }
}

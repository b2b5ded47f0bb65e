//! Entry, exit and transition actions.

use super::context::{MachineView, StateContext};
use super::state::StateId;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Failure raised by an action callback.
///
/// The hierarchy never inspects or wraps these; they reach the owning
/// machine exactly as the action returned them.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("action failed: {message}")]
    Failed { message: String },

    #[error(transparent)]
    Source(Box<dyn std::error::Error + Send + Sync>),
}

impl ActionError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }
}

/// Arguments of a single action invocation.
///
/// Entry actions see `from: None, to: Some(state)`; exit actions see
/// `from: Some(state), to: None`; transition actions see both ends.
pub struct ActionCall<'a, S: StateId, E, C> {
    pub from: Option<&'a S>,
    pub to: Option<&'a S>,
    pub event: &'a E,
    pub payload: &'a C,
    pub machine: &'a dyn MachineView<S>,
}

impl<'a, S: StateId, E, C> ActionCall<'a, S, E, C> {
    pub(crate) fn new(
        from: Option<&'a S>,
        to: Option<&'a S>,
        ctx: &StateContext<'a, S, E, C>,
    ) -> Self {
        Self {
            from,
            to,
            event: ctx.event(),
            payload: ctx.payload(),
            machine: ctx.machine(),
        }
    }
}

type ActionFn<S, E, C> =
    Arc<dyn Fn(&ActionCall<'_, S, E, C>) -> Result<(), ActionError> + Send + Sync>;

/// A callback executed when a state is entered or exited, or when a
/// transition fires.
pub struct Action<S: StateId, E, C> {
    name: Option<String>,
    run: ActionFn<S, E, C>,
}

impl<S: StateId, E, C> Action<S, E, C> {
    pub fn new<F>(run: F) -> Self
    where
        F: Fn(&ActionCall<'_, S, E, C>) -> Result<(), ActionError> + Send + Sync + 'static,
    {
        Self {
            name: None,
            run: Arc::new(run),
        }
    }

    /// Same as [`Action::new`], with a name shown in diagnostics.
    pub fn named<F>(name: impl Into<String>, run: F) -> Self
    where
        F: Fn(&ActionCall<'_, S, E, C>) -> Result<(), ActionError> + Send + Sync + 'static,
    {
        Self {
            name: Some(name.into()),
            run: Arc::new(run),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn execute(&self, call: &ActionCall<'_, S, E, C>) -> Result<(), ActionError> {
        (self.run)(call)
    }
}

impl<S: StateId, E, C> Clone for Action<S, E, C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            run: Arc::clone(&self.run),
        }
    }
}

impl<S: StateId, E, C> fmt::Debug for Action<S, E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action").field("name", &self.name).finish()
    }
}

//! Triggering context handed to guards, actions and dispatch.

use super::state::StateId;

/// Read-only view of the machine that owns a hierarchy.
///
/// Actions receive it as a back-reference; they can inspect the machine but
/// never drive it from inside a callback.
pub trait MachineView<S: StateId> {
    /// Machine name for diagnostics.
    fn name(&self) -> &str;

    /// The currently active leaf state, if the machine has started.
    fn current_state(&self) -> Option<&S>;
}

/// Stand-in machine for contexts built outside any machine (tests, tools).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Detached;

impl<S: StateId> MachineView<S> for Detached {
    fn name(&self) -> &str {
        "detached"
    }

    fn current_state(&self) -> Option<&S> {
        None
    }
}

/// The event being processed, its payload and the owning machine.
pub struct StateContext<'a, S: StateId, E, C> {
    event: &'a E,
    payload: &'a C,
    machine: &'a dyn MachineView<S>,
}

impl<'a, S: StateId, E, C> StateContext<'a, S, E, C> {
    pub fn new(event: &'a E, payload: &'a C, machine: &'a dyn MachineView<S>) -> Self {
        Self {
            event,
            payload,
            machine,
        }
    }

    /// Context that is not attached to a machine.
    pub fn detached(event: &'a E, payload: &'a C) -> Self {
        Self::new(event, payload, &Detached)
    }

    pub fn event(&self) -> &'a E {
        self.event
    }

    pub fn payload(&self) -> &'a C {
        self.payload
    }

    pub fn machine(&self) -> &'a dyn MachineView<S> {
        self.machine
    }
}

impl<S: StateId, E, C> Clone for StateContext<'_, S, E, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: StateId, E, C> Copy for StateContext<'_, S, E, C> {}

//! Observability callbacks registered by the owning machine.
//!
//! The hierarchy holds no logger of its own. Whoever owns it registers
//! observers; [`TracingObserver`] forwards everything to `tracing`.

use crate::core::{EventId, StateId};
use tracing::{debug, trace};

/// Hooks invoked while the hierarchy enters, exits and dispatches.
///
/// Every method defaults to a no-op, so observers implement only what they
/// need.
pub trait HierarchyObserver<S: StateId, E: EventId>: Send + Sync {
    fn on_entry(&self, _state: &S) {}

    fn on_exit(&self, _state: &S) {}

    /// An event declined by `from` is being offered to its parent `to`.
    fn on_bubble(&self, _from: &S, _to: &S, _event: &E) {}

    /// A transition registered on `source` accepted the event.
    fn on_accepted(&self, _source: &S, _event: &E) {}

    /// No state from `origin` up to the root accepted the event.
    fn on_unhandled(&self, _origin: &S, _event: &E) {}
}

/// Observer that emits structured `tracing` events.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl<S: StateId, E: EventId> HierarchyObserver<S, E> for TracingObserver {
    fn on_entry(&self, state: &S) {
        debug!(state = state.name(), "state entry");
    }

    fn on_exit(&self, state: &S) {
        debug!(state = state.name(), "state exit");
    }

    fn on_bubble(&self, from: &S, to: &S, event: &E) {
        trace!(
            state = from.name(),
            parent = to.name(),
            event = ?event,
            "event bubbled to parent state"
        );
    }

    fn on_accepted(&self, source: &S, event: &E) {
        debug!(state = source.name(), event = ?event, "transition accepted");
    }

    fn on_unhandled(&self, origin: &S, event: &E) {
        debug!(state = origin.name(), event = ?event, "event not accepted");
    }
}

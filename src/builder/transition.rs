//! Fluent configuration of a freshly registered transition.

use crate::builder::hierarchy::PendingTransition;
use crate::core::{Action, EventId, Guard, StateContext, StateId};
use crate::hierarchy::{StateIndex, TransitionIndex, TransitionKind};

/// Configures the transition returned by
/// [`HierarchyBuilder::add_transition_on`](crate::builder::HierarchyBuilder::add_transition_on).
///
/// A transition left without a target is internal: it can accept events
/// and run actions but never changes the active state.
pub struct TransitionBuilder<'a, S: StateId, E: EventId, C> {
    index: TransitionIndex,
    transition: &'a mut PendingTransition<S, E, C>,
}

impl<'a, S: StateId, E: EventId, C> TransitionBuilder<'a, S, E, C> {
    pub(crate) fn new(index: TransitionIndex, transition: &'a mut PendingTransition<S, E, C>) -> Self {
        Self { index, transition }
    }

    pub fn index(&self) -> TransitionIndex {
        self.index
    }

    /// Set the target state.
    pub fn to(self, target: StateIndex) -> Self {
        self.transition.target = Some(target);
        self
    }

    pub fn guard(self, guard: Guard<S, E, C>) -> Self {
        self.transition.guard = Some(guard);
        self
    }

    /// Add a guard using a closure.
    pub fn when<F>(self, predicate: F) -> Self
    where
        F: Fn(&StateContext<'_, S, E, C>) -> bool + Send + Sync + 'static,
    {
        self.guard(Guard::new(predicate))
    }

    /// Append an action run when the transition is applied.
    pub fn action(self, action: Action<S, E, C>) -> Self {
        self.transition.actions.push(action);
        self
    }

    /// Run actions only, without exiting or entering states.
    pub fn internal(self) -> Self {
        self.transition.kind = TransitionKind::Internal;
        self
    }
}

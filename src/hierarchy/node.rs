//! A single state in the frozen hierarchy.

use super::transition::TransitionIndex;
use super::StateIndex;
use crate::core::{Action, EventId, StateId};
use std::collections::HashMap;
use std::fmt;

/// A state: identity, actions, transition table and hierarchy links.
///
/// Links are arena indices into the owning [`Hierarchy`](super::Hierarchy).
/// Nodes are only reachable through a hierarchy, which has no structural
/// mutators, so every link is fixed for the node's lifetime.
pub struct StateNode<S: StateId, E: EventId, C> {
    pub(crate) index: StateIndex,
    pub(crate) id: S,
    pub(crate) entry_actions: Vec<Action<S, E, C>>,
    pub(crate) exit_actions: Vec<Action<S, E, C>>,
    /// Every transition in registration order, across events.
    pub(crate) transitions: Vec<TransitionIndex>,
    pub(crate) by_event: HashMap<E, Vec<TransitionIndex>>,
    pub(crate) parent: Option<StateIndex>,
    pub(crate) children: Vec<StateIndex>,
    pub(crate) child_initial: Option<StateIndex>,
    pub(crate) level: usize,
}

impl<S: StateId, E: EventId, C> StateNode<S, E, C> {
    pub fn index(&self) -> StateIndex {
        self.index
    }

    pub fn id(&self) -> &S {
        &self.id
    }

    pub fn entry_actions(&self) -> &[Action<S, E, C>] {
        &self.entry_actions
    }

    pub fn exit_actions(&self) -> &[Action<S, E, C>] {
        &self.exit_actions
    }

    pub fn all_transitions(&self) -> &[TransitionIndex] {
        &self.transitions
    }

    /// Candidates for `event`, in the order they were registered.
    pub fn transitions(&self, event: &E) -> &[TransitionIndex] {
        self.by_event.get(event).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn parent(&self) -> Option<StateIndex> {
        self.parent
    }

    pub fn children(&self) -> &[StateIndex] {
        &self.children
    }

    pub fn child_initial(&self) -> Option<StateIndex> {
        self.child_initial
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_composite(&self) -> bool {
        !self.children.is_empty()
    }

    pub fn is_final(&self) -> bool {
        self.id.is_final()
    }
}

impl<S: StateId, E: EventId, C> fmt::Display for StateNode<S, E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id.name())
    }
}

impl<S: StateId, E: EventId, C> fmt::Debug for StateNode<S, E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateNode")
            .field("index", &self.index)
            .field("id", &self.id)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("child_initial", &self.child_initial)
            .field("level", &self.level)
            .field("transitions", &self.transitions.len())
            .finish()
    }
}

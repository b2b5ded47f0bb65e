//! The frozen state hierarchy.
//!
//! States live in an arena and refer to each other by [`StateIndex`]; a
//! parent stores its children's indices and a child stores its parent's.
//! A [`Hierarchy`] is produced by
//! [`HierarchyBuilder::build`](crate::builder::HierarchyBuilder::build) and
//! offers no way to rewire it afterwards.
//!
//! The operations are split by concern:
//! - `cascade`: entry, exit, shallow entry and history-aware re-entry
//! - `dispatch`: first-match event handling with bubbling to ancestors
//! - `path`: level-ordered exit/entry planning for the owning machine
//! - `visitor`: read-only structural traversal

mod cascade;
mod dispatch;
mod node;
mod path;
mod transition;
mod visitor;

pub use node::StateNode;
pub use path::TransitionPath;
pub use transition::{Accepted, Transition, TransitionIndex, TransitionKind, TransitionResult};
pub use visitor::{DiagramNode, DiagramTransition, DiagramVisitor, StructureCounter, Visitor};

use crate::core::{EventId, StateId};
use crate::observe::HierarchyObserver;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Stable handle of a state inside a hierarchy.
///
/// Indices are only meaningful for the builder and hierarchy that issued
/// them. Passing an index from another hierarchy panics like an
/// out-of-bounds slice access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StateIndex(pub(crate) usize);

impl StateIndex {
    pub fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for StateIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An immutable tree (or forest) of states and their transitions.
pub struct Hierarchy<S: StateId, E: EventId, C> {
    pub(crate) nodes: Vec<StateNode<S, E, C>>,
    pub(crate) transitions: Vec<Transition<S, E, C>>,
    pub(crate) lookup: HashMap<S, StateIndex>,
    pub(crate) observers: Vec<Arc<dyn HierarchyObserver<S, E>>>,
}

impl<S: StateId, E: EventId, C> Hierarchy<S, E, C> {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Look a state up by identity.
    pub fn index_of(&self, id: &S) -> Option<StateIndex> {
        self.lookup.get(id).copied()
    }

    /// Checked node access.
    pub fn get(&self, index: StateIndex) -> Option<&StateNode<S, E, C>> {
        self.nodes.get(index.0)
    }

    /// # Panics
    ///
    /// Panics if `index` was not issued for this hierarchy.
    pub fn node(&self, index: StateIndex) -> &StateNode<S, E, C> {
        &self.nodes[index.0]
    }

    pub fn id(&self, index: StateIndex) -> &S {
        &self.node(index).id
    }

    pub fn nodes(&self) -> impl Iterator<Item = &StateNode<S, E, C>> {
        self.nodes.iter()
    }

    pub fn roots(&self) -> impl Iterator<Item = StateIndex> + '_ {
        self.nodes.iter().filter(|n| n.is_root()).map(|n| n.index)
    }

    /// # Panics
    ///
    /// Panics if `index` was not issued for this hierarchy.
    pub fn transition(&self, index: TransitionIndex) -> &Transition<S, E, C> {
        &self.transitions[index.0]
    }

    pub fn transitions(&self) -> &[Transition<S, E, C>] {
        &self.transitions
    }

    pub fn parent(&self, index: StateIndex) -> Option<StateIndex> {
        self.node(index).parent
    }

    pub fn children(&self, index: StateIndex) -> &[StateIndex] {
        &self.node(index).children
    }

    pub fn child_initial(&self, index: StateIndex) -> Option<StateIndex> {
        self.node(index).child_initial
    }

    pub fn level(&self, index: StateIndex) -> usize {
        self.node(index).level
    }

    pub fn is_final(&self, index: StateIndex) -> bool {
        self.node(index).is_final()
    }

    /// Register an observability callback.
    ///
    /// Observers are not part of the structure; adding one after the freeze
    /// does not touch any state, link or level.
    pub fn register_observer(&mut self, observer: Arc<dyn HierarchyObserver<S, E>>) {
        self.observers.push(observer);
    }

    pub(crate) fn notify(&self, f: impl Fn(&dyn HierarchyObserver<S, E>)) {
        for observer in &self.observers {
            f(observer.as_ref());
        }
    }
}

impl<S: StateId, E: EventId, C> fmt::Debug for Hierarchy<S, E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hierarchy")
            .field("nodes", &self.nodes)
            .field("transitions", &self.transitions)
            .field("observers", &self.observers.len())
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn lookup_by_identity() {
        let hierarchy = player_builder().build().unwrap();
        let active = hierarchy.index_of(&Player::Active).unwrap();

        assert_eq!(hierarchy.id(active), &Player::Active);
        assert_eq!(hierarchy.node(active).to_string(), "Active");
        assert!(hierarchy.index_of(&Player::Ejected).is_some());
    }

    #[test]
    fn roots_are_unparented_states() {
        let hierarchy = player_builder().build().unwrap();
        let roots: Vec<_> = hierarchy.roots().map(|r| hierarchy.id(r).clone()).collect();

        assert_eq!(roots, vec![Player::Player, Player::Ejected]);
    }

    #[test]
    fn links_are_visible_after_freeze() {
        let hierarchy = player_builder().build().unwrap();
        let player = hierarchy.index_of(&Player::Player).unwrap();
        let active = hierarchy.index_of(&Player::Active).unwrap();
        let playing = hierarchy.index_of(&Player::Playing).unwrap();

        assert_eq!(hierarchy.parent(active), Some(player));
        assert_eq!(hierarchy.child_initial(active), Some(playing));
        assert_eq!(hierarchy.children(active).len(), 2);
        assert!(hierarchy.node(active).is_composite());
        assert!(!hierarchy.node(playing).is_composite());
        assert_eq!(hierarchy.level(player), 0);
        assert_eq!(hierarchy.level(active), 1);
        assert_eq!(hierarchy.level(playing), 2);
    }

    #[test]
    fn final_is_decided_by_identity() {
        let hierarchy = player_builder().build().unwrap();
        let ejected = hierarchy.index_of(&Player::Ejected).unwrap();
        let paused = hierarchy.index_of(&Player::Paused).unwrap();

        assert!(hierarchy.is_final(ejected));
        assert!(!hierarchy.is_final(paused));
    }

    #[test]
    fn transitions_are_grouped_by_event() {
        let hierarchy = player_builder().build().unwrap();
        let active = hierarchy.index_of(&Player::Active).unwrap();
        let node = hierarchy.node(active);

        assert_eq!(node.transitions(&Button::Stop).len(), 1);
        assert!(node.transitions(&Button::Volume).is_empty());
        assert_eq!(node.all_transitions().len(), 1);
        assert_eq!(hierarchy.transitions().len(), 5);
    }
}

//! Builder that wires states together and freezes them into a hierarchy.

use crate::builder::error::{BuildError, Link, WiringError};
use crate::builder::transition::TransitionBuilder;
use crate::builder::validation::validate;
use crate::core::{Action, EventId, Guard, StateId};
use crate::hierarchy::{
    Hierarchy, StateIndex, StateNode, Transition, TransitionIndex, TransitionKind,
};
use std::collections::{HashMap, HashSet};
use stillwater::validation::Validation;

pub(crate) struct PendingState<S: StateId, E: EventId, C> {
    pub(crate) id: S,
    pub(crate) entry_actions: Vec<Action<S, E, C>>,
    pub(crate) exit_actions: Vec<Action<S, E, C>>,
    pub(crate) transitions: Vec<TransitionIndex>,
    pub(crate) parent: Option<StateIndex>,
    pub(crate) children: Vec<StateIndex>,
    pub(crate) child_initial: Option<StateIndex>,
    pub(crate) level: usize,
}

pub(crate) struct PendingTransition<S: StateId, E: EventId, C> {
    pub(crate) source: StateIndex,
    pub(crate) event: E,
    pub(crate) target: Option<StateIndex>,
    pub(crate) kind: TransitionKind,
    pub(crate) guard: Option<Guard<S, E, C>>,
    pub(crate) actions: Vec<Action<S, E, C>>,
}

/// Accumulates states, links, actions and transitions.
///
/// Set-once rules are checked on every call; cross-state consistency is
/// checked once, in [`build`](Self::build), which reports every problem it
/// finds rather than the first.
///
/// # Example
///
/// ```rust
/// use hierarch::builder::HierarchyBuilder;
/// use hierarch::core::StateContext;
/// use hierarch::state_enum;
///
/// state_enum! {
///     enum Door {
///         Closed,
///         Locked,
///         Open,
///     }
/// }
///
/// let mut builder = HierarchyBuilder::<Door, &str, ()>::new();
/// let closed = builder.add_state(Door::Closed);
/// let locked = builder.add_state(Door::Locked);
/// let open = builder.add_state(Door::Open);
/// builder.nest(closed, locked, false).unwrap();
/// builder.add_transition_on(closed, "open").unwrap().to(open);
///
/// let doors = builder.build().unwrap();
/// assert_eq!(doors.level(locked), 1);
///
/// // Locked has no "open" transition of its own; Closed handles it.
/// let result = doors.dispatch(locked, &StateContext::detached(&"open", &()));
/// assert_eq!(result.accepted().unwrap().target, Some(open));
/// ```
pub struct HierarchyBuilder<S: StateId, E: EventId, C> {
    pub(crate) states: Vec<PendingState<S, E, C>>,
    pub(crate) transitions: Vec<PendingTransition<S, E, C>>,
    lookup: HashMap<S, StateIndex>,
}

impl<S: StateId, E: EventId, C> HierarchyBuilder<S, E, C> {
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            transitions: Vec::new(),
            lookup: HashMap::new(),
        }
    }

    /// Register a state. Registering an identity again returns its
    /// existing index.
    pub fn add_state(&mut self, id: S) -> StateIndex {
        if let Some(&index) = self.lookup.get(&id) {
            return index;
        }
        let index = StateIndex(self.states.len());
        self.lookup.insert(id.clone(), index);
        self.states.push(PendingState {
            id,
            entry_actions: Vec::new(),
            exit_actions: Vec::new(),
            transitions: Vec::new(),
            parent: None,
            children: Vec::new(),
            child_initial: None,
            level: 0,
        });
        index
    }

    pub fn index_of(&self, id: &S) -> Option<StateIndex> {
        self.lookup.get(id).copied()
    }

    /// Registered states with their identities, in registration order.
    pub fn states(&self) -> impl Iterator<Item = (StateIndex, S)> + '_ {
        self.states
            .iter()
            .enumerate()
            .map(|(i, s)| (StateIndex(i), s.id.clone()))
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn level(&self, state: StateIndex) -> Result<usize, WiringError> {
        Ok(self.pending(state)?.level)
    }

    pub fn parent(&self, state: StateIndex) -> Result<Option<StateIndex>, WiringError> {
        Ok(self.pending(state)?.parent)
    }

    pub fn children(&self, state: StateIndex) -> Result<&[StateIndex], WiringError> {
        Ok(&self.pending(state)?.children)
    }

    pub fn child_initial(&self, state: StateIndex) -> Result<Option<StateIndex>, WiringError> {
        Ok(self.pending(state)?.child_initial)
    }

    pub fn add_entry_action(
        &mut self,
        state: StateIndex,
        action: Action<S, E, C>,
    ) -> Result<(), WiringError> {
        self.pending_mut(state)?.entry_actions.push(action);
        Ok(())
    }

    pub fn add_entry_actions(
        &mut self,
        state: StateIndex,
        actions: impl IntoIterator<Item = Action<S, E, C>>,
    ) -> Result<(), WiringError> {
        self.pending_mut(state)?.entry_actions.extend(actions);
        Ok(())
    }

    pub fn add_exit_action(
        &mut self,
        state: StateIndex,
        action: Action<S, E, C>,
    ) -> Result<(), WiringError> {
        self.pending_mut(state)?.exit_actions.push(action);
        Ok(())
    }

    pub fn add_exit_actions(
        &mut self,
        state: StateIndex,
        actions: impl IntoIterator<Item = Action<S, E, C>>,
    ) -> Result<(), WiringError> {
        self.pending_mut(state)?.exit_actions.extend(actions);
        Ok(())
    }

    /// Register a transition on `state` for `event`, after any already
    /// registered for the same event. The returned builder configures it.
    pub fn add_transition_on(
        &mut self,
        state: StateIndex,
        event: E,
    ) -> Result<TransitionBuilder<'_, S, E, C>, WiringError> {
        let index = TransitionIndex(self.transitions.len());
        self.pending_mut(state)?.transitions.push(index);
        self.transitions.push(PendingTransition {
            source: state,
            event,
            target: None,
            kind: TransitionKind::External,
            guard: None,
            actions: Vec::new(),
        });
        let last = self.transitions.len() - 1;
        Ok(TransitionBuilder::new(index, &mut self.transitions[last]))
    }

    /// Attach `state` under `parent` and recompute the levels of `state`
    /// and everything already nested in it.
    ///
    /// Fails without changing anything if `parent` is `state` itself, if
    /// `state` already has a parent, or if a recomputed level would
    /// overflow.
    pub fn set_parent_state(
        &mut self,
        state: StateIndex,
        parent: StateIndex,
    ) -> Result<(), WiringError> {
        let parent_level = self.pending(parent)?.level;
        let node = self.pending(state)?;
        if state == parent {
            return Err(WiringError::SelfParent {
                state: node.id.name().to_string(),
            });
        }
        if node.parent.is_some() {
            return Err(WiringError::Rewire {
                state: node.id.name().to_string(),
                link: Link::Parent,
            });
        }
        let level = parent_level
            .checked_add(1)
            .ok_or_else(|| WiringError::LevelOverflow {
                state: node.id.name().to_string(),
            })?;

        self.set_level(state, level)?;
        self.pending_mut(state)?.parent = Some(parent);
        Ok(())
    }

    pub fn set_child_initial_state(
        &mut self,
        state: StateIndex,
        child: StateIndex,
    ) -> Result<(), WiringError> {
        self.pending(child)?;
        let node = self.pending_mut(state)?;
        if node.child_initial.is_some() {
            return Err(WiringError::Rewire {
                state: node.id.name().to_string(),
                link: Link::ChildInitial,
            });
        }
        node.child_initial = Some(child);
        Ok(())
    }

    /// Append `child` to `state`'s children. Adding a child twice is a
    /// no-op.
    pub fn add_child_state(
        &mut self,
        state: StateIndex,
        child: StateIndex,
    ) -> Result<(), WiringError> {
        self.pending(child)?;
        let node = self.pending_mut(state)?;
        if !node.children.contains(&child) {
            node.children.push(child);
        }
        Ok(())
    }

    /// Set the parent link, add the child, and optionally make it the
    /// child-initial state, in one call.
    pub fn nest(
        &mut self,
        parent: StateIndex,
        child: StateIndex,
        initial: bool,
    ) -> Result<(), WiringError> {
        self.set_parent_state(child, parent)?;
        self.add_child_state(parent, child)?;
        if initial {
            self.set_child_initial_state(parent, child)?;
        }
        Ok(())
    }

    /// Store `level` on `state` and `level + depth` on every state already
    /// nested beneath it.
    ///
    /// Levels are only written once every one of them is known to fit in a
    /// `usize`; on overflow nothing changes.
    pub fn set_level(&mut self, state: StateIndex, level: usize) -> Result<(), WiringError> {
        self.pending(state)?;
        let mut visited = HashSet::new();
        let mut assigned = Vec::new();
        let mut pending = vec![(state, level)];
        while let Some((current, level)) = pending.pop() {
            // A malformed children graph may loop; build() reports it.
            if !visited.insert(current) {
                continue;
            }
            assigned.push((current, level));
            for &child in &self.states[current.0].children {
                let next = level
                    .checked_add(1)
                    .ok_or_else(|| WiringError::LevelOverflow {
                        state: self.states[child.0].id.name().to_string(),
                    })?;
                pending.push((child, next));
            }
        }
        for (index, level) in assigned {
            self.states[index.0].level = level;
        }
        Ok(())
    }

    /// Validate the accumulated wiring and freeze it.
    pub fn build(self) -> Result<Hierarchy<S, E, C>, BuildError> {
        if self.states.is_empty() {
            return Err(BuildError::EmptyHierarchy);
        }
        if let Validation::Failure(violations) = validate(&self.states, &self.transitions) {
            return Err(BuildError::Invalid(violations.iter().cloned().collect()));
        }

        let transitions: Vec<Transition<S, E, C>> = self
            .transitions
            .into_iter()
            .enumerate()
            .map(|(i, t)| Transition {
                index: TransitionIndex(i),
                source: t.source,
                source_id: self.states[t.source.0].id.clone(),
                target: t.target.map(|target| (target, self.states[target.0].id.clone())),
                event: t.event,
                kind: t.kind,
                guard: t.guard,
                actions: t.actions,
            })
            .collect();

        let nodes = self
            .states
            .into_iter()
            .enumerate()
            .map(|(i, s)| {
                let mut by_event: HashMap<E, Vec<TransitionIndex>> = HashMap::new();
                for &t in &s.transitions {
                    by_event
                        .entry(transitions[t.0].event.clone())
                        .or_default()
                        .push(t);
                }
                StateNode {
                    index: StateIndex(i),
                    id: s.id,
                    entry_actions: s.entry_actions,
                    exit_actions: s.exit_actions,
                    transitions: s.transitions,
                    by_event,
                    parent: s.parent,
                    children: s.children,
                    child_initial: s.child_initial,
                    level: s.level,
                }
            })
            .collect();

        Ok(Hierarchy {
            nodes,
            transitions,
            lookup: self.lookup,
            observers: Vec::new(),
        })
    }

    fn pending(&self, state: StateIndex) -> Result<&PendingState<S, E, C>, WiringError> {
        self.states
            .get(state.0)
            .ok_or(WiringError::UnknownState { index: state })
    }

    fn pending_mut(
        &mut self,
        state: StateIndex,
    ) -> Result<&mut PendingState<S, E, C>, WiringError> {
        self.states
            .get_mut(state.0)
            .ok_or(WiringError::UnknownState { index: state })
    }
}

impl<S: StateId, E: EventId, C> Default for HierarchyBuilder<S, E, C> {
    fn default() -> Self {
        Self::new()
    }
}

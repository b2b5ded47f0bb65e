//! Transitions bound to a source state and an event.

use super::visitor::Visitor;
use super::StateIndex;
use crate::core::{Action, ActionCall, ActionError, EventId, Guard, StateContext, StateId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable handle of a transition inside a hierarchy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TransitionIndex(pub(crate) usize);

impl TransitionIndex {
    pub fn get(self) -> usize {
        self.0
    }
}

/// Whether firing leaves and re-enters the source state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionKind {
    #[default]
    External,
    /// Runs the transition actions without exiting or entering anything.
    Internal,
}

/// Outcome of offering an event to a transition or a state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionResult {
    Accepted(Accepted),
    NotAccepted,
}

impl TransitionResult {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    pub fn accepted(&self) -> Option<Accepted> {
        match self {
            Self::Accepted(accepted) => Some(*accepted),
            Self::NotAccepted => None,
        }
    }
}

/// The transition that took an event, and where it leads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Accepted {
    pub transition: TransitionIndex,
    pub source: StateIndex,
    pub target: Option<StateIndex>,
    pub kind: TransitionKind,
}

impl Accepted {
    /// Transitions without a target, or declared internal, never change the
    /// active configuration.
    pub fn is_internal(&self) -> bool {
        self.kind == TransitionKind::Internal || self.target.is_none()
    }
}

/// A transition registered on a state for one event.
pub struct Transition<S: StateId, E: EventId, C> {
    pub(crate) index: TransitionIndex,
    pub(crate) source: StateIndex,
    pub(crate) source_id: S,
    pub(crate) event: E,
    pub(crate) target: Option<(StateIndex, S)>,
    pub(crate) kind: TransitionKind,
    pub(crate) guard: Option<Guard<S, E, C>>,
    pub(crate) actions: Vec<Action<S, E, C>>,
}

impl<S: StateId, E: EventId, C> Transition<S, E, C> {
    pub fn index(&self) -> TransitionIndex {
        self.index
    }

    pub fn source(&self) -> StateIndex {
        self.source
    }

    pub fn source_id(&self) -> &S {
        &self.source_id
    }

    pub fn event(&self) -> &E {
        &self.event
    }

    pub fn target(&self) -> Option<StateIndex> {
        self.target.as_ref().map(|(index, _)| *index)
    }

    pub fn target_id(&self) -> Option<&S> {
        self.target.as_ref().map(|(_, id)| id)
    }

    pub fn kind(&self) -> TransitionKind {
        self.kind
    }

    pub fn has_guard(&self) -> bool {
        self.guard.is_some()
    }

    pub fn actions(&self) -> &[Action<S, E, C>] {
        &self.actions
    }

    /// Offer the context to this transition.
    ///
    /// Declines when the event differs or the guard says no. Firing never
    /// runs actions; those belong to the apply phase of the owning machine.
    pub fn fire(&self, ctx: &StateContext<'_, S, E, C>) -> TransitionResult {
        if *ctx.event() != self.event {
            return TransitionResult::NotAccepted;
        }
        if !self.guard.as_ref().is_none_or(|g| g.check(ctx)) {
            return TransitionResult::NotAccepted;
        }

        TransitionResult::Accepted(Accepted {
            transition: self.index,
            source: self.source,
            target: self.target(),
            kind: self.kind,
        })
    }

    /// Run the transition actions in registration order.
    pub fn execute(&self, ctx: &StateContext<'_, S, E, C>) -> Result<(), ActionError> {
        let call = ActionCall::new(Some(&self.source_id), self.target_id(), ctx);
        for action in &self.actions {
            action.execute(&call)?;
        }
        Ok(())
    }

    pub fn accept<V>(&self, visitor: &mut V)
    where
        V: Visitor<S, E, C> + ?Sized,
    {
        visitor.visit_transition(self);
    }
}

impl<S: StateId, E: EventId, C> fmt::Debug for Transition<S, E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("index", &self.index)
            .field("source", &self.source_id)
            .field("event", &self.event)
            .field("target", &self.target_id())
            .field("kind", &self.kind)
            .field("guarded", &self.guard.is_some())
            .finish()
    }
}

impl<S: StateId, E: EventId, C> fmt::Display for Transition<S, E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target_id() {
            Some(target) => write!(
                f,
                "{} --{:?}--> {}",
                self.source_id.name(),
                self.event,
                target.name()
            ),
            None => write!(f, "{} --{:?}--> (internal)", self.source_id.name(), self.event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum Tape {
        Stopped,
        Playing,
    }

    impl StateId for Tape {
        fn name(&self) -> &str {
            match self {
                Self::Stopped => "Stopped",
                Self::Playing => "Playing",
            }
        }
    }

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum Button {
        Play,
        Stop,
    }

    fn play(guard: Option<Guard<Tape, Button, u8>>) -> Transition<Tape, Button, u8> {
        Transition {
            index: TransitionIndex(0),
            source: StateIndex(0),
            source_id: Tape::Stopped,
            event: Button::Play,
            target: Some((StateIndex(1), Tape::Playing)),
            kind: TransitionKind::External,
            guard,
            actions: Vec::new(),
        }
    }

    #[test]
    fn fire_accepts_matching_event() {
        let transition = play(None);
        let result = transition.fire(&StateContext::detached(&Button::Play, &0));

        assert_eq!(
            result,
            TransitionResult::Accepted(Accepted {
                transition: TransitionIndex(0),
                source: StateIndex(0),
                target: Some(StateIndex(1)),
                kind: TransitionKind::External,
            })
        );
    }

    #[test]
    fn fire_declines_other_events() {
        let transition = play(None);
        let result = transition.fire(&StateContext::detached(&Button::Stop, &0));
        assert_eq!(result, TransitionResult::NotAccepted);
    }

    #[test]
    fn fire_respects_guard() {
        let transition = play(Some(Guard::new(|ctx| *ctx.payload() > 5)));

        assert!(transition
            .fire(&StateContext::detached(&Button::Play, &9))
            .is_accepted());
        assert!(!transition
            .fire(&StateContext::detached(&Button::Play, &1))
            .is_accepted());
    }

    #[test]
    fn execute_runs_actions_with_both_ends() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut transition = play(None);
        transition.actions.push(Action::new(move |call| {
            sink.lock()
                .unwrap()
                .push((call.from.cloned(), call.to.cloned()));
            Ok(())
        }));

        transition
            .execute(&StateContext::detached(&Button::Play, &0))
            .unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![(Some(Tape::Stopped), Some(Tape::Playing))]
        );
    }

    #[test]
    fn targetless_transition_is_internal() {
        let mut transition = play(None);
        transition.target = None;
        let accepted = transition
            .fire(&StateContext::detached(&Button::Play, &0))
            .accepted()
            .unwrap();

        assert!(accepted.is_internal());
        assert_eq!(transition.to_string(), "Stopped --Play--> (internal)");
    }

    #[test]
    fn display_names_both_ends() {
        assert_eq!(play(None).to_string(), "Stopped --Play--> Playing");
    }
}

//! Owning machine that drives a hierarchy.
//!
//! The hierarchy decides which transition accepts an event and which
//! states enter and exit; the machine tracks the active leaf, applies the
//! plan in level order and keeps the history store up to date.

use crate::core::{ActionError, EventId, MachineView, StateContext, StateId};
use crate::hierarchy::{Hierarchy, StateIndex, TransitionResult};
use crate::history::{HistoryStore, HistoryType};
use crate::observe::HierarchyObserver;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Runtime options of a [`HierarchicalMachine`].
///
/// Missing fields fall back to their defaults when deserialized.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    pub name: String,
    /// How composite transition targets are descended into.
    pub history: HistoryType,
    /// Record the active chain whenever states are exited.
    pub record_history: bool,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            name: "machine".to_string(),
            history: HistoryType::None,
            record_history: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum MachineError {
    #[error("Machine has not been started")]
    NotStarted,

    #[error("Machine is already running")]
    AlreadyStarted,

    #[error("State '{state}' is not part of the hierarchy")]
    UnknownState { state: String },

    #[error(transparent)]
    Action(#[from] ActionError),
}

/// A hierarchy plus the active leaf state and its history.
///
/// Events are applied one at a time; `&mut self` guarantees a transition
/// is fully applied before the next one starts.
pub struct HierarchicalMachine<S: StateId, E: EventId, C> {
    hierarchy: Hierarchy<S, E, C>,
    config: MachineConfig,
    initial: StateIndex,
    current: Option<StateIndex>,
    history: HistoryStore<S>,
}

impl<S: StateId, E: EventId, C> HierarchicalMachine<S, E, C> {
    /// Create a machine that will start in `initial`.
    pub fn new(
        hierarchy: Hierarchy<S, E, C>,
        initial: &S,
        config: MachineConfig,
    ) -> Result<Self, MachineError> {
        let initial = hierarchy
            .index_of(initial)
            .ok_or_else(|| MachineError::UnknownState {
                state: initial.name().to_string(),
            })?;

        Ok(Self {
            hierarchy,
            config,
            initial,
            current: None,
            history: HistoryStore::new(),
        })
    }

    /// Continue from a previously saved history store.
    pub fn with_history(mut self, history: HistoryStore<S>) -> Self {
        self.history = history;
        self
    }

    /// Enter the initial state, its ancestors first, then its child-initial
    /// chain. Returns the active leaf.
    pub fn start(&mut self, event: &E, payload: &C) -> Result<&S, MachineError> {
        if self.current.is_some() {
            return Err(MachineError::AlreadyStarted);
        }

        let leaf = {
            let ctx = StateContext::new(event, payload, &*self);
            let mut enclosing: Vec<_> = self.hierarchy.ancestors(self.initial).collect();
            enclosing.reverse();
            for state in enclosing {
                self.hierarchy.entry(state, &ctx)?;
            }
            self.hierarchy.enter_shallow(self.initial, &ctx)?
        };

        self.current = Some(leaf);
        let state = self.hierarchy.id(leaf);
        debug!(machine = %self.config.name, state = state.name(), "machine started");
        Ok(state)
    }

    /// Dispatch `event` from the active leaf and apply the accepted
    /// transition.
    ///
    /// Exits run deepest first and entries shallowest first; a composite
    /// target is then descended into according to the configured history
    /// type. An event nobody accepts leaves the machine untouched.
    ///
    /// If an action fails, the error is returned and the machine stops: it
    /// reports no current state and must be started again. Actions that
    /// already ran are not undone. History is only recorded once every exit
    /// has succeeded.
    pub fn fire(&mut self, event: &E, payload: &C) -> Result<TransitionResult, MachineError> {
        let leaf = self.current.ok_or(MachineError::NotStarted)?;

        let result = {
            let ctx = StateContext::new(event, payload, &*self);
            self.hierarchy.dispatch(leaf, &ctx)
        };
        let Some(accepted) = result.accepted() else {
            return Ok(result);
        };
        let path = self.hierarchy.path_for(leaf, &accepted);

        let exited = {
            let ctx = StateContext::new(event, payload, &*self);
            path.exits
                .iter()
                .try_for_each(|&state| self.hierarchy.exit(state, &ctx))
        };
        if let Err(err) = exited {
            return Err(self.halt(leaf, err));
        }
        if self.config.record_history && !path.exits.is_empty() {
            self.history.record_exit(&self.hierarchy, leaf);
        }

        let entered = {
            let ctx = StateContext::new(event, payload, &*self);
            self.hierarchy
                .transition(accepted.transition)
                .execute(&ctx)
                .and_then(|()| {
                    path.entries
                        .iter()
                        .try_for_each(|&state| self.hierarchy.entry(state, &ctx))
                })
                .and_then(|()| match path.entries.last() {
                    Some(&target) => self.hierarchy.enter_by_history(
                        target,
                        &ctx,
                        self.config.history,
                        &self.history,
                    ),
                    None => Ok(leaf),
                })
        };
        let next = match entered {
            Ok(next) => next,
            Err(err) => return Err(self.halt(leaf, err)),
        };

        self.current = Some(next);
        debug!(
            machine = %self.config.name,
            from = self.hierarchy.id(leaf).name(),
            to = self.hierarchy.id(next).name(),
            event = ?event,
            "transition applied"
        );
        Ok(result)
    }

    fn halt(&mut self, leaf: StateIndex, err: ActionError) -> MachineError {
        self.current = None;
        warn!(
            machine = %self.config.name,
            from = self.hierarchy.id(leaf).name(),
            error = %err,
            "action failed, machine stopped"
        );
        MachineError::Action(err)
    }

    pub fn current_state(&self) -> Option<&S> {
        self.current.map(|index| self.hierarchy.id(index))
    }

    pub fn current_index(&self) -> Option<StateIndex> {
        self.current
    }

    /// Whether the active leaf is a final state.
    pub fn is_final(&self) -> bool {
        self.current.is_some_and(|index| self.hierarchy.is_final(index))
    }

    pub fn hierarchy(&self) -> &Hierarchy<S, E, C> {
        &self.hierarchy
    }

    pub fn history(&self) -> &HistoryStore<S> {
        &self.history
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Register an observer on the owned hierarchy.
    pub fn observe(&mut self, observer: Arc<dyn HierarchyObserver<S, E>>) {
        self.hierarchy.register_observer(observer);
    }
}

impl<S: StateId, E: EventId, C> MachineView<S> for HierarchicalMachine<S, E, C> {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn current_state(&self) -> Option<&S> {
        HierarchicalMachine::current_state(self)
    }
}

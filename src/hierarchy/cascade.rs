//! Entry and exit of states, including cascades into nested states.

use super::{Hierarchy, StateIndex};
use crate::core::{Action, ActionCall, ActionError, EventId, StateContext, StateId};
use crate::history::{HistoryStore, HistoryType};

impl<S: StateId, E: EventId, C> Hierarchy<S, E, C> {
    /// Run the entry actions of one state, in insertion order.
    ///
    /// The first failing action stops the sequence and its error is
    /// returned unchanged.
    pub fn entry(
        &self,
        state: StateIndex,
        ctx: &StateContext<'_, S, E, C>,
    ) -> Result<(), ActionError> {
        let node = self.node(state);
        run_actions(&node.entry_actions, ActionCall::new(None, Some(&node.id), ctx))?;
        self.notify(|o| o.on_entry(&node.id));
        Ok(())
    }

    /// Run the exit actions of one state. Only this state is exited; the
    /// owning machine orders multi-level exits.
    pub fn exit(
        &self,
        state: StateIndex,
        ctx: &StateContext<'_, S, E, C>,
    ) -> Result<(), ActionError> {
        let node = self.node(state);
        run_actions(&node.exit_actions, ActionCall::new(Some(&node.id), None, ctx))?;
        self.notify(|o| o.on_exit(&node.id));
        Ok(())
    }

    /// Enter `state`, then keep entering child-initial states until a state
    /// without one is reached. Returns the deepest state entered.
    pub fn enter_shallow(
        &self,
        state: StateIndex,
        ctx: &StateContext<'_, S, E, C>,
    ) -> Result<StateIndex, ActionError> {
        self.entry(state, ctx)?;
        match self.node(state).child_initial {
            Some(child) => self.enter_shallow(child, ctx),
            None => Ok(state),
        }
    }

    /// Descend into an already-entered composite `state` according to
    /// `history`.
    ///
    /// `state`'s own entry actions are not run. Shallow history resumes the
    /// recorded child and then its default chain; deep history resumes the
    /// recorded child at every level. Wherever nothing was recorded, the
    /// child-initial chain is used, which is also what
    /// [`HistoryType::None`] always does.
    pub fn enter_by_history(
        &self,
        state: StateIndex,
        ctx: &StateContext<'_, S, E, C>,
        history: HistoryType,
        store: &HistoryStore<S>,
    ) -> Result<StateIndex, ActionError> {
        let recorded = match history {
            HistoryType::None => None,
            HistoryType::Shallow | HistoryType::Deep => self.recorded_child(state, store),
        };

        match (history, recorded) {
            (HistoryType::Shallow, Some(child)) => self.enter_shallow(child, ctx),
            (HistoryType::Deep, Some(child)) => {
                self.entry(child, ctx)?;
                self.enter_by_history(child, ctx, HistoryType::Deep, store)
            }
            _ => self.enter_history_none(state, ctx),
        }
    }

    fn enter_history_none(
        &self,
        state: StateIndex,
        ctx: &StateContext<'_, S, E, C>,
    ) -> Result<StateIndex, ActionError> {
        match self.node(state).child_initial {
            Some(child) => self.enter_shallow(child, ctx),
            None => Ok(state),
        }
    }

    /// The recorded child of `state`, provided it still is one.
    fn recorded_child(&self, state: StateIndex, store: &HistoryStore<S>) -> Option<StateIndex> {
        let node = self.node(state);
        store
            .last_active(&node.id)
            .and_then(|child| self.index_of(child))
            .filter(|child| node.children.contains(child))
    }
}

fn run_actions<S: StateId, E, C>(
    actions: &[Action<S, E, C>],
    call: ActionCall<'_, S, E, C>,
) -> Result<(), ActionError> {
    for action in actions {
        action.execute(&call)?;
    }
    Ok(())
}

//! Event dispatch with bubbling to enclosing states.

use super::transition::TransitionResult;
use super::{Hierarchy, StateIndex};
use crate::core::{EventId, StateContext, StateId};

impl<S: StateId, E: EventId, C> Hierarchy<S, E, C> {
    /// Offer the context's event to `state`, then to each ancestor in turn.
    ///
    /// Candidates registered for the event are fired in registration order
    /// and the first acceptance wins. A state that accepts nothing passes the
    /// same context to its parent. Reaching past the root yields
    /// [`TransitionResult::NotAccepted`]; dispatch never fails.
    pub fn dispatch(
        &self,
        state: StateIndex,
        ctx: &StateContext<'_, S, E, C>,
    ) -> TransitionResult {
        let event = ctx.event();
        let mut current = state;
        loop {
            let node = self.node(current);
            for &candidate in node.transitions(event) {
                let result = self.transition(candidate).fire(ctx);
                if result.is_accepted() {
                    self.notify(|o| o.on_accepted(&node.id, event));
                    return result;
                }
            }

            match node.parent {
                Some(parent) => {
                    self.notify(|o| o.on_bubble(&node.id, self.id(parent), event));
                    current = parent;
                }
                None => {
                    self.notify(|o| o.on_unhandled(self.id(state), event));
                    return TransitionResult::NotAccepted;
                }
            }
        }
    }

    /// Like [`dispatch`](Self::dispatch) but confined to `state` itself.
    pub fn dispatch_local(
        &self,
        state: StateIndex,
        ctx: &StateContext<'_, S, E, C>,
    ) -> TransitionResult {
        self.node(state)
            .transitions(ctx.event())
            .iter()
            .map(|&candidate| self.transition(candidate).fire(ctx))
            .find(TransitionResult::is_accepted)
            .unwrap_or(TransitionResult::NotAccepted)
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::super::transition::{Accepted, TransitionKind, TransitionResult};
    use crate::builder::HierarchyBuilder;
    use crate::core::{Guard, StateContext, StateId};
    use crate::observe::HierarchyObserver;
    use std::sync::{Arc, Mutex};

    #[test]
    fn first_accepting_candidate_wins() {
        let mut builder: HierarchyBuilder<Player, Button, u32> = HierarchyBuilder::new();
        let stopped = builder.add_state(Player::Stopped);
        let playing = builder.add_state(Player::Playing);
        let paused = builder.add_state(Player::Paused);
        let declines = builder
            .add_transition_on(stopped, Button::Play)
            .unwrap()
            .to(playing)
            .when(|_| false)
            .index();
        let accepts = builder
            .add_transition_on(stopped, Button::Play)
            .unwrap()
            .to(paused)
            .index();
        let shadowed = builder
            .add_transition_on(stopped, Button::Play)
            .unwrap()
            .to(playing)
            .index();
        let hierarchy = builder.build().unwrap();

        let result = hierarchy.dispatch(stopped, &StateContext::detached(&Button::Play, &0));

        assert_eq!(
            result,
            TransitionResult::Accepted(Accepted {
                transition: accepts,
                source: stopped,
                target: Some(paused),
                kind: TransitionKind::External,
            })
        );
        assert_ne!(result.accepted().unwrap().transition, declines);
        assert_ne!(result.accepted().unwrap().transition, shadowed);
    }

    #[test]
    fn guard_sees_payload() {
        let mut builder: HierarchyBuilder<Player, Button, u32> = HierarchyBuilder::new();
        let playing = builder.add_state(Player::Playing);
        builder
            .add_transition_on(playing, Button::Volume)
            .unwrap()
            .guard(Guard::new(|ctx| *ctx.payload() <= 11));
        let hierarchy = builder.build().unwrap();

        let loud = hierarchy.dispatch(playing, &StateContext::detached(&Button::Volume, &11));
        let too_loud = hierarchy.dispatch(playing, &StateContext::detached(&Button::Volume, &12));

        assert!(loud.is_accepted());
        assert!(loud.accepted().unwrap().is_internal());
        assert_eq!(too_loud, TransitionResult::NotAccepted);
    }

    #[test]
    fn unhandled_event_bubbles_to_parent() {
        let hierarchy = player_builder().build().unwrap();
        let playing = hierarchy.index_of(&Player::Playing).unwrap();
        let active = hierarchy.index_of(&Player::Active).unwrap();
        let stopped = hierarchy.index_of(&Player::Stopped).unwrap();

        let result = hierarchy.dispatch(playing, &StateContext::detached(&Button::Stop, &0));
        let accepted = result.accepted().unwrap();

        assert_eq!(accepted.source, active);
        assert_eq!(accepted.target, Some(stopped));
    }

    #[test]
    fn bubbling_reaches_the_root() {
        let hierarchy = player_builder().build().unwrap();
        let paused = hierarchy.index_of(&Player::Paused).unwrap();
        let player = hierarchy.index_of(&Player::Player).unwrap();

        let result = hierarchy.dispatch(paused, &StateContext::detached(&Button::Eject, &0));

        assert_eq!(result.accepted().unwrap().source, player);
    }

    #[test]
    fn inner_state_shadows_ancestor() {
        let mut builder = player_builder();
        let paused = builder.index_of(&Player::Paused).unwrap();
        let playing = builder.index_of(&Player::Playing).unwrap();
        builder
            .add_transition_on(paused, Button::Stop)
            .unwrap()
            .to(playing);
        let hierarchy = builder.build().unwrap();

        let result = hierarchy.dispatch(paused, &StateContext::detached(&Button::Stop, &0));

        assert_eq!(result.accepted().unwrap().source, paused);
    }

    #[test]
    fn unmatched_event_is_not_accepted() {
        let hierarchy = player_builder().build().unwrap();
        let playing = hierarchy.index_of(&Player::Playing).unwrap();

        let result = hierarchy.dispatch(playing, &StateContext::detached(&Button::Volume, &0));

        assert_eq!(result, TransitionResult::NotAccepted);
        assert!(result.accepted().is_none());
    }

    #[test]
    fn dispatch_local_does_not_bubble() {
        let hierarchy = player_builder().build().unwrap();
        let playing = hierarchy.index_of(&Player::Playing).unwrap();

        let result = hierarchy.dispatch_local(playing, &StateContext::detached(&Button::Stop, &0));

        assert_eq!(result, TransitionResult::NotAccepted);
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    impl HierarchyObserver<Player, Button> for Recorder {
        fn on_bubble(&self, from: &Player, to: &Player, event: &Button) {
            self.0
                .lock()
                .unwrap()
                .push(format!("{}->{}:{:?}", from.name(), to.name(), event));
        }

        fn on_accepted(&self, source: &Player, _event: &Button) {
            self.0.lock().unwrap().push(format!("ok:{}", source.name()));
        }

        fn on_unhandled(&self, origin: &Player, _event: &Button) {
            self.0.lock().unwrap().push(format!("miss:{}", origin.name()));
        }
    }

    #[test]
    fn observers_see_each_bubble_step() {
        let recorder = Arc::new(Recorder::default());
        let mut hierarchy = player_builder().build().unwrap();
        hierarchy.register_observer(recorder.clone());
        let playing = hierarchy.index_of(&Player::Playing).unwrap();

        hierarchy.dispatch(playing, &StateContext::detached(&Button::Eject, &0));
        hierarchy.dispatch(playing, &StateContext::detached(&Button::Volume, &0));

        assert_eq!(
            *recorder.0.lock().unwrap(),
            vec![
                "Playing->Active:Eject",
                "Active->Player:Eject",
                "ok:Player",
                "Playing->Active:Volume",
                "Active->Player:Volume",
                "miss:Playing",
            ]
        );
    }
}

//! Level queries and exit/entry planning.
//!
//! Levels are kept consistent by the builder, so the owning machine can
//! order a multi-level transition purely by comparing them: exits run
//! children before parents, entries parents before children.

use super::transition::{Accepted, TransitionKind};
use super::{Hierarchy, StateIndex};
use crate::core::{EventId, StateId};

/// States to exit and enter when applying one transition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransitionPath {
    /// Deepest first.
    pub exits: Vec<StateIndex>,
    /// Shallowest first; the last entry is the transition target.
    pub entries: Vec<StateIndex>,
}

impl TransitionPath {
    pub fn is_empty(&self) -> bool {
        self.exits.is_empty() && self.entries.is_empty()
    }
}

impl<S: StateId, E: EventId, C> Hierarchy<S, E, C> {
    /// Ancestors of `state`, nearest first, excluding `state` itself.
    pub fn ancestors(&self, state: StateIndex) -> impl Iterator<Item = StateIndex> + '_ {
        std::iter::successors(self.parent(state), move |&s| self.parent(s))
    }

    /// Whether `ancestor` encloses `state` (a state encloses itself).
    pub fn is_descendant_of(&self, state: StateIndex, ancestor: StateIndex) -> bool {
        state == ancestor || self.ancestors(state).any(|s| s == ancestor)
    }

    /// Deepest state enclosing both `a` and `b`, if they share a root.
    pub fn least_common_ancestor(&self, a: StateIndex, b: StateIndex) -> Option<StateIndex> {
        let (mut a, mut b) = (a, b);
        while self.level(a) > self.level(b) {
            a = self.parent(a)?;
        }
        while self.level(b) > self.level(a) {
            b = self.parent(b)?;
        }
        while a != b {
            a = self.parent(a)?;
            b = self.parent(b)?;
        }
        Some(a)
    }

    /// Plan the exits and entries for a transition from `source` to
    /// `target` while `active` is the current leaf.
    ///
    /// `active` is normally `source` or one of its descendants (the event
    /// bubbled up to `source`). Internal transitions change nothing. A
    /// transition whose source encloses its target, or the reverse, leaves
    /// and re-enters the enclosing end; a self transition exits and
    /// re-enters the state.
    pub fn transition_path(
        &self,
        active: StateIndex,
        source: StateIndex,
        target: StateIndex,
        kind: TransitionKind,
    ) -> TransitionPath {
        if kind == TransitionKind::Internal {
            return TransitionPath::default();
        }

        let boundary = match self.least_common_ancestor(source, target) {
            Some(lca) if lca == source || lca == target => self.parent(lca),
            lca => lca,
        };

        let mut exits: Vec<_> = std::iter::once(active)
            .chain(self.ancestors(active))
            .take_while(|&s| Some(s) != boundary)
            .collect();
        let mut entries: Vec<_> = std::iter::once(target)
            .chain(self.ancestors(target))
            .take_while(|&s| Some(s) != boundary)
            .collect();

        exits.sort_by(|a, b| self.level(*b).cmp(&self.level(*a)));
        entries.sort_by_key(|&s| self.level(s));

        TransitionPath { exits, entries }
    }

    /// [`transition_path`](Self::transition_path) for a dispatch result.
    pub fn path_for(&self, active: StateIndex, accepted: &Accepted) -> TransitionPath {
        match (accepted.is_internal(), accepted.target) {
            (false, Some(target)) => {
                self.transition_path(active, accepted.source, target, accepted.kind)
            }
            _ => TransitionPath::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::super::transition::TransitionKind;
    use super::super::StateIndex;
    use crate::core::StateContext;

    fn names(
        hierarchy: &crate::hierarchy::Hierarchy<Player, Button, u32>,
        states: &[StateIndex],
    ) -> Vec<Player> {
        states.iter().map(|&s| hierarchy.id(s).clone()).collect()
    }

    #[test]
    fn ancestors_are_nearest_first() {
        let hierarchy = player_builder().build().unwrap();
        let paused = hierarchy.index_of(&Player::Paused).unwrap();
        let ancestors: Vec<_> = hierarchy.ancestors(paused).collect();

        assert_eq!(
            names(&hierarchy, &ancestors),
            vec![Player::Active, Player::Player]
        );
    }

    #[test]
    fn lca_of_siblings_is_parent() {
        let hierarchy = player_builder().build().unwrap();
        let paused = hierarchy.index_of(&Player::Paused).unwrap();
        let stopped = hierarchy.index_of(&Player::Stopped).unwrap();
        let player = hierarchy.index_of(&Player::Player).unwrap();
        let ejected = hierarchy.index_of(&Player::Ejected).unwrap();

        assert_eq!(hierarchy.least_common_ancestor(paused, stopped), Some(player));
        assert_eq!(hierarchy.least_common_ancestor(paused, paused), Some(paused));
        assert_eq!(hierarchy.least_common_ancestor(paused, ejected), None);
        assert!(hierarchy.is_descendant_of(paused, player));
        assert!(!hierarchy.is_descendant_of(player, paused));
    }

    #[test]
    fn path_exits_deepest_first_and_enters_shallowest_first() {
        let hierarchy = player_builder().build().unwrap();
        let paused = hierarchy.index_of(&Player::Paused).unwrap();
        let active = hierarchy.index_of(&Player::Active).unwrap();
        let stopped = hierarchy.index_of(&Player::Stopped).unwrap();

        let path = hierarchy.transition_path(paused, active, stopped, TransitionKind::External);

        assert_eq!(
            names(&hierarchy, &path.exits),
            vec![Player::Paused, Player::Active]
        );
        assert_eq!(names(&hierarchy, &path.entries), vec![Player::Stopped]);
    }

    #[test]
    fn path_into_nested_target_enters_every_level() {
        let hierarchy = player_builder().build().unwrap();
        let stopped = hierarchy.index_of(&Player::Stopped).unwrap();
        let paused = hierarchy.index_of(&Player::Paused).unwrap();

        let path = hierarchy.transition_path(stopped, stopped, paused, TransitionKind::External);

        assert_eq!(names(&hierarchy, &path.exits), vec![Player::Stopped]);
        assert_eq!(
            names(&hierarchy, &path.entries),
            vec![Player::Active, Player::Paused]
        );
    }

    #[test]
    fn self_transition_exits_and_reenters() {
        let hierarchy = player_builder().build().unwrap();
        let playing = hierarchy.index_of(&Player::Playing).unwrap();

        let path = hierarchy.transition_path(playing, playing, playing, TransitionKind::External);

        assert_eq!(path.exits, vec![playing]);
        assert_eq!(path.entries, vec![playing]);
    }

    #[test]
    fn transition_to_enclosing_state_reenters_it() {
        let hierarchy = player_builder().build().unwrap();
        let playing = hierarchy.index_of(&Player::Playing).unwrap();
        let active = hierarchy.index_of(&Player::Active).unwrap();

        let path = hierarchy.transition_path(playing, playing, active, TransitionKind::External);

        assert_eq!(
            names(&hierarchy, &path.exits),
            vec![Player::Playing, Player::Active]
        );
        assert_eq!(names(&hierarchy, &path.entries), vec![Player::Active]);
    }

    #[test]
    fn cross_root_transition_leaves_whole_tree() {
        let hierarchy = player_builder().build().unwrap();
        let playing = hierarchy.index_of(&Player::Playing).unwrap();
        let player = hierarchy.index_of(&Player::Player).unwrap();
        let ejected = hierarchy.index_of(&Player::Ejected).unwrap();

        let path = hierarchy.transition_path(playing, player, ejected, TransitionKind::External);

        assert_eq!(
            names(&hierarchy, &path.exits),
            vec![Player::Playing, Player::Active, Player::Player]
        );
        assert_eq!(path.entries, vec![ejected]);
    }

    #[test]
    fn internal_transition_has_empty_path() {
        let hierarchy = player_builder().build().unwrap();
        let playing = hierarchy.index_of(&Player::Playing).unwrap();
        let paused = hierarchy.index_of(&Player::Paused).unwrap();

        let path = hierarchy.transition_path(playing, playing, paused, TransitionKind::Internal);

        assert!(path.is_empty());
    }

    #[test]
    fn path_for_dispatch_result() {
        let hierarchy = player_builder().build().unwrap();
        let playing = hierarchy.index_of(&Player::Playing).unwrap();

        let accepted = hierarchy
            .dispatch(playing, &StateContext::detached(&Button::Stop, &0))
            .accepted()
            .unwrap();
        let path = hierarchy.path_for(playing, &accepted);

        assert_eq!(
            names(&hierarchy, &path.exits),
            vec![Player::Playing, Player::Active]
        );
        assert_eq!(names(&hierarchy, &path.entries), vec![Player::Stopped]);
    }
}

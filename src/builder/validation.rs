//! Whole-hierarchy consistency checks run by `build()`.
//!
//! Every check contributes a `Validation`, and all of them are combined so
//! a single build reports every inconsistency at once.

use crate::builder::error::HierarchyViolation;
use crate::builder::hierarchy::{PendingState, PendingTransition};
use crate::core::{EventId, StateId};
use crate::hierarchy::StateIndex;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

type Check = Validation<(), NonEmptyVec<HierarchyViolation>>;

pub(crate) fn validate<S: StateId, E: EventId, C>(
    states: &[PendingState<S, E, C>],
    transitions: &[PendingTransition<S, E, C>],
) -> Check {
    let mut checks: Vec<Check> = Vec::new();

    for (i, state) in states.iter().enumerate() {
        let index = StateIndex(i);
        checks.extend(state.children.iter().map(|&child| child_linked(states, index, child)));
        if let Some(parent) = state.parent {
            checks.push(parent_lists(states, parent, index));
            checks.push(level_consistent(states, parent, index));
        }
        if let Some(initial) = state.child_initial {
            checks.push(initial_is_child(states, index, initial));
        }
        checks.push(acyclic(states, index));
    }

    for transition in transitions {
        if let Some(target) = transition.target {
            checks.push(target_known(states, transition.source, target));
        }
    }

    Validation::all_vec(checks).map(|_| ())
}

fn name<S: StateId, E: EventId, C>(states: &[PendingState<S, E, C>], index: StateIndex) -> String {
    states[index.0].id.name().to_string()
}

fn child_linked<S: StateId, E: EventId, C>(
    states: &[PendingState<S, E, C>],
    parent: StateIndex,
    child: StateIndex,
) -> Check {
    match states[child.0].parent {
        Some(actual) if actual == parent => Validation::success(()),
        actual => Validation::fail(HierarchyViolation::ChildNotLinked {
            parent: name(states, parent),
            child: name(states, child),
            actual: actual.map_or_else(|| "none".to_string(), |a| format!("'{}'", name(states, a))),
        }),
    }
}

fn parent_lists<S: StateId, E: EventId, C>(
    states: &[PendingState<S, E, C>],
    parent: StateIndex,
    child: StateIndex,
) -> Check {
    if states[parent.0].children.contains(&child) {
        Validation::success(())
    } else {
        Validation::fail(HierarchyViolation::ParentNotListed {
            parent: name(states, parent),
            child: name(states, child),
        })
    }
}

fn level_consistent<S: StateId, E: EventId, C>(
    states: &[PendingState<S, E, C>],
    parent: StateIndex,
    child: StateIndex,
) -> Check {
    let level = states[child.0].level;
    match states[parent.0].level.checked_add(1) {
        Some(expected) if expected == level => Validation::success(()),
        Some(expected) => Validation::fail(HierarchyViolation::LevelMismatch {
            state: name(states, child),
            level,
            expected,
        }),
        None => Validation::fail(HierarchyViolation::LevelOverflow {
            state: name(states, child),
        }),
    }
}

fn initial_is_child<S: StateId, E: EventId, C>(
    states: &[PendingState<S, E, C>],
    state: StateIndex,
    initial: StateIndex,
) -> Check {
    if states[state.0].children.contains(&initial) {
        Validation::success(())
    } else {
        Validation::fail(HierarchyViolation::InitialNotChild {
            state: name(states, state),
            initial: name(states, initial),
        })
    }
}

fn acyclic<S: StateId, E: EventId, C>(states: &[PendingState<S, E, C>], state: StateIndex) -> Check {
    let mut current = states[state.0].parent;
    // Any acyclic chain ends within `states.len()` steps.
    for _ in 0..states.len() {
        match current {
            Some(ancestor) if ancestor == state => {
                return Validation::fail(HierarchyViolation::Cycle {
                    state: name(states, state),
                });
            }
            Some(ancestor) => current = states[ancestor.0].parent,
            None => break,
        }
    }
    Validation::success(())
}

fn target_known<S: StateId, E: EventId, C>(
    states: &[PendingState<S, E, C>],
    source: StateIndex,
    target: StateIndex,
) -> Check {
    if target.0 < states.len() {
        Validation::success(())
    } else {
        Validation::fail(HierarchyViolation::TransitionTargetUnknown {
            state: name(states, source),
            target,
        })
    }
}

//! Errors raised while wiring and freezing a hierarchy.

use crate::hierarchy::StateIndex;
use std::fmt;
use thiserror::Error;

/// Set-once link that a wiring call tried to overwrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    Parent,
    ChildInitial,
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parent => f.write_str("parent"),
            Self::ChildInitial => f.write_str("child initial"),
        }
    }
}

/// Structural mistakes caught immediately by a wiring call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WiringError {
    #[error("State '{state}' cannot be its own parent")]
    SelfParent { state: String },

    #[error("Cannot change the {link} of state '{state}' once set")]
    Rewire { state: String, link: Link },

    #[error("No state registered at index {index}")]
    UnknownState { index: StateIndex },

    #[error("Level of state '{state}' would exceed usize::MAX")]
    LevelOverflow { state: String },
}

/// Inconsistencies found when validating the whole hierarchy at build time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyViolation {
    #[error("'{parent}' lists '{child}' as a child, but its parent is {actual}")]
    ChildNotLinked {
        parent: String,
        child: String,
        actual: String,
    },

    #[error("'{child}' names '{parent}' as parent, but is not among its children")]
    ParentNotListed { parent: String, child: String },

    #[error("Initial state '{initial}' of '{state}' is not one of its children")]
    InitialNotChild { state: String, initial: String },

    #[error("State '{state}' is its own ancestor")]
    Cycle { state: String },

    #[error("State '{state}' has level {level}, expected {expected}")]
    LevelMismatch {
        state: String,
        level: usize,
        expected: usize,
    },

    #[error("State '{state}' is nested below a state at the maximum level")]
    LevelOverflow { state: String },

    #[error("Transition on '{state}' targets unknown state {target}")]
    TransitionTargetUnknown { state: String, target: StateIndex },
}

/// Errors that can occur when freezing a builder into a hierarchy.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("No states defined. Add at least one state")]
    EmptyHierarchy,

    #[error(transparent)]
    Wiring(#[from] WiringError),

    #[error("Hierarchy is inconsistent: {}", summarize(.0))]
    Invalid(Vec<HierarchyViolation>),
}

fn summarize(violations: &[HierarchyViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

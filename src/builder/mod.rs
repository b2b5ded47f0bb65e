//! Builder API for wiring a state hierarchy.
//!
//! States, parent/child links, entry/exit actions and transitions are
//! accumulated in a [`HierarchyBuilder`]. Set-once rules are enforced by
//! each wiring call; the whole structure is validated when
//! [`HierarchyBuilder::build`] freezes it into a
//! [`Hierarchy`](crate::hierarchy::Hierarchy).

pub mod error;
pub mod hierarchy;
pub mod macros;
pub mod transition;
mod validation;

pub use error::{BuildError, HierarchyViolation, Link, WiringError};
pub use hierarchy::HierarchyBuilder;
pub use transition::TransitionBuilder;

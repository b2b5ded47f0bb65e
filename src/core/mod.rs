//! Contracts shared by every layer of the engine.
//!
//! - State and event identities via `StateId` / `EventId`
//! - The triggering `StateContext` and its read-only machine view
//! - Guard predicates and entry/exit/transition actions

mod action;
mod context;
mod guard;
mod state;

pub use action::{Action, ActionCall, ActionError};
pub use context::{Detached, MachineView, StateContext};
pub use guard::Guard;
pub use state::{EventId, StateId};

//! Hierarch: hierarchical states for finite-state machines
//!
//! A state may contain child states. Events a child does not handle bubble
//! to its parent, entering a composite state cascades into its initial
//! child, and every state knows its nesting level so an owning machine can
//! order exits and entries across several levels.
//!
//! # Core Concepts
//!
//! - **Builder**: wire states, actions and transitions, then freeze them
//! - **Hierarchy**: immutable arena of states with dispatch, cascade and
//!   path planning
//! - **History**: records of the last active child, used when re-entering
//! - **Machine**: owns a hierarchy and tracks the active leaf state
//! - **Visitor**: read-only structural traversal, e.g. for diagrams
//!
//! # Example
//!
//! ```rust
//! use hierarch::builder::HierarchyBuilder;
//! use hierarch::machine::{HierarchicalMachine, MachineConfig};
//! use hierarch::state_enum;
//!
//! state_enum! {
//!     enum Lamp {
//!         Powered,
//!         Dim,
//!         Bright,
//!         Off,
//!     }
//! }
//!
//! let mut builder = HierarchyBuilder::<Lamp, &str, ()>::new();
//! let powered = builder.add_state(Lamp::Powered);
//! let dim = builder.add_state(Lamp::Dim);
//! let bright = builder.add_state(Lamp::Bright);
//! let off = builder.add_state(Lamp::Off);
//! builder.nest(powered, dim, true).unwrap();
//! builder.nest(powered, bright, false).unwrap();
//! builder.add_transition_on(dim, "turn").unwrap().to(bright);
//! builder.add_transition_on(powered, "unplug").unwrap().to(off);
//! builder.add_transition_on(off, "plug").unwrap().to(powered);
//!
//! let mut lamp =
//!     HierarchicalMachine::new(builder.build().unwrap(), &Lamp::Off, MachineConfig::default())
//!         .unwrap();
//! lamp.start(&"boot", &()).unwrap();
//!
//! lamp.fire(&"plug", &()).unwrap();
//! assert_eq!(lamp.current_state(), Some(&Lamp::Dim));
//!
//! lamp.fire(&"turn", &()).unwrap();
//! // Bright has no "unplug" transition; Powered handles it.
//! lamp.fire(&"unplug", &()).unwrap();
//! assert_eq!(lamp.current_state(), Some(&Lamp::Off));
//! ```

pub mod builder;
pub mod core;
pub mod hierarchy;
pub mod history;
pub mod machine;
pub mod observe;

// Re-export commonly used types
pub use builder::{BuildError, HierarchyBuilder, WiringError};
pub use core::{Action, ActionError, Guard, StateContext, StateId};
pub use hierarchy::{Hierarchy, StateIndex, TransitionResult, Visitor};
pub use history::{HistoryStore, HistoryType};
pub use machine::{HierarchicalMachine, MachineConfig, MachineError};
pub use observe::{HierarchyObserver, TracingObserver};

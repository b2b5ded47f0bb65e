//! Identity traits for states and events.
//!
//! A state node in the hierarchy is addressed by an arena index, but it is
//! *named* by an identity value supplied by the user. The identity type
//! also decides whether a state is terminal.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state identities.
///
/// All methods are pure. Identities are compared for equality and hashed to
/// look states up by value, so two distinct states must never share one.
///
/// # Example
///
/// ```rust
/// use hierarch::core::StateId;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Player {
///     Stopped,
///     Active,
///     Playing,
///     Paused,
///     Ejected,
/// }
///
/// impl StateId for Player {
///     fn name(&self) -> &str {
///         match self {
///             Self::Stopped => "Stopped",
///             Self::Active => "Active",
///             Self::Playing => "Playing",
///             Self::Paused => "Paused",
///             Self::Ejected => "Ejected",
///         }
///     }
///
///     fn is_final(&self) -> bool {
///         matches!(self, Self::Ejected)
///     }
/// }
///
/// assert!(Player::Ejected.is_final());
/// assert!(!Player::Paused.is_final());
/// ```
pub trait StateId:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Check if this is a final (terminal) state.
    ///
    /// Ordinary states answer `false`; terminal identities override this.
    fn is_final(&self) -> bool {
        false
    }
}

/// Marker trait for event keys.
///
/// Events index a state's transition table, so they must be hashable.
/// Implemented for every type meeting the bounds.
pub trait EventId: Clone + Eq + Hash + Debug + Send + Sync {}

impl<T> EventId for T where T: Clone + Eq + Hash + Debug + Send + Sync {}

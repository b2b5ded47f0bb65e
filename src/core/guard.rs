//! Guard predicates for controlling transitions.
//!
//! Guards are pure boolean functions over the triggering context. A
//! transition whose guard declines is skipped and the next candidate for
//! the same event is tried.

use super::context::StateContext;
use super::state::StateId;
use std::fmt;
use std::sync::Arc;

type Predicate<S, E, C> = Arc<dyn Fn(&StateContext<'_, S, E, C>) -> bool + Send + Sync>;

/// Pure predicate that determines if a transition accepts an event.
///
/// # Example
///
/// ```rust
/// use hierarch::core::{Guard, StateContext, StateId};
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
/// enum Door {
///     Open,
///     Closed,
/// }
///
/// impl StateId for Door {
///     fn name(&self) -> &str {
///         match self {
///             Self::Open => "Open",
///             Self::Closed => "Closed",
///         }
///     }
/// }
///
/// let heavy_enough = Guard::<Door, &str, u32>::new(|ctx| *ctx.payload() > 10);
///
/// assert!(heavy_enough.check(&StateContext::detached(&"push", &42)));
/// assert!(!heavy_enough.check(&StateContext::detached(&"push", &3)));
/// ```
pub struct Guard<S: StateId, E, C> {
    predicate: Predicate<S, E, C>,
}

impl<S: StateId, E, C> Guard<S, E, C> {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be deterministic and thread-safe.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&StateContext<'_, S, E, C>) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// Guard that accepts every context.
    pub fn always() -> Self
    where
        S: 'static,
        E: 'static,
        C: 'static,
    {
        Self::new(|_| true)
    }

    /// Check if the guard accepts this context.
    pub fn check(&self, ctx: &StateContext<'_, S, E, C>) -> bool {
        (self.predicate)(ctx)
    }
}

impl<S: StateId, E, C> Clone for Guard<S, E, C> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<S: StateId, E, C> fmt::Debug for Guard<S, E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    struct TestState(String);

    impl StateId for TestState {
        fn name(&self) -> &str {
            &self.0
        }
    }

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum Event {
        Submit,
        Cancel,
    }

    #[test]
    fn guard_checks_event() {
        let guard = Guard::<TestState, Event, ()>::new(|ctx| *ctx.event() == Event::Submit);

        assert!(guard.check(&StateContext::detached(&Event::Submit, &())));
        assert!(!guard.check(&StateContext::detached(&Event::Cancel, &())));
    }

    #[test]
    fn guard_checks_payload() {
        let guard = Guard::<TestState, Event, i64>::new(|ctx| *ctx.payload() >= 0);

        assert!(guard.check(&StateContext::detached(&Event::Submit, &5)));
        assert!(!guard.check(&StateContext::detached(&Event::Submit, &-1)));
    }

    #[test]
    fn always_accepts() {
        let guard = Guard::<TestState, Event, ()>::always();
        assert!(guard.check(&StateContext::detached(&Event::Cancel, &())));
    }

    #[test]
    fn guard_is_deterministic() {
        let guard = Guard::<TestState, Event, u8>::new(|ctx| *ctx.payload() % 2 == 0);
        let ctx = StateContext::detached(&Event::Submit, &4);

        assert_eq!(guard.check(&ctx), guard.check(&ctx));
    }

    #[test]
    fn cloned_guard_shares_predicate() {
        let guard = Guard::<TestState, Event, u8>::new(|ctx| *ctx.payload() > 1);
        let cloned = guard.clone();
        let ctx = StateContext::detached(&Event::Submit, &2);

        assert_eq!(guard.check(&ctx), cloned.check(&ctx));
        assert_eq!(format!("{:?}", cloned), "Guard(..)");
    }
}

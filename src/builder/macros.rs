//! Macros for declaring state identities.

/// Declare a state identity enum and implement [`StateId`](crate::core::StateId)
/// for it.
///
/// Each variant's name doubles as its display name. Variants listed under
/// `final:` report themselves as final states.
///
/// # Example
///
/// ```
/// use hierarch::core::StateId;
/// use hierarch::state_enum;
///
/// state_enum! {
///     pub enum Order {
///         Open,
///         Paid,
///         Shipped,
///         Cancelled,
///     }
///     final: [Shipped, Cancelled]
/// }
///
/// assert_eq!(Order::Paid.name(), "Paid");
/// assert!(Order::Cancelled.is_final());
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        $(final: [$($final:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::StateId for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    #[allow(unreachable_patterns)]
                    _ => false,
                }
            }
        }
    };
}

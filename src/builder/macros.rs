//! Macros for declaring walk states.

/// Generate a `State` implementation for a simple enum.
///
/// Variants are listed in sampling order; the generated `ALL` constant keeps
/// that order and can be handed straight to the builder.
///
/// # Example
///
/// ```
/// use markov_walk::core::State;
/// use markov_walk::state_enum;
///
/// state_enum! {
///     pub enum Weather {
///         Sunny,
///         Cloudy,
///         Rainy,
///     }
/// }
///
/// assert_eq!(Weather::Cloudy.name(), "Cloudy");
/// assert_eq!(Weather::ALL.len(), 3);
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
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $name {
            /// Every variant, in declaration order.
            #[allow(dead_code)]
            pub const ALL: &'static [$name] = &[$($name::$variant),*];
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}

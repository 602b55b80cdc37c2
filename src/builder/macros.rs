//! Macros for declaring identifier enums.

/// Declare an application identifier enum with explicit raw values.
///
/// Generates the enum plus its [`EnumKind`](crate::core::EnumKind)
/// descriptor, `From<E> for Value` and the
/// [`FromValue`](crate::core::FromValue) extraction used by
/// [`MachineBuilder::build`](crate::builder::MachineBuilder::build).
///
/// # Example
///
/// ```rust
/// use arbor::id_enum;
/// use arbor::core::{FromValue, Value};
///
/// id_enum! {
///     pub enum DoorTrigger {
///         Open = 0,
///         Close = 1,
///     }
/// }
///
/// assert_eq!(Value::from(DoorTrigger::Close), Value::enumerated("DoorTrigger", 1));
/// assert_eq!(
///     DoorTrigger::from_value(&Value::enumerated("DoorTrigger", 0)),
///     Some(DoorTrigger::Open),
/// );
/// assert!(DoorTrigger::kind().is_defined(1));
/// ```
#[macro_export]
macro_rules! id_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $value:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant = $value
            ),+
        }

        impl $name {
            /// The enumeration's kind descriptor.
            pub fn kind() -> $crate::core::EnumKind {
                $crate::core::EnumKind::new(
                    stringify!($name),
                    [$((stringify!($variant), $value)),+],
                )
            }
        }

        impl From<$name> for $crate::core::Value {
            fn from(id: $name) -> Self {
                $crate::core::Value::enumerated(stringify!($name), id as i32)
            }
        }

        impl $crate::core::FromValue for $name {
            fn from_value(value: &$crate::core::Value) -> Option<Self> {
                match value {
                    $crate::core::Value::Enum { kind, raw } if kind == stringify!($name) => {
                        match *raw {
                            $(raw if raw == $value => Some(Self::$variant),)+
                            _ => None,
                        }
                    }
                    _ => None,
                }
            }
        }
    };
}

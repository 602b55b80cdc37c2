//! Identifier values and kinds.
//!
//! State and trigger identifiers are dynamically kinded: a definition
//! declares one underlying kind per identifier family (32-bit integer,
//! 32-bit float, string, or a named enumeration) and every identifier in
//! that family carries a value of that kind. `Value` models the identifier
//! as a closed tagged variant, so no runtime type lookup is ever needed.

use serde::{Deserialize, Serialize};

/// A single named constant of an enumeration kind.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct EnumMember {
    /// Constant name, e.g. `"Start"`.
    pub name: String,
    /// Underlying integral value.
    pub value: i32,
}

/// Descriptor of a named enumeration kind.
///
/// Carries the member table used to validate raw values when decoding
/// persisted identifiers.
///
/// # Example
///
/// ```rust
/// use arbor::core::EnumKind;
///
/// let kind = EnumKind::new("DoorTrigger", [("Open", 0), ("Close", 1)]);
///
/// assert_eq!(kind.name(), "DoorTrigger");
/// assert!(kind.is_defined(1));
/// assert!(!kind.is_defined(5));
/// ```
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct EnumKind {
    name: String,
    members: Vec<EnumMember>,
}

impl EnumKind {
    /// Create a descriptor from `(member name, value)` pairs.
    pub fn new<N, M>(name: N, members: M) -> Self
    where
        N: Into<String>,
        M: IntoIterator<Item = (&'static str, i32)>,
    {
        Self {
            name: name.into(),
            members: members
                .into_iter()
                .map(|(name, value)| EnumMember {
                    name: name.to_string(),
                    value,
                })
                .collect(),
        }
    }

    /// The enumeration's kind name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All declared members, in declaration order.
    pub fn members(&self) -> &[EnumMember] {
        &self.members
    }

    /// Whether `raw` is the value of a declared member.
    pub fn is_defined(&self, raw: i32) -> bool {
        self.members.iter().any(|m| m.value == raw)
    }

    /// Look up a member by name.
    pub fn member_named(&self, name: &str) -> Option<&EnumMember> {
        self.members.iter().find(|m| m.name == name)
    }

    /// The identifier value of the member called `name`, if declared.
    pub fn value_of(&self, name: &str) -> Option<Value> {
        self.member_named(name)
            .map(|m| Value::enumerated(self.name.clone(), m.value))
    }

    /// The identifier value for `raw` under this kind, without validation.
    pub fn value(&self, raw: i32) -> Value {
        Value::enumerated(self.name.clone(), raw)
    }
}

/// The underlying kind of one identifier family.
#[derive(Clone, PartialEq, Debug)]
pub enum Kind {
    /// 32-bit signed integer identifiers.
    Int,
    /// 32-bit float identifiers.
    Float,
    /// String identifiers.
    Str,
    /// Named-enumeration identifiers.
    Enum(EnumKind),
}

impl Kind {
    /// The kind's persisted name: `"i32"`, `"f32"`, `"str"`, or the
    /// enumeration name.
    pub fn name(&self) -> &str {
        match self {
            Self::Int => "i32",
            Self::Float => "f32",
            Self::Str => "str",
            Self::Enum(kind) => kind.name(),
        }
    }
}

/// A dynamically-kinded identifier value.
///
/// Two values are equal iff they are the same variant with the same
/// payload; enum values additionally require the same kind name.
///
/// # Example
///
/// ```rust
/// use arbor::core::{Kind, Value};
///
/// let id = Value::from("idle");
/// assert!(id.matches(&Kind::Str));
/// assert!(!id.matches(&Kind::Int));
/// assert_eq!(id, Value::from("idle"));
/// ```
#[derive(Clone, PartialEq, Debug)]
pub enum Value {
    /// 32-bit signed integer payload.
    Int(i32),
    /// 32-bit float payload.
    Float(f32),
    /// String payload.
    Str(String),
    /// Enumeration payload: kind name plus raw member value.
    Enum {
        /// Name of the enumeration kind the value belongs to.
        kind: String,
        /// Underlying integral value.
        raw: i32,
    },
}

impl Value {
    /// Construct an enumeration value.
    pub fn enumerated<N: Into<String>>(kind: N, raw: i32) -> Self {
        Self::Enum {
            kind: kind.into(),
            raw,
        }
    }

    /// Whether this value belongs to `kind`.
    pub fn matches(&self, kind: &Kind) -> bool {
        match (self, kind) {
            (Self::Int(_), Kind::Int) => true,
            (Self::Float(_), Kind::Float) => true,
            (Self::Str(_), Kind::Str) => true,
            (Self::Enum { kind: name, .. }, Kind::Enum(descriptor)) => name == descriptor.name(),
            _ => false,
        }
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// Typed extraction from an identifier value.
///
/// The builder's generic entry point uses this to turn dynamically-kinded
/// registry entries into concrete identifier types; entries that do not
/// convert are excluded from the built machine.
///
/// # Example
///
/// ```rust
/// use arbor::core::{FromValue, Value};
///
/// assert_eq!(i32::from_value(&Value::from(3)), Some(3));
/// assert_eq!(i32::from_value(&Value::from("three")), None);
/// ```
pub trait FromValue: Sized {
    /// Extract `Self` from `value`, or `None` on a kind mismatch.
    fn from_value(value: &Value) -> Option<Self>;
}

impl FromValue for i32 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Int(raw) => Some(*raw),
            _ => None,
        }
    }
}

impl FromValue for f32 {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Float(raw) => Some(*raw),
            _ => None,
        }
    }
}

impl FromValue for String {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Str(text) => Some(text.clone()),
            _ => None,
        }
    }
}

impl FromValue for Value {
    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

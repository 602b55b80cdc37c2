//! Canonical text codec for identifier values.
//!
//! Persisted definitions store every identifier as a `(text, kind name)`
//! pair so heterogeneous kinds share one storage representation. The codec
//! is pure: serialization and kind resolution have no side effects, and
//! codec failures are the only hard failures in the authoring layer.

use thiserror::Error;

use super::value::{EnumKind, Kind, Value};

/// Errors raised by the codec.
#[derive(Debug, Error, PartialEq)]
pub enum CodecError {
    /// A persisted kind name denotes no supported kind.
    #[error("identifier kind `{0}` is not supported")]
    UnsupportedKind(String),

    /// The stored text is not a valid value of the requested kind.
    #[error("`{text}` is not a valid {kind} value")]
    Malformed {
        /// The offending stored text.
        text: String,
        /// Name of the kind the text was decoded under.
        kind: String,
    },
}

/// Serialize a value to its canonical text form.
///
/// Integers, floats and strings use their canonical representation;
/// enumeration values serialize as their raw integral value.
///
/// # Example
///
/// ```rust
/// use arbor::core::{codec, Value};
///
/// assert_eq!(codec::serialize(&Value::from(42)), "42");
/// assert_eq!(codec::serialize(&Value::enumerated("DoorTrigger", 1)), "1");
/// ```
pub fn serialize(value: &Value) -> String {
    match value {
        Value::Int(raw) => raw.to_string(),
        Value::Float(raw) => raw.to_string(),
        Value::Str(text) => text.clone(),
        Value::Enum { raw, .. } => raw.to_string(),
    }
}

/// Deserialize canonical text under a declared kind.
///
/// Enumeration text parses as the raw integral value; a raw value that
/// denotes no declared member falls back to the kind's zero value rather
/// than failing. Text that does not parse at all is a hard error.
///
/// # Example
///
/// ```rust
/// use arbor::core::{codec, EnumKind, Kind, Value};
///
/// let trigger = Kind::Enum(EnumKind::new("Run", [("Start", 0), ("Stop", 1)]));
///
/// assert_eq!(codec::deserialize("1", &trigger), Ok(Value::enumerated("Run", 1)));
/// // Undefined member: falls back to the zero value.
/// assert_eq!(codec::deserialize("5", &trigger), Ok(Value::enumerated("Run", 0)));
/// ```
pub fn deserialize(text: &str, kind: &Kind) -> Result<Value, CodecError> {
    match kind {
        Kind::Int => text
            .parse::<i32>()
            .map(Value::Int)
            .map_err(|_| malformed(text, kind)),
        Kind::Float => text
            .parse::<f32>()
            .map(Value::Float)
            .map_err(|_| malformed(text, kind)),
        Kind::Str => Ok(Value::Str(text.to_string())),
        Kind::Enum(descriptor) => {
            let raw = text.parse::<i32>().map_err(|_| malformed(text, kind))?;
            let raw = if descriptor.is_defined(raw) { raw } else { 0 };
            Ok(Value::enumerated(descriptor.name(), raw))
        }
    }
}

/// Resolve a persisted kind name against the scalar kinds and a table of
/// enumeration descriptors.
///
/// Any name outside `"i32"`, `"f32"`, `"str"` and the supplied enum names
/// is [`CodecError::UnsupportedKind`].
pub fn resolve_kind(name: &str, enums: &[EnumKind]) -> Result<Kind, CodecError> {
    match name {
        "i32" => Ok(Kind::Int),
        "f32" => Ok(Kind::Float),
        "str" => Ok(Kind::Str),
        other => enums
            .iter()
            .find(|e| e.name() == other)
            .cloned()
            .map(Kind::Enum)
            .ok_or_else(|| CodecError::UnsupportedKind(other.to_string())),
    }
}

fn malformed(text: &str, kind: &Kind) -> CodecError {
    CodecError::Malformed {
        text: text.to_string(),
        kind: kind.name().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trigger_kind() -> Kind {
        Kind::Enum(EnumKind::new("Run", [("Start", 0), ("Stop", 1)]))
    }

    #[test]
    fn scalar_values_round_trip() {
        let cases = [
            (Value::from(-17), Kind::Int),
            (Value::from(2.25f32), Kind::Float),
            (Value::from("deep space"), Kind::Str),
        ];

        for (value, kind) in cases {
            let text = serialize(&value);
            assert_eq!(deserialize(&text, &kind), Ok(value));
        }
    }

    #[test]
    fn enum_values_round_trip_through_raw_text() {
        let value = Value::enumerated("Run", 1);
        assert_eq!(serialize(&value), "1");
        assert_eq!(deserialize("1", &trigger_kind()), Ok(value));
    }

    #[test]
    fn undefined_enum_raw_falls_back_to_zero() {
        assert_eq!(
            deserialize("5", &trigger_kind()),
            Ok(Value::enumerated("Run", 0))
        );
    }

    #[test]
    fn malformed_text_is_a_hard_error() {
        assert_eq!(
            deserialize("banana", &Kind::Int),
            Err(CodecError::Malformed {
                text: "banana".to_string(),
                kind: "i32".to_string(),
            })
        );
        assert!(deserialize("banana", &trigger_kind()).is_err());
    }

    #[test]
    fn kind_names_resolve_against_the_enum_table() {
        let enums = [EnumKind::new("Run", [("Start", 0)])];

        assert_eq!(resolve_kind("i32", &enums), Ok(Kind::Int));
        assert_eq!(resolve_kind("f32", &enums), Ok(Kind::Float));
        assert_eq!(resolve_kind("str", &enums), Ok(Kind::Str));
        assert!(matches!(resolve_kind("Run", &enums), Ok(Kind::Enum(_))));
        assert_eq!(
            resolve_kind("System.Object", &enums),
            Err(CodecError::UnsupportedKind("System.Object".to_string()))
        );
    }
}

//! Classification of instance values.
//!
//! Instances are plain [`serde_json::Value`]s. This crate enables serde_json's
//! `preserve_order` feature, so the keys of an object keep the order in which
//! they were inserted by whatever built the instance.

use serde_json::Value;
use std::fmt;

/// The kind of a value, as far as validation is concerned.
///
/// Numbers are split into `Int` and `Float`: a number which is representable
/// as an `i64` or a `u64` is an `Int`, and any other number is a `Float`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    String,
    Sequence,
    Mapping,
}

impl ValueKind {
    /// Classify a value.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(n) if n.is_i64() || n.is_u64() => ValueKind::Int,
            Value::Number(_) => ValueKind::Float,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Sequence,
            Value::Object(_) => ValueKind::Mapping,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::String => "string",
            ValueKind::Sequence => "sequence",
            ValueKind::Mapping => "mapping",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classify() {
        assert_eq!(ValueKind::of(&json!(null)), ValueKind::Null);
        assert_eq!(ValueKind::of(&json!(true)), ValueKind::Bool);
        assert_eq!(ValueKind::of(&json!(1500)), ValueKind::Int);
        assert_eq!(ValueKind::of(&json!(-3)), ValueKind::Int);
        assert_eq!(ValueKind::of(&json!(u64::max_value())), ValueKind::Int);
        assert_eq!(ValueKind::of(&json!(4.0)), ValueKind::Float);
        assert_eq!(ValueKind::of(&json!("4.0 MiB")), ValueKind::String);
        assert_eq!(ValueKind::of(&json!([1, 2])), ValueKind::Sequence);
        assert_eq!(ValueKind::of(&json!({ "a": 1 })), ValueKind::Mapping);
    }

    #[test]
    fn object_keys_keep_insertion_order() {
        let value: Value = serde_json::from_str(r#"{"z": 1, "a": 2, "m": 3}"#).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }
}

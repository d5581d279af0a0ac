use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec::format_number;
use crate::error::{CodecError, CodecResult};

/// The shape of a storable value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Plain text, stored verbatim.
    Text,
    /// An object or array, stored as tagged JSON.
    Structured,
    /// A number, stored as tagged decimal text.
    Number,
    /// A boolean, stored as tagged `true` / `false`.
    Boolean,
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Structured => write!(f, "object"),
            Self::Number => write!(f, "number"),
            Self::Boolean => write!(f, "boolean"),
        }
    }
}

/// A typed value that can be stored in a text-only substrate.
///
/// This is a closed set: anything that is not text, structured JSON, a number
/// or a boolean must be converted into one of these before it can be stored.
/// `Structured(Null)` exists only so it can be rejected at encode time; null
/// is reserved to mean "not stored".
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Text(String),
    Structured(serde_json::Value),
    Number(f64),
    Boolean(bool),
}

impl Value {
    /// The shape of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Text(_) => ValueKind::Text,
            Self::Structured(_) => ValueKind::Structured,
            Self::Number(_) => ValueKind::Number,
            Self::Boolean(_) => ValueKind::Boolean,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_structured(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Structured(v) => Some(v),
            _ => None,
        }
    }

    /// Convert any serializable value into a storable [`Value`].
    ///
    /// Serialization goes through `serde_json`, so JSON strings become
    /// [`Value::Text`], numbers [`Value::Number`], booleans
    /// [`Value::Boolean`] and objects or arrays [`Value::Structured`].
    /// `key` is only used to identify the offending entry in errors.
    pub fn from_serialize<T: Serialize + ?Sized>(key: &str, value: &T) -> CodecResult<Self> {
        let json = serde_json::to_value(value).map_err(|_| CodecError::UnsupportedType {
            shape: std::any::type_name::<T>().to_string(),
            key: key.to_string(),
        })?;
        Ok(Self::from(json))
    }

    /// The JSON view of this value. Non-finite numbers map to `null`.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Text(s) => serde_json::Value::String(s.clone()),
            Self::Structured(v) => v.clone(),
            Self::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::Boolean(b) => serde_json::Value::Bool(*b),
        }
    }

    /// Deserialize this value into a concrete Rust type.
    pub fn deserialize_into<T: DeserializeOwned>(&self) -> CodecResult<T> {
        serde_json::from_value(self.to_json()).map_err(|e| CodecError::Deserialize {
            target: std::any::type_name::<T>().to_string(),
            reason: e.to_string(),
        })
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Structured(v) => write!(f, "{v}"),
            Self::Number(n) => f.write_str(&format_number(*n)),
            Self::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Self::Text(s.clone())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Self::Number(n as f64)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::String(s) => Self::Text(s),
            serde_json::Value::Bool(b) => Self::Boolean(b),
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(f64::NAN)),
            other => Self::Structured(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use std::collections::HashMap;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Plugin {
        name: String,
        version: String,
    }

    #[test]
    fn kind_display_names() {
        assert_eq!(Value::from("a").kind().to_string(), "text");
        assert_eq!(Value::from(json!({"a": 1})).kind().to_string(), "object");
        assert_eq!(Value::from(1).kind().to_string(), "number");
        assert_eq!(Value::from(true).kind().to_string(), "boolean");
    }

    #[test]
    fn json_scalars_map_to_scalar_variants() {
        assert_eq!(Value::from(json!("s")), Value::Text("s".into()));
        assert_eq!(Value::from(json!(12)), Value::Number(12.0));
        assert_eq!(Value::from(json!(false)), Value::Boolean(false));
        assert_eq!(Value::from(json!(null)), Value::Structured(json!(null)));
        assert_eq!(Value::from(json!(["a"])), Value::Structured(json!(["a"])));
    }

    #[test]
    fn integer_conversions_are_numbers() {
        assert_eq!(Value::from(1234i64).as_f64(), Some(1234.0));
        assert_eq!(Value::from(7u32).as_f64(), Some(7.0));
        assert_eq!(Value::from(-3i32).as_f64(), Some(-3.0));
    }

    #[test]
    fn from_serialize_struct_is_structured() {
        let plugin = Plugin {
            name: "blueocean".into(),
            version: "1.0".into(),
        };
        let value = Value::from_serialize("plugin", &plugin).unwrap();
        assert_eq!(
            value,
            Value::Structured(json!({"name": "blueocean", "version": "1.0"}))
        );
        let back: Plugin = value.deserialize_into().unwrap();
        assert_eq!(back, plugin);
    }

    #[test]
    fn from_serialize_rejects_non_string_map_keys() {
        let mut map: HashMap<(u8, u8), u8> = HashMap::new();
        map.insert((1, 2), 3);
        let err = Value::from_serialize("grid", &map).unwrap_err();
        match err {
            CodecError::UnsupportedType { shape, key } => {
                assert!(shape.contains("HashMap"));
                assert_eq!(key, "grid");
            }
            other => panic!("expected UnsupportedType, got: {other}"),
        }
    }

    #[test]
    fn deserialize_into_type_mismatch() {
        let err = Value::from("not a number").deserialize_into::<u32>().unwrap_err();
        assert!(matches!(err, CodecError::Deserialize { .. }), "got: {err}");
    }

    #[test]
    fn display_matches_stored_payload() {
        assert_eq!(Value::from("plain").to_string(), "plain");
        assert_eq!(Value::from(1234).to_string(), "1234");
        assert_eq!(Value::from(false).to_string(), "false");
        assert_eq!(Value::from(json!({"a": "b"})).to_string(), r#"{"a":"b"}"#);
    }

    #[test]
    fn accessors() {
        assert_eq!(Value::from("x").as_str(), Some("x"));
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert!(Value::from(1).as_str().is_none());
        assert!(Value::from(json!([1])).as_structured().is_some());
    }
}

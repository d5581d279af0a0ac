use nestkv_substrate::Substrate;
use tracing::debug;

use crate::error::{CodecError, CodecResult};
use crate::value::Value;

/// Prefix marking a stored value as JSON-encoded structured data.
pub const OBJECT_TAG: &str = "_$_object:";
/// Prefix marking a stored value as a number.
pub const NUMBER_TAG: &str = "_$_number:";
/// Prefix marking a stored value as a boolean.
pub const BOOLEAN_TAG: &str = "_$_boolean:";

/// Format a number the way a JavaScript engine prints it, so stored values
/// stay readable by existing browser-side code.
pub(crate) fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".into();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity".into() } else { "-Infinity".into() };
    }
    if n == 0.0 {
        // Covers -0 as well.
        return "0".into();
    }
    let abs = n.abs();
    if (1e-6..1e21).contains(&abs) {
        return n.to_string();
    }
    let sci = format!("{n:e}");
    match sci.split_once('e') {
        Some((mantissa, exp)) if !exp.starts_with('-') => format!("{mantissa}e+{exp}"),
        _ => sci,
    }
}

fn parse_number(payload: &str) -> Option<f64> {
    match payload.trim() {
        "" => None,
        "NaN" => Some(f64::NAN),
        "Infinity" | "+Infinity" => Some(f64::INFINITY),
        "-Infinity" => Some(f64::NEG_INFINITY),
        text => text.parse::<f64>().ok(),
    }
}

/// Codec mapping typed [`Value`]s to the tagged text stored in a substrate.
///
/// Stored representation:
/// ```text
/// text        -> stored verbatim
/// structured  -> "_$_object:"  + compact JSON
/// number      -> "_$_number:"  + decimal text
/// boolean     -> "_$_boolean:" + "true" | "false"
/// ```
pub struct TagCodec;

impl TagCodec {
    /// Encode a value into its stored text form without touching a substrate.
    pub fn encode_text(key: &str, value: &Value) -> CodecResult<String> {
        if key.is_empty() {
            return Err(CodecError::InvalidKey);
        }
        match value {
            Value::Text(s) => Ok(s.clone()),
            Value::Structured(serde_json::Value::Null) => Err(CodecError::InvalidValue {
                key: key.to_string(),
            }),
            Value::Structured(json) => {
                let payload =
                    serde_json::to_string(json).map_err(|_| CodecError::UnsupportedType {
                        shape: value.kind().to_string(),
                        key: key.to_string(),
                    })?;
                Ok(format!("{OBJECT_TAG}{payload}"))
            }
            Value::Number(n) => Ok(format!("{NUMBER_TAG}{}", format_number(*n))),
            Value::Boolean(b) => Ok(format!("{BOOLEAN_TAG}{b}")),
        }
    }

    /// Decode stored text back into a typed value.
    ///
    /// Text without a recognised tag is returned unchanged as
    /// [`Value::Text`]. A tagged payload that does not parse is reported as
    /// [`CodecError::CorruptValue`]; this only happens after out-of-band
    /// writes to the substrate.
    pub fn decode_text(key: &str, raw: &str) -> CodecResult<Value> {
        if let Some(payload) = raw.strip_prefix(OBJECT_TAG) {
            let json: serde_json::Value =
                serde_json::from_str(payload).map_err(|e| CodecError::CorruptValue {
                    key: key.to_string(),
                    reason: format!("invalid object payload: {e}"),
                })?;
            return Ok(Value::Structured(json));
        }
        if let Some(payload) = raw.strip_prefix(NUMBER_TAG) {
            return parse_number(payload)
                .map(Value::Number)
                .ok_or_else(|| CodecError::CorruptValue {
                    key: key.to_string(),
                    reason: format!("invalid number payload: {payload:?}"),
                });
        }
        if let Some(payload) = raw.strip_prefix(BOOLEAN_TAG) {
            return match payload {
                "true" => Ok(Value::Boolean(true)),
                "false" => Ok(Value::Boolean(false)),
                other => Err(CodecError::CorruptValue {
                    key: key.to_string(),
                    reason: format!("invalid boolean payload: {other:?}"),
                }),
            };
        }
        Ok(Value::Text(raw.to_string()))
    }

    /// Encode `value` and write it to `substrate` at the raw `key`.
    ///
    /// Validation happens before the write, so a rejected value never
    /// replaces what is already stored.
    pub fn encode(key: &str, value: &Value, substrate: &dyn Substrate) -> CodecResult<()> {
        let text = Self::encode_text(key, value)?;
        substrate.set_item(key, &text)?;
        debug!(key, kind = %value.kind(), len = text.len(), "value stored");
        Ok(())
    }

    /// Read and decode the value at the raw `key`.
    ///
    /// Returns `Ok(None)` when nothing is stored there.
    pub fn decode(key: &str, substrate: &dyn Substrate) -> CodecResult<Option<Value>> {
        match substrate.get_item(key)? {
            Some(raw) => Self::decode_text(key, &raw).map(Some),
            None => Ok(None),
        }
    }

    /// Delete the raw `key`. Deleting an absent key is not an error.
    pub fn remove(key: &str, substrate: &dyn Substrate) -> CodecResult<()> {
        substrate.remove_item(key)?;
        debug!(key, "value removed");
        Ok(())
    }
}

//! Type-tagging codec for nestkv.
//!
//! A substrate only stores text. This crate restores the type information
//! that would otherwise be lost, by prefixing stored text with a fixed tag:
//!
//! | Value                  | Stored as                          |
//! |------------------------|------------------------------------|
//! | [`Value::Text`]        | the text itself                    |
//! | [`Value::Structured`]  | `_$_object:` + compact JSON        |
//! | [`Value::Number`]      | `_$_number:` + decimal text        |
//! | [`Value::Boolean`]     | `_$_boolean:` + `true` / `false`   |
//!
//! The tags are part of the stored format and must not change: browser-side
//! code reads the same entries.

pub mod codec;
pub mod error;
pub mod value;

pub use codec::{TagCodec, BOOLEAN_TAG, NUMBER_TAG, OBJECT_TAG};
pub use error::{CodecError, CodecResult};
pub use value::{Value, ValueKind};

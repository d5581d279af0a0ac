use nestkv_substrate::SubstrateError;

/// Errors from encoding or decoding typed values.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// Attempted to store under an empty key.
    #[error("unexpected call to store via an empty name")]
    InvalidKey,

    /// Attempted to store a null value. Null is reserved to mean "not stored".
    #[error("unexpected call to store a null value in storage. Name: {key}")]
    InvalidValue { key: String },

    /// The value has a shape the codec cannot represent.
    #[error("unexpected call to store type \"{shape}\". Name: {key}")]
    UnsupportedType { shape: String, key: String },

    /// A tagged value in the substrate failed to parse.
    #[error("corrupt value at {key}: {reason}")]
    CorruptValue { key: String, reason: String },

    /// A decoded value could not be converted into the requested Rust type.
    #[error("cannot read value as {target}: {reason}")]
    Deserialize { target: String, reason: String },

    /// Error from the underlying substrate.
    #[error("substrate error: {0}")]
    Substrate(#[from] SubstrateError),
}

/// Result alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

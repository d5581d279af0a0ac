//! Error types for namespace operations.

use thiserror::Error;

use nestkv_codec::CodecError;
use nestkv_substrate::SubstrateError;

/// Errors that can occur during namespace operations.
#[derive(Debug, Error)]
pub enum NamespaceError {
    /// A generic namespace was requested under a name reserved for a
    /// dedicated factory.
    #[error("call to local_namespace() using a reserved namespace name \"{name}\". Please call {factory}() instead")]
    ReservedName { name: String, factory: String },

    /// The namespace name is not a valid `/`-separated path.
    #[error("invalid namespace name: {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// Encoding or decoding a value failed.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// The underlying substrate failed.
    #[error("substrate error: {0}")]
    Substrate(#[from] SubstrateError),
}

/// Convenience type alias for namespace operations.
pub type Result<T> = std::result::Result<T, NamespaceError>;

//! High-level API for nestkv.
//!
//! Binds a substrate to a [`Storage`] and exposes the entry points an
//! application uses: typed access to raw keys, the generic namespace factory
//! and the reserved instance namespace. This is the main entry point for
//! applications embedding nestkv.

pub mod config;
pub mod error;
pub mod storage;

pub use config::{StorageConfig, DEFAULT_INSTANCE_NAMESPACE};
pub use error::{SdkError, SdkResult};
pub use storage::Storage;

// Re-export key types
pub use nestkv_codec::{Value, ValueKind};
pub use nestkv_namespace::{DotParent, GetOptions, Namespace, NamespaceEntry};
pub use nestkv_substrate::{FileSubstrate, InMemorySubstrate, Substrate};

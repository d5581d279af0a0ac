//! Hierarchical namespaces over a flat nestkv substrate.
//!
//! A flat substrate has one keyspace. This crate carves it into a tree of
//! named namespaces by prefixing every key with the namespace name:
//!
//! ```text
//! namespace "a/b", key "org.jenkins.magickey"  ->  "a/b:org.jenkins.magickey"
//! namespace "a/z", key "org.jenkins.magickey"  ->  "a/z:org.jenkins.magickey"
//! ```
//!
//! Two axes of hierarchy exist side by side and never mix:
//!
//! - the **namespace path**, `/`-separated, which scopes [`Namespace::count`],
//!   [`Namespace::iterate`] and [`Namespace::clear`];
//! - the **dot path** inside a local key, which only drives the optional
//!   dot-parent fallback of [`Namespace::get_with`].
//!
//! # Modules
//!
//! - [`error`]: Error types for namespace operations
//! - [`names`]: Namespace name validation and key splitting
//! - [`options`]: [`GetOptions`] and the [`DotParent`] fallback policy
//! - [`namespace`]: The [`Namespace`] handle and [`NamespaceEntry`]

pub mod error;
pub mod names;
pub mod namespace;
pub mod options;

pub use error::{NamespaceError, Result};
pub use names::{validate_namespace_name, validate_subspace_name, KEY_SEPARATOR, PATH_SEPARATOR};
pub use namespace::{Namespace, NamespaceEntry};
pub use options::{DotParent, GetOptions};

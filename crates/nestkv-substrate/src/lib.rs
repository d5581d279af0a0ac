//! Flat key-value substrates for nestkv.
//!
//! A substrate is the storage that everything else in nestkv is layered on:
//! a single flat keyspace of text keys mapped to text values, with no native
//! hierarchy and no type information. It has the same shape as a browser
//! `Storage` object.
//!
//! # Backends
//!
//! All backends implement the [`Substrate`] trait:
//!
//! - [`InMemorySubstrate`] -- `BTreeMap`-based, optional byte quota; used for
//!   tests and session-scoped storage
//! - [`FileSubstrate`] -- JSON file on disk, rewritten atomically on every
//!   mutation; used for persistent storage
//!
//! # Design Rules
//!
//! 1. The substrate never interprets keys or values.
//! 2. A missing key reads as `None`, never as an error.
//! 3. There is no atomicity across keys and no isolation between writers.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{SubstrateError, SubstrateResult};
pub use file::FileSubstrate;
pub use memory::InMemorySubstrate;
pub use traits::Substrate;

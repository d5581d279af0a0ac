//! The [`Namespace`] handle: a named subtree of a flat substrate.

use std::fmt::Display;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use nestkv_codec::{TagCodec, Value};
use nestkv_substrate::Substrate;

use crate::error::Result;
use crate::names::{
    in_scope, split_qualified_key, validate_namespace_name, validate_subspace_name,
    KEY_SEPARATOR, PATH_SEPARATOR,
};
use crate::options::{dot_parents, GetOptions};

/// One stored entry visited by a scoped scan.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamespaceEntry {
    /// Key local to the owning namespace.
    pub key: String,
    /// The stored text, exactly as the substrate holds it.
    pub raw_value: String,
    /// Name of the namespace that owns the entry: the scanned namespace
    /// itself or one of its subspaces.
    pub namespace: String,
}

impl NamespaceEntry {
    /// The raw substrate key of this entry.
    pub fn qualified_key(&self) -> String {
        format!("{}{KEY_SEPARATOR}{}", self.namespace, self.key)
    }

    /// Decode the stored text into a typed value.
    pub fn decode(&self) -> Result<Value> {
        Ok(TagCodec::decode_text(&self.qualified_key(), &self.raw_value)?)
    }
}

/// A named subtree of the flat keyspace.
///
/// A namespace is a stateless handle: a name plus a shared reference to the
/// substrate. Values are stored under `"<name>:<key>"`, and a subspace `y` of
/// `x` is simply the namespace `"x/y"`. Dropping a handle never touches stored
/// data, and any number of handles may name the same subtree.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use nestkv_namespace::{GetOptions, Namespace};
/// use nestkv_substrate::InMemorySubstrate;
///
/// let ns = Namespace::new("jenkins", Arc::new(InMemorySubstrate::new())).unwrap();
/// let categories = ns.subspace("log-categories").unwrap();
/// categories.set("org.jenkins", "DEBUG").unwrap();
///
/// let level = categories
///     .get_with("org.jenkins.blueocean.sse", &GetOptions::dot_parent())
///     .unwrap();
/// assert_eq!(level.unwrap().as_str(), Some("DEBUG"));
/// assert_eq!(ns.count(true).unwrap(), 1);
/// ```
#[derive(Clone)]
pub struct Namespace {
    name: String,
    substrate: Arc<dyn Substrate>,
}

impl Namespace {
    /// Create a handle for the namespace `name` over `substrate`.
    ///
    /// `name` may be a `/`-separated path such as `"a/b"`.
    pub fn new(name: impl Into<String>, substrate: Arc<dyn Substrate>) -> Result<Self> {
        let name = name.into();
        validate_namespace_name(&name)?;
        Ok(Self { name, substrate })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn substrate(&self) -> &Arc<dyn Substrate> {
        &self.substrate
    }

    /// The raw substrate key for `key` in this namespace.
    pub fn qualify(&self, key: &str) -> String {
        format!("{}{KEY_SEPARATOR}{key}", self.name)
    }

    // ---- Values ----

    /// Store a value under `key`.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        TagCodec::encode(&self.qualify(key), &value, self.substrate.as_ref())?;
        Ok(())
    }

    /// Store any serializable value under `key`.
    pub fn set_serialized<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let qualified = self.qualify(key);
        let value = Value::from_serialize(&qualified, value)?;
        TagCodec::encode(&qualified, &value, self.substrate.as_ref())?;
        Ok(())
    }

    /// Read the value stored under `key`.
    pub fn get(&self, key: &str) -> Result<Option<Value>> {
        self.get_with(key, &GetOptions::default())
    }

    /// Read the value stored under `key`, applying the fallback policy in
    /// `options` when nothing usable is stored at the exact key.
    pub fn get_with(&self, key: &str, options: &GetOptions) -> Result<Option<Value>> {
        let policy = &options.check_dot_parent;

        if let Some(value) = TagCodec::decode(&self.qualify(key), self.substrate.as_ref())? {
            if policy.permits(&value) {
                return Ok(Some(value));
            }
        }
        if !policy.is_enabled() {
            return Ok(None);
        }

        for parent in dot_parents(key) {
            if let Some(value) = TagCodec::decode(&self.qualify(parent), self.substrate.as_ref())? {
                if policy.permits(&value) {
                    debug!(namespace = %self.name, key, parent, "resolved via dot parent");
                    return Ok(Some(value));
                }
            }
        }
        Ok(None)
    }

    /// Read and deserialize the value stored under `key`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key)? {
            Some(value) => Ok(Some(value.deserialize_into()?)),
            None => Ok(None),
        }
    }

    /// Delete `key` from this namespace. Deleting an absent key is a no-op.
    pub fn remove(&self, key: &str) -> Result<()> {
        self.substrate.remove_item(&self.qualify(key))?;
        Ok(())
    }

    // ---- Hierarchy ----

    /// The child namespace `"<name>/<child>"`, sharing this substrate.
    pub fn subspace(&self, child: &str) -> Result<Self> {
        validate_subspace_name(child)?;
        Ok(Self {
            name: format!("{}{PATH_SEPARATOR}{child}", self.name),
            substrate: Arc::clone(&self.substrate),
        })
    }

    /// The enclosing namespace, or `None` for a top-level namespace.
    pub fn parent(&self) -> Option<Self> {
        let (parent, _) = self.name.rsplit_once(PATH_SEPARATOR)?;
        Some(Self {
            name: parent.to_string(),
            substrate: Arc::clone(&self.substrate),
        })
    }

    /// Returns `true` if `other` names a subspace (at any depth) of this
    /// namespace.
    pub fn contains(&self, other: &Namespace) -> bool {
        in_scope(&self.name, &other.name, true) && self.name != other.name
    }

    // ---- Scoped scans ----

    /// Snapshot every entry in scope.
    ///
    /// Entries stored directly in this namespace are always included;
    /// entries of subspaces (any depth) only with `include_subspaces`. The
    /// whole match list is materialized before returning, so callers may
    /// mutate the substrate while walking it. Order follows the substrate's
    /// enumeration order.
    pub fn entries(&self, include_subspaces: bool) -> Result<Vec<NamespaceEntry>> {
        let mut entries = Vec::new();
        for raw_key in self.substrate.keys()? {
            let Some((namespace, key)) = split_qualified_key(&raw_key) else {
                continue;
            };
            if !in_scope(&self.name, namespace, include_subspaces) {
                continue;
            }
            // Keys can vanish between enumeration and read under external
            // writers; treat them as already removed.
            let Some(raw_value) = self.substrate.get_item(&raw_key)? else {
                continue;
            };
            entries.push(NamespaceEntry {
                key: key.to_string(),
                raw_value,
                namespace: namespace.to_string(),
            });
        }
        Ok(entries)
    }

    /// Visit every entry in scope. Returns the number of entries visited.
    ///
    /// A visitor error is logged and the scan carries on with the next
    /// entry. The match list is materialized before the first visit, so a
    /// visitor may remove entries (including ones not yet visited) safely.
    pub fn iterate<F, E>(&self, include_subspaces: bool, mut visitor: F) -> Result<usize>
    where
        F: FnMut(&NamespaceEntry) -> std::result::Result<(), E>,
        E: Display,
    {
        let entries = self.entries(include_subspaces)?;
        for entry in &entries {
            if let Err(e) = visitor(entry) {
                warn!(
                    namespace = %self.name,
                    owner = %entry.namespace,
                    key = %entry.key,
                    error = %e,
                    "error iterating storage namespace"
                );
            }
        }
        Ok(entries.len())
    }

    /// Number of entries in scope.
    ///
    /// This is a full substrate scan, not a metadata lookup.
    pub fn count(&self, include_subspaces: bool) -> Result<usize> {
        let mut count = 0;
        self.iterate(include_subspaces, |_| {
            count += 1;
            Ok::<(), std::convert::Infallible>(())
        })?;
        Ok(count)
    }

    /// Remove every entry in scope. Returns the number of entries removed.
    ///
    /// Each entry is removed by its own qualified key, so entries found in a
    /// subspace are removed from that subspace rather than from this
    /// namespace.
    pub fn clear(&self, include_subspaces: bool) -> Result<usize> {
        let mut removed = 0;
        self.iterate(include_subspaces, |entry| {
            self.substrate.remove_item(&entry.qualified_key())?;
            removed += 1;
            Ok::<(), nestkv_substrate::SubstrateError>(())
        })?;
        debug!(namespace = %self.name, include_subspaces, removed, "namespace cleared");
        Ok(removed)
    }
}

impl std::fmt::Debug for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Namespace").field("name", &self.name).finish()
    }
}

impl PartialEq for Namespace {
    /// Two handles are equal when they name the same subtree of the same
    /// substrate instance.
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.substrate, &other.substrate)
    }
}

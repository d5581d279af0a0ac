use std::collections::BTreeMap;
use std::sync::RwLock;

use tracing::debug;

use crate::error::{SubstrateError, SubstrateResult};
use crate::traits::Substrate;

/// Entries plus their running byte total, guarded together.
#[derive(Default)]
struct Entries {
    map: BTreeMap<String, String>,
    bytes: u64,
}

fn entry_size(key: &str, value: &str) -> u64 {
    (key.len() + value.len()) as u64
}

/// In-memory substrate, the `sessionStorage` analogue.
///
/// Intended for tests and for embedding where persistence is not wanted.
/// Keys enumerate in lexicographic order. An optional byte quota mimics the
/// per-origin limit of browser storage: a write that would exceed it fails and
/// leaves the previous value in place.
pub struct InMemorySubstrate {
    entries: RwLock<Entries>,
    quota: Option<u64>,
}

impl InMemorySubstrate {
    /// Create a new empty substrate with no quota.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Entries::default()),
            quota: None,
        }
    }

    /// Create a new empty substrate that rejects writes past `quota` bytes.
    ///
    /// Usage is counted as the UTF-8 length of every key plus its value.
    pub fn with_quota(quota: u64) -> Self {
        Self {
            entries: RwLock::new(Entries::default()),
            quota: Some(quota),
        }
    }

    /// Seed a substrate from existing raw entries, bypassing the quota.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut state = Entries::default();
        for (key, value) in entries {
            let (key, value) = (key.into(), value.into());
            state.bytes += entry_size(&key, &value);
            if let Some(old) = state.map.insert(key.clone(), value) {
                state.bytes -= entry_size(&key, &old);
            }
        }
        Self {
            entries: RwLock::new(state),
            quota: None,
        }
    }

    /// The configured byte quota, if any.
    pub fn quota(&self) -> Option<u64> {
        self.quota
    }

    /// Bytes currently used by keys and values.
    pub fn used_bytes(&self) -> SubstrateResult<u64> {
        let entries = self
            .entries
            .read()
            .map_err(|_| SubstrateError::LockPoisoned)?;
        Ok(entries.bytes)
    }
}

impl Default for InMemorySubstrate {
    fn default() -> Self {
        Self::new()
    }
}

impl Substrate for InMemorySubstrate {
    fn get_item(&self, key: &str) -> SubstrateResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| SubstrateError::LockPoisoned)?;
        Ok(entries.map.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> SubstrateResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| SubstrateError::LockPoisoned)?;
        let replaced = entries
            .map
            .get(key)
            .map(|old| entry_size(key, old))
            .unwrap_or(0);
        let requested = entries.bytes - replaced + entry_size(key, value);
        if let Some(quota) = self.quota {
            if requested > quota {
                debug!(key, requested, quota, "write rejected by quota");
                return Err(SubstrateError::QuotaExceeded { requested, quota });
            }
        }
        entries.map.insert(key.to_string(), value.to_string());
        entries.bytes = requested;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> SubstrateResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| SubstrateError::LockPoisoned)?;
        if let Some(old) = entries.map.remove(key) {
            entries.bytes -= entry_size(key, &old);
        }
        Ok(())
    }

    fn len(&self) -> SubstrateResult<usize> {
        let entries = self
            .entries
            .read()
            .map_err(|_| SubstrateError::LockPoisoned)?;
        Ok(entries.map.len())
    }

    fn key(&self, index: usize) -> SubstrateResult<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| SubstrateError::LockPoisoned)?;
        Ok(entries.map.keys().nth(index).cloned())
    }

    fn clear(&self) -> SubstrateResult<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| SubstrateError::LockPoisoned)?;
        let removed = entries.map.len();
        entries.map.clear();
        entries.bytes = 0;
        debug!(removed, "in-memory substrate cleared");
        Ok(())
    }

    fn keys(&self) -> SubstrateResult<Vec<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| SubstrateError::LockPoisoned)?;
        Ok(entries.map.keys().cloned().collect())
    }
}

impl std::fmt::Debug for InMemorySubstrate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len().unwrap_or(0);
        f.debug_struct("InMemorySubstrate")
            .field("key_count", &count)
            .field("quota", &self.quota)
            .finish()
    }
}

use crate::error::SubstrateResult;

/// A flat, text-only key-value store.
///
/// This is the contract of a browser `Storage` object (`localStorage`,
/// `sessionStorage`) expressed as a trait:
/// - Keys and values are plain strings. The substrate never interprets them.
/// - Reading a missing key is not an error; it returns `Ok(None)`.
/// - Removing a missing key is not an error.
/// - Enumeration is positional (`len` + `key(i)`) and its order is whatever the
///   backend provides. Callers must not assume insertion order.
/// - There is no atomicity across keys. The last write wins.
pub trait Substrate: Send + Sync {
    /// Read the raw text stored at `key`.
    fn get_item(&self, key: &str) -> SubstrateResult<Option<String>>;

    /// Store `value` at `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> SubstrateResult<()>;

    /// Delete `key`. Deleting an absent key is a no-op.
    fn remove_item(&self, key: &str) -> SubstrateResult<()>;

    /// Number of raw keys currently stored.
    fn len(&self) -> SubstrateResult<usize>;

    /// The raw key at position `index`, or `None` past the end.
    ///
    /// Positions are only stable while the substrate is not mutated.
    fn key(&self, index: usize) -> SubstrateResult<Option<String>>;

    /// Remove every raw key.
    fn clear(&self) -> SubstrateResult<()>;

    /// Returns `true` if no keys are stored.
    fn is_empty(&self) -> SubstrateResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Snapshot every raw key currently stored.
    ///
    /// Default implementation performs a positional scan with `len()` and
    /// `key()`. Backends may override with a cheaper snapshot.
    fn keys(&self) -> SubstrateResult<Vec<String>> {
        let len = self.len()?;
        let mut keys = Vec::with_capacity(len);
        for index in 0..len {
            if let Some(key) = self.key(index)? {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}

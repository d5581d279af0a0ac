use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, info};

use crate::error::{SubstrateError, SubstrateResult};
use crate::traits::Substrate;

/// File-backed substrate, the `localStorage` analogue.
///
/// The whole keyspace is held in memory and rewritten to disk after every
/// mutation as a single JSON object of string values:
///
/// ```text
/// {
///   "jenkins-instance:currentVersion": "2.401",
///   "x/y:a": "_$_number:1234"
/// }
/// ```
///
/// Writes go to a sibling `*.tmp` file which is then renamed over the target,
/// so a crash mid-write leaves either the old or the new file, never a torn one.
pub struct FileSubstrate {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileSubstrate {
    /// Open (or create) a storage file at the given path.
    ///
    /// Parent directories are created as needed. A missing or empty file
    /// starts an empty keyspace; the file itself is only written on the first
    /// mutation.
    pub fn open(path: &Path) -> SubstrateResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let entries = match fs::read(path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice::<BTreeMap<String, String>>(&bytes).map_err(
                |e| SubstrateError::Corrupt {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                },
            )?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        info!(path = %path.display(), keys = entries.len(), "file substrate opened");

        Ok(Self {
            path: path.to_path_buf(),
            entries: Mutex::new(entries),
        })
    }

    /// Path of the backing storage file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> SubstrateResult<()> {
        let data = serde_json::to_vec_pretty(entries).map_err(|e| SubstrateError::Corrupt {
            path: self.path.clone(),
            reason: e.to_string(),
        })?;

        let mut tmp_path = self.path.clone().into_os_string();
        tmp_path.push(".tmp");
        let tmp_path = PathBuf::from(tmp_path);

        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(&data)?;
        file.sync_all()?;
        fs::rename(&tmp_path, &self.path)?;

        debug!(path = %self.path.display(), keys = entries.len(), bytes = data.len(), "storage file persisted");
        Ok(())
    }
}

impl Substrate for FileSubstrate {
    fn get_item(&self, key: &str) -> SubstrateResult<Option<String>> {
        let entries = self.entries.lock().map_err(|_| SubstrateError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> SubstrateResult<()> {
        let mut entries = self.entries.lock().map_err(|_| SubstrateError::LockPoisoned)?;
        let previous = entries.insert(key.to_string(), value.to_string());
        if let Err(e) = self.persist(&entries) {
            // Keep memory consistent with what is on disk.
            match previous {
                Some(old) => entries.insert(key.to_string(), old),
                None => entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn remove_item(&self, key: &str) -> SubstrateResult<()> {
        let mut entries = self.entries.lock().map_err(|_| SubstrateError::LockPoisoned)?;
        if let Some(old) = entries.remove(key) {
            if let Err(e) = self.persist(&entries) {
                entries.insert(key.to_string(), old);
                return Err(e);
            }
        }
        Ok(())
    }

    fn len(&self) -> SubstrateResult<usize> {
        let entries = self.entries.lock().map_err(|_| SubstrateError::LockPoisoned)?;
        Ok(entries.len())
    }

    fn key(&self, index: usize) -> SubstrateResult<Option<String>> {
        let entries = self.entries.lock().map_err(|_| SubstrateError::LockPoisoned)?;
        Ok(entries.keys().nth(index).cloned())
    }

    fn clear(&self) -> SubstrateResult<()> {
        let mut entries = self.entries.lock().map_err(|_| SubstrateError::LockPoisoned)?;
        let previous = std::mem::take(&mut *entries);
        if let Err(e) = self.persist(&entries) {
            *entries = previous;
            return Err(e);
        }
        Ok(())
    }

    fn keys(&self) -> SubstrateResult<Vec<String>> {
        let entries = self.entries.lock().map_err(|_| SubstrateError::LockPoisoned)?;
        Ok(entries.keys().cloned().collect())
    }
}

impl std::fmt::Debug for FileSubstrate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileSubstrate")
            .field("path", &self.path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage_path(dir: &TempDir) -> PathBuf {
        dir.path().join("nested").join("storage.json")
    }

    #[test]
    fn open_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let substrate = FileSubstrate::open(&storage_path(&dir)).unwrap();
        assert!(substrate.is_empty().unwrap());
        // Nothing is written until the first mutation.
        assert!(!substrate.path().exists());
    }

    #[test]
    fn values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = storage_path(&dir);
        {
            let substrate = FileSubstrate::open(&path).unwrap();
            substrate.set_item("x:a", "avalx").unwrap();
            substrate.set_item("x/y:a", "_$_number:1234").unwrap();
            substrate.set_item("gone", "soon").unwrap();
            substrate.remove_item("gone").unwrap();
        }

        let reopened = FileSubstrate::open(&path).unwrap();
        assert_eq!(reopened.len().unwrap(), 2);
        assert_eq!(reopened.get_item("x:a").unwrap().as_deref(), Some("avalx"));
        assert_eq!(
            reopened.get_item("x/y:a").unwrap().as_deref(),
            Some("_$_number:1234")
        );
        assert!(reopened.get_item("gone").unwrap().is_none());
    }

    #[test]
    fn clear_persists_empty_keyspace() {
        let dir = TempDir::new().unwrap();
        let path = storage_path(&dir);
        let substrate = FileSubstrate::open(&path).unwrap();
        substrate.set_item("a", "1").unwrap();
        substrate.clear().unwrap();

        let reopened = FileSubstrate::open(&path).unwrap();
        assert!(reopened.is_empty().unwrap());
    }

    #[test]
    fn persisted_file_is_plain_json_object() {
        let dir = TempDir::new().unwrap();
        let path = storage_path(&dir);
        let substrate = FileSubstrate::open(&path).unwrap();
        substrate.set_item("ns:key", "value").unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed["ns:key"], "value");
        // The temp file never outlives a successful write.
        assert!(!path.with_file_name("storage.json.tmp").exists());
    }

    #[test]
    fn empty_file_opens_as_empty_keyspace() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "  \n").unwrap();
        let substrate = FileSubstrate::open(&path).unwrap();
        assert!(substrate.is_empty().unwrap());
    }

    #[test]
    fn corrupt_file_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "[1, 2, 3]").unwrap();
        let err = FileSubstrate::open(&path).unwrap_err();
        assert!(matches!(err, SubstrateError::Corrupt { .. }), "got: {err}");
    }

    #[test]
    fn non_string_values_are_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, r#"{"a": 1}"#).unwrap();
        assert!(FileSubstrate::open(&path).is_err());
    }

    #[test]
    fn default_key_scan_sees_every_key() {
        let dir = TempDir::new().unwrap();
        let substrate = FileSubstrate::open(&storage_path(&dir)).unwrap();
        substrate.set_item("b", "2").unwrap();
        substrate.set_item("a", "1").unwrap();
        assert_eq!(substrate.keys().unwrap(), vec!["a", "b"]);
        assert_eq!(substrate.key(1).unwrap().as_deref(), Some("b"));
    }
}

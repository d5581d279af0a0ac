use std::sync::Arc;

use tracing::debug;

use nestkv_codec::{TagCodec, Value};
use nestkv_namespace::{validate_subspace_name, Namespace, NamespaceError};
use nestkv_substrate::{FileSubstrate, InMemorySubstrate, Substrate};

use crate::config::StorageConfig;
use crate::error::SdkResult;

/// Name of the dedicated factory for the reserved namespace, used in errors.
const INSTANCE_FACTORY: &str = "jenkins_instance_namespace";

/// High-level storage API bound to one substrate.
///
/// Offers typed access to raw keys (`set_local` / `get_local` /
/// `remove_local`) and hands out [`Namespace`] handles. The instance namespace
/// is reserved: it can only be obtained through
/// [`Storage::jenkins_instance_namespace`], so that the code that owns its
/// lifecycle (clearing it when the backend instance changes) stays in one
/// place.
pub struct Storage {
    substrate: Arc<dyn Substrate>,
    config: StorageConfig,
}

impl Storage {
    /// Bind to `substrate` with the default configuration.
    pub fn new(substrate: Arc<dyn Substrate>) -> Self {
        Self::with_config(substrate, StorageConfig::default())
    }

    pub fn with_config(substrate: Arc<dyn Substrate>, config: StorageConfig) -> Self {
        Self { substrate, config }
    }

    /// A storage over a fresh in-memory substrate.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemorySubstrate::new()))
    }

    /// Build the substrate described by `config`: a [`FileSubstrate`] when a
    /// storage file is configured, otherwise an [`InMemorySubstrate`] with the
    /// configured quota.
    pub fn from_config(config: StorageConfig) -> SdkResult<Self> {
        let substrate: Arc<dyn Substrate> = match (&config.storage_file, config.quota_bytes) {
            (Some(path), _) => Arc::new(FileSubstrate::open(path)?),
            (None, Some(quota)) => Arc::new(InMemorySubstrate::with_quota(quota)),
            (None, None) => Arc::new(InMemorySubstrate::new()),
        };
        Ok(Self::with_config(substrate, config))
    }

    pub fn substrate(&self) -> &Arc<dyn Substrate> {
        &self.substrate
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    // ---- Root-level typed access ----

    /// Store a value at the raw, unnamespaced `key`.
    pub fn set_local(&self, key: &str, value: impl Into<Value>) -> SdkResult<()> {
        TagCodec::encode(key, &value.into(), self.substrate.as_ref())?;
        Ok(())
    }

    /// Read the value at the raw `key`. Namespaced entries are visible here
    /// under their qualified key, e.g. `"x/y:a"`.
    pub fn get_local(&self, key: &str) -> SdkResult<Option<Value>> {
        Ok(TagCodec::decode(key, self.substrate.as_ref())?)
    }

    /// Delete the raw `key`.
    pub fn remove_local(&self, key: &str) -> SdkResult<()> {
        TagCodec::remove(key, self.substrate.as_ref())?;
        Ok(())
    }

    // ---- Namespace factories ----

    /// A namespace handle for `name`, which may be a `/` path.
    ///
    /// Fails with [`NamespaceError::ReservedName`] for the reserved instance
    /// namespace; use [`Storage::jenkins_instance_namespace`] for that one.
    pub fn local_namespace(&self, name: &str) -> SdkResult<Namespace> {
        if name == self.config.reserved_namespace {
            return Err(NamespaceError::ReservedName {
                name: name.to_string(),
                factory: INSTANCE_FACTORY.to_string(),
            }
            .into());
        }
        Ok(Namespace::new(name, Arc::clone(&self.substrate))?)
    }

    /// The reserved instance namespace.
    ///
    /// With an instance id the namespace is `"<reserved>-<id>"`, so that
    /// several backend instances can keep separate state side by side. An
    /// empty id is treated as no id.
    ///
    /// The embedding application is responsible for clearing this namespace
    /// when it detects that the backend instance changed (new version,
    /// different plugins).
    pub fn jenkins_instance_namespace(&self, instance_id: Option<&str>) -> SdkResult<Namespace> {
        let base = &self.config.reserved_namespace;
        let name = match instance_id.filter(|id| !id.is_empty()) {
            Some(id) => {
                validate_subspace_name(id)?;
                format!("{base}-{id}")
            }
            None => base.clone(),
        };
        debug!(namespace = %name, "instance namespace opened");
        Ok(Namespace::new(name, Arc::clone(&self.substrate))?)
    }

    /// Remove every key from the substrate, namespaced or not.
    pub fn clear_all(&self) -> SdkResult<()> {
        self.substrate.clear()?;
        Ok(())
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("reserved_namespace", &self.config.reserved_namespace)
            .finish()
    }
}

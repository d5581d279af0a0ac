use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};

/// Default name of the namespace reserved for the Jenkins instance.
pub const DEFAULT_INSTANCE_NAMESPACE: &str = "jenkins-instance";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Base name reserved for the instance namespace factory.
    pub reserved_namespace: String,
    /// Storage file for file-backed substrates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_file: Option<PathBuf>,
    /// Byte quota applied to in-memory substrates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quota_bytes: Option<u64>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            reserved_namespace: DEFAULT_INSTANCE_NAMESPACE.to_string(),
            storage_file: None,
            quota_bytes: None,
        }
    }
}

impl StorageConfig {
    pub fn from_toml_str(text: &str) -> SdkResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| SdkError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> SdkResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> SdkResult<String> {
        toml::to_string(self).map_err(|e| SdkError::Config(e.to_string()))
    }

    fn validate(&self) -> SdkResult<()> {
        nestkv_namespace::validate_namespace_name(&self.reserved_namespace).map_err(|e| {
            SdkError::Config(format!("reserved_namespace: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = StorageConfig::default();
        assert_eq!(c.reserved_namespace, "jenkins-instance");
        assert!(c.storage_file.is_none());
        assert!(c.quota_bytes.is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = StorageConfig::from_toml_str("quota_bytes = 5242880\n").unwrap();
        assert_eq!(c.quota_bytes, Some(5 * 1024 * 1024));
        assert_eq!(c.reserved_namespace, DEFAULT_INSTANCE_NAMESPACE);
    }

    #[test]
    fn full_toml() {
        let text = r#"
reserved_namespace = "ci-instance"
storage_file = "/var/lib/nestkv/storage.json"
"#;
        let c = StorageConfig::from_toml_str(text).unwrap();
        assert_eq!(c.reserved_namespace, "ci-instance");
        assert_eq!(c.storage_file, Some(PathBuf::from("/var/lib/nestkv/storage.json")));
    }

    #[test]
    fn invalid_reserved_name_rejected() {
        let err = StorageConfig::from_toml_str("reserved_namespace = \"a:b\"\n").unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
    }

    #[test]
    fn malformed_toml_rejected() {
        assert!(StorageConfig::from_toml_str("quota_bytes = [").is_err());
    }

    #[test]
    fn toml_round_trip() {
        let c = StorageConfig {
            quota_bytes: Some(1024),
            ..StorageConfig::default()
        };
        let text = c.to_toml_string().unwrap();
        assert_eq!(StorageConfig::from_toml_str(&text).unwrap(), c);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nestkv.toml");
        std::fs::write(&path, "reserved_namespace = \"ci\"\n").unwrap();
        assert_eq!(StorageConfig::load(&path).unwrap().reserved_namespace, "ci");
        assert!(StorageConfig::load(&dir.path().join("missing.toml")).is_err());
    }
}

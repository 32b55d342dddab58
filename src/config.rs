//! Configuration Management
//!
//! Handles persistent configuration storage for atlas-k8s.

use crate::capability::{registry, DEFAULT_SCHEMA_BASE_URL};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Namespace used when neither flag nor config names one
pub const DEFAULT_NAMESPACE: &str = "default";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Namespace the generated objects are placed in
    #[serde(default)]
    pub namespace: Option<String>,
    /// Target operator version
    #[serde(default)]
    pub operator_version: Option<String>,
    /// Where CRD documents are downloaded from
    #[serde(default)]
    pub schema_base_url: Option<String>,
    /// Local CRD tree, used instead of downloading
    #[serde(default)]
    pub schema_dir: Option<PathBuf>,
}

impl Config {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("atlas-k8s").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load from an explicit file; missing or unreadable files give defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get effective namespace (CLI > config > default)
    pub fn effective_namespace(&self, flag: Option<&str>) -> String {
        flag.map(str::to_string)
            .or_else(|| self.namespace.clone())
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string())
    }

    /// Get effective operator version (CLI > config > latest registered)
    pub fn effective_operator_version(&self, flag: Option<&str>) -> String {
        flag.map(str::to_string)
            .or_else(|| self.operator_version.clone())
            .unwrap_or_else(|| registry().latest().version.to_string())
    }

    /// Get effective schema base URL (CLI > config > upstream repository)
    pub fn effective_schema_base_url(&self, flag: Option<&str>) -> String {
        flag.map(str::to_string)
            .or_else(|| self.schema_base_url.clone())
            .unwrap_or_else(|| DEFAULT_SCHEMA_BASE_URL.to_string())
    }

    /// Get effective schema directory (CLI > config), if any
    pub fn effective_schema_dir(&self, flag: Option<&Path>) -> Option<PathBuf> {
        flag.map(Path::to_path_buf).or_else(|| self.schema_dir.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_overrides_config() {
        let config = Config {
            namespace: Some("atlas".into()),
            operator_version: Some("2.3.0".into()),
            ..Default::default()
        };
        assert_eq!(config.effective_namespace(Some("prod")), "prod");
        assert_eq!(config.effective_namespace(None), "atlas");
        assert_eq!(config.effective_operator_version(None), "2.3.0");
        assert_eq!(Config::default().effective_namespace(None), DEFAULT_NAMESPACE);
        assert_eq!(
            Config::default().effective_schema_base_url(None),
            DEFAULT_SCHEMA_BASE_URL
        );
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = Config {
            schema_dir: Some(PathBuf::from("/opt/crds")),
            ..Default::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path), config);
    }

    #[test]
    fn test_malformed_config_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        assert_eq!(Config::load_from(&path), Config::default());
    }
}

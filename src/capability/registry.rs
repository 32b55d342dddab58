//! Version Registry - which resource kinds each operator version ships
//!
//! The table is embedded from `versions.json` and parsed on first access.
//! Converters never compare versions themselves; they ask the registry (and
//! the loaded schemas) what a version supports.

use crate::error::CapabilityError;
use crate::resources::ResourceKind;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

const REGISTRY_FILE: &str = include_str!("versions.json");

/// Post-processing an object kind needs against the live schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatchRule {
    #[default]
    None,
    /// Drop backup policy items whose frequency type the schema does not accept
    PruneFrequencyTypes,
}

/// `major.minor.patch` operator version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// Parse `2.5`, `2.5.1`, `v2.5.1` or `2.5.1-rc.1`
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().trim_start_matches('v');
        let core = s.split(&['-', '+'][..]).next()?;
        let mut parts = core.split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = parts.next()?.parse().ok()?;
        let patch = match parts.next() {
            Some(p) => p.parse().ok()?,
            None => 0,
        };
        if parts.next().is_some() {
            return None;
        }
        Some(Self {
            major,
            minor,
            patch,
        })
    }

    /// Same major and minor, patch zeroed
    pub fn major_minor(self) -> Self {
        Self { patch: 0, ..self }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[derive(Debug, Clone)]
pub struct VersionEntry {
    pub version: Version,
    pub kinds: Vec<ResourceKind>,
}

impl VersionEntry {
    pub fn supports(&self, kind: ResourceKind) -> bool {
        self.kinds.contains(&kind)
    }
}

/// Root structure of versions.json
#[derive(Debug, Deserialize)]
struct RegistryFile {
    versions: HashMap<String, Vec<String>>,
    #[serde(default)]
    patches: HashMap<String, PatchRule>,
}

#[derive(Debug)]
pub struct Registry {
    entries: Vec<VersionEntry>,
    patches: HashMap<ResourceKind, PatchRule>,
}

static REGISTRY: OnceLock<Registry> = OnceLock::new();

/// Get the version registry (loads from embedded JSON on first access)
pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(|| {
        Registry::parse(REGISTRY_FILE)
            .unwrap_or_else(|e| panic!("Failed to parse embedded version registry: {}", e))
    })
}

fn kind_from_name(name: &str) -> Result<ResourceKind, String> {
    ResourceKind::from_kind_name(name).ok_or_else(|| format!("unknown kind {:?}", name))
}

impl Registry {
    fn parse(content: &str) -> Result<Self, String> {
        let file: RegistryFile = serde_json::from_str(content).map_err(|e| e.to_string())?;

        let mut entries = Vec::with_capacity(file.versions.len());
        for (label, kinds) in file.versions {
            let version =
                Version::parse(&label).ok_or_else(|| format!("invalid version {:?}", label))?;
            let kinds = kinds
                .iter()
                .map(|k| kind_from_name(k))
                .collect::<Result<Vec<_>, _>>()?;
            entries.push(VersionEntry { version, kinds });
        }
        if entries.is_empty() {
            return Err("no versions registered".to_string());
        }
        entries.sort_by_key(|e| e.version);

        let patches = file
            .patches
            .iter()
            .map(|(k, rule)| Ok((kind_from_name(k)?, *rule)))
            .collect::<Result<HashMap<_, _>, String>>()?;

        Ok(Self { entries, patches })
    }

    /// Entry for a version, matched on major.minor
    pub fn lookup(&self, version: &str) -> Result<&VersionEntry, CapabilityError> {
        let wanted = Version::parse(version)
            .ok_or_else(|| CapabilityError::VersionUnsupported(version.to_string()))?
            .major_minor();
        self.entries
            .iter()
            .find(|e| e.version == wanted)
            .ok_or_else(|| CapabilityError::VersionUnsupported(version.to_string()))
    }

    pub fn versions(&self) -> impl Iterator<Item = &VersionEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> &VersionEntry {
        // parse() rejects an empty table
        &self.entries[self.entries.len() - 1]
    }

    /// Version to target for a requested one: newer than anything known
    /// clamps to the latest entry, otherwise major.minor.0
    pub fn compatible_version(&self, requested: &str) -> Result<Version, CapabilityError> {
        let wanted = Version::parse(requested)
            .ok_or_else(|| CapabilityError::VersionUnsupported(requested.to_string()))?
            .major_minor();
        let latest = self.latest().version;
        Ok(if wanted > latest { latest } else { wanted })
    }

    pub fn patch_rule(&self, kind: ResourceKind) -> PatchRule {
        self.patches.get(&kind).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_loads_successfully() {
        let reg = registry();
        assert!(reg.versions().count() >= 7);
        assert_eq!(reg.latest().version.to_string(), "2.8.0");
    }

    #[test]
    fn test_versions_sorted() {
        let versions: Vec<Version> = registry().versions().map(|e| e.version).collect();
        let mut sorted = versions.clone();
        sorted.sort();
        assert_eq!(versions, sorted);
    }

    #[test]
    fn test_lookup_matches_major_minor() {
        let entry = registry().lookup("2.5.3").unwrap();
        assert_eq!(entry.version.to_string(), "2.5.0");
        assert!(entry.supports(ResourceKind::StreamInstance));
        assert!(!entry.supports(ResourceKind::PrivateEndpoint));
    }

    #[test]
    fn test_kinds_grow_with_version() {
        let reg = registry();
        assert!(!reg.lookup("2.2.0").unwrap().supports(ResourceKind::StreamConnection));
        assert!(reg.lookup("2.3.0").unwrap().supports(ResourceKind::StreamConnection));
        assert!(reg.lookup("2.6.0").unwrap().supports(ResourceKind::IpAccessList));
    }

    #[test]
    fn test_unknown_version_rejected() {
        assert!(matches!(
            registry().lookup("1.9.0"),
            Err(CapabilityError::VersionUnsupported(_))
        ));
        assert!(registry().lookup("latest").is_err());
    }

    #[test]
    fn test_compatible_version() {
        let reg = registry();
        assert_eq!(reg.compatible_version("2.4.7").unwrap().to_string(), "2.4.0");
        assert_eq!(reg.compatible_version("v9.1.0").unwrap().to_string(), "2.8.0");
    }

    #[test]
    fn test_version_parse() {
        assert_eq!(Version::parse("2.5").unwrap().to_string(), "2.5.0");
        assert_eq!(Version::parse("2.5.1-rc.1").unwrap().patch, 1);
        assert!(Version::parse("2").is_none());
        assert!(Version::parse("2.5.1.4").is_none());
    }

    #[test]
    fn test_patch_rules() {
        let reg = registry();
        assert_eq!(
            reg.patch_rule(ResourceKind::BackupPolicy),
            PatchRule::PruneFrequencyTypes
        );
        assert_eq!(reg.patch_rule(ResourceKind::Project), PatchRule::None);
    }
}

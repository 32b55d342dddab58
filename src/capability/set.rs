//! Per-run view of what one operator version accepts

use super::provider::SchemaProvider;
use super::registry::{registry, PatchRule, Version};
use super::schema::SchemaNode;
use crate::error::CapabilityError;
use crate::resources::ResourceKind;
use std::collections::HashMap;

/// Supported kinds and their `spec` schemas at one operator version
#[derive(Debug, Clone)]
pub struct CapabilitySet {
    version: Version,
    schemas: HashMap<ResourceKind, SchemaNode>,
}

impl CapabilitySet {
    /// Fetch the schema of every kind the version ships.
    ///
    /// Secrets are core objects and need no schema.
    pub async fn load(
        provider: &dyn SchemaProvider,
        version: &str,
    ) -> Result<Self, CapabilityError> {
        let entry = registry().lookup(version)?;
        let version_label = entry.version.to_string();

        let mut schemas = HashMap::with_capacity(entry.kinds.len());
        for &kind in &entry.kinds {
            let unavailable = |reason: String| CapabilityError::SchemaUnavailable {
                kind: kind.kind_name().to_string(),
                version: version_label.clone(),
                reason,
            };

            let document = provider
                .fetch(kind, &version_label)
                .await
                .map_err(|e| unavailable(format!("{:#}", e)))?;
            let spec = document
                .into_spec_schema()
                .map_err(|e| unavailable(e.to_string()))?;

            tracing::debug!("Loaded {} schema for {}", kind, version_label);
            schemas.insert(kind, spec);
        }

        tracing::info!(
            "Capabilities loaded for {} ({} kinds)",
            version_label,
            schemas.len()
        );
        Ok(Self {
            version: entry.version,
            schemas,
        })
    }

    /// Build directly from already parsed `spec` schemas
    pub fn from_schemas(
        version: &str,
        schemas: impl IntoIterator<Item = (ResourceKind, SchemaNode)>,
    ) -> Result<Self, CapabilityError> {
        let version = Version::parse(version)
            .ok_or_else(|| CapabilityError::VersionUnsupported(version.to_string()))?;
        Ok(Self {
            version,
            schemas: schemas.into_iter().collect(),
        })
    }

    pub fn version(&self) -> Version {
        self.version
    }

    /// Value of the version label on generated objects
    pub fn version_label(&self) -> String {
        self.version.to_string()
    }

    pub fn is_kind_supported(&self, kind: ResourceKind) -> bool {
        kind == ResourceKind::Secret || self.schemas.contains_key(&kind)
    }

    pub fn is_field_path_supported(&self, kind: ResourceKind, path: &str) -> bool {
        self.schemas
            .get(&kind)
            .is_some_and(|schema| schema.has_path(path))
    }

    /// Allowed values at a path; empty when the path is unknown or unconstrained
    pub fn enum_values(&self, kind: ResourceKind, path: &str) -> Vec<String> {
        self.schemas
            .get(&kind)
            .and_then(|schema| schema.resolve(path))
            .map(SchemaNode::enum_strings)
            .unwrap_or_default()
    }

    pub fn patch_rule(&self, kind: ResourceKind) -> PatchRule {
        registry().patch_rule(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::provider::StaticSchemaProvider;

    fn crd(spec_properties: &str) -> String {
        format!(
            "spec:\n  versions:\n  - schema:\n      openAPIV3Schema:\n        properties:\n          spec:\n            properties:\n{}",
            spec_properties
        )
    }

    fn all_kinds_provider() -> StaticSchemaProvider {
        ResourceKind::ALL
            .into_iter()
            .filter(|k| *k != ResourceKind::Secret)
            .fold(StaticSchemaProvider::new(), |p, kind| {
                p.with_document(kind, crd("              name: {type: string}\n"))
            })
    }

    #[tokio::test]
    async fn test_load_supported_version() {
        let caps = CapabilitySet::load(&all_kinds_provider(), "2.5.1").await.unwrap();
        assert_eq!(caps.version_label(), "2.5.0");
        assert!(caps.is_kind_supported(ResourceKind::StreamInstance));
        assert!(!caps.is_kind_supported(ResourceKind::CustomRole));
        assert!(caps.is_kind_supported(ResourceKind::Secret));
        assert!(caps.is_field_path_supported(ResourceKind::Project, "name"));
        assert!(!caps.is_field_path_supported(ResourceKind::CustomRole, "name"));
    }

    #[tokio::test]
    async fn test_load_unknown_version() {
        let err = CapabilitySet::load(&all_kinds_provider(), "1.0.0")
            .await
            .unwrap_err();
        assert!(matches!(err, CapabilityError::VersionUnsupported(_)));
    }

    #[tokio::test]
    async fn test_missing_document_is_unavailable() {
        let provider = StaticSchemaProvider::new()
            .with_document(ResourceKind::Project, crd("              name: {}\n"));
        let err = CapabilitySet::load(&provider, "2.2.0").await.unwrap_err();
        assert!(matches!(err, CapabilityError::SchemaUnavailable { .. }));
    }

    #[tokio::test]
    async fn test_document_without_spec_is_unavailable() {
        let provider = all_kinds_provider().with_document(
            ResourceKind::Team,
            "spec:\n  versions:\n  - schema:\n      openAPIV3Schema:\n        properties: {}\n",
        );
        match CapabilitySet::load(&provider, "2.2.0").await.unwrap_err() {
            CapabilityError::SchemaUnavailable { kind, reason, .. } => {
                assert_eq!(kind, "AtlasTeam");
                assert!(reason.contains("spec"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_field_path_differs_between_versions() {
        let with_field: SchemaNode =
            serde_yaml::from_str("properties:\n  backupRef: {type: object}\n").unwrap();
        let without_field = SchemaNode::default();

        let a = CapabilitySet::from_schemas("2.2.0", [(ResourceKind::Deployment, with_field)])
            .unwrap();
        let b = CapabilitySet::from_schemas("2.3.0", [(ResourceKind::Deployment, without_field)])
            .unwrap();
        assert!(a.is_field_path_supported(ResourceKind::Deployment, "backupRef"));
        assert!(!b.is_field_path_supported(ResourceKind::Deployment, "backupRef"));
    }
}

//! AtlasStreamInstance and AtlasStreamConnection specs

use super::{ObjectKey, ProjectReference, References, ResourceKind, ResourceRef};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamInstanceSpec {
    #[serde(flatten)]
    pub project: ProjectReference,
    pub name: String,
    pub config: StreamInstanceConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub connection_registry: Vec<ResourceRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StreamInstanceConfig {
    pub provider: String,
    pub region: String,
    pub tier: String,
}

impl References for StreamInstanceSpec {
    fn references(&self, namespace: &str) -> Vec<ObjectKey> {
        let mut refs = self.project.references(namespace);
        refs.extend(
            self.connection_registry
                .iter()
                .filter_map(|r| r.key(ResourceKind::StreamConnection, namespace)),
        );
        refs
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamConnectionSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub connection_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_config: Option<ClusterConnectionConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kafka_config: Option<KafkaConnectionConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClusterConnectionConfig {
    pub name: String,
    pub role: StreamClusterRole,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StreamClusterRole {
    pub name: String,
    #[serde(rename = "type")]
    pub role_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KafkaConnectionConfig {
    pub authentication: KafkaAuthenticationSpec,
    pub bootstrap_servers: String,
    pub security: KafkaSecuritySpec,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub config: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KafkaAuthenticationSpec {
    pub mechanism: String,
    pub credentials: ResourceRef,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KafkaSecuritySpec {
    pub protocol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate: Option<ResourceRef>,
}

impl References for StreamConnectionSpec {
    fn references(&self, namespace: &str) -> Vec<ObjectKey> {
        let Some(kafka) = &self.kafka_config else {
            return Vec::new();
        };
        kafka
            .authentication
            .credentials
            .key(ResourceKind::Secret, namespace)
            .into_iter()
            .chain(
                kafka
                    .security
                    .certificate
                    .as_ref()
                    .and_then(|c| c.key(ResourceKind::Secret, namespace)),
            )
            .collect()
    }
}

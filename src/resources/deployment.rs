//! AtlasDeployment, AtlasBackupSchedule and AtlasBackupPolicy specs

use super::{ObjectKey, ProjectReference, References, ResourceKind, ResourceRef};
use crate::cloud::model::{
    AutoScaling, BackupPolicyItem, CopySetting, HardwareSpec, Label, ManagedNamespace, ProcessArgs,
};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentSpec {
    #[serde(flatten)]
    pub project: ProjectReference,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment_spec: Option<AdvancedDeploymentSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serverless_spec: Option<ServerlessSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_args: Option<ProcessArgs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_ref: Option<ResourceRef>,
}

impl References for DeploymentSpec {
    fn references(&self, namespace: &str) -> Vec<ObjectKey> {
        let mut refs = self.project.references(namespace);
        refs.extend(
            self.backup_ref
                .as_ref()
                .and_then(|r| r.key(ResourceKind::BackupSchedule, namespace)),
        );
        refs
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvancedDeploymentSpec {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bi_connector: Option<BiConnectorSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encryption_at_rest_provider: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Label>,
    #[serde(rename = "mongoDBMajorVersion", skip_serializing_if = "Option::is_none")]
    pub mongo_db_major_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paused: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pit_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub replication_specs: Vec<ReplicationSpecSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_cert_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination_protection_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_release_system: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_zone_mapping: Vec<CustomZoneMapping>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub managed_namespaces: Vec<ManagedNamespace>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BiConnectorSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_preference: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicationSpecSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_shards: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub region_configs: Vec<RegionConfigSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionConfigSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analytics_specs: Option<HardwareSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub electable_specs: Option<HardwareSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_only_specs: Option<HardwareSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_scaling: Option<AutoScaling>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backing_provider_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CustomZoneMapping {
    pub location: String,
    pub zone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerlessSpec {
    pub name: String,
    pub provider_settings: ServerlessProviderSpec,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub private_endpoints: Vec<ServerlessPrivateEndpointSpec>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Label>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination_protection_enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerlessProviderSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backing_provider_name: Option<String>,
    pub provider_name: String,
    pub region_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerlessPrivateEndpointSpec {
    pub name: String,
    #[serde(rename = "cloudProviderEndpointID", skip_serializing_if = "Option::is_none")]
    pub cloud_provider_endpoint_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_endpoint_ip_address: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupScheduleSpec {
    pub auto_export_enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export: Option<BackupExportSpec>,
    pub policy: ResourceRef,
    pub reference_hour_of_day: i64,
    pub reference_minute_of_hour: i64,
    pub restore_window_days: i64,
    pub update_snapshots: bool,
    pub use_org_and_group_names_in_export_prefix: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub copy_settings: Vec<CopySetting>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupExportSpec {
    #[serde(rename = "exportBucketId")]
    pub export_bucket_id: String,
    pub frequency_type: String,
}

impl References for BackupScheduleSpec {
    fn references(&self, namespace: &str) -> Vec<ObjectKey> {
        self.policy
            .key(ResourceKind::BackupPolicy, namespace)
            .into_iter()
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BackupPolicySpec {
    pub items: Vec<BackupPolicyItem>,
}

impl References for BackupPolicySpec {
    fn references(&self, _namespace: &str) -> Vec<ObjectKey> {
        Vec::new()
    }
}

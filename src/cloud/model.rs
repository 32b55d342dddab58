//! Atlas Admin API views consumed by the converters
//!
//! Field names follow the Atlas Admin API v2 JSON payloads. Every type is
//! read-only input; converters never mutate a snapshot.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lifecycle states after which an entity is excluded from export
pub const TERMINAL_STATES: &[&str] = &["DELETING", "DELETED"];

pub fn is_terminal_state(state: Option<&str>) -> bool {
    state.is_some_and(|s| TERMINAL_STATES.contains(&s))
}

// ============================================================================
// Project
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub org_id: String,
    pub region_usage_restrictions: Option<String>,
    pub with_default_alerts_settings: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IpAccessEntry {
    pub cidr_block: Option<String>,
    pub ip_address: Option<String>,
    pub aws_security_group: Option<String>,
    pub comment: Option<String>,
    pub delete_after_date: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MaintenanceWindow {
    pub day_of_week: i32,
    pub hour_of_day: Option<i32>,
    #[serde(rename = "startASAP")]
    pub start_asap: Option<bool>,
    pub auto_defer_once_enabled: Option<bool>,
}

/// Third-party integration. Which fields are set depends on `type`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Integration {
    #[serde(rename = "type")]
    pub integration_type: String,
    pub account_id: Option<String>,
    pub api_key: Option<String>,
    pub api_token: Option<String>,
    pub channel_name: Option<String>,
    pub enabled: Option<bool>,
    pub license_key: Option<String>,
    pub microsoft_teams_webhook_url: Option<String>,
    pub password: Option<String>,
    pub read_token: Option<String>,
    pub region: Option<String>,
    pub routing_key: Option<String>,
    pub secret: Option<String>,
    pub service_discovery: Option<String>,
    pub service_key: Option<String>,
    pub team_name: Option<String>,
    pub url: Option<String>,
    pub username: Option<String>,
    pub write_token: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkPeer {
    pub provider_name: Option<String>,
    pub container_id: Option<String>,
    pub accepter_region_name: Option<String>,
    pub aws_account_id: Option<String>,
    pub route_table_cidr_block: Option<String>,
    pub vpc_id: Option<String>,
    pub azure_directory_id: Option<String>,
    pub azure_subscription_id: Option<String>,
    pub resource_group_name: Option<String>,
    pub vnet_name: Option<String>,
    pub gcp_project_id: Option<String>,
    pub network_name: Option<String>,
}

/// Private endpoint service as listed per provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrivateEndpointService {
    pub id: String,
    pub cloud_provider: String,
    pub region_name: String,
    pub status: Option<String>,
    /// Interface endpoint ids (AWS), private endpoint ids (Azure) or
    /// endpoint group names (GCP)
    pub interface_endpoints: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InterfaceEndpoint {
    pub interface_endpoint_id: Option<String>,
    pub private_endpoint_resource_id: Option<String>,
    #[serde(rename = "privateEndpointIPAddress")]
    pub private_endpoint_ip_address: Option<String>,
    pub endpoint_group_name: Option<String>,
    pub endpoints: Vec<GcpEndpoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GcpEndpoint {
    pub endpoint_name: String,
    pub ip_address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EncryptionAtRest {
    pub aws_kms: AwsKms,
    pub azure_key_vault: AzureKeyVault,
    pub google_cloud_kms: GoogleCloudKms,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AwsKms {
    pub enabled: Option<bool>,
    pub region: Option<String>,
    pub valid: Option<bool>,
    pub role_id: Option<String>,
    #[serde(rename = "customerMasterKeyID")]
    pub customer_master_key_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AzureKeyVault {
    pub enabled: Option<bool>,
    #[serde(rename = "clientID")]
    pub client_id: Option<String>,
    pub azure_environment: Option<String>,
    pub resource_group_name: Option<String>,
    #[serde(rename = "tenantID")]
    pub tenant_id: Option<String>,
    #[serde(rename = "subscriptionID")]
    pub subscription_id: Option<String>,
    pub key_vault_name: Option<String>,
    pub key_identifier: Option<String>,
    pub secret: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GoogleCloudKms {
    pub enabled: Option<bool>,
    pub service_account_key: Option<String>,
    #[serde(rename = "keyVersionResourceID")]
    pub key_version_resource_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CloudProviderAccessRole {
    pub provider_name: String,
    pub iam_assumed_role_arn: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectSettings {
    pub is_collect_database_specifics_statistics_enabled: Option<bool>,
    pub is_data_explorer_enabled: Option<bool>,
    pub is_extended_storage_sizes_enabled: Option<bool>,
    pub is_performance_advisor_enabled: Option<bool>,
    pub is_realtime_performance_panel_enabled: Option<bool>,
    pub is_schema_advisor_enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Auditing {
    pub audit_authorization_success: Option<bool>,
    pub audit_filter: Option<String>,
    pub enabled: Option<bool>,
}

// ============================================================================
// Alert configurations
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlertConfiguration {
    pub id: Option<String>,
    pub event_type_name: Option<String>,
    pub enabled: Option<bool>,
    pub matchers: Vec<AlertMatcher>,
    pub metric_threshold: Option<MetricThreshold>,
    pub threshold: Option<AlertThreshold>,
    pub notifications: Vec<AlertNotification>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlertMatcher {
    pub field_name: Option<String>,
    pub operator: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetricThreshold {
    pub metric_name: String,
    pub operator: Option<String>,
    pub threshold: Option<f64>,
    pub units: Option<String>,
    pub mode: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlertThreshold {
    pub operator: Option<String>,
    pub units: Option<String>,
    pub threshold: Option<i64>,
}

/// One notification target. Credential fields depend on `typeName`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlertNotification {
    pub type_name: Option<String>,
    pub notifier_id: Option<String>,
    pub channel_name: Option<String>,
    pub datadog_region: Option<String>,
    pub delay_min: Option<i32>,
    pub email_address: Option<String>,
    pub email_enabled: Option<bool>,
    pub interval_min: Option<i32>,
    pub mobile_number: Option<String>,
    pub ops_genie_region: Option<String>,
    pub sms_enabled: Option<bool>,
    pub team_id: Option<String>,
    pub team_name: Option<String>,
    pub username: Option<String>,
    pub roles: Vec<String>,
    pub service_key: Option<String>,
    pub api_token: Option<String>,
    pub datadog_api_key: Option<String>,
    pub ops_genie_api_key: Option<String>,
    pub victor_ops_api_key: Option<String>,
    pub victor_ops_routing_key: Option<String>,
}

// ============================================================================
// Custom roles
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatabaseRole {
    pub role_name: String,
    pub inherited_roles: Vec<InheritedRole>,
    pub actions: Vec<RoleAction>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InheritedRole {
    pub role: String,
    pub db: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleAction {
    pub action: String,
    pub resources: Vec<ActionResource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionResource {
    pub cluster: Option<bool>,
    pub db: Option<String>,
    pub collection: Option<String>,
}

// ============================================================================
// Teams
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeamAssignment {
    pub team_id: String,
    pub role_names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Team {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamUser {
    pub username: String,
}

// ============================================================================
// Database users
// ============================================================================

/// Value used by Atlas for "this authentication method is not in use"
pub const AUTH_NONE: &str = "NONE";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatabaseUser {
    pub username: String,
    pub database_name: String,
    pub delete_after_date: Option<chrono::DateTime<chrono::Utc>>,
    pub labels: Vec<Label>,
    pub roles: Vec<UserRole>,
    pub scopes: Vec<UserScope>,
    pub x509_type: Option<String>,
    #[serde(rename = "awsIAMType")]
    pub aws_iam_type: Option<String>,
    pub ldap_auth_type: Option<String>,
    pub oidc_auth_type: Option<String>,
    /// Only present in snapshots taken with credentials; never returned by the API
    pub password: Option<String>,
}

impl DatabaseUser {
    /// True when no external authentication method manages this user
    pub fn uses_password(&self) -> bool {
        [
            &self.x509_type,
            &self.aws_iam_type,
            &self.ldap_auth_type,
            &self.oidc_auth_type,
        ]
        .iter()
        .all(|t| t.as_deref().map_or(true, |v| v.is_empty() || v == AUTH_NONE))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Label {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserRole {
    pub role_name: String,
    pub database_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserScope {
    pub name: String,
    #[serde(rename = "type")]
    pub scope_type: String,
}

// ============================================================================
// Deployments
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdvancedCluster {
    pub name: String,
    pub cluster_type: Option<String>,
    pub backup_enabled: Option<bool>,
    pub bi_connector: Option<BiConnector>,
    pub encryption_at_rest_provider: Option<String>,
    pub labels: Vec<Label>,
    pub tags: Vec<Label>,
    #[serde(rename = "mongoDBMajorVersion")]
    pub mongo_db_major_version: Option<String>,
    pub paused: Option<bool>,
    pub pit_enabled: Option<bool>,
    pub replication_specs: Vec<ReplicationSpec>,
    pub root_cert_type: Option<String>,
    pub state_name: Option<String>,
    pub termination_protection_enabled: Option<bool>,
    pub version_release_system: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BiConnector {
    pub enabled: Option<bool>,
    pub read_preference: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReplicationSpec {
    pub id: Option<String>,
    pub num_shards: Option<i32>,
    pub zone_name: Option<String>,
    pub region_configs: Vec<RegionConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegionConfig {
    pub analytics_specs: Option<HardwareSpec>,
    pub electable_specs: Option<HardwareSpec>,
    pub read_only_specs: Option<HardwareSpec>,
    pub auto_scaling: Option<AutoScaling>,
    pub backing_provider_name: Option<String>,
    pub priority: Option<i32>,
    pub provider_name: Option<String>,
    pub region_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HardwareSpec {
    #[serde(rename = "diskIOPS", skip_serializing_if = "Option::is_none")]
    pub disk_iops: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ebs_volume_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node_count: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AutoScaling {
    #[serde(rename = "diskGB", skip_serializing_if = "Option::is_none")]
    pub disk_gb: Option<DiskGbAutoScaling>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compute: Option<ComputeAutoScaling>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiskGbAutoScaling {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComputeAutoScaling {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_down_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_instance_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_instance_size: Option<String>,
}

/// Cluster configuration options ("process args")
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProcessArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_read_concern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_write_concern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_enabled_tls_protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fail_index_key_too_long: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub javascript_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_table_scan: Option<bool>,
    #[serde(rename = "oplogSizeMB", skip_serializing_if = "Option::is_none")]
    pub oplog_size_mb: Option<i64>,
    #[serde(rename = "sampleSizeBIConnector", skip_serializing_if = "Option::is_none")]
    pub sample_size_bi_connector: Option<i64>,
    #[serde(
        rename = "sampleRefreshIntervalBIConnector",
        skip_serializing_if = "Option::is_none"
    )]
    pub sample_refresh_interval_bi_connector: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackupSchedule {
    pub auto_export_enabled: Option<bool>,
    pub export: Option<BackupExport>,
    pub policies: Vec<BackupPolicy>,
    pub reference_hour_of_day: Option<i64>,
    pub reference_minute_of_hour: Option<i64>,
    pub restore_window_days: Option<i64>,
    pub update_snapshots: Option<bool>,
    pub use_org_and_group_names_in_export_prefix: Option<bool>,
    pub copy_settings: Vec<CopySetting>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackupExport {
    pub export_bucket_id: String,
    pub frequency_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackupPolicy {
    pub id: Option<String>,
    pub policy_items: Vec<BackupPolicyItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BackupPolicyItem {
    pub frequency_type: String,
    pub frequency_interval: i32,
    pub retention_unit: String,
    pub retention_value: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CopySetting {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replication_spec_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_copy_oplogs: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub frequencies: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GlobalCluster {
    /// Location code mapped to replication spec (zone) id
    pub custom_zone_mapping: BTreeMap<String, String>,
    pub managed_namespaces: Vec<ManagedNamespace>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ManagedNamespace {
    pub db: String,
    pub collection: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_shard_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_custom_shard_key_hashed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_shard_key_unique: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerlessInstance {
    pub name: String,
    pub provider_settings: ServerlessProviderSettings,
    pub state_name: Option<String>,
    pub tags: Vec<Label>,
    pub termination_protection_enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerlessProviderSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backing_provider_name: Option<String>,
    pub provider_name: String,
    pub region_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerlessPrivateEndpoint {
    pub comment: Option<String>,
    pub cloud_provider_endpoint_id: Option<String>,
    pub private_endpoint_ip_address: Option<String>,
}

// ============================================================================
// Data federation
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataFederation {
    pub name: String,
    pub state: Option<String>,
    pub cloud_provider_config: Option<DataFederationCloudProviderConfig>,
    pub data_process_region: Option<DataProcessRegion>,
    pub storage: Option<DataFederationStorage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataFederationCloudProviderConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aws: Option<DataFederationAws>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataFederationAws {
    pub role_id: String,
    #[serde(rename = "testS3Bucket")]
    pub test_s3_bucket: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataProcessRegion {
    pub cloud_provider: String,
    pub region: String,
}

/// Storage configuration is passed through to the target spec unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataFederationStorage {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub databases: Vec<FederatedDatabase>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub stores: Vec<FederatedStore>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FederatedDatabase {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub collections: Vec<FederatedCollection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_wildcard_collections: Option<i32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub views: Vec<FederatedView>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FederatedCollection {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub data_sources: Vec<FederatedDataSource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FederatedDataSource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_insecure: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_regex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_regex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provenance_field_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FederatedView {
    pub name: String,
    pub pipeline: String,
    pub source: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FederatedStore {
    pub name: String,
    pub provider: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub additional_storage_classes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_tags: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

// ============================================================================
// Federated authentication
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FederationSettings {
    pub id: String,
    pub identity_provider_id: Option<String>,
    pub identity_provider_status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectedOrgConfig {
    pub domain_allow_list: Vec<String>,
    pub domain_restriction_enabled: bool,
    pub post_auth_role_grants: Vec<String>,
    pub role_mappings: Vec<RoleMapping>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoleMapping {
    pub external_group_name: String,
    pub role_assignments: Vec<RoleAssignment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RoleAssignment {
    pub group_id: Option<String>,
    pub org_id: Option<String>,
    pub role: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IdentityProvider {
    pub id: String,
    pub sso_debug_enabled: Option<bool>,
}

// ============================================================================
// Stream processing
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StreamInstance {
    pub name: String,
    pub data_process_region: DataProcessRegion,
    pub stream_config: StreamConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    pub tier: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StreamConnection {
    pub name: String,
    #[serde(rename = "type")]
    pub connection_type: String,
    pub cluster_name: Option<String>,
    pub db_role_to_execute: Option<StreamDbRole>,
    pub authentication: Option<KafkaAuthentication>,
    pub bootstrap_servers: Option<String>,
    pub security: Option<KafkaSecurity>,
    pub config: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamDbRole {
    pub role: String,
    #[serde(rename = "type")]
    pub role_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KafkaAuthentication {
    pub mechanism: String,
    pub username: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KafkaSecurity {
    pub protocol: String,
    pub broker_public_certificate: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_database_user_auth_detection() {
        let mut user = DatabaseUser {
            username: "svc".into(),
            x509_type: Some("NONE".into()),
            ..Default::default()
        };
        assert!(user.uses_password());

        user.oidc_auth_type = Some("IDP_GROUP".into());
        assert!(!user.uses_password());
    }

    #[test]
    fn test_terminal_state() {
        assert!(is_terminal_state(Some("DELETING")));
        assert!(is_terminal_state(Some("DELETED")));
        assert!(!is_terminal_state(Some("IDLE")));
        assert!(!is_terminal_state(None));
    }

    #[test]
    fn test_cluster_parses_api_payload() {
        let cluster: AdvancedCluster = serde_json::from_value(json!({
            "name": "c0",
            "clusterType": "REPLICASET",
            "backupEnabled": true,
            "mongoDBMajorVersion": "7.0",
            "stateName": "IDLE",
            "replicationSpecs": [{
                "id": "rs1",
                "numShards": 1,
                "zoneName": "Zone 1",
                "regionConfigs": [{
                    "providerName": "AWS",
                    "regionName": "US_EAST_1",
                    "priority": 7,
                    "electableSpecs": {"instanceSize": "M10", "nodeCount": 3, "diskIOPS": 3000}
                }]
            }]
        }))
        .unwrap();

        assert_eq!(cluster.mongo_db_major_version.as_deref(), Some("7.0"));
        let rc = &cluster.replication_specs[0].region_configs[0];
        assert_eq!(rc.electable_specs.as_ref().unwrap().disk_iops, Some(3000));
    }
}

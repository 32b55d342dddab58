//! AtlasProject spec
//!
//! Sections other than `name` are optional and only emitted when the target
//! schema has the corresponding field.

use super::custom_role::CustomRoleDefinition;
use super::network::IpAccessEntrySpec;
use super::{LocalRef, ObjectKey, References, ResourceKind, ResourceRef};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSpec {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_secret_ref: Option<LocalRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_usage_restrictions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_default_alerts_settings: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub project_ip_access_list: Vec<IpAccessEntrySpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maintenance_window: Option<MaintenanceWindowSpec>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub integrations: Vec<IntegrationSpec>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub network_peers: Vec<NetworkPeerSpec>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub private_endpoints: Vec<ProjectPrivateEndpoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encryption_at_rest: Option<EncryptionAtRestSpec>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cloud_provider_access_roles: Vec<CloudProviderAccessRoleSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<ProjectSettingsSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auditing: Option<AuditingSpec>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alert_configurations: Vec<AlertConfigurationSpec>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub custom_roles: Vec<CustomRoleDefinition>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub teams: Vec<TeamRefSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceWindowSpec {
    pub day_of_week: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hour_of_day: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_defer: Option<bool>,
    #[serde(rename = "startASAP", skip_serializing_if = "Option::is_none")]
    pub start_asap: Option<bool>,
}

/// Third-party integration; credentials live in referenced secrets
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationSpec {
    #[serde(rename = "type")]
    pub integration_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "microsoftTeamsWebhookUrl", skip_serializing_if = "Option::is_none")]
    pub microsoft_teams_webhook_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_discovery: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_ref: Option<ResourceRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token_ref: Option<ResourceRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_key_ref: Option<ResourceRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_key_ref: Option<ResourceRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_token_ref: Option<ResourceRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_token_ref: Option<ResourceRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing_key_ref: Option<ResourceRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_ref: Option<ResourceRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_ref: Option<ResourceRef>,
}

impl IntegrationSpec {
    fn secret_refs(&self) -> impl Iterator<Item = &ResourceRef> {
        [
            &self.api_key_ref,
            &self.api_token_ref,
            &self.service_key_ref,
            &self.license_key_ref,
            &self.write_token_ref,
            &self.read_token_ref,
            &self.routing_key_ref,
            &self.secret_ref,
            &self.password_ref,
        ]
        .into_iter()
        .flatten()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPeerSpec {
    pub provider_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepter_region_name: Option<String>,
    #[serde(rename = "awsAccountId", skip_serializing_if = "Option::is_none")]
    pub aws_account_id: Option<String>,
    #[serde(rename = "routeTableCIDRBlock", skip_serializing_if = "Option::is_none")]
    pub route_table_cidr_block: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vpc_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub azure_directory_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub azure_subscription_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_group_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vnet_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gcp_project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_name: Option<String>,
}

/// Private endpoint embedded in the project spec (schemas without the
/// standalone AtlasPrivateEndpoint kind)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPrivateEndpoint {
    pub provider: String,
    pub region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionAtRestSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aws_kms: Option<AwsKmsSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub azure_key_vault: Option<AzureKeyVaultSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_cloud_kms: Option<GoogleCloudKmsSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsKmsSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_ref: Option<ResourceRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureKeyVaultSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(rename = "clientID", skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub azure_environment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_group_name: Option<String>,
    #[serde(rename = "tenantID", skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_ref: Option<ResourceRef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleCloudKmsSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret_ref: Option<ResourceRef>,
}

impl EncryptionAtRestSpec {
    fn secret_refs(&self) -> impl Iterator<Item = &ResourceRef> {
        let aws = self.aws_kms.as_ref().and_then(|k| k.secret_ref.as_ref());
        let azure = self.azure_key_vault.as_ref().and_then(|k| k.secret_ref.as_ref());
        let gcp = self.google_cloud_kms.as_ref().and_then(|k| k.secret_ref.as_ref());
        aws.into_iter().chain(azure).chain(gcp)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudProviderAccessRoleSpec {
    pub provider_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iam_assumed_role_arn: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettingsSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_collect_database_specifics_statistics_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_data_explorer_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_extended_storage_sizes_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_performance_advisor_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_realtime_performance_panel_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_schema_advisor_enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditingSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit_authorization_success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit_filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertConfigurationSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub matchers: Vec<MatcherSpec>,
    /// Always present; empty when Atlas has no metric threshold
    pub metric_threshold: MetricThresholdSpec,
    pub threshold: ThresholdSpec,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notifications: Vec<NotificationSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatcherSpec {
    pub field_name: String,
    pub operator: String,
    pub value: String,
}

/// Thresholds are strings in the operator schema
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricThresholdSpec {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub metric_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datadog_region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_min: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_min: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ops_genie_region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sms_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_key_ref: Option<ResourceRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token_ref: Option<ResourceRef>,
    #[serde(rename = "datadogAPIKeyRef", skip_serializing_if = "Option::is_none")]
    pub datadog_api_key_ref: Option<ResourceRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ops_genie_api_key_ref: Option<ResourceRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub victor_ops_secret_ref: Option<ResourceRef>,
}

impl NotificationSpec {
    fn secret_refs(&self) -> impl Iterator<Item = &ResourceRef> {
        [
            &self.service_key_ref,
            &self.api_token_ref,
            &self.datadog_api_key_ref,
            &self.ops_genie_api_key_ref,
            &self.victor_ops_secret_ref,
        ]
        .into_iter()
        .flatten()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamRefSpec {
    pub team_ref: ResourceRef,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
}

impl References for ProjectSpec {
    fn references(&self, namespace: &str) -> Vec<ObjectKey> {
        let connection = self
            .connection_secret_ref
            .as_ref()
            .and_then(|r| r.key(ResourceKind::Secret, namespace));
        let integrations = self.integrations.iter().flat_map(|i| i.secret_refs());
        let encryption = self.encryption_at_rest.iter().flat_map(|e| e.secret_refs());
        let notifications = self
            .alert_configurations
            .iter()
            .flat_map(|a| a.notifications.iter())
            .flat_map(|n| n.secret_refs());
        let secrets = integrations
            .chain(encryption)
            .chain(notifications)
            .filter_map(|r| r.key(ResourceKind::Secret, namespace));
        let teams = self
            .teams
            .iter()
            .filter_map(|t| t.team_ref.key(ResourceKind::Team, namespace));

        connection.into_iter().chain(secrets).chain(teams).collect()
    }
}

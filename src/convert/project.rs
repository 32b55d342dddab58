//! AtlasProject, its integration, alert and encryption secrets, and the
//! project credentials Secret

use super::{custom_roles, network, ConvertContext, PROVIDER_AWS, PROVIDER_AZURE, PROVIDER_GCP};
use crate::cloud::model::{
    is_terminal_state, AlertConfiguration, AlertMatcher, AlertNotification, Auditing,
    CloudProviderAccessRole, DatabaseRole, EncryptionAtRest, Integration, IpAccessEntry,
    MaintenanceWindow, NetworkPeer, PrivateEndpointService, ProjectSettings,
};
use crate::cloud::CloudDataProvider;
use crate::error::{CloudContext, Result};
use crate::resources::project::*;
use crate::resources::{LocalRef, ResourceKind, ResourceRef, TargetObject};
use crate::secrets::{
    ORG_ID_FIELD, PASSWORD_FIELD, PRIVATE_API_KEY_FIELD, PUBLIC_API_KEY_FIELD,
};

const PAGER_DUTY: &str = "PAGER_DUTY";
const SLACK: &str = "SLACK";
const DATADOG: &str = "DATADOG";
const OPS_GENIE: &str = "OPS_GENIE";
const WEBHOOK: &str = "WEBHOOK";
const MICROSOFT_TEAMS: &str = "MICROSOFT_TEAMS";
const PROMETHEUS: &str = "PROMETHEUS";
const VICTOR_OPS: &str = "VICTOR_OPS";
const NEW_RELIC: &str = "NEW_RELIC";

/// Optional project sections, fetched only when the schema has the field
#[derive(Debug, Default)]
pub struct ProjectData {
    pub ip_access_list: Option<Vec<IpAccessEntry>>,
    pub maintenance_window: Option<MaintenanceWindow>,
    pub integrations: Option<Vec<Integration>>,
    pub network_peers: Option<Vec<(&'static str, NetworkPeer)>>,
    pub private_endpoints: Option<Vec<(&'static str, PrivateEndpointService)>>,
    pub encryption_at_rest: Option<EncryptionAtRest>,
    pub cloud_provider_access_roles: Option<Vec<CloudProviderAccessRole>>,
    pub settings: Option<ProjectSettings>,
    pub auditing: Option<Auditing>,
    pub alert_configurations: Option<Vec<AlertConfiguration>>,
    pub custom_roles: Option<Vec<DatabaseRole>>,
}

fn wants(ctx: &ConvertContext<'_>, field: &str) -> bool {
    ctx.supports(ResourceKind::Project, field)
}

pub async fn fetch(cloud: &dyn CloudDataProvider, ctx: &ConvertContext<'_>) -> Result<ProjectData> {
    let id = ctx.project_id();
    let mut data = ProjectData::default();

    if wants(ctx, "projectIpAccessList") && !ctx.supports_kind(ResourceKind::IpAccessList) {
        data.ip_access_list = Some(
            cloud
                .ip_access_list(id)
                .await
                .cloud_context(|| format!("list ip access list of project {}", id))?,
        );
    }

    if wants(ctx, "maintenanceWindow") {
        data.maintenance_window = Some(
            cloud
                .maintenance_window(id)
                .await
                .cloud_context(|| format!("describe maintenance window of project {}", id))?,
        );
    }

    if wants(ctx, "integrations") {
        data.integrations = Some(
            cloud
                .integrations(id)
                .await
                .cloud_context(|| format!("list integrations of project {}", id))?,
        );
    }

    if wants(ctx, "networkPeers") {
        let mut peers = Vec::new();
        for provider in [PROVIDER_AWS, PROVIDER_GCP, PROVIDER_AZURE] {
            let listed = cloud.network_peers(id, provider).await.cloud_context(|| {
                format!("list {} network peering connections of project {}", provider, id)
            })?;
            peers.extend(listed.into_iter().map(|p| (provider, p)));
        }
        data.network_peers = Some(peers);
    }

    if wants(ctx, "privateEndpoints") && !ctx.supports_kind(ResourceKind::PrivateEndpoint) {
        let mut services = Vec::new();
        for provider in [PROVIDER_AWS, PROVIDER_GCP, PROVIDER_AZURE] {
            let listed = cloud
                .private_endpoint_services(id, provider)
                .await
                .cloud_context(|| {
                    format!("list {} private endpoints of project {}", provider, id)
                })?;
            for service in listed {
                if is_terminal_state(service.status.as_deref()) {
                    tracing::debug!(
                        "Skipping private endpoint service {} ({:?})",
                        service.id,
                        service.status
                    );
                    continue;
                }
                services.push((provider, service));
            }
        }
        data.private_endpoints = Some(services);
    }

    if wants(ctx, "encryptionAtRest") {
        data.encryption_at_rest = Some(
            cloud
                .encryption_at_rest(id)
                .await
                .cloud_context(|| format!("describe encryption at rest of project {}", id))?,
        );
    }

    if wants(ctx, "cloudProviderAccessRoles") {
        data.cloud_provider_access_roles = Some(
            cloud
                .cloud_provider_access_roles(id)
                .await
                .cloud_context(|| format!("list cloud provider access roles of project {}", id))?,
        );
    }

    if wants(ctx, "settings") {
        data.settings = Some(
            cloud
                .project_settings(id)
                .await
                .cloud_context(|| format!("describe settings of project {}", id))?,
        );
    }

    if wants(ctx, "auditing") {
        data.auditing = Some(
            cloud
                .auditing(id)
                .await
                .cloud_context(|| format!("describe auditing of project {}", id))?,
        );
    }

    if wants(ctx, "alertConfigurations") {
        data.alert_configurations = Some(
            cloud
                .alert_configurations(id)
                .await
                .cloud_context(|| format!("list alert configurations of project {}", id))?,
        );
    }

    if wants(ctx, "customRoles") && !ctx.supports_kind(ResourceKind::CustomRole) {
        data.custom_roles = Some(
            cloud
                .database_roles(id)
                .await
                .cloud_context(|| format!("list custom roles of project {}", id))?,
        );
    }

    tracing::debug!("Fetched project sections for {}", id);
    Ok(data)
}

pub fn build(data: ProjectData, ctx: &mut ConvertContext<'_>) -> Result<Vec<TargetObject>> {
    let mut secrets = Vec::new();

    let mut spec = ProjectSpec {
        name: ctx.project.name.clone(),
        region_usage_restrictions: ctx.project.region_usage_restrictions.clone(),
        with_default_alerts_settings: ctx.project.with_default_alerts_settings,
        ..Default::default()
    };

    if ctx.include_secrets {
        spec.connection_secret_ref = Some(LocalRef::new(ctx.credentials_secret.clone()));
    }

    if let Some(entries) = &data.ip_access_list {
        spec.project_ip_access_list = entries.iter().map(network::ip_access_entry).collect();
    }

    if let Some(mw) = data.maintenance_window {
        spec.maintenance_window = Some(MaintenanceWindowSpec {
            day_of_week: mw.day_of_week,
            hour_of_day: mw.hour_of_day,
            auto_defer: mw.auto_defer_once_enabled,
            start_asap: mw.start_asap,
        });
    }

    if let Some(integrations) = &data.integrations {
        for integration in integrations {
            spec.integrations
                .push(build_integration(integration, ctx, &mut secrets));
        }
    }

    if let Some(peers) = &data.network_peers {
        spec.network_peers = peers
            .iter()
            .map(|(provider, peer)| network_peer(provider, peer))
            .collect();
    }

    if let Some(services) = data.private_endpoints {
        spec.private_endpoints = services
            .into_iter()
            .map(|(provider, service)| ProjectPrivateEndpoint {
                provider: provider.to_string(),
                region: service.region_name,
                id: service.interface_endpoints.into_iter().next(),
            })
            .collect();
    }

    if let Some(encryption) = &data.encryption_at_rest {
        spec.encryption_at_rest = Some(build_encryption_at_rest(encryption, ctx, &mut secrets));
    }

    if let Some(roles) = data.cloud_provider_access_roles {
        spec.cloud_provider_access_roles = roles
            .into_iter()
            .map(|r| CloudProviderAccessRoleSpec {
                provider_name: r.provider_name,
                iam_assumed_role_arn: r.iam_assumed_role_arn,
            })
            .collect();
    }

    if let Some(s) = data.settings {
        spec.settings = Some(ProjectSettingsSpec {
            is_collect_database_specifics_statistics_enabled: s
                .is_collect_database_specifics_statistics_enabled,
            is_data_explorer_enabled: s.is_data_explorer_enabled,
            is_extended_storage_sizes_enabled: s.is_extended_storage_sizes_enabled,
            is_performance_advisor_enabled: s.is_performance_advisor_enabled,
            is_realtime_performance_panel_enabled: s.is_realtime_performance_panel_enabled,
            is_schema_advisor_enabled: s.is_schema_advisor_enabled,
        });
    }

    if let Some(a) = data.auditing {
        spec.auditing = Some(AuditingSpec {
            audit_authorization_success: a.audit_authorization_success,
            audit_filter: a.audit_filter,
            enabled: a.enabled,
        });
    }

    if let Some(alerts) = &data.alert_configurations {
        for (index, alert) in alerts.iter().enumerate() {
            spec.alert_configurations
                .push(build_alert_configuration(index, alert, ctx, &mut secrets));
        }
    }

    if let Some(roles) = &data.custom_roles {
        spec.custom_roles = roles.iter().map(custom_roles::definition).collect();
    }

    let project = ctx.resource(ResourceKind::Project, ctx.project_name.clone(), spec);

    let credentials = ctx
        .secret(ctx.credentials_secret.clone())
        .field(ORG_ID_FIELD, Some(ctx.org_id.as_str()))
        .field(PUBLIC_API_KEY_FIELD, Some(ctx.credentials.public_api_key().as_str()))
        .field(PRIVATE_API_KEY_FIELD, Some(ctx.credentials.private_api_key().as_str()))
        .build();

    let mut objects = Vec::with_capacity(secrets.len() + 2);
    objects.push(TargetObject::Project(project));
    objects.extend(secrets.into_iter().map(TargetObject::Secret));
    objects.push(TargetObject::Secret(credentials));
    Ok(objects)
}

/// Secret holding one integration credential in its `password` field
fn integration_secret(
    ctx: &mut ConvertContext<'_>,
    raw_name: String,
    value: Option<&str>,
    secrets: &mut Vec<crate::resources::Secret>,
) -> ResourceRef {
    let name = ctx.name(ResourceKind::Secret, &raw_name);
    secrets.push(ctx.secret(name.clone()).field(PASSWORD_FIELD, value).build());
    ctx.local_ref(&name)
}

fn build_integration(
    integration: &Integration,
    ctx: &mut ConvertContext<'_>,
    secrets: &mut Vec<crate::resources::Secret>,
) -> IntegrationSpec {
    let itype = integration.integration_type.as_str();
    let base = format!("{}-integration-{}", ctx.project_id(), itype.to_lowercase());
    let mut spec = IntegrationSpec {
        integration_type: itype.to_string(),
        ..Default::default()
    };

    match itype {
        PAGER_DUTY => {
            spec.service_key_ref = Some(integration_secret(
                ctx,
                base,
                integration.service_key.as_deref(),
                secrets,
            ));
        }
        SLACK => {
            spec.team_name = integration.team_name.clone();
            spec.channel_name = integration.channel_name.clone();
            spec.api_token_ref = Some(integration_secret(
                ctx,
                base,
                integration.api_token.as_deref(),
                secrets,
            ));
        }
        DATADOG | OPS_GENIE => {
            spec.region = integration.region.clone();
            spec.api_key_ref = Some(integration_secret(
                ctx,
                base,
                integration.api_key.as_deref(),
                secrets,
            ));
        }
        WEBHOOK => {
            spec.url = integration.url.clone();
            spec.secret_ref = Some(integration_secret(
                ctx,
                base,
                integration.secret.as_deref(),
                secrets,
            ));
        }
        MICROSOFT_TEAMS => {
            spec.microsoft_teams_webhook_url = integration.microsoft_teams_webhook_url.clone();
        }
        PROMETHEUS => {
            spec.username = integration.username.clone();
            spec.service_discovery = integration.service_discovery.clone();
            spec.enabled = integration.enabled;
            spec.password_ref = Some(integration_secret(
                ctx,
                base,
                integration.password.as_deref(),
                secrets,
            ));
        }
        VICTOR_OPS => {
            if integration.routing_key.as_deref().is_some_and(|k| !k.is_empty()) {
                spec.routing_key_ref = Some(integration_secret(
                    ctx,
                    format!("{}-routing-key", base),
                    integration.routing_key.as_deref(),
                    secrets,
                ));
            }
            spec.api_key_ref = Some(integration_secret(
                ctx,
                base,
                integration.api_key.as_deref(),
                secrets,
            ));
        }
        NEW_RELIC => {
            spec.account_id = integration.account_id.clone();
            spec.write_token_ref = Some(integration_secret(
                ctx,
                format!("{}-write-token", base),
                integration.write_token.as_deref(),
                secrets,
            ));
            spec.read_token_ref = Some(integration_secret(
                ctx,
                format!("{}-read-token", base),
                integration.read_token.as_deref(),
                secrets,
            ));
            spec.license_key_ref = Some(integration_secret(
                ctx,
                base,
                integration.license_key.as_deref(),
                secrets,
            ));
        }
        other => {
            tracing::warn!("Integration type {} has no known settings, exporting type only", other);
        }
    }
    spec
}

fn build_alert_configuration(
    index: usize,
    alert: &AlertConfiguration,
    ctx: &mut ConvertContext<'_>,
    secrets: &mut Vec<crate::resources::Secret>,
) -> AlertConfigurationSpec {
    let notifications = alert
        .notifications
        .iter()
        .enumerate()
        .map(|(n, notification)| {
            let base = format!("{}-alert-{}-{}", ctx.project_name, index, n);
            build_notification(base, notification, ctx, secrets)
        })
        .collect();

    AlertConfigurationSpec {
        event_type_name: alert.event_type_name.clone(),
        enabled: alert.enabled,
        matchers: alert.matchers.iter().filter_map(matcher).collect(),
        metric_threshold: alert
            .metric_threshold
            .as_ref()
            .map(|mt| MetricThresholdSpec {
                metric_name: mt.metric_name.clone(),
                operator: mt.operator.clone(),
                threshold: Some(format!("{:.6}", mt.threshold.unwrap_or_default())),
                units: mt.units.clone(),
                mode: mt.mode.clone(),
            })
            .unwrap_or_default(),
        threshold: alert
            .threshold
            .as_ref()
            .map(|t| ThresholdSpec {
                operator: t.operator.clone(),
                units: t.units.clone(),
                threshold: Some(t.threshold.unwrap_or_default().to_string()),
            })
            .unwrap_or_default(),
        notifications,
    }
}

/// Matchers need all three parts; incomplete ones are dropped
fn matcher(m: &AlertMatcher) -> Option<MatcherSpec> {
    let part = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(str::to_string);
    match (part(&m.field_name), part(&m.operator), part(&m.value)) {
        (Some(field_name), Some(operator), Some(value)) => Some(MatcherSpec {
            field_name,
            operator,
            value,
        }),
        _ => {
            tracing::warn!("Skipping incomplete alert matcher {:?}", m);
            None
        }
    }
}

fn build_notification(
    base: String,
    notification: &AlertNotification,
    ctx: &mut ConvertContext<'_>,
    secrets: &mut Vec<crate::resources::Secret>,
) -> NotificationSpec {
    let mut spec = NotificationSpec {
        type_name: notification.type_name.clone(),
        channel_name: notification.channel_name.clone(),
        datadog_region: notification.datadog_region.clone(),
        delay_min: notification.delay_min,
        email_address: notification.email_address.clone(),
        email_enabled: notification.email_enabled,
        interval_min: notification.interval_min,
        mobile_number: notification.mobile_number.clone(),
        ops_genie_region: notification.ops_genie_region.clone(),
        sms_enabled: notification.sms_enabled,
        team_id: notification.team_id.clone(),
        team_name: notification.team_name.clone(),
        username: notification.username.clone(),
        roles: notification.roles.clone(),
        ..Default::default()
    };

    let Some(type_name) = notification.type_name.as_deref() else {
        return spec;
    };
    let (suffix, fields): (&str, Vec<(&str, Option<&str>)>) = match type_name {
        PAGER_DUTY => (
            "service-key",
            vec![("ServiceKey", notification.service_key.as_deref())],
        ),
        SLACK => (
            "api-token",
            vec![("APIToken", notification.api_token.as_deref())],
        ),
        DATADOG => (
            "datadog-api-key",
            vec![("DatadogAPIKey", notification.datadog_api_key.as_deref())],
        ),
        OPS_GENIE => (
            "ops-genie-api-key",
            vec![("OpsGenieAPIKey", notification.ops_genie_api_key.as_deref())],
        ),
        VICTOR_OPS => (
            "victor-ops-credentials",
            vec![
                ("VictorOpsAPIKey", notification.victor_ops_api_key.as_deref()),
                ("VictorOpsRoutingKey", notification.victor_ops_routing_key.as_deref()),
            ],
        ),
        _ => return spec,
    };

    let name = ctx.name(ResourceKind::Secret, &format!("{}-{}", base, suffix));
    let secret = fields
        .into_iter()
        .fold(ctx.secret(name.clone()), |b, (field, value)| b.field(field, value))
        .with_project_labels(ctx.project_id(), &ctx.project.name)
        .with_notifier_labels(notification.notifier_id.as_deref(), type_name)
        .build();
    secrets.push(secret);

    let reference = Some(ctx.local_ref(&name));
    match type_name {
        PAGER_DUTY => spec.service_key_ref = reference,
        SLACK => spec.api_token_ref = reference,
        DATADOG => spec.datadog_api_key_ref = reference,
        OPS_GENIE => spec.ops_genie_api_key_ref = reference,
        _ => spec.victor_ops_secret_ref = reference,
    }
    spec
}

fn network_peer(provider: &str, peer: &NetworkPeer) -> NetworkPeerSpec {
    let provider_name = peer
        .provider_name
        .clone()
        .unwrap_or_else(|| provider.to_string());
    let mut spec = NetworkPeerSpec {
        container_id: peer.container_id.clone(),
        ..Default::default()
    };
    match provider_name.as_str() {
        PROVIDER_AWS => {
            spec.accepter_region_name = peer.accepter_region_name.clone();
            spec.aws_account_id = peer.aws_account_id.clone();
            spec.route_table_cidr_block = peer.route_table_cidr_block.clone();
            spec.vpc_id = peer.vpc_id.clone();
        }
        PROVIDER_GCP => {
            spec.gcp_project_id = peer.gcp_project_id.clone();
            spec.network_name = peer.network_name.clone();
        }
        PROVIDER_AZURE => {
            spec.azure_directory_id = peer.azure_directory_id.clone();
            spec.azure_subscription_id = peer.azure_subscription_id.clone();
            spec.resource_group_name = peer.resource_group_name.clone();
            spec.vnet_name = peer.vnet_name.clone();
        }
        _ => {}
    }
    spec.provider_name = provider_name;
    spec
}

fn build_encryption_at_rest(
    data: &EncryptionAtRest,
    ctx: &mut ConvertContext<'_>,
    secrets: &mut Vec<crate::resources::Secret>,
) -> EncryptionAtRestSpec {
    let mut spec = EncryptionAtRestSpec {
        aws_kms: Some(AwsKmsSpec {
            enabled: data.aws_kms.enabled,
            region: data.aws_kms.region.clone(),
            valid: data.aws_kms.valid,
            secret_ref: None,
        }),
        azure_key_vault: Some(AzureKeyVaultSpec {
            enabled: data.azure_key_vault.enabled,
            client_id: data.azure_key_vault.client_id.clone(),
            azure_environment: data.azure_key_vault.azure_environment.clone(),
            resource_group_name: data.azure_key_vault.resource_group_name.clone(),
            tenant_id: data.azure_key_vault.tenant_id.clone(),
            secret_ref: None,
        }),
        google_cloud_kms: Some(GoogleCloudKmsSpec {
            enabled: data.google_cloud_kms.enabled,
            secret_ref: None,
        }),
    };

    let enabled = |flag: Option<bool>| flag.unwrap_or(false);
    let (provider, fields): (&str, Vec<(&str, Option<&str>)>) = if enabled(data.aws_kms.enabled) {
        (
            "aws",
            vec![
                ("CustomerMasterKeyID", data.aws_kms.customer_master_key_id.as_deref()),
                ("RoleID", data.aws_kms.role_id.as_deref()),
            ],
        )
    } else if enabled(data.azure_key_vault.enabled) {
        let azure = &data.azure_key_vault;
        (
            "azure",
            vec![
                ("SubscriptionID", azure.subscription_id.as_deref()),
                ("KeyVaultName", azure.key_vault_name.as_deref()),
                ("KeyIdentifier", azure.key_identifier.as_deref()),
                ("Secret", azure.secret.as_deref()),
            ],
        )
    } else if enabled(data.google_cloud_kms.enabled) {
        let gcp = &data.google_cloud_kms;
        (
            "gcp",
            vec![
                ("ServiceAccountKey", gcp.service_account_key.as_deref()),
                ("KeyVersionResourceID", gcp.key_version_resource_id.as_deref()),
            ],
        )
    } else {
        return spec;
    };

    let raw = format!("{}-{}-encryption-credentials", ctx.project_name, provider);
    let name = ctx.name(ResourceKind::Secret, &raw);
    let secret = fields
        .into_iter()
        .fold(ctx.secret(name.clone()), |b, (field, value)| b.field(field, value))
        .with_project_labels(ctx.project_id(), &ctx.project.name)
        .build();
    secrets.push(secret);

    let slot = match provider {
        "aws" => spec.aws_kms.as_mut().map(|s| &mut s.secret_ref),
        "azure" => spec.azure_key_vault.as_mut().map(|s| &mut s.secret_ref),
        _ => spec.google_cloud_kms.as_mut().map(|s| &mut s.secret_ref),
    };
    if let Some(slot) = slot {
        *slot = Some(ctx.local_ref(&name));
    }
    spec
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use crate::cloud::model::{AlertThreshold, AwsKms, MetricThreshold, Project};
    use crate::cloud::snapshot::{ProjectSnapshot, Snapshot, SnapshotProvider};
    use crate::resources::References;
    use crate::secrets::{NOTIFIER_ID_LABEL, NOTIFIER_TYPE_LABEL, TYPE_LABEL};

    const ALL_FIELDS: &[&str] = &[
        "name",
        "projectIpAccessList",
        "maintenanceWindow",
        "integrations",
        "networkPeers",
        "privateEndpoints",
        "encryptionAtRest",
        "cloudProviderAccessRoles",
        "settings",
        "auditing",
        "alertConfigurations",
        "customRoles",
        "teams",
    ];

    fn project_of(objects: &[TargetObject]) -> &ProjectSpec {
        match &objects[0] {
            TargetObject::Project(p) => &p.spec,
            other => panic!("expected project, got {:?}", other.kind()),
        }
    }

    fn secret_named<'a>(objects: &'a [TargetObject], name: &str) -> &'a crate::resources::Secret {
        objects
            .iter()
            .find_map(|o| match o {
                TargetObject::Secret(s) if s.metadata.name == name => Some(s),
                _ => None,
            })
            .unwrap_or_else(|| panic!("secret {} not emitted", name))
    }

    /// Only the name survives when the schema has no optional sections
    #[test]
    fn test_minimal_project() {
        let caps = capabilities(&[(ResourceKind::Project, &["name"])]);
        let creds = credentials();
        let mut ctx = context(&caps, &creds);
        let objects = build(ProjectData::default(), &mut ctx).unwrap();

        assert_eq!(objects.len(), 2);
        let spec = project_of(&objects);
        assert_eq!(spec.name, "Prod Cluster!!");
        assert!(spec.connection_secret_ref.is_none());

        let creds_secret = secret_named(&objects, "prod-cluster-credentials");
        assert_eq!(creds_secret.get(PUBLIC_API_KEY_FIELD).as_deref(), Some(""));
        assert_eq!(creds_secret.metadata.labels[TYPE_LABEL], "credentials");
    }

    #[test]
    fn test_credentials_included_on_request() {
        let caps = capabilities(&[(ResourceKind::Project, &["name"])]);
        let creds = credentials();
        let mut ctx = context(&caps, &creds);
        ctx.include_secrets = true;
        let objects = build(ProjectData::default(), &mut ctx).unwrap();

        let spec = project_of(&objects);
        assert_eq!(
            spec.connection_secret_ref.as_ref().unwrap().name,
            "prod-cluster-credentials"
        );
        let secret = secret_named(&objects, "prod-cluster-credentials");
        assert_eq!(secret.get(ORG_ID_FIELD).as_deref(), Some("o1"));
        assert_eq!(secret.get(PRIVATE_API_KEY_FIELD).as_deref(), Some("priv-key"));
    }

    #[test]
    fn test_ip_entries_drop_host_cidr() {
        let caps = capabilities(&[(ResourceKind::Project, ALL_FIELDS)]);
        let creds = credentials();
        let mut ctx = context(&caps, &creds);
        let data = ProjectData {
            ip_access_list: Some(vec![
                IpAccessEntry {
                    cidr_block: Some("10.0.0.1/32".into()),
                    ip_address: Some("10.0.0.1".into()),
                    ..Default::default()
                },
                IpAccessEntry {
                    cidr_block: Some("10.1.0.0/16".into()),
                    ..Default::default()
                },
            ]),
            ..Default::default()
        };
        let objects = build(data, &mut ctx).unwrap();
        let entries = &project_of(&objects).project_ip_access_list;
        assert_eq!(entries[0].cidr_block, None);
        assert_eq!(entries[0].ip_address.as_deref(), Some("10.0.0.1"));
        assert_eq!(entries[1].cidr_block.as_deref(), Some("10.1.0.0/16"));
    }

    /// Every integration secret the project points at is emitted
    #[test]
    fn test_integration_secrets_are_complete() {
        let caps = capabilities(&[(ResourceKind::Project, ALL_FIELDS)]);
        let creds = credentials();
        let mut ctx = context(&caps, &creds);
        let data = ProjectData {
            integrations: Some(vec![
                Integration {
                    integration_type: "SLACK".into(),
                    team_name: Some("ops".into()),
                    api_token: Some("xoxb".into()),
                    ..Default::default()
                },
                Integration {
                    integration_type: "NEW_RELIC".into(),
                    license_key: Some("lk".into()),
                    write_token: Some("wt".into()),
                    read_token: Some("rt".into()),
                    ..Default::default()
                },
                Integration {
                    integration_type: "VICTOR_OPS".into(),
                    api_key: Some("ak".into()),
                    routing_key: Some("rk".into()),
                    ..Default::default()
                },
            ]),
            ..Default::default()
        };
        let objects = build(data, &mut ctx).unwrap();

        let TargetObject::Project(project) = &objects[0] else {
            panic!("expected project first");
        };
        let keys: Vec<_> = objects.iter().map(|o| o.key()).collect();
        for reference in project.spec.references("default") {
            assert!(keys.contains(&reference), "missing {}", reference);
        }

        let relic = &project.spec.integrations[1];
        assert_ne!(relic.write_token_ref, relic.read_token_ref);
        assert_eq!(relic.license_key_ref.as_ref().unwrap().name, "p1-integration-new-relic");

        let token = secret_named(&objects, "p1-integration-slack");
        assert_eq!(token.get(PASSWORD_FIELD).as_deref(), Some(""));
    }

    #[test]
    fn test_encryption_secret_for_enabled_provider() {
        let caps = capabilities(&[(ResourceKind::Project, ALL_FIELDS)]);
        let creds = credentials();
        let mut ctx = context(&caps, &creds);
        ctx.include_secrets = true;
        let data = ProjectData {
            encryption_at_rest: Some(EncryptionAtRest {
                aws_kms: AwsKms {
                    enabled: Some(true),
                    region: Some("US_EAST_1".into()),
                    customer_master_key_id: Some("cmk".into()),
                    role_id: Some("role".into()),
                    ..Default::default()
                },
                ..Default::default()
            }),
            ..Default::default()
        };
        let objects = build(data, &mut ctx).unwrap();
        let spec = project_of(&objects);
        let aws = spec.encryption_at_rest.as_ref().unwrap().aws_kms.as_ref().unwrap();
        let name = &aws.secret_ref.as_ref().unwrap().name;
        assert_eq!(name, "prod-cluster-aws-encryption-credentials");

        let secret = secret_named(&objects, name);
        assert_eq!(secret.get("CustomerMasterKeyID").as_deref(), Some("cmk"));
        assert_eq!(
            secret.metadata.labels[crate::secrets::PROJECT_ID_LABEL],
            "p1"
        );
    }

    #[test]
    fn test_embedded_private_endpoints_take_first_interface() {
        let caps = capabilities(&[(ResourceKind::Project, ALL_FIELDS)]);
        let creds = credentials();
        let mut ctx = context(&caps, &creds);
        let data = ProjectData {
            private_endpoints: Some(vec![(
                PROVIDER_AWS,
                PrivateEndpointService {
                    id: "svc".into(),
                    cloud_provider: "AWS".into(),
                    region_name: "US_EAST_1".into(),
                    interface_endpoints: vec!["vpce-1".into(), "vpce-2".into()],
                    ..Default::default()
                },
            )]),
            ..Default::default()
        };
        let objects = build(data, &mut ctx).unwrap();
        let pe = &project_of(&objects).private_endpoints[0];
        assert_eq!(pe.provider, "AWS");
        assert_eq!(pe.id.as_deref(), Some("vpce-1"));
    }

    #[tokio::test]
    async fn test_embedded_private_endpoints_skip_terminal_services() {
        let caps = capabilities(&[(ResourceKind::Project, &["name", "privateEndpoints"])]);
        let creds = credentials();
        let mut ctx = context(&caps, &creds);

        let mut project = ProjectSnapshot {
            project: Project {
                id: "p1".into(),
                ..Default::default()
            },
            ..Default::default()
        };
        project.private_endpoint_services.insert(
            PROVIDER_AWS.into(),
            ["DELETING", "AVAILABLE", "DELETED"]
                .into_iter()
                .map(|status| PrivateEndpointService {
                    id: format!("svc-{}", status.to_lowercase()),
                    region_name: "US_EAST_1".into(),
                    status: Some(status.into()),
                    interface_endpoints: vec![format!("vpce-{}", status.to_lowercase())],
                    ..Default::default()
                })
                .collect(),
        );
        let cloud = SnapshotProvider::new(Snapshot {
            projects: vec![project],
            ..Default::default()
        });

        let data = fetch(&cloud, &ctx).await.unwrap();
        let objects = build(data, &mut ctx).unwrap();
        let endpoints = &project_of(&objects).private_endpoints;
        assert_eq!(endpoints.len(), 1);
        assert_eq!(endpoints[0].id.as_deref(), Some("vpce-available"));
    }

    #[test]
    fn test_alert_configurations_with_notification_secrets() {
        let caps = capabilities(&[(ResourceKind::Project, ALL_FIELDS)]);
        let creds = credentials();
        let mut ctx = context(&caps, &creds);
        ctx.include_secrets = true;
        let data = ProjectData {
            alert_configurations: Some(vec![AlertConfiguration {
                event_type_name: Some("OUTSIDE_METRIC_THRESHOLD".into()),
                enabled: Some(true),
                matchers: vec![
                    AlertMatcher {
                        field_name: Some("HOSTNAME_AND_PORT".into()),
                        operator: Some("EQUALS".into()),
                        value: Some("db-0:27017".into()),
                    },
                    AlertMatcher {
                        field_name: Some("REPLICA_SET_NAME".into()),
                        ..Default::default()
                    },
                ],
                metric_threshold: Some(MetricThreshold {
                    metric_name: "ASSERT_REGULAR".into(),
                    operator: Some("LESS_THAN".into()),
                    threshold: Some(99.5),
                    units: Some("RAW".into()),
                    mode: Some("AVERAGE".into()),
                }),
                threshold: Some(AlertThreshold {
                    operator: Some("GREATER_THAN".into()),
                    units: Some("HOURS".into()),
                    threshold: Some(2),
                }),
                notifications: vec![
                    AlertNotification {
                        type_name: Some("SLACK".into()),
                        notifier_id: Some("n1".into()),
                        channel_name: Some("#alerts".into()),
                        api_token: Some("xoxb".into()),
                        ..Default::default()
                    },
                    AlertNotification {
                        type_name: Some("VICTOR_OPS".into()),
                        victor_ops_api_key: Some("vak".into()),
                        victor_ops_routing_key: Some("vrk".into()),
                        ..Default::default()
                    },
                    AlertNotification {
                        type_name: Some("EMAIL".into()),
                        email_address: Some("ops@corp.io".into()),
                        ..Default::default()
                    },
                ],
                ..Default::default()
            }]),
            ..Default::default()
        };
        let objects = build(data, &mut ctx).unwrap();

        let TargetObject::Project(project) = &objects[0] else {
            panic!("expected project first");
        };
        let alert = &project.spec.alert_configurations[0];
        assert_eq!(alert.matchers.len(), 1);
        assert_eq!(alert.matchers[0].value, "db-0:27017");
        assert_eq!(alert.metric_threshold.threshold.as_deref(), Some("99.500000"));
        assert_eq!(alert.threshold.threshold.as_deref(), Some("2"));

        let slack = &alert.notifications[0];
        let token_ref = slack.api_token_ref.as_ref().unwrap();
        assert_eq!(token_ref.name, "prod-cluster-alert-0-0-api-token");
        let token = secret_named(&objects, &token_ref.name);
        assert_eq!(token.get("APIToken").as_deref(), Some("xoxb"));
        assert_eq!(token.metadata.labels[NOTIFIER_ID_LABEL], "n1");
        assert_eq!(token.metadata.labels[NOTIFIER_TYPE_LABEL], "SLACK");

        let victor = secret_named(&objects, "prod-cluster-alert-0-1-victor-ops-credentials");
        assert_eq!(victor.get("VictorOpsRoutingKey").as_deref(), Some("vrk"));

        let email = &alert.notifications[2];
        assert_eq!(email.email_address.as_deref(), Some("ops@corp.io"));
        assert!(email.service_key_ref.is_none() && email.api_token_ref.is_none());

        let keys: Vec<_> = objects.iter().map(|o| o.key()).collect();
        for reference in project.spec.references("default") {
            assert!(keys.contains(&reference), "missing {}", reference);
        }
    }

    #[test]
    fn test_alerts_without_thresholds_keep_empty_sections() {
        let caps = capabilities(&[(ResourceKind::Project, ALL_FIELDS)]);
        let creds = credentials();
        let mut ctx = context(&caps, &creds);
        let data = ProjectData {
            alert_configurations: Some(vec![AlertConfiguration {
                event_type_name: Some("JOINED_GROUP".into()),
                ..Default::default()
            }]),
            ..Default::default()
        };
        let objects = build(data, &mut ctx).unwrap();
        let alert = &project_of(&objects).alert_configurations[0];
        assert_eq!(alert.metric_threshold, MetricThresholdSpec::default());
        assert_eq!(alert.threshold, ThresholdSpec::default());

        let json = serde_json::to_value(alert).unwrap();
        assert_eq!(json["metricThreshold"], serde_json::json!({}));
        assert_eq!(json["eventTypeName"], "JOINED_GROUP");
    }
}

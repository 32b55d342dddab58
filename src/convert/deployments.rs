//! AtlasDeployment objects with their backup schedule and policy

use super::ConvertContext;
use crate::cloud::model::{
    is_terminal_state, AdvancedCluster, BackupSchedule, GlobalCluster, ProcessArgs,
    ReplicationSpec, ServerlessInstance, ServerlessPrivateEndpoint,
};
use crate::cloud::CloudDataProvider;
use crate::error::{CloudContext, Error, Result};
use crate::resources::deployment::*;
use crate::resources::{ResourceKind, TargetObject};
use std::collections::HashMap;

/// Everything needed to build one deployment
#[derive(Debug)]
pub enum DeploymentData {
    Cluster {
        cluster: AdvancedCluster,
        process_args: Option<ProcessArgs>,
        backup_schedule: Option<BackupSchedule>,
        global_cluster: Option<GlobalCluster>,
    },
    Serverless {
        instance: ServerlessInstance,
        private_endpoints: Vec<ServerlessPrivateEndpoint>,
    },
}

/// Backup objects are only emitted when the deployment can point at them
fn backup_supported(ctx: &ConvertContext<'_>) -> bool {
    ctx.supports_kind(ResourceKind::BackupSchedule)
        && ctx.supports_kind(ResourceKind::BackupPolicy)
        && ctx.supports(ResourceKind::Deployment, "backupRef")
}

enum Selected {
    Cluster(AdvancedCluster),
    Serverless(ServerlessInstance),
}

fn select(
    clusters: Vec<AdvancedCluster>,
    serverless: Vec<ServerlessInstance>,
    requested: &[String],
) -> Result<Vec<Selected>> {
    if requested.is_empty() {
        return Ok(clusters
            .into_iter()
            .map(Selected::Cluster)
            .chain(serverless.into_iter().map(Selected::Serverless))
            .collect());
    }

    let mut clusters: HashMap<String, AdvancedCluster> =
        clusters.into_iter().map(|c| (c.name.clone(), c)).collect();
    let mut serverless: HashMap<String, ServerlessInstance> =
        serverless.into_iter().map(|s| (s.name.clone(), s)).collect();

    requested
        .iter()
        .map(|name| {
            if let Some(cluster) = clusters.remove(name) {
                Ok(Selected::Cluster(cluster))
            } else if let Some(instance) = serverless.remove(name) {
                Ok(Selected::Serverless(instance))
            } else {
                Err(Error::conversion(
                    ResourceKind::Deployment.kind_name(),
                    format!("deployment not found: {}", name),
                ))
            }
        })
        .collect()
}

pub async fn fetch(
    cloud: &dyn CloudDataProvider,
    ctx: &ConvertContext<'_>,
) -> Result<Vec<DeploymentData>> {
    let id = ctx.project_id();
    let clusters = cloud
        .advanced_clusters(id)
        .await
        .cloud_context(|| format!("list clusters of project {}", id))?;
    let serverless = cloud
        .serverless_instances(id)
        .await
        .cloud_context(|| format!("list serverless instances of project {}", id))?;

    let mut result = Vec::new();
    for selected in select(clusters, serverless, &ctx.cluster_names)? {
        match selected {
            Selected::Cluster(cluster) => {
                if is_terminal_state(cluster.state_name.as_deref()) {
                    tracing::debug!("Skipping cluster {} ({:?})", cluster.name, cluster.state_name);
                    continue;
                }
                result.push(fetch_cluster(cloud, ctx, cluster).await?);
            }
            Selected::Serverless(instance) => {
                if is_terminal_state(instance.state_name.as_deref()) {
                    tracing::debug!(
                        "Skipping serverless instance {} ({:?})",
                        instance.name,
                        instance.state_name
                    );
                    continue;
                }
                let private_endpoints =
                    if ctx.supports(ResourceKind::Deployment, "serverlessSpec.privateEndpoints") {
                        cloud
                            .serverless_private_endpoints(id, &instance.name)
                            .await
                            .cloud_context(|| {
                                format!("list private endpoints of serverless instance {}", instance.name)
                            })?
                    } else {
                        Vec::new()
                    };
                result.push(DeploymentData::Serverless {
                    instance,
                    private_endpoints,
                });
            }
        }
    }
    Ok(result)
}

async fn fetch_cluster(
    cloud: &dyn CloudDataProvider,
    ctx: &ConvertContext<'_>,
    cluster: AdvancedCluster,
) -> Result<DeploymentData> {
    let id = ctx.project_id();
    let name = cluster.name.as_str();
    tracing::debug!("Fetching cluster {} of project {}", name, id);

    let process_args = if ctx.supports(ResourceKind::Deployment, "processArgs") {
        Some(
            cloud
                .process_args(id, name)
                .await
                .cloud_context(|| format!("get process args of cluster {}", name))?,
        )
    } else {
        None
    };

    // A cluster without a readable schedule is exported without backup objects
    let backup_schedule = if cluster.backup_enabled == Some(true) && backup_supported(ctx) {
        match cloud.backup_schedule(id, name).await {
            Ok(schedule) => schedule,
            Err(e) => {
                tracing::warn!("Failed to get backup schedule of cluster {}: {:#}", name, e);
                None
            }
        }
    } else {
        None
    };

    let global_cluster =
        if ctx.supports(ResourceKind::Deployment, "deploymentSpec.customZoneMapping") {
            Some(
                cloud
                    .global_cluster(id, name)
                    .await
                    .cloud_context(|| format!("get global cluster settings of {}", name))?,
            )
        } else {
            None
        };

    Ok(DeploymentData::Cluster {
        cluster,
        process_args,
        backup_schedule,
        global_cluster,
    })
}

fn replication_specs(specs: &[ReplicationSpec]) -> Vec<ReplicationSpecSpec> {
    specs
        .iter()
        .map(|spec| ReplicationSpecSpec {
            num_shards: spec.num_shards,
            zone_name: spec.zone_name.clone(),
            region_configs: spec
                .region_configs
                .iter()
                .map(|rc| RegionConfigSpec {
                    analytics_specs: rc.analytics_specs.clone(),
                    electable_specs: rc.electable_specs.clone(),
                    read_only_specs: rc.read_only_specs.clone(),
                    auto_scaling: rc.auto_scaling.clone(),
                    backing_provider_name: rc.backing_provider_name.clone(),
                    priority: rc.priority,
                    provider_name: rc.provider_name.clone(),
                    region_name: rc.region_name.clone(),
                })
                .collect(),
        })
        .collect()
}

/// Zone mappings keyed by zone name instead of replication spec id
fn custom_zone_mapping(global: &GlobalCluster, specs: &[ReplicationSpec]) -> Vec<CustomZoneMapping> {
    let zones: HashMap<&str, &str> = specs
        .iter()
        .filter_map(|s| Some((s.id.as_deref()?, s.zone_name.as_deref().unwrap_or_default())))
        .collect();

    global
        .custom_zone_mapping
        .iter()
        .map(|(location, zone_id)| CustomZoneMapping {
            location: location.clone(),
            zone: zones
                .get(zone_id.as_str())
                .map(|z| z.to_string())
                .unwrap_or_default(),
        })
        .collect()
}

fn advanced_spec(cluster: &AdvancedCluster, global: Option<&GlobalCluster>) -> AdvancedDeploymentSpec {
    let (custom_zone_mapping, managed_namespaces) = match global {
        Some(g) => (
            custom_zone_mapping(g, &cluster.replication_specs),
            g.managed_namespaces.clone(),
        ),
        None => (Vec::new(), Vec::new()),
    };

    AdvancedDeploymentSpec {
        name: cluster.name.clone(),
        cluster_type: cluster.cluster_type.clone(),
        backup_enabled: cluster.backup_enabled,
        bi_connector: cluster.bi_connector.as_ref().map(|b| BiConnectorSpec {
            enabled: b.enabled,
            read_preference: b.read_preference.clone(),
        }),
        encryption_at_rest_provider: cluster.encryption_at_rest_provider.clone(),
        labels: cluster.labels.clone(),
        tags: cluster.tags.clone(),
        mongo_db_major_version: cluster.mongo_db_major_version.clone(),
        paused: cluster.paused,
        pit_enabled: cluster.pit_enabled,
        replication_specs: replication_specs(&cluster.replication_specs),
        root_cert_type: cluster.root_cert_type.clone(),
        termination_protection_enabled: cluster.termination_protection_enabled,
        version_release_system: cluster.version_release_system.clone(),
        custom_zone_mapping,
        managed_namespaces,
    }
}

/// Policy and schedule objects for one deployment; returns the schedule name
fn build_backup(
    deployment: &str,
    schedule: BackupSchedule,
    ctx: &mut ConvertContext<'_>,
    out: &mut Vec<TargetObject>,
) -> String {
    let policy_name = ctx.name(
        ResourceKind::BackupPolicy,
        &format!("{}-backuppolicy", deployment),
    );
    let schedule_name = ctx.name(
        ResourceKind::BackupSchedule,
        &format!("{}-backupschedule", deployment),
    );

    // Atlas keeps a single policy per schedule
    let items = schedule
        .policies
        .into_iter()
        .flat_map(|p| p.policy_items)
        .collect();
    out.push(TargetObject::BackupPolicy(ctx.resource(
        ResourceKind::BackupPolicy,
        policy_name.clone(),
        BackupPolicySpec { items },
    )));

    let spec = BackupScheduleSpec {
        auto_export_enabled: schedule.auto_export_enabled.unwrap_or_default(),
        export: schedule.export.map(|e| BackupExportSpec {
            export_bucket_id: e.export_bucket_id,
            frequency_type: e.frequency_type,
        }),
        policy: ctx.local_ref(&policy_name),
        reference_hour_of_day: schedule.reference_hour_of_day.unwrap_or_default(),
        reference_minute_of_hour: schedule.reference_minute_of_hour.unwrap_or_default(),
        restore_window_days: schedule.restore_window_days.unwrap_or_default(),
        update_snapshots: schedule.update_snapshots.unwrap_or_default(),
        use_org_and_group_names_in_export_prefix: schedule
            .use_org_and_group_names_in_export_prefix
            .unwrap_or_default(),
        copy_settings: if ctx.supports(ResourceKind::BackupSchedule, "copySettings") {
            schedule.copy_settings
        } else {
            Vec::new()
        },
    };
    out.push(TargetObject::BackupSchedule(ctx.resource(
        ResourceKind::BackupSchedule,
        schedule_name.clone(),
        spec,
    )));

    schedule_name
}

pub fn build(deployments: Vec<DeploymentData>, ctx: &mut ConvertContext<'_>) -> Vec<TargetObject> {
    let mut objects = Vec::new();

    for data in deployments {
        match data {
            DeploymentData::Cluster {
                cluster,
                process_args,
                backup_schedule,
                global_cluster,
            } => {
                let name = ctx.name(ResourceKind::Deployment, &cluster.name);
                let mut backup = Vec::new();
                let backup_ref = backup_schedule.map(|schedule| {
                    let schedule_name = build_backup(&name, schedule, ctx, &mut backup);
                    ctx.local_ref(&schedule_name)
                });

                let spec = DeploymentSpec {
                    project: ctx.project_reference(ResourceKind::Deployment),
                    deployment_spec: Some(advanced_spec(&cluster, global_cluster.as_ref())),
                    serverless_spec: None,
                    process_args,
                    backup_ref,
                };
                objects.push(TargetObject::Deployment(ctx.resource(
                    ResourceKind::Deployment,
                    name,
                    spec,
                )));
                objects.extend(backup);
            }
            DeploymentData::Serverless {
                instance,
                private_endpoints,
            } => {
                let name = ctx.name(ResourceKind::Deployment, &instance.name);
                let settings = instance.provider_settings;
                let spec = DeploymentSpec {
                    project: ctx.project_reference(ResourceKind::Deployment),
                    serverless_spec: Some(ServerlessSpec {
                        name: instance.name,
                        provider_settings: ServerlessProviderSpec {
                            backing_provider_name: settings.backing_provider_name,
                            provider_name: settings.provider_name,
                            region_name: settings.region_name,
                        },
                        private_endpoints: private_endpoints
                            .into_iter()
                            .map(|pe| ServerlessPrivateEndpointSpec {
                                name: pe.comment.unwrap_or_default(),
                                cloud_provider_endpoint_id: pe.cloud_provider_endpoint_id,
                                private_endpoint_ip_address: pe.private_endpoint_ip_address,
                            })
                            .collect(),
                        tags: instance.tags,
                        termination_protection_enabled: instance.termination_protection_enabled,
                    }),
                    ..Default::default()
                };
                objects.push(TargetObject::Deployment(ctx.resource(
                    ResourceKind::Deployment,
                    name,
                    spec,
                )));
            }
        }
    }

    objects
}

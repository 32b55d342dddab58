//! Standalone AtlasIPAccessList and AtlasPrivateEndpoint objects

use super::{ConvertContext, PROVIDER_AWS, PROVIDER_AZURE, PROVIDER_GCP};
use crate::cloud::model::{is_terminal_state, InterfaceEndpoint, IpAccessEntry, PrivateEndpointService};
use crate::cloud::CloudDataProvider;
use crate::error::{CloudContext, Error, Result};
use crate::resources::network::*;
use crate::resources::{ResourceKind, TargetObject};

/// Single-host CIDR suffix; such entries are expressed by IP address alone
const HOST_CIDR_SUFFIX: &str = "/32";

pub fn ip_access_entry(entry: &IpAccessEntry) -> IpAccessEntrySpec {
    let host_entry = entry
        .cidr_block
        .as_deref()
        .is_some_and(|c| c.ends_with(HOST_CIDR_SUFFIX))
        && entry.ip_address.as_deref().is_some_and(|ip| !ip.is_empty());

    IpAccessEntrySpec {
        cidr_block: if host_entry {
            None
        } else {
            entry.cidr_block.clone()
        },
        ip_address: entry.ip_address.clone(),
        aws_security_group: entry.aws_security_group.clone(),
        comment: entry.comment.clone(),
        delete_after_date: entry.delete_after_date.map(|d| d.to_rfc3339()),
    }
}

pub async fn fetch_ip_access_list(
    cloud: &dyn CloudDataProvider,
    ctx: &ConvertContext<'_>,
) -> Result<Vec<IpAccessEntry>> {
    let id = ctx.project_id();
    cloud
        .ip_access_list(id)
        .await
        .cloud_context(|| format!("list ip access list of project {}", id))
}

pub fn build_ip_access_list(
    entries: Vec<IpAccessEntry>,
    ctx: &mut ConvertContext<'_>,
) -> Vec<TargetObject> {
    if entries.is_empty() {
        return Vec::new();
    }
    let name = ctx.name(
        ResourceKind::IpAccessList,
        &format!("{}-ip-access-list", ctx.project_name),
    );
    let spec = IpAccessListSpec {
        project: ctx.project_reference(ResourceKind::IpAccessList),
        entries: entries.iter().map(ip_access_entry).collect(),
    };
    vec![TargetObject::IpAccessList(
        ctx.resource(ResourceKind::IpAccessList, name, spec),
    )]
}

/// A live endpoint service with its interface endpoints resolved
#[derive(Debug)]
pub struct EndpointService {
    pub provider: &'static str,
    pub service: PrivateEndpointService,
    pub interfaces: Vec<InterfaceEndpoint>,
}

fn known_provider(name: &str) -> Option<&'static str> {
    [PROVIDER_AWS, PROVIDER_AZURE, PROVIDER_GCP]
        .into_iter()
        .find(|p| *p == name)
}

pub async fn fetch_private_endpoints(
    cloud: &dyn CloudDataProvider,
    ctx: &ConvertContext<'_>,
) -> Result<Vec<EndpointService>> {
    let id = ctx.project_id();
    let mut result = Vec::new();

    for listed in [PROVIDER_AWS, PROVIDER_AZURE, PROVIDER_GCP] {
        let services = cloud
            .private_endpoint_services(id, listed)
            .await
            .cloud_context(|| format!("list {} private endpoints of project {}", listed, id))?;

        for service in services {
            if is_terminal_state(service.status.as_deref()) {
                tracing::debug!("Skipping private endpoint service {} ({:?})", service.id, service.status);
                continue;
            }
            let reported = if service.cloud_provider.is_empty() {
                listed
            } else {
                service.cloud_provider.as_str()
            };
            let provider = known_provider(reported).ok_or_else(|| {
                Error::conversion(
                    ResourceKind::PrivateEndpoint.kind_name(),
                    format!("unknown cloud provider {:?} for service {}", reported, service.id),
                )
            })?;

            let mut interfaces = Vec::with_capacity(service.interface_endpoints.len());
            for endpoint_id in &service.interface_endpoints {
                let endpoint = cloud
                    .interface_endpoint(id, provider, &service.id, endpoint_id)
                    .await
                    .map_err(|e| {
                        Error::conversion(
                            ResourceKind::PrivateEndpoint.kind_name(),
                            format!(
                                "failed to get interface endpoint {} of service {}: {:#}",
                                endpoint_id, service.id, e
                            ),
                        )
                    })?;
                interfaces.push(endpoint);
            }

            result.push(EndpointService {
                provider,
                service,
                interfaces,
            });
        }
    }

    Ok(result)
}

pub fn build_private_endpoints(
    services: Vec<EndpointService>,
    ctx: &mut ConvertContext<'_>,
) -> Result<Vec<TargetObject>> {
    let mut objects = Vec::with_capacity(services.len());

    for EndpointService {
        provider,
        service,
        interfaces,
    } in services
    {
        let raw = format!(
            "{}-pe-{}-{}",
            ctx.project_name,
            provider,
            service.region_name.replace('_', "").to_lowercase()
        );
        let name = ctx.name(ResourceKind::PrivateEndpoint, &raw);

        let mut spec = PrivateEndpointSpec {
            project: ctx.project_reference(ResourceKind::PrivateEndpoint),
            provider: provider.to_string(),
            region: service.region_name.clone(),
            ..Default::default()
        };

        for (endpoint_id, endpoint) in service.interface_endpoints.iter().zip(interfaces) {
            match provider {
                PROVIDER_AWS => spec.aws_configuration.push(AwsEndpointConfig {
                    id: endpoint
                        .interface_endpoint_id
                        .unwrap_or_else(|| endpoint_id.clone()),
                }),
                PROVIDER_AZURE => spec.azure_configuration.push(AzureEndpointConfig {
                    id: endpoint
                        .private_endpoint_resource_id
                        .unwrap_or_else(|| endpoint_id.clone()),
                    ip_address: endpoint.private_endpoint_ip_address.unwrap_or_default(),
                }),
                _ => spec.gcp_configuration.push(GcpEndpointConfig {
                    project_id: String::new(),
                    group_name: endpoint
                        .endpoint_group_name
                        .unwrap_or_else(|| endpoint_id.clone()),
                    endpoints: endpoint
                        .endpoints
                        .into_iter()
                        .map(|e| GcpEndpointSpec {
                            name: e.endpoint_name,
                            ip_address: e.ip_address,
                        })
                        .collect(),
                }),
            }
        }

        objects.push(TargetObject::PrivateEndpoint(ctx.resource(
            ResourceKind::PrivateEndpoint,
            name,
            spec,
        )));
    }

    Ok(objects)
}

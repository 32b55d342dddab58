//! Stream processing instances and their connections

use super::ConvertContext;
use crate::cloud::model::{StreamConnection, StreamInstance};
use crate::cloud::CloudDataProvider;
use crate::error::{CloudContext, Error, Result};
use crate::resources::streams::*;
use crate::resources::{ResourceKind, TargetObject};
use crate::secrets::{CERTIFICATE_FIELD, PASSWORD_FIELD, USERNAME_FIELD};

pub const CONNECTION_SAMPLE: &str = "Sample";
pub const CONNECTION_CLUSTER: &str = "Cluster";
pub const CONNECTION_KAFKA: &str = "Kafka";

const PROTOCOL_SSL: &str = "SSL";

#[derive(Debug)]
pub struct InstanceData {
    pub instance: StreamInstance,
    pub connections: Vec<StreamConnection>,
}

pub async fn fetch(
    cloud: &dyn CloudDataProvider,
    ctx: &ConvertContext<'_>,
) -> Result<Vec<InstanceData>> {
    let id = ctx.project_id();
    let instances = cloud
        .stream_instances(id)
        .await
        .cloud_context(|| format!("list stream instances of project {}", id))?;

    let mut result = Vec::with_capacity(instances.len());
    for instance in instances {
        let connections = cloud
            .stream_connections(id, &instance.name)
            .await
            .cloud_context(|| format!("list connections of stream instance {}", instance.name))?;
        result.push(InstanceData {
            instance,
            connections,
        });
    }
    Ok(result)
}

/// Instance first, then its connections, then the connections' secrets
pub fn build(instances: Vec<InstanceData>, ctx: &mut ConvertContext<'_>) -> Result<Vec<TargetObject>> {
    let mut objects = Vec::new();

    for InstanceData {
        instance,
        connections,
    } in instances
    {
        let mut connection_objects = Vec::with_capacity(connections.len());
        let mut secrets = Vec::new();
        for connection in connections {
            let built = build_connection(&instance.name, connection, ctx, &mut secrets)?;
            connection_objects.push(built);
        }

        let name = ctx.name(
            ResourceKind::StreamInstance,
            &format!("{}-{}", ctx.project_name, instance.name),
        );
        let spec = StreamInstanceSpec {
            project: ctx.project_reference(ResourceKind::StreamInstance),
            config: StreamInstanceConfig {
                provider: instance.data_process_region.cloud_provider,
                region: instance.data_process_region.region,
                tier: instance.stream_config.tier,
            },
            connection_registry: connection_objects
                .iter()
                .map(|c: &TargetObject| ctx.local_ref(c.name()))
                .collect(),
            name: instance.name,
        };

        objects.push(TargetObject::StreamInstance(ctx.resource(
            ResourceKind::StreamInstance,
            name,
            spec,
        )));
        objects.extend(connection_objects);
        objects.extend(secrets);
    }

    Ok(objects)
}

fn build_connection(
    instance: &str,
    connection: StreamConnection,
    ctx: &mut ConvertContext<'_>,
    secrets: &mut Vec<TargetObject>,
) -> Result<TargetObject> {
    let raw = format!("{}-{}-{}", ctx.project_name, instance, connection.name);

    let mut spec = StreamConnectionSpec {
        name: connection.name.clone(),
        connection_type: connection.connection_type.clone(),
        ..Default::default()
    };

    match connection.connection_type.as_str() {
        CONNECTION_SAMPLE => {}
        CONNECTION_CLUSTER => {
            let role = connection.db_role_to_execute.unwrap_or_default();
            spec.cluster_config = Some(ClusterConnectionConfig {
                name: connection.cluster_name.unwrap_or_default(),
                role: StreamClusterRole {
                    name: role.role,
                    role_type: role.role_type,
                },
            });
        }
        CONNECTION_KAFKA => {
            let authentication = connection.authentication.unwrap_or_default();
            let security = connection.security.unwrap_or_default();

            // the password is write-only in Atlas
            let userpass = ctx.name(ResourceKind::Secret, &format!("{}-userpass", raw));
            secrets.push(TargetObject::Secret(
                ctx.secret(userpass.clone())
                    .public_field(USERNAME_FIELD, &authentication.username)
                    .field(PASSWORD_FIELD, None)
                    .build(),
            ));

            let certificate = if security.protocol == PROTOCOL_SSL {
                let name = ctx.name(ResourceKind::Secret, &format!("{}-certificate", raw));
                secrets.push(TargetObject::Secret(
                    ctx.secret(name.clone())
                        .public_field(
                            CERTIFICATE_FIELD,
                            security.broker_public_certificate.as_deref().unwrap_or_default(),
                        )
                        .build(),
                ));
                Some(ctx.local_ref(&name))
            } else {
                None
            };

            spec.kafka_config = Some(KafkaConnectionConfig {
                authentication: KafkaAuthenticationSpec {
                    mechanism: authentication.mechanism,
                    credentials: ctx.local_ref(&userpass),
                },
                bootstrap_servers: connection.bootstrap_servers.unwrap_or_default(),
                security: KafkaSecuritySpec {
                    protocol: security.protocol,
                    certificate,
                },
                config: connection.config,
            });
        }
        other => {
            return Err(Error::conversion(
                ResourceKind::StreamConnection.kind_name(),
                format!(
                    "unsupported connection type {:?} for connection {} of instance {}",
                    other, connection.name, instance
                ),
            ))
        }
    }

    let name = ctx.name(ResourceKind::StreamConnection, &raw);
    Ok(TargetObject::StreamConnection(ctx.resource(
        ResourceKind::StreamConnection,
        name,
        spec,
    )))
}

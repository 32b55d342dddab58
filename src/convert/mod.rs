//! Resource converters
//!
//! Each [`Converter`] turns one slice of a project's Atlas configuration into
//! target objects. Converters run in [`Converter::ORDER`]; each one first
//! fetches what it needs from the [`CloudDataProvider`] (one awaited call at
//! a time) and then builds objects from that snapshot without further I/O.

pub mod custom_roles;
pub mod data_federation;
pub mod database_users;
pub mod deployments;
pub mod federated_auth;
pub mod network;
pub mod project;
pub mod streams;
pub mod teams;

use crate::capability::CapabilitySet;
use crate::cloud::model::Project;
use crate::cloud::{CloudDataProvider, CredentialsGetter};
use crate::error::Result;
use crate::naming::NameDictionary;
use crate::resources::{ProjectReference, Resource, ResourceKind, ResourceRef, TargetObject};
use crate::secrets::SecretBuilder;

/// Cloud provider names, in the order network resources are listed
pub const PROVIDER_AWS: &str = "AWS";
pub const PROVIDER_AZURE: &str = "AZURE";
pub const PROVIDER_GCP: &str = "GCP";

/// Per-run state shared by all converters
pub struct ConvertContext<'a> {
    pub project: Project,
    pub org_id: String,
    /// Object name of the AtlasProject
    pub project_name: String,
    pub namespace: String,
    /// Value of the version label
    pub version: String,
    pub include_secrets: bool,
    pub independent: bool,
    /// Object name of the project credentials Secret
    pub credentials_secret: String,
    pub cluster_names: Vec<String>,
    pub data_federation_names: Vec<String>,
    pub capabilities: &'a CapabilitySet,
    pub credentials: &'a dyn CredentialsGetter,
    pub names: NameDictionary,
}

impl ConvertContext<'_> {
    pub fn project_id(&self) -> &str {
        &self.project.id
    }

    /// Assign a collision-free object name
    pub fn name(&mut self, kind: ResourceKind, raw: &str) -> String {
        self.names.assign(kind, raw)
    }

    pub fn supports(&self, kind: ResourceKind, path: &str) -> bool {
        self.capabilities.is_field_path_supported(kind, path)
    }

    pub fn supports_kind(&self, kind: ResourceKind) -> bool {
        self.capabilities.is_kind_supported(kind)
    }

    /// How an object of `kind` points at its project.
    ///
    /// Independent objects carry the Atlas project id and their own
    /// credentials, but only where the kind's schema accepts that.
    pub fn project_reference(&self, kind: ResourceKind) -> ProjectReference {
        if self.independent && self.supports(kind, "externalProjectRef") {
            ProjectReference::external(self.project.id.clone(), self.credentials_secret.clone())
        } else {
            ProjectReference::project(self.project_name.clone(), self.namespace.clone())
        }
    }

    /// Reference to an object in the target namespace
    pub fn local_ref(&self, name: &str) -> ResourceRef {
        ResourceRef::new(name, self.namespace.clone())
    }

    pub fn resource<S>(&self, kind: ResourceKind, name: impl Into<String>, spec: S) -> Resource<S> {
        Resource::new(kind, name, self.namespace.clone(), &self.version, spec)
    }

    /// Secret builder honoring the include-secrets policy
    pub fn secret(&self, name: impl Into<String>) -> SecretBuilder {
        SecretBuilder::new(name, self.namespace.clone(), &self.version)
            .include_values(self.include_secrets)
    }
}

/// One conversion step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Converter {
    Project,
    Teams,
    IpAccessList,
    PrivateEndpoints,
    CustomRoles,
    DatabaseUsers,
    Deployments,
    DataFederation,
    FederatedAuth,
    StreamProcessing,
}

impl Converter {
    pub const ORDER: [Converter; 10] = [
        Converter::Project,
        Converter::Teams,
        Converter::IpAccessList,
        Converter::PrivateEndpoints,
        Converter::CustomRoles,
        Converter::DatabaseUsers,
        Converter::Deployments,
        Converter::DataFederation,
        Converter::FederatedAuth,
        Converter::StreamProcessing,
    ];

    /// Kinds that must all be supported for the converter to run
    pub fn required_kinds(self) -> &'static [ResourceKind] {
        match self {
            Converter::Project => &[ResourceKind::Project],
            Converter::Teams => &[ResourceKind::Team],
            Converter::IpAccessList => &[ResourceKind::IpAccessList],
            Converter::PrivateEndpoints => &[ResourceKind::PrivateEndpoint],
            Converter::CustomRoles => &[ResourceKind::CustomRole],
            Converter::DatabaseUsers => &[ResourceKind::DatabaseUser],
            Converter::Deployments => &[ResourceKind::Deployment],
            Converter::DataFederation => &[ResourceKind::DataFederation],
            Converter::FederatedAuth => &[ResourceKind::FederatedAuth],
            Converter::StreamProcessing => {
                &[ResourceKind::StreamInstance, ResourceKind::StreamConnection]
            }
        }
    }

    pub fn is_enabled(self, capabilities: &CapabilitySet) -> bool {
        self.required_kinds()
            .iter()
            .all(|k| capabilities.is_kind_supported(*k))
    }

    pub fn label(self) -> &'static str {
        match self {
            Converter::Project => "project",
            Converter::Teams => "teams",
            Converter::IpAccessList => "ip access list",
            Converter::PrivateEndpoints => "private endpoints",
            Converter::CustomRoles => "custom roles",
            Converter::DatabaseUsers => "database users",
            Converter::Deployments => "deployments",
            Converter::DataFederation => "data federation",
            Converter::FederatedAuth => "federated auth",
            Converter::StreamProcessing => "stream processing",
        }
    }

    /// Fetch, build and append this converter's objects to `out`.
    ///
    /// Teams also add their references to the AtlasProject already in `out`.
    pub async fn run(
        self,
        cloud: &dyn CloudDataProvider,
        ctx: &mut ConvertContext<'_>,
        out: &mut Vec<TargetObject>,
    ) -> Result<()> {
        let before = out.len();
        match self {
            Converter::Project => {
                let data = project::fetch(cloud, ctx).await?;
                out.extend(project::build(data, ctx)?);
            }
            Converter::Teams => {
                let data = teams::fetch(cloud, ctx).await?;
                teams::build(data, ctx, out);
            }
            Converter::IpAccessList => {
                let entries = network::fetch_ip_access_list(cloud, ctx).await?;
                out.extend(network::build_ip_access_list(entries, ctx));
            }
            Converter::PrivateEndpoints => {
                let services = network::fetch_private_endpoints(cloud, ctx).await?;
                out.extend(network::build_private_endpoints(services, ctx)?);
            }
            Converter::CustomRoles => {
                let roles = custom_roles::fetch(cloud, ctx).await?;
                out.extend(custom_roles::build(roles, ctx));
            }
            Converter::DatabaseUsers => {
                let users = database_users::fetch(cloud, ctx).await?;
                out.extend(database_users::build(users, ctx));
            }
            Converter::Deployments => {
                let data = deployments::fetch(cloud, ctx).await?;
                out.extend(deployments::build(data, ctx));
            }
            Converter::DataFederation => {
                let federations = data_federation::fetch(cloud, ctx).await?;
                out.extend(data_federation::build(federations, ctx));
            }
            Converter::FederatedAuth => {
                if let Some(data) = federated_auth::fetch(cloud, ctx).await? {
                    out.extend(federated_auth::build(data, ctx));
                }
            }
            Converter::StreamProcessing => {
                let instances = streams::fetch(cloud, ctx).await?;
                out.extend(streams::build(instances, ctx)?);
            }
        }
        tracing::info!("Converted {}: {} object(s)", self.label(), out.len() - before);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Fixtures shared by converter tests

    use super::*;
    use crate::capability::SchemaNode;
    use crate::cloud::StaticCredentials;

    /// A schema node accepting every listed dot path
    pub fn schema_with_paths(paths: &[&str]) -> SchemaNode {
        let mut root = SchemaNode::default();
        for path in paths {
            let mut node = &mut root;
            for segment in path.split('.') {
                node = node.properties.entry(segment.to_string()).or_default();
            }
        }
        root
    }

    pub fn capabilities(kinds: &[(ResourceKind, &[&str])]) -> CapabilitySet {
        CapabilitySet::from_schemas(
            "2.5.0",
            kinds
                .iter()
                .map(|(kind, paths)| (*kind, schema_with_paths(paths))),
        )
        .unwrap()
    }

    pub fn credentials() -> StaticCredentials {
        StaticCredentials::new("pub-key", "priv-key")
    }

    pub fn context<'a>(
        capabilities: &'a CapabilitySet,
        credentials: &'a StaticCredentials,
    ) -> ConvertContext<'a> {
        ConvertContext {
            project: Project {
                id: "p1".into(),
                name: "Prod Cluster!!".into(),
                org_id: "o1".into(),
                ..Default::default()
            },
            org_id: "o1".into(),
            project_name: "prod-cluster".into(),
            namespace: "default".into(),
            version: "2.5.0".into(),
            include_secrets: false,
            independent: false,
            credentials_secret: "prod-cluster-credentials".into(),
            cluster_names: Vec::new(),
            data_federation_names: Vec::new(),
            capabilities,
            credentials,
            names: NameDictionary::new(),
        }
    }
}

//! Target object model
//!
//! Every exported object is a [`TargetObject`]: one of the Atlas Kubernetes
//! Operator custom resources or a core `v1/Secret`. Objects know their own
//! kind, identity and the in-batch objects they reference.

pub mod common;
pub mod custom_role;
pub mod data_federation;
pub mod database_user;
pub mod deployment;
pub mod federated_auth;
pub mod network;
pub mod project;
pub mod secret;
pub mod streams;
pub mod team;

pub use common::{ExternalProjectRef, LocalRef, ProjectReference, ResourceRef};
pub use secret::Secret;

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// API group/version of every operator resource
pub const API_VERSION: &str = "atlas.mongodb.com/v1";

/// Label recording the schema version an object was generated for
pub const VERSION_LABEL: &str = "mongodb.com/atlas-resource-version";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    Project,
    DatabaseUser,
    Deployment,
    BackupSchedule,
    BackupPolicy,
    DataFederation,
    PrivateEndpoint,
    CustomRole,
    IpAccessList,
    FederatedAuth,
    StreamInstance,
    StreamConnection,
    Team,
    Secret,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 14] = [
        ResourceKind::Project,
        ResourceKind::DatabaseUser,
        ResourceKind::Deployment,
        ResourceKind::BackupSchedule,
        ResourceKind::BackupPolicy,
        ResourceKind::DataFederation,
        ResourceKind::PrivateEndpoint,
        ResourceKind::CustomRole,
        ResourceKind::IpAccessList,
        ResourceKind::FederatedAuth,
        ResourceKind::StreamInstance,
        ResourceKind::StreamConnection,
        ResourceKind::Team,
        ResourceKind::Secret,
    ];

    /// The `kind` field of the serialized object
    pub fn kind_name(self) -> &'static str {
        match self {
            ResourceKind::Project => "AtlasProject",
            ResourceKind::DatabaseUser => "AtlasDatabaseUser",
            ResourceKind::Deployment => "AtlasDeployment",
            ResourceKind::BackupSchedule => "AtlasBackupSchedule",
            ResourceKind::BackupPolicy => "AtlasBackupPolicy",
            ResourceKind::DataFederation => "AtlasDataFederation",
            ResourceKind::PrivateEndpoint => "AtlasPrivateEndpoint",
            ResourceKind::CustomRole => "AtlasCustomRole",
            ResourceKind::IpAccessList => "AtlasIPAccessList",
            ResourceKind::FederatedAuth => "AtlasFederatedAuth",
            ResourceKind::StreamInstance => "AtlasStreamInstance",
            ResourceKind::StreamConnection => "AtlasStreamConnection",
            ResourceKind::Team => "AtlasTeam",
            ResourceKind::Secret => "Secret",
        }
    }

    /// Plural resource name, as used in CRD file names
    pub fn plural(self) -> &'static str {
        match self {
            ResourceKind::Project => "atlasprojects",
            ResourceKind::DatabaseUser => "atlasdatabaseusers",
            ResourceKind::Deployment => "atlasdeployments",
            ResourceKind::BackupSchedule => "atlasbackupschedules",
            ResourceKind::BackupPolicy => "atlasbackuppolicies",
            ResourceKind::DataFederation => "atlasdatafederations",
            ResourceKind::PrivateEndpoint => "atlasprivateendpoints",
            ResourceKind::CustomRole => "atlascustomroles",
            ResourceKind::IpAccessList => "atlasipaccesslists",
            ResourceKind::FederatedAuth => "atlasfederatedauths",
            ResourceKind::StreamInstance => "atlasstreaminstances",
            ResourceKind::StreamConnection => "atlasstreamconnections",
            ResourceKind::Team => "atlasteams",
            ResourceKind::Secret => "secrets",
        }
    }

    /// Look a kind up by its serialized `kind` name
    pub fn from_kind_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.kind_name() == name)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind_name())
    }
}

/// Identity of an object within a cluster
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey {
    pub kind: ResourceKind,
    pub name: String,
    pub namespace: String,
}

impl ObjectKey {
    pub fn new(kind: ResourceKind, name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            namespace: namespace.into(),
        }
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}/{}", self.kind, self.namespace, self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ObjectMeta {
    pub name: String,
    pub namespace: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

/// Freshly created objects carry no conditions
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Status {
    pub conditions: Vec<serde_json::Value>,
}

/// Objects whose spec points at other objects of the same batch
pub trait References {
    /// Keys of the referenced objects; `namespace` fills unqualified refs
    fn references(&self, namespace: &str) -> Vec<ObjectKey>;
}

/// A custom resource of the operator's API group
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource<S> {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    pub spec: S,
    pub status: Status,
}

impl<S> Resource<S> {
    pub fn new(
        kind: ResourceKind,
        name: impl Into<String>,
        namespace: impl Into<String>,
        version: &str,
        spec: S,
    ) -> Self {
        let mut labels = BTreeMap::new();
        labels.insert(VERSION_LABEL.to_string(), version.to_string());
        Self {
            api_version: API_VERSION.to_string(),
            kind: kind.kind_name().to_string(),
            metadata: ObjectMeta {
                name: name.into(),
                namespace: namespace.into(),
                labels,
            },
            spec,
            status: Status::default(),
        }
    }
}

impl<S: References> Resource<S> {
    fn references(&self) -> Vec<ObjectKey> {
        self.spec.references(&self.metadata.namespace)
    }
}

/// One exported object
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TargetObject {
    Project(Resource<project::ProjectSpec>),
    DatabaseUser(Resource<database_user::DatabaseUserSpec>),
    Deployment(Resource<deployment::DeploymentSpec>),
    BackupSchedule(Resource<deployment::BackupScheduleSpec>),
    BackupPolicy(Resource<deployment::BackupPolicySpec>),
    DataFederation(Resource<data_federation::DataFederationSpec>),
    PrivateEndpoint(Resource<network::PrivateEndpointSpec>),
    CustomRole(Resource<custom_role::CustomRoleSpec>),
    IpAccessList(Resource<network::IpAccessListSpec>),
    FederatedAuth(Resource<federated_auth::FederatedAuthSpec>),
    StreamInstance(Resource<streams::StreamInstanceSpec>),
    StreamConnection(Resource<streams::StreamConnectionSpec>),
    Team(Resource<team::TeamSpec>),
    Secret(Secret),
}

macro_rules! each_variant {
    ($obj:expr, $r:ident => $body:expr) => {
        match $obj {
            TargetObject::Project($r) => $body,
            TargetObject::DatabaseUser($r) => $body,
            TargetObject::Deployment($r) => $body,
            TargetObject::BackupSchedule($r) => $body,
            TargetObject::BackupPolicy($r) => $body,
            TargetObject::DataFederation($r) => $body,
            TargetObject::PrivateEndpoint($r) => $body,
            TargetObject::CustomRole($r) => $body,
            TargetObject::IpAccessList($r) => $body,
            TargetObject::FederatedAuth($r) => $body,
            TargetObject::StreamInstance($r) => $body,
            TargetObject::StreamConnection($r) => $body,
            TargetObject::Team($r) => $body,
            TargetObject::Secret($r) => $body,
        }
    };
}

impl TargetObject {
    pub fn kind(&self) -> ResourceKind {
        match self {
            TargetObject::Project(_) => ResourceKind::Project,
            TargetObject::DatabaseUser(_) => ResourceKind::DatabaseUser,
            TargetObject::Deployment(_) => ResourceKind::Deployment,
            TargetObject::BackupSchedule(_) => ResourceKind::BackupSchedule,
            TargetObject::BackupPolicy(_) => ResourceKind::BackupPolicy,
            TargetObject::DataFederation(_) => ResourceKind::DataFederation,
            TargetObject::PrivateEndpoint(_) => ResourceKind::PrivateEndpoint,
            TargetObject::CustomRole(_) => ResourceKind::CustomRole,
            TargetObject::IpAccessList(_) => ResourceKind::IpAccessList,
            TargetObject::FederatedAuth(_) => ResourceKind::FederatedAuth,
            TargetObject::StreamInstance(_) => ResourceKind::StreamInstance,
            TargetObject::StreamConnection(_) => ResourceKind::StreamConnection,
            TargetObject::Team(_) => ResourceKind::Team,
            TargetObject::Secret(_) => ResourceKind::Secret,
        }
    }

    pub fn metadata(&self) -> &ObjectMeta {
        each_variant!(self, r => &r.metadata)
    }

    pub fn metadata_mut(&mut self) -> &mut ObjectMeta {
        each_variant!(self, r => &mut r.metadata)
    }

    pub fn name(&self) -> &str {
        &self.metadata().name
    }

    pub fn key(&self) -> ObjectKey {
        let meta = self.metadata();
        ObjectKey::new(self.kind(), meta.name.clone(), meta.namespace.clone())
    }

    /// Objects this one points at, which must exist in the same batch
    pub fn references(&self) -> Vec<ObjectKey> {
        each_variant!(self, r => r.references())
    }

    /// The schema version label, if set
    pub fn resource_version(&self) -> Option<&str> {
        self.metadata().labels.get(VERSION_LABEL).map(String::as_str)
    }
}

//! Collaborator contracts for reading Atlas state
//!
//! Every call is a single describe/list lookup. Implementations own their
//! transport and retry policy; the engine awaits each call in order.

use super::model::*;
use anyhow::Result;
use async_trait::async_trait;

/// Read access to one Atlas organization's configuration
#[async_trait]
pub trait CloudDataProvider: Send + Sync {
    async fn project(&self, project_id: &str) -> Result<Project>;

    async fn ip_access_list(&self, project_id: &str) -> Result<Vec<IpAccessEntry>>;

    async fn maintenance_window(&self, project_id: &str) -> Result<MaintenanceWindow>;

    async fn integrations(&self, project_id: &str) -> Result<Vec<Integration>>;

    /// Network peering connections for one provider (`AWS`, `GCP`, `AZURE`)
    async fn network_peers(&self, project_id: &str, provider: &str) -> Result<Vec<NetworkPeer>>;

    /// Private endpoint services for one provider (`AWS`, `AZURE`, `GCP`)
    async fn private_endpoint_services(
        &self,
        project_id: &str,
        provider: &str,
    ) -> Result<Vec<PrivateEndpointService>>;

    async fn interface_endpoint(
        &self,
        project_id: &str,
        provider: &str,
        service_id: &str,
        endpoint_id: &str,
    ) -> Result<InterfaceEndpoint>;

    async fn encryption_at_rest(&self, project_id: &str) -> Result<EncryptionAtRest>;

    async fn cloud_provider_access_roles(
        &self,
        project_id: &str,
    ) -> Result<Vec<CloudProviderAccessRole>>;

    async fn project_settings(&self, project_id: &str) -> Result<ProjectSettings>;

    async fn auditing(&self, project_id: &str) -> Result<Auditing>;

    async fn alert_configurations(&self, project_id: &str) -> Result<Vec<AlertConfiguration>>;

    async fn database_roles(&self, project_id: &str) -> Result<Vec<DatabaseRole>>;

    async fn project_teams(&self, project_id: &str) -> Result<Vec<TeamAssignment>>;

    async fn team_by_id(&self, org_id: &str, team_id: &str) -> Result<Team>;

    async fn team_users(&self, org_id: &str, team_id: &str) -> Result<Vec<TeamUser>>;

    async fn database_users(&self, project_id: &str) -> Result<Vec<DatabaseUser>>;

    async fn advanced_clusters(&self, project_id: &str) -> Result<Vec<AdvancedCluster>>;

    async fn serverless_instances(&self, project_id: &str) -> Result<Vec<ServerlessInstance>>;

    async fn process_args(&self, project_id: &str, cluster_name: &str) -> Result<ProcessArgs>;

    /// `None` when the cluster has no backup schedule
    async fn backup_schedule(
        &self,
        project_id: &str,
        cluster_name: &str,
    ) -> Result<Option<BackupSchedule>>;

    async fn global_cluster(&self, project_id: &str, cluster_name: &str) -> Result<GlobalCluster>;

    async fn serverless_private_endpoints(
        &self,
        project_id: &str,
        instance_name: &str,
    ) -> Result<Vec<ServerlessPrivateEndpoint>>;

    async fn data_federations(&self, project_id: &str) -> Result<Vec<DataFederation>>;

    /// `None` when the organization has no federation settings
    async fn federation_settings(&self, org_id: &str) -> Result<Option<FederationSettings>>;

    async fn connected_org_config(
        &self,
        federation_settings_id: &str,
        org_id: &str,
    ) -> Result<ConnectedOrgConfig>;

    async fn identity_provider(
        &self,
        federation_settings_id: &str,
        identity_provider_id: &str,
    ) -> Result<IdentityProvider>;

    async fn stream_instances(&self, project_id: &str) -> Result<Vec<StreamInstance>>;

    async fn stream_connections(
        &self,
        project_id: &str,
        instance_name: &str,
    ) -> Result<Vec<StreamConnection>>;
}

/// The caller's own API key pair, used for the project credentials secret
pub trait CredentialsGetter: Send + Sync {
    fn public_api_key(&self) -> String;
    fn private_api_key(&self) -> String;
}

/// Credentials supplied up front (e.g. from the environment)
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    pub public_key: String,
    pub private_key: String,
}

impl StaticCredentials {
    pub fn new(public_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            private_key: private_key.into(),
        }
    }

    /// Read `MONGODB_ATLAS_PUBLIC_API_KEY` / `MONGODB_ATLAS_PRIVATE_API_KEY`
    pub fn from_env() -> Self {
        Self {
            public_key: std::env::var("MONGODB_ATLAS_PUBLIC_API_KEY").unwrap_or_default(),
            private_key: std::env::var("MONGODB_ATLAS_PRIVATE_API_KEY").unwrap_or_default(),
        }
    }
}

impl CredentialsGetter for StaticCredentials {
    fn public_api_key(&self) -> String {
        self.public_key.clone()
    }

    fn private_api_key(&self) -> String {
        self.private_key.clone()
    }
}

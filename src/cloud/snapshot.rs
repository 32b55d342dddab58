//! File-backed cloud data provider
//!
//! Serves lookups from a JSON dump of Atlas state, so exports can be
//! produced (and reproduced) without network access.

use super::model::*;
use super::provider::CloudDataProvider;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Top-level dump document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub projects: Vec<ProjectSnapshot>,
    pub organizations: Vec<OrganizationSnapshot>,
}

/// Everything captured for one project. Maps are keyed by provider,
/// cluster, instance or endpoint id as named.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectSnapshot {
    pub project: Project,
    pub ip_access_list: Vec<IpAccessEntry>,
    pub maintenance_window: MaintenanceWindow,
    pub integrations: Vec<Integration>,
    pub network_peers: BTreeMap<String, Vec<NetworkPeer>>,
    pub private_endpoint_services: BTreeMap<String, Vec<PrivateEndpointService>>,
    pub interface_endpoints: BTreeMap<String, InterfaceEndpoint>,
    pub encryption_at_rest: EncryptionAtRest,
    pub cloud_provider_access_roles: Vec<CloudProviderAccessRole>,
    pub project_settings: ProjectSettings,
    pub auditing: Auditing,
    pub alert_configurations: Vec<AlertConfiguration>,
    pub database_roles: Vec<DatabaseRole>,
    pub teams: Vec<TeamAssignment>,
    pub database_users: Vec<DatabaseUser>,
    pub advanced_clusters: Vec<AdvancedCluster>,
    pub serverless_instances: Vec<ServerlessInstance>,
    pub process_args: BTreeMap<String, ProcessArgs>,
    pub backup_schedules: BTreeMap<String, BackupSchedule>,
    pub global_clusters: BTreeMap<String, GlobalCluster>,
    pub serverless_private_endpoints: BTreeMap<String, Vec<ServerlessPrivateEndpoint>>,
    pub data_federations: Vec<DataFederation>,
    pub stream_instances: Vec<StreamInstance>,
    pub stream_connections: BTreeMap<String, Vec<StreamConnection>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OrganizationSnapshot {
    pub id: String,
    pub teams: Vec<TeamSnapshot>,
    pub federation_settings: Option<FederationSettings>,
    pub connected_org_config: Option<ConnectedOrgConfig>,
    pub identity_providers: Vec<IdentityProvider>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamSnapshot {
    pub id: String,
    pub name: String,
    pub usernames: Vec<String>,
}

/// [`CloudDataProvider`] over an in-memory [`Snapshot`]
#[derive(Debug, Clone, Default)]
pub struct SnapshotProvider {
    snapshot: Snapshot,
}

impl SnapshotProvider {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { snapshot }
    }

    /// Load a dump from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        let snapshot: Snapshot = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;
        tracing::debug!(
            "Loaded snapshot with {} project(s) from {:?}",
            snapshot.projects.len(),
            path
        );
        Ok(Self::new(snapshot))
    }

    fn project_snapshot(&self, project_id: &str) -> Result<&ProjectSnapshot> {
        self.snapshot
            .projects
            .iter()
            .find(|p| p.project.id == project_id)
            .ok_or_else(|| anyhow!("project {} not found", project_id))
    }

    fn organization(&self, org_id: &str) -> Result<&OrganizationSnapshot> {
        self.snapshot
            .organizations
            .iter()
            .find(|o| o.id == org_id)
            .ok_or_else(|| anyhow!("organization {} not found", org_id))
    }

    fn team(&self, org_id: &str, team_id: &str) -> Result<&TeamSnapshot> {
        self.organization(org_id)?
            .teams
            .iter()
            .find(|t| t.id == team_id)
            .ok_or_else(|| anyhow!("team {} not found in organization {}", team_id, org_id))
    }
}

#[async_trait]
impl CloudDataProvider for SnapshotProvider {
    async fn project(&self, project_id: &str) -> Result<Project> {
        Ok(self.project_snapshot(project_id)?.project.clone())
    }

    async fn ip_access_list(&self, project_id: &str) -> Result<Vec<IpAccessEntry>> {
        Ok(self.project_snapshot(project_id)?.ip_access_list.clone())
    }

    async fn maintenance_window(&self, project_id: &str) -> Result<MaintenanceWindow> {
        Ok(self.project_snapshot(project_id)?.maintenance_window.clone())
    }

    async fn integrations(&self, project_id: &str) -> Result<Vec<Integration>> {
        Ok(self.project_snapshot(project_id)?.integrations.clone())
    }

    async fn network_peers(&self, project_id: &str, provider: &str) -> Result<Vec<NetworkPeer>> {
        Ok(self
            .project_snapshot(project_id)?
            .network_peers
            .get(provider)
            .cloned()
            .unwrap_or_default())
    }

    async fn private_endpoint_services(
        &self,
        project_id: &str,
        provider: &str,
    ) -> Result<Vec<PrivateEndpointService>> {
        Ok(self
            .project_snapshot(project_id)?
            .private_endpoint_services
            .get(provider)
            .cloned()
            .unwrap_or_default())
    }

    async fn interface_endpoint(
        &self,
        project_id: &str,
        provider: &str,
        service_id: &str,
        endpoint_id: &str,
    ) -> Result<InterfaceEndpoint> {
        self.project_snapshot(project_id)?
            .interface_endpoints
            .get(endpoint_id)
            .cloned()
            .ok_or_else(|| {
                anyhow!(
                    "{} interface endpoint {} of service {} not found",
                    provider,
                    endpoint_id,
                    service_id
                )
            })
    }

    async fn encryption_at_rest(&self, project_id: &str) -> Result<EncryptionAtRest> {
        Ok(self.project_snapshot(project_id)?.encryption_at_rest.clone())
    }

    async fn cloud_provider_access_roles(
        &self,
        project_id: &str,
    ) -> Result<Vec<CloudProviderAccessRole>> {
        Ok(self
            .project_snapshot(project_id)?
            .cloud_provider_access_roles
            .clone())
    }

    async fn project_settings(&self, project_id: &str) -> Result<ProjectSettings> {
        Ok(self.project_snapshot(project_id)?.project_settings.clone())
    }

    async fn auditing(&self, project_id: &str) -> Result<Auditing> {
        Ok(self.project_snapshot(project_id)?.auditing.clone())
    }

    async fn alert_configurations(&self, project_id: &str) -> Result<Vec<AlertConfiguration>> {
        Ok(self.project_snapshot(project_id)?.alert_configurations.clone())
    }

    async fn database_roles(&self, project_id: &str) -> Result<Vec<DatabaseRole>> {
        Ok(self.project_snapshot(project_id)?.database_roles.clone())
    }

    async fn project_teams(&self, project_id: &str) -> Result<Vec<TeamAssignment>> {
        Ok(self.project_snapshot(project_id)?.teams.clone())
    }

    async fn team_by_id(&self, org_id: &str, team_id: &str) -> Result<Team> {
        let team = self.team(org_id, team_id)?;
        Ok(Team {
            id: team.id.clone(),
            name: team.name.clone(),
        })
    }

    async fn team_users(&self, org_id: &str, team_id: &str) -> Result<Vec<TeamUser>> {
        Ok(self
            .team(org_id, team_id)?
            .usernames
            .iter()
            .map(|u| TeamUser {
                username: u.clone(),
            })
            .collect())
    }

    async fn database_users(&self, project_id: &str) -> Result<Vec<DatabaseUser>> {
        Ok(self.project_snapshot(project_id)?.database_users.clone())
    }

    async fn advanced_clusters(&self, project_id: &str) -> Result<Vec<AdvancedCluster>> {
        Ok(self.project_snapshot(project_id)?.advanced_clusters.clone())
    }

    async fn serverless_instances(&self, project_id: &str) -> Result<Vec<ServerlessInstance>> {
        Ok(self.project_snapshot(project_id)?.serverless_instances.clone())
    }

    async fn process_args(&self, project_id: &str, cluster_name: &str) -> Result<ProcessArgs> {
        Ok(self
            .project_snapshot(project_id)?
            .process_args
            .get(cluster_name)
            .cloned()
            .unwrap_or_default())
    }

    async fn backup_schedule(
        &self,
        project_id: &str,
        cluster_name: &str,
    ) -> Result<Option<BackupSchedule>> {
        Ok(self
            .project_snapshot(project_id)?
            .backup_schedules
            .get(cluster_name)
            .cloned())
    }

    async fn global_cluster(&self, project_id: &str, cluster_name: &str) -> Result<GlobalCluster> {
        Ok(self
            .project_snapshot(project_id)?
            .global_clusters
            .get(cluster_name)
            .cloned()
            .unwrap_or_default())
    }

    async fn serverless_private_endpoints(
        &self,
        project_id: &str,
        instance_name: &str,
    ) -> Result<Vec<ServerlessPrivateEndpoint>> {
        Ok(self
            .project_snapshot(project_id)?
            .serverless_private_endpoints
            .get(instance_name)
            .cloned()
            .unwrap_or_default())
    }

    async fn data_federations(&self, project_id: &str) -> Result<Vec<DataFederation>> {
        Ok(self.project_snapshot(project_id)?.data_federations.clone())
    }

    async fn federation_settings(&self, org_id: &str) -> Result<Option<FederationSettings>> {
        Ok(self
            .snapshot
            .organizations
            .iter()
            .find(|o| o.id == org_id)
            .and_then(|o| o.federation_settings.clone()))
    }

    async fn connected_org_config(
        &self,
        federation_settings_id: &str,
        org_id: &str,
    ) -> Result<ConnectedOrgConfig> {
        self.organization(org_id)?
            .connected_org_config
            .clone()
            .ok_or_else(|| {
                anyhow!(
                    "organization {} is not connected to federation {}",
                    org_id,
                    federation_settings_id
                )
            })
    }

    async fn identity_provider(
        &self,
        federation_settings_id: &str,
        identity_provider_id: &str,
    ) -> Result<IdentityProvider> {
        self.snapshot
            .organizations
            .iter()
            .filter(|o| {
                o.federation_settings
                    .as_ref()
                    .is_some_and(|f| f.id == federation_settings_id)
            })
            .flat_map(|o| o.identity_providers.iter())
            .find(|idp| idp.id == identity_provider_id)
            .cloned()
            .ok_or_else(|| anyhow!("identity provider {} not found", identity_provider_id))
    }

    async fn stream_instances(&self, project_id: &str) -> Result<Vec<StreamInstance>> {
        Ok(self.project_snapshot(project_id)?.stream_instances.clone())
    }

    async fn stream_connections(
        &self,
        project_id: &str,
        instance_name: &str,
    ) -> Result<Vec<StreamConnection>> {
        Ok(self
            .project_snapshot(project_id)?
            .stream_connections
            .get(instance_name)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn provider() -> SnapshotProvider {
        let snapshot: Snapshot = serde_json::from_value(json!({
            "projects": [{
                "project": {"id": "p1", "name": "Prod", "orgId": "o1"},
                "teams": [{"teamId": "t1", "roleNames": ["GROUP_OWNER"]}],
                "backupSchedules": {"c0": {"restoreWindowDays": 7}}
            }],
            "organizations": [{
                "id": "o1",
                "teams": [{"id": "t1", "name": "Ops", "usernames": ["a@corp.io"]}]
            }]
        }))
        .unwrap();
        SnapshotProvider::new(snapshot)
    }

    #[tokio::test]
    async fn test_project_lookup() {
        let p = provider();
        assert_eq!(p.project("p1").await.unwrap().name, "Prod");
        assert!(p.project("missing").await.is_err());
    }

    #[tokio::test]
    async fn test_team_lookups() {
        let p = provider();
        assert_eq!(p.team_by_id("o1", "t1").await.unwrap().name, "Ops");
        assert_eq!(p.team_users("o1", "t1").await.unwrap().len(), 1);
        assert!(p.team_by_id("o1", "t2").await.is_err());
    }

    #[tokio::test]
    async fn test_missing_sections_default() {
        let p = provider();
        assert!(p.database_users("p1").await.unwrap().is_empty());
        assert!(p.alert_configurations("p1").await.unwrap().is_empty());
        assert!(p.backup_schedule("p1", "c0").await.unwrap().is_some());
        assert!(p.backup_schedule("p1", "c1").await.unwrap().is_none());
        assert!(p.federation_settings("o1").await.unwrap().is_none());
    }
}

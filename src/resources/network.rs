//! AtlasPrivateEndpoint and AtlasIPAccessList specs

use super::{ObjectKey, ProjectReference, References};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IpAccessEntrySpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cidr_block: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aws_security_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_after_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IpAccessListSpec {
    #[serde(flatten)]
    pub project: ProjectReference,
    pub entries: Vec<IpAccessEntrySpec>,
}

impl References for IpAccessListSpec {
    fn references(&self, namespace: &str) -> Vec<ObjectKey> {
        self.project.references(namespace)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrivateEndpointSpec {
    #[serde(flatten)]
    pub project: ProjectReference,
    pub provider: String,
    pub region: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aws_configuration: Vec<AwsEndpointConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub azure_configuration: Vec<AzureEndpointConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub gcp_configuration: Vec<GcpEndpointConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AwsEndpointConfig {
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureEndpointConfig {
    pub id: String,
    pub ip_address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GcpEndpointConfig {
    /// Left empty: Atlas does not report the customer's GCP project
    pub project_id: String,
    pub group_name: String,
    pub endpoints: Vec<GcpEndpointSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GcpEndpointSpec {
    pub name: String,
    pub ip_address: String,
}

impl References for PrivateEndpointSpec {
    fn references(&self, namespace: &str) -> Vec<ObjectKey> {
        self.project.references(namespace)
    }
}

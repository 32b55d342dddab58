use super::{ObjectKey, ProjectReference, References};
use crate::cloud::model::{DataFederationCloudProviderConfig, DataFederationStorage, DataProcessRegion};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFederationSpec {
    #[serde(flatten)]
    pub project: ProjectReference,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_provider_config: Option<DataFederationCloudProviderConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_process_region: Option<DataProcessRegion>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage: Option<DataFederationStorage>,
}

impl References for DataFederationSpec {
    fn references(&self, namespace: &str) -> Vec<ObjectKey> {
        self.project.references(namespace)
    }
}

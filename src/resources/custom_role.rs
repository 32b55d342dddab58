//! Custom database roles, standalone (AtlasCustomRole) or embedded in a project

use super::{ObjectKey, ProjectReference, References};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomRoleDefinition {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub inherited_roles: Vec<InheritedRoleSpec>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub actions: Vec<ActionSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InheritedRoleSpec {
    pub name: String,
    pub database: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActionSpec {
    pub name: String,
    pub resources: Vec<ActionResourceSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActionResourceSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomRoleSpec {
    #[serde(flatten)]
    pub project: ProjectReference,
    pub role: CustomRoleDefinition,
}

impl References for CustomRoleSpec {
    fn references(&self, namespace: &str) -> Vec<ObjectKey> {
        self.project.references(namespace)
    }
}

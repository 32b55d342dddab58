use super::{ObjectKey, References, ResourceKind, ResourceRef};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FederatedAuthSpec {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_secret_ref: Option<ResourceRef>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub domain_allow_list: Vec<String>,
    pub domain_restriction_enabled: bool,
    #[serde(rename = "ssoDebugEnabled", skip_serializing_if = "Option::is_none")]
    pub sso_debug_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub post_auth_role_grants: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub role_mappings: Vec<RoleMappingSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleMappingSpec {
    pub external_group_name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub role_assignments: Vec<RoleAssignmentSpec>,
}

/// `project_name` is the Atlas project's display name, not an object reference
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleAssignmentSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    pub role: String,
}

impl References for FederatedAuthSpec {
    fn references(&self, namespace: &str) -> Vec<ObjectKey> {
        self.connection_secret_ref
            .as_ref()
            .and_then(|r| r.key(ResourceKind::Secret, namespace))
            .into_iter()
            .collect()
    }
}

use super::{LocalRef, ObjectKey, ProjectReference, References, ResourceKind};
use crate::cloud::model::{Label, UserRole, UserScope};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseUserSpec {
    #[serde(flatten)]
    pub project: ProjectReference,
    pub username: String,
    pub database_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete_after_date: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<Label>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<UserRole>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<UserScope>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_secret_ref: Option<LocalRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x509_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aws_iam_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ldap_auth_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oidc_auth_type: Option<String>,
}

impl References for DatabaseUserSpec {
    fn references(&self, namespace: &str) -> Vec<ObjectKey> {
        let mut refs = self.project.references(namespace);
        refs.extend(
            self.password_secret_ref
                .as_ref()
                .and_then(|r| r.key(ResourceKind::Secret, namespace)),
        );
        refs
    }
}

//! Reference types shared by several specs

use super::{ObjectKey, ResourceKind};
use serde::Serialize;

/// Reference to a named object, optionally in another namespace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResourceRef {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: String,
}

impl ResourceRef {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
        }
    }

    /// Key of the referenced object; `None` for an empty reference
    pub fn key(&self, kind: ResourceKind, default_namespace: &str) -> Option<ObjectKey> {
        if self.name.is_empty() {
            return None;
        }
        let namespace = if self.namespace.is_empty() {
            default_namespace
        } else {
            &self.namespace
        };
        Some(ObjectKey::new(kind, self.name.clone(), namespace))
    }
}

/// Reference to an object in the referrer's own namespace
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocalRef {
    pub name: String,
}

impl LocalRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn key(&self, kind: ResourceKind, namespace: &str) -> Option<ObjectKey> {
        (!self.name.is_empty()).then(|| ObjectKey::new(kind, self.name.clone(), namespace))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExternalProjectRef {
    pub id: String,
}

/// How a resource names its owning project.
///
/// Either an in-batch `projectRef`, or (independent mode) the Atlas
/// project id plus a credentials secret of its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectReference {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_ref: Option<ResourceRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_project_ref: Option<ExternalProjectRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_secret: Option<LocalRef>,
}

impl ProjectReference {
    pub fn project(name: impl Into<String>, namespace: impl Into<String>) -> Self {
        Self {
            project_ref: Some(ResourceRef::new(name, namespace)),
            ..Default::default()
        }
    }

    pub fn external(project_id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            project_ref: None,
            external_project_ref: Some(ExternalProjectRef {
                id: project_id.into(),
            }),
            connection_secret: Some(LocalRef::new(secret)),
        }
    }

    pub fn is_independent(&self) -> bool {
        self.external_project_ref.is_some()
    }

    pub fn references(&self, namespace: &str) -> Vec<ObjectKey> {
        let project = self
            .project_ref
            .as_ref()
            .and_then(|r| r.key(ResourceKind::Project, namespace));
        let secret = self
            .connection_secret
            .as_ref()
            .and_then(|r| r.key(ResourceKind::Secret, namespace));
        project.into_iter().chain(secret).collect()
    }
}

//! Secret materialization
//!
//! Every credential-bearing secret declares all of its field names. Values
//! are written only when the caller asked for secrets to be included, so
//! the default output is safe to commit.

use crate::resources::{ObjectMeta, Secret, VERSION_LABEL};
use std::collections::BTreeMap;

pub const PASSWORD_FIELD: &str = "password";
pub const USERNAME_FIELD: &str = "username";
pub const CERTIFICATE_FIELD: &str = "certificate";

pub const ORG_ID_FIELD: &str = "orgId";
pub const PUBLIC_API_KEY_FIELD: &str = "publicApiKey";
pub const PRIVATE_API_KEY_FIELD: &str = "privateApiKey";

pub const TYPE_LABEL: &str = "atlas.mongodb.com/type";
pub const CREDENTIALS_TYPE: &str = "credentials";
pub const PROJECT_ID_LABEL: &str = "atlas.mongodb.com/project-id";
pub const PROJECT_NAME_LABEL: &str = "atlas.mongodb.com/project-name";
pub const NOTIFIER_ID_LABEL: &str = "atlas.mongodb.com/notifier-id";
pub const NOTIFIER_TYPE_LABEL: &str = "atlas.mongodb.com/notifier-type";

/// Builds one [`Secret`]
#[derive(Debug, Clone)]
pub struct SecretBuilder {
    name: String,
    namespace: String,
    include_values: bool,
    labels: BTreeMap<String, String>,
    fields: Vec<(String, String)>,
}

impl SecretBuilder {
    pub fn new(name: impl Into<String>, namespace: impl Into<String>, version: &str) -> Self {
        let mut labels = BTreeMap::new();
        labels.insert(TYPE_LABEL.to_string(), CREDENTIALS_TYPE.to_string());
        labels.insert(VERSION_LABEL.to_string(), version.to_string());
        Self {
            name: name.into(),
            namespace: namespace.into(),
            include_values: false,
            labels,
            fields: Vec::new(),
        }
    }

    /// Whether sensitive values are written or left empty
    pub fn include_values(mut self, include: bool) -> Self {
        self.include_values = include;
        self
    }

    /// Declare a sensitive field; its value is kept only when values are included
    pub fn field(mut self, name: &str, value: Option<&str>) -> Self {
        let value = if self.include_values {
            value.unwrap_or_default()
        } else {
            ""
        };
        self.fields.push((name.to_string(), value.to_string()));
        self
    }

    /// Declare a non-sensitive field, always populated
    pub fn public_field(mut self, name: &str, value: &str) -> Self {
        self.fields.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_project_labels(mut self, project_id: &str, project_name: &str) -> Self {
        self.labels
            .insert(PROJECT_ID_LABEL.to_string(), project_id.to_string());
        self.labels
            .insert(PROJECT_NAME_LABEL.to_string(), project_name.to_string());
        self
    }

    /// Tie an alert notification secret to its Atlas notifier
    pub fn with_notifier_labels(mut self, notifier_id: Option<&str>, notifier_type: &str) -> Self {
        if let Some(id) = notifier_id {
            self.labels
                .insert(NOTIFIER_ID_LABEL.to_string(), id.to_string());
        }
        self.labels
            .insert(NOTIFIER_TYPE_LABEL.to_string(), notifier_type.to_string());
        self
    }

    pub fn build(self) -> Secret {
        let mut secret = Secret::new(ObjectMeta {
            name: self.name,
            namespace: self.namespace,
            labels: self.labels,
        });
        for (field, value) in &self.fields {
            secret.set(field, value);
        }
        secret
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_redacted_by_default() {
        let secret = SecretBuilder::new("prod-svc", "ns", "2.5.0")
            .field(PASSWORD_FIELD, Some("hunter2"))
            .build();
        assert_eq!(secret.get(PASSWORD_FIELD).as_deref(), Some(""));
        assert_eq!(secret.data.len(), 1);
    }

    #[test]
    fn test_values_included_on_request() {
        let secret = SecretBuilder::new("prod-svc", "ns", "2.5.0")
            .include_values(true)
            .field(PASSWORD_FIELD, Some("hunter2"))
            .field(USERNAME_FIELD, None)
            .build();
        assert_eq!(secret.get(PASSWORD_FIELD).as_deref(), Some("hunter2"));
        assert_eq!(secret.data[PASSWORD_FIELD], "aHVudGVyMg==");
        assert_eq!(secret.get(USERNAME_FIELD).as_deref(), Some(""));
    }

    #[test]
    fn test_public_fields_and_labels() {
        let secret = SecretBuilder::new("kafka-userpass", "ns", "2.5.0")
            .public_field(USERNAME_FIELD, "svc")
            .with_project_labels("p1", "prod")
            .build();
        assert_eq!(secret.get(USERNAME_FIELD).as_deref(), Some("svc"));
        let labels = &secret.metadata.labels;
        assert_eq!(labels[TYPE_LABEL], CREDENTIALS_TYPE);
        assert_eq!(labels[PROJECT_ID_LABEL], "p1");
        assert_eq!(labels[VERSION_LABEL], "2.5.0");
    }

    #[test]
    fn test_notifier_labels() {
        let secret = SecretBuilder::new("prod-alert-0-0-api-token", "ns", "2.5.0")
            .with_notifier_labels(Some("n1"), "SLACK")
            .build();
        assert_eq!(secret.metadata.labels[NOTIFIER_ID_LABEL], "n1");
        assert_eq!(secret.metadata.labels[NOTIFIER_TYPE_LABEL], "SLACK");

        let anonymous = SecretBuilder::new("other", "ns", "2.5.0")
            .with_notifier_labels(None, "PAGER_DUTY")
            .build();
        assert!(!anonymous.metadata.labels.contains_key(NOTIFIER_ID_LABEL));
    }
}

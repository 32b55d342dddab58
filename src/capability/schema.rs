//! CRD schema documents and field-path lookups

use serde::Deserialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Recursion cap for path walks over (possibly malformed) schemas
pub const MAX_DEPTH: usize = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("document is empty")]
    DocumentIsEmpty,
    #[error("document has no versions")]
    NoVersions,
    #[error("document has no openAPIV3Schema")]
    NoSchema,
    #[error("schema has no spec property")]
    NoSpec,
    #[error("invalid document: {0}")]
    Parse(String),
}

/// One node of an OpenAPI v3 schema, reduced to what lookups need
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SchemaNode {
    #[serde(rename = "type", default)]
    pub node_type: Option<String>,
    #[serde(default)]
    pub properties: BTreeMap<String, SchemaNode>,
    #[serde(default)]
    pub items: Option<SchemaItems>,
    #[serde(rename = "enum", default)]
    pub enum_values: Vec<serde_json::Value>,
}

/// Array item schema: a single schema or a list of alternatives
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum SchemaItems {
    Single(Box<SchemaNode>),
    Many(Vec<SchemaNode>),
}

impl SchemaNode {
    /// Whether a dot-separated path exists below this node
    pub fn has_path(&self, path: &str) -> bool {
        self.resolve(path).is_some()
    }

    /// Node at a dot-separated path.
    ///
    /// Named properties consume a segment; array nodes are stepped through
    /// into their item schema without consuming one. With several item
    /// alternatives the first one that resolves wins. An empty segment
    /// (including the empty path) names no property and never resolves.
    pub fn resolve(&self, path: &str) -> Option<&SchemaNode> {
        let segments: Vec<&str> = path.split('.').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return None;
        }
        self.resolve_segments(&segments, MAX_DEPTH)
    }

    fn resolve_segments(&self, segments: &[&str], budget: usize) -> Option<&SchemaNode> {
        let Some((first, rest)) = segments.split_first() else {
            return Some(self);
        };
        if budget == 0 {
            return None;
        }

        if let Some(child) = self.properties.get(*first) {
            return child.resolve_segments(rest, budget - 1);
        }

        match &self.items {
            Some(SchemaItems::Single(item)) => item.resolve_segments(segments, budget - 1),
            Some(SchemaItems::Many(items)) => items
                .iter()
                .find_map(|item| item.resolve_segments(segments, budget - 1)),
            None => None,
        }
    }

    /// Enum values as strings
    pub fn enum_strings(&self) -> Vec<String> {
        self.enum_values
            .iter()
            .map(|v| match v {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
struct CrdSpec {
    #[serde(default)]
    versions: Vec<CrdVersion>,
}

#[derive(Debug, Default, Deserialize)]
struct CrdVersion {
    #[serde(default)]
    schema: Option<CrdSchema>,
}

#[derive(Debug, Default, Deserialize)]
struct CrdSchema {
    #[serde(rename = "openAPIV3Schema", default)]
    open_api_v3_schema: Option<SchemaNode>,
}

/// A CustomResourceDefinition document
#[derive(Debug, Default, Deserialize)]
pub struct CrdDocument {
    #[serde(default)]
    spec: Option<CrdSpec>,
}

impl CrdDocument {
    pub fn from_yaml(content: &str) -> Result<Self, SchemaError> {
        if content.trim().is_empty() {
            return Err(SchemaError::DocumentIsEmpty);
        }
        let doc: Option<CrdDocument> =
            serde_yaml::from_str(content).map_err(|e| SchemaError::Parse(e.to_string()))?;
        doc.ok_or(SchemaError::DocumentIsEmpty)
    }

    /// The `spec` subtree of the first served version's schema
    pub fn into_spec_schema(self) -> Result<SchemaNode, SchemaError> {
        let version = self
            .spec
            .and_then(|s| s.versions.into_iter().next())
            .ok_or(SchemaError::NoVersions)?;
        let mut root = version
            .schema
            .and_then(|s| s.open_api_v3_schema)
            .ok_or(SchemaError::NoSchema)?;
        root.properties.remove("spec").ok_or(SchemaError::NoSpec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POLICY_CRD: &str = r#"
apiVersion: apiextensions.k8s.io/v1
kind: CustomResourceDefinition
metadata:
  name: atlasbackuppolicies.atlas.mongodb.com
spec:
  group: atlas.mongodb.com
  versions:
  - name: v1
    schema:
      openAPIV3Schema:
        type: object
        properties:
          spec:
            type: object
            properties:
              items:
                type: array
                items:
                  type: object
                  properties:
                    frequencyType:
                      type: string
                      enum: [hourly, daily, weekly, monthly]
                    frequencyInterval:
                      type: integer
"#;

    fn spec_schema() -> SchemaNode {
        CrdDocument::from_yaml(POLICY_CRD)
            .unwrap()
            .into_spec_schema()
            .unwrap()
    }

    #[test]
    fn test_paths_step_through_arrays() {
        let spec = spec_schema();
        assert!(spec.has_path("items"));
        assert!(spec.has_path("items.frequencyType"));
        assert!(!spec.has_path("items.retentionUnit"));
        assert!(!spec.has_path("backupRef"));
    }

    #[test]
    fn test_empty_segments_never_resolve() {
        let spec = spec_schema();
        assert!(!spec.has_path(""));
        assert!(!spec.has_path("items..frequencyType"));
        assert!(!spec.has_path(".items"));
        assert!(!spec.has_path("items."));
        assert!(spec.resolve("items.frequencyType").is_some());
    }

    #[test]
    fn test_enum_lookup() {
        let node = spec_schema().resolve("items.frequencyType").cloned().unwrap();
        assert_eq!(node.enum_strings(), vec!["hourly", "daily", "weekly", "monthly"]);
    }

    #[test]
    fn test_item_alternatives() {
        let node: SchemaNode = serde_yaml::from_str(
            r#"
type: array
items:
  - properties:
      a: {type: string}
  - properties:
      b: {type: string}
"#,
        )
        .unwrap();
        assert!(node.has_path("a"));
        assert!(node.has_path("b"));
        assert!(!node.has_path("c"));
    }

    #[test]
    fn test_depth_is_bounded() {
        let mut node = SchemaNode::default();
        for _ in 0..(MAX_DEPTH + 10) {
            let mut parent = SchemaNode::default();
            parent.properties.insert("n".to_string(), node);
            node = parent;
        }
        let shallow = vec!["n"; 10].join(".");
        let deep = vec!["n"; MAX_DEPTH + 5].join(".");
        assert!(node.has_path(&shallow));
        assert!(!node.has_path(&deep));
    }

    #[test]
    fn test_document_errors() {
        assert_eq!(
            CrdDocument::from_yaml("  ").unwrap_err(),
            SchemaError::DocumentIsEmpty
        );
        let no_versions = CrdDocument::from_yaml("spec:\n  versions: []\n").unwrap();
        assert_eq!(no_versions.into_spec_schema().unwrap_err(), SchemaError::NoVersions);

        let no_schema = CrdDocument::from_yaml("spec:\n  versions:\n  - name: v1\n").unwrap();
        assert_eq!(no_schema.into_spec_schema().unwrap_err(), SchemaError::NoSchema);

        let no_spec = CrdDocument::from_yaml(
            "spec:\n  versions:\n  - schema:\n      openAPIV3Schema:\n        properties:\n          status: {}\n",
        )
        .unwrap();
        assert_eq!(no_spec.into_spec_schema().unwrap_err(), SchemaError::NoSpec);
    }
}

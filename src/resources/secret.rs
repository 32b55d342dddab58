//! Core `v1/Secret` objects

use super::{ObjectKey, ObjectMeta};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Secret {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    /// Base64-encoded values, keyed by field name
    pub data: BTreeMap<String, String>,
}

impl Secret {
    pub fn new(metadata: ObjectMeta) -> Self {
        Self {
            api_version: "v1".to_string(),
            kind: "Secret".to_string(),
            metadata,
            data: BTreeMap::new(),
        }
    }

    /// Set a field, encoding the raw value
    pub fn set(&mut self, field: &str, value: &str) {
        self.data.insert(field.to_string(), STANDARD.encode(value));
    }

    /// Decoded value of a field
    pub fn get(&self, field: &str) -> Option<String> {
        let encoded = self.data.get(field)?;
        let bytes = STANDARD.decode(encoded).ok()?;
        String::from_utf8(bytes).ok()
    }

    pub(super) fn references(&self) -> Vec<ObjectKey> {
        Vec::new()
    }
}

use super::{ObjectKey, References};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TeamSpec {
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub usernames: Vec<String>,
}

impl References for TeamSpec {
    fn references(&self, _namespace: &str) -> Vec<ObjectKey> {
        Vec::new()
    }
}

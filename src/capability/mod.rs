//! Capability model: which kinds and fields an operator version accepts

pub mod provider;
pub mod registry;
pub mod schema;
pub mod set;

pub use provider::{
    crd_file_name, DirSchemaProvider, HttpSchemaProvider, SchemaProvider, StaticSchemaProvider,
    DEFAULT_SCHEMA_BASE_URL,
};
pub use registry::{registry, PatchRule, Version};
pub use schema::{CrdDocument, SchemaNode};
pub use set::CapabilitySet;

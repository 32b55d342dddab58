//! atlas-k8s - export MongoDB Atlas projects as Atlas Kubernetes Operator
//! resources
//!
//! A run loads the [`capability::CapabilitySet`] of one operator version,
//! converts a project's Atlas configuration into [`resources::TargetObject`]s
//! with the [`exporter::Exporter`], and either serializes them as a YAML
//! stream or creates them in dependency order with the [`apply::Applier`].

pub mod apply;
pub mod capability;
pub mod cloud;
pub mod config;
pub mod convert;
pub mod error;
pub mod exporter;
pub mod naming;
pub mod patcher;
pub mod resources;
pub mod secrets;

pub use error::{Error, Result};

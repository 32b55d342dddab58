//! Atlas side of the translation: snapshot types and lookup contracts

pub mod model;
pub mod provider;
pub mod snapshot;

pub use provider::{CloudDataProvider, CredentialsGetter, StaticCredentials};
pub use snapshot::{Snapshot, SnapshotProvider};

//! Apply path: order exported objects and create them in a cluster

pub mod applier;
pub mod cluster;
pub mod sorter;

pub use applier::{Applier, ApplyReport, ApplyState};
pub use cluster::{ClusterClient, DirectoryCluster, MemoryCluster};
pub use sorter::{apply_bucket, sort_for_apply};

//! Creates exported objects in dependency order

use super::cluster::ClusterClient;
use super::sorter::sort_for_apply;
use crate::error::{Error, Result};
use crate::resources::{ObjectKey, TargetObject};

/// Outcome of one object's creation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyState {
    Created,
    CreateFailed,
}

#[derive(Debug, Default)]
pub struct ApplyReport {
    /// Objects created, in creation order
    pub created: Vec<ObjectKey>,
}

impl ApplyReport {
    pub fn state(&self, key: &ObjectKey) -> Option<ApplyState> {
        self.created.contains(key).then_some(ApplyState::Created)
    }
}

pub struct Applier<'a> {
    cluster: &'a dyn ClusterClient,
}

impl<'a> Applier<'a> {
    pub fn new(cluster: &'a dyn ClusterClient) -> Self {
        Self { cluster }
    }

    /// Create every applicable object, one at a time.
    ///
    /// The first failure stops the run; objects created before it stay.
    pub async fn apply(&self, objects: Vec<TargetObject>) -> Result<ApplyReport> {
        let ordered = sort_for_apply(objects);
        let mut report = ApplyReport::default();

        for obj in &ordered {
            let key = obj.key();
            if let Err(source) = self.cluster.create(obj).await {
                tracing::warn!("{} -> {:?}: {:#}", key, ApplyState::CreateFailed, source);
                return Err(Error::Apply {
                    key,
                    created: report.created.len(),
                    source,
                });
            }
            tracing::info!("Created {}", key);
            report.created.push(key);
        }

        Ok(report)
    }
}

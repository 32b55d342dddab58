//! Creation order for the apply path

use crate::resources::{ResourceKind, TargetObject};

/// Creation bucket of a kind; `None` for kinds the apply path does not handle
pub fn apply_bucket(kind: ResourceKind) -> Option<usize> {
    match kind {
        ResourceKind::Secret => Some(0),
        ResourceKind::Team => Some(1),
        ResourceKind::Project => Some(2),
        ResourceKind::DatabaseUser => Some(3),
        ResourceKind::BackupPolicy => Some(4),
        ResourceKind::BackupSchedule => Some(5),
        ResourceKind::Deployment => Some(6),
        _ => None,
    }
}

/// Order objects so that every object is created after what it references.
///
/// Stable within a bucket. Kinds without a bucket are dropped.
pub fn sort_for_apply(objects: Vec<TargetObject>) -> Vec<TargetObject> {
    let mut ordered: Vec<(usize, TargetObject)> = objects
        .into_iter()
        .filter_map(|obj| match apply_bucket(obj.kind()) {
            Some(bucket) => Some((bucket, obj)),
            None => {
                tracing::debug!("Not applying {}: kind has no creation order", obj.key());
                None
            }
        })
        .collect();
    ordered.sort_by_key(|(bucket, _)| *bucket);
    ordered.into_iter().map(|(_, obj)| obj).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::deployment::DeploymentSpec;
    use crate::resources::network::IpAccessListSpec;
    use crate::resources::project::ProjectSpec;
    use crate::resources::{ObjectMeta, Resource, Secret};

    fn secret(name: &str) -> TargetObject {
        TargetObject::Secret(Secret::new(ObjectMeta {
            name: name.into(),
            namespace: "default".into(),
            ..Default::default()
        }))
    }

    #[test]
    fn test_sort_buckets_and_stability() {
        let objects = vec![
            TargetObject::Deployment(Resource::new(
                ResourceKind::Deployment,
                "c0",
                "default",
                "2.5.0",
                DeploymentSpec::default(),
            )),
            secret("b"),
            TargetObject::Project(Resource::new(
                ResourceKind::Project,
                "p",
                "default",
                "2.5.0",
                ProjectSpec::default(),
            )),
            TargetObject::IpAccessList(Resource::new(
                ResourceKind::IpAccessList,
                "ip",
                "default",
                "2.5.0",
                IpAccessListSpec::default(),
            )),
            secret("a"),
        ];

        let names: Vec<String> = sort_for_apply(objects)
            .iter()
            .map(|o| o.key().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "Secret default/b",
                "Secret default/a",
                "AtlasProject default/p",
                "AtlasDeployment default/c0",
            ]
        );
    }
}

//! Post-conversion patches
//!
//! A [`Patcher`] adjusts finished objects to what the target operator
//! version actually accepts. The exporter runs every object through one.

use crate::capability::{CapabilitySet, PatchRule};
use crate::error::PatchError;
use crate::resources::{ResourceKind, TargetObject};
use std::collections::HashSet;

/// Path of the frequency type enum in the AtlasBackupPolicy schema
pub const FREQUENCY_TYPE_PATH: &str = "items.frequencyType";

pub trait Patcher: Send + Sync {
    fn patch(&self, obj: &mut TargetObject) -> Result<(), PatchError>;
}

/// Leaves every object untouched
#[derive(Debug, Clone, Copy, Default)]
pub struct NopPatcher;

impl Patcher for NopPatcher {
    fn patch(&self, _obj: &mut TargetObject) -> Result<(), PatchError> {
        Ok(())
    }
}

/// Drops backup policy items whose frequency type is not allowed
#[derive(Debug, Clone, Default)]
pub struct BackupFrequencyPruner {
    allowed: HashSet<String>,
}

impl BackupFrequencyPruner {
    pub fn new(allowed: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }
}

impl Patcher for BackupFrequencyPruner {
    fn patch(&self, obj: &mut TargetObject) -> Result<(), PatchError> {
        let actual = obj.kind();
        let TargetObject::BackupPolicy(policy) = obj else {
            return Err(PatchError::UnexpectedKind {
                expected: ResourceKind::BackupPolicy.kind_name(),
                actual: actual.kind_name(),
            });
        };

        let before = policy.spec.items.len();
        policy
            .spec
            .items
            .retain(|item| self.allowed.contains(&item.frequency_type));
        if policy.spec.items.len() != before {
            tracing::debug!(
                "Pruned {} backup policy item(s) from {}",
                before - policy.spec.items.len(),
                policy.metadata.name
            );
        }
        Ok(())
    }
}

/// Applies each kind's registered patch rule against the loaded schemas
#[derive(Debug, Default)]
pub struct SchemaPatcher {
    backup_pruner: Option<BackupFrequencyPruner>,
}

impl SchemaPatcher {
    pub fn new(capabilities: &CapabilitySet) -> Self {
        let backup_pruner = match capabilities.patch_rule(ResourceKind::BackupPolicy) {
            PatchRule::PruneFrequencyTypes => {
                let allowed =
                    capabilities.enum_values(ResourceKind::BackupPolicy, FREQUENCY_TYPE_PATH);
                // an unconstrained schema accepts any frequency
                (!allowed.is_empty()).then(|| BackupFrequencyPruner::new(allowed))
            }
            PatchRule::None => None,
        };
        Self { backup_pruner }
    }
}

impl Patcher for SchemaPatcher {
    fn patch(&self, obj: &mut TargetObject) -> Result<(), PatchError> {
        match (obj.kind(), &self.backup_pruner) {
            (ResourceKind::BackupPolicy, Some(pruner)) => pruner.patch(obj),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::SchemaNode;
    use crate::cloud::model::BackupPolicyItem;
    use crate::resources::deployment::BackupPolicySpec;
    use crate::resources::team::TeamSpec;
    use crate::resources::Resource;

    fn policy(frequencies: &[&str]) -> TargetObject {
        let items = frequencies
            .iter()
            .map(|f| BackupPolicyItem {
                frequency_type: f.to_string(),
                frequency_interval: 1,
                retention_unit: "days".into(),
                retention_value: 7,
            })
            .collect();
        TargetObject::BackupPolicy(Resource::new(
            ResourceKind::BackupPolicy,
            "c0-backuppolicy",
            "default",
            "2.5.0",
            BackupPolicySpec { items },
        ))
    }

    fn frequencies(obj: &TargetObject) -> Vec<String> {
        let TargetObject::BackupPolicy(p) = obj else {
            panic!("expected backup policy");
        };
        p.spec.items.iter().map(|i| i.frequency_type.clone()).collect()
    }

    /// Unknown frequency types go, the rest keep their order
    #[test]
    fn test_pruner_keeps_order() {
        let pruner = BackupFrequencyPruner::new(["daily", "hourly", "weekly"]);
        let mut obj = policy(&["weekly", "yearly", "hourly", "daily"]);
        pruner.patch(&mut obj).unwrap();
        assert_eq!(frequencies(&obj), vec!["weekly", "hourly", "daily"]);
    }

    #[test]
    fn test_pruner_rejects_other_kinds() {
        let pruner = BackupFrequencyPruner::new(["daily"]);
        let mut team = TargetObject::Team(Resource::new(
            ResourceKind::Team,
            "t",
            "default",
            "2.5.0",
            TeamSpec::default(),
        ));
        let err = pruner.patch(&mut team).unwrap_err();
        assert_eq!(
            err,
            PatchError::UnexpectedKind {
                expected: "AtlasBackupPolicy",
                actual: "AtlasTeam",
            }
        );
    }

    #[test]
    fn test_schema_patcher_uses_live_enum() {
        let mut frequency = SchemaNode::default();
        frequency.enum_values = vec!["hourly".into(), "daily".into()];
        let mut item = SchemaNode::default();
        item.properties.insert("frequencyType".into(), frequency);
        let mut items = SchemaNode {
            node_type: Some("array".into()),
            ..Default::default()
        };
        items.items = Some(crate::capability::schema::SchemaItems::Single(Box::new(item)));
        let mut spec = SchemaNode::default();
        spec.properties.insert("items".into(), items);

        let caps = CapabilitySet::from_schemas("2.5.0", [(ResourceKind::BackupPolicy, spec)]).unwrap();
        let patcher = SchemaPatcher::new(&caps);

        let mut obj = policy(&["yearly", "daily"]);
        patcher.patch(&mut obj).unwrap();
        assert_eq!(frequencies(&obj), vec!["daily"]);

        let mut team = TargetObject::Team(Resource::new(
            ResourceKind::Team,
            "t",
            "default",
            "2.5.0",
            TeamSpec::default(),
        ));
        assert!(patcher.patch(&mut team).is_ok());
    }

    #[test]
    fn test_schema_patcher_without_enum_is_noop() {
        let caps = CapabilitySet::from_schemas(
            "2.5.0",
            [(ResourceKind::BackupPolicy, SchemaNode::default())],
        )
        .unwrap();
        let patcher = SchemaPatcher::new(&caps);
        let mut obj = policy(&["yearly"]);
        patcher.patch(&mut obj).unwrap();
        assert_eq!(frequencies(&obj), vec!["yearly"]);
    }
}

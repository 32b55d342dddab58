//! Custom database roles

use super::ConvertContext;
use crate::cloud::model::DatabaseRole;
use crate::cloud::CloudDataProvider;
use crate::error::{CloudContext, Result};
use crate::resources::custom_role::*;
use crate::resources::{ResourceKind, TargetObject};

/// Role definition shared by the standalone kind and the project section
pub fn definition(role: &DatabaseRole) -> CustomRoleDefinition {
    CustomRoleDefinition {
        name: role.role_name.clone(),
        inherited_roles: role
            .inherited_roles
            .iter()
            .map(|r| InheritedRoleSpec {
                name: r.role.clone(),
                database: r.db.clone(),
            })
            .collect(),
        actions: role
            .actions
            .iter()
            .map(|a| ActionSpec {
                name: a.action.clone(),
                resources: a
                    .resources
                    .iter()
                    .map(|r| ActionResourceSpec {
                        cluster: r.cluster,
                        database: r.db.clone(),
                        collection: r.collection.clone(),
                    })
                    .collect(),
            })
            .collect(),
    }
}

pub async fn fetch(
    cloud: &dyn CloudDataProvider,
    ctx: &ConvertContext<'_>,
) -> Result<Vec<DatabaseRole>> {
    let id = ctx.project_id();
    cloud
        .database_roles(id)
        .await
        .cloud_context(|| format!("list custom roles of project {}", id))
}

pub fn build(roles: Vec<DatabaseRole>, ctx: &mut ConvertContext<'_>) -> Vec<TargetObject> {
    roles
        .iter()
        .map(|role| {
            let name = ctx.name(
                ResourceKind::CustomRole,
                &format!("{}-{}", ctx.project_name, role.role_name),
            );
            let spec = CustomRoleSpec {
                project: ctx.project_reference(ResourceKind::CustomRole),
                role: definition(role),
            };
            TargetObject::CustomRole(ctx.resource(ResourceKind::CustomRole, name, spec))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use crate::cloud::model::{ActionResource, InheritedRole, RoleAction};

    #[test]
    fn test_custom_role_definition() {
        let caps = capabilities(&[(ResourceKind::CustomRole, &["role"])]);
        let creds = credentials();
        let mut ctx = context(&caps, &creds);
        let roles = vec![DatabaseRole {
            role_name: "reporting_ro".into(),
            inherited_roles: vec![InheritedRole {
                role: "read".into(),
                db: "reports".into(),
            }],
            actions: vec![RoleAction {
                action: "FIND".into(),
                resources: vec![ActionResource {
                    db: Some("reports".into()),
                    collection: Some("daily".into()),
                    ..Default::default()
                }],
            }],
        }];

        let objects = build(roles, &mut ctx);
        let TargetObject::CustomRole(role) = &objects[0] else {
            panic!("expected custom role");
        };
        assert_eq!(role.metadata.name, "prod-cluster-reporting-ro");
        assert_eq!(role.spec.role.name, "reporting_ro");
        assert_eq!(role.spec.role.inherited_roles[0].database, "reports");
        assert_eq!(
            role.spec.role.actions[0].resources[0].collection.as_deref(),
            Some("daily")
        );
    }
}

//! AtlasDatabaseUser objects and their password secrets

use super::ConvertContext;
use crate::cloud::model::{DatabaseUser, AUTH_NONE};
use crate::cloud::CloudDataProvider;
use crate::error::{CloudContext, Result};
use crate::resources::database_user::DatabaseUserSpec;
use crate::resources::{LocalRef, ResourceKind, TargetObject};
use crate::secrets::PASSWORD_FIELD;

pub async fn fetch(
    cloud: &dyn CloudDataProvider,
    ctx: &ConvertContext<'_>,
) -> Result<Vec<DatabaseUser>> {
    let id = ctx.project_id();
    cloud
        .database_users(id)
        .await
        .cloud_context(|| format!("list database users of project {}", id))
}

/// Auth type, dropped when Atlas reports it as unused
fn auth_type(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|v| !v.is_empty() && *v != AUTH_NONE)
        .map(str::to_string)
}

pub fn build(users: Vec<DatabaseUser>, ctx: &mut ConvertContext<'_>) -> Vec<TargetObject> {
    let mut objects = Vec::with_capacity(users.len() * 2);

    for user in users {
        let raw = format!("{}-{}", ctx.project_name, user.username);
        let name = ctx.name(ResourceKind::DatabaseUser, &raw);

        let mut spec = DatabaseUserSpec {
            project: ctx.project_reference(ResourceKind::DatabaseUser),
            username: user.username.clone(),
            database_name: user.database_name.clone(),
            delete_after_date: user.delete_after_date.map(|d| d.to_rfc3339()),
            labels: user.labels.clone(),
            roles: user.roles.clone(),
            scopes: user.scopes.clone(),
            password_secret_ref: None,
            x509_type: auth_type(&user.x509_type),
            aws_iam_type: auth_type(&user.aws_iam_type),
            ldap_auth_type: auth_type(&user.ldap_auth_type),
            oidc_auth_type: auth_type(&user.oidc_auth_type),
        };

        let secret = if user.uses_password() {
            let secret_name = ctx.name(ResourceKind::Secret, &raw);
            spec.password_secret_ref = Some(LocalRef::new(secret_name.clone()));
            Some(
                ctx.secret(secret_name)
                    .field(PASSWORD_FIELD, user.password.as_deref())
                    .with_project_labels(ctx.project_id(), &ctx.project.name)
                    .build(),
            )
        } else {
            None
        };

        tracing::debug!("Converted database user {} as {}", user.username, name);
        objects.push(TargetObject::DatabaseUser(ctx.resource(
            ResourceKind::DatabaseUser,
            name,
            spec,
        )));
        objects.extend(secret.map(TargetObject::Secret));
    }

    objects
}

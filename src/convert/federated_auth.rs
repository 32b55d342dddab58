//! AtlasFederatedAuth for the organization's identity federation

use super::ConvertContext;
use crate::cloud::model::{ConnectedOrgConfig, FederationSettings, IdentityProvider};
use crate::cloud::CloudDataProvider;
use crate::error::{CloudContext, Result};
use crate::resources::federated_auth::*;
use crate::resources::{ResourceKind, TargetObject};
use std::collections::HashMap;

#[derive(Debug)]
pub struct FederatedAuthData {
    pub settings: FederationSettings,
    pub org_config: ConnectedOrgConfig,
    pub identity_provider: Option<IdentityProvider>,
    /// Atlas project id to display name, for role assignments
    pub project_names: HashMap<String, String>,
}

/// `None` when the organization has no federation with an identity provider
pub async fn fetch(
    cloud: &dyn CloudDataProvider,
    ctx: &ConvertContext<'_>,
) -> Result<Option<FederatedAuthData>> {
    let org_id = ctx.org_id.as_str();
    let settings = cloud
        .federation_settings(org_id)
        .await
        .cloud_context(|| format!("get federation settings of organization {}", org_id))?;

    let Some(settings) = settings else {
        tracing::debug!("Organization {} has no federation settings", org_id);
        return Ok(None);
    };
    let Some(idp_id) = settings
        .identity_provider_id
        .clone()
        .filter(|id| !id.is_empty())
    else {
        tracing::debug!("Federation {} has no identity provider", settings.id);
        return Ok(None);
    };

    let org_config = cloud
        .connected_org_config(&settings.id, org_id)
        .await
        .cloud_context(|| format!("get org config of federation {}", settings.id))?;

    let identity_provider = match cloud.identity_provider(&settings.id, &idp_id).await {
        Ok(idp) => Some(idp),
        Err(e) => {
            tracing::warn!(
                "Failed to get identity provider {} of federation {}: {:#}",
                idp_id,
                settings.id,
                e
            );
            None
        }
    };

    let mut project_names = HashMap::new();
    let group_ids = org_config
        .role_mappings
        .iter()
        .flat_map(|m| m.role_assignments.iter())
        .filter_map(|a| a.group_id.as_deref())
        .filter(|id| !id.is_empty());
    for group_id in group_ids {
        if project_names.contains_key(group_id) {
            continue;
        }
        match cloud.project(group_id).await {
            Ok(project) => {
                project_names.insert(group_id.to_string(), project.name);
            }
            Err(e) => tracing::warn!("Failed to get project name for group {}: {:#}", group_id, e),
        }
    }

    Ok(Some(FederatedAuthData {
        settings,
        org_config,
        identity_provider,
        project_names,
    }))
}

fn role_mappings(config: &ConnectedOrgConfig, project_names: &HashMap<String, String>) -> Vec<RoleMappingSpec> {
    config
        .role_mappings
        .iter()
        .map(|mapping| RoleMappingSpec {
            external_group_name: mapping.external_group_name.clone(),
            role_assignments: mapping
                .role_assignments
                .iter()
                .filter_map(|a| match a.group_id.as_deref().filter(|id| !id.is_empty()) {
                    // unresolved projects were logged while fetching
                    Some(group_id) => project_names.get(group_id).map(|name| RoleAssignmentSpec {
                        project_name: Some(name.clone()),
                        role: a.role.clone(),
                    }),
                    None => Some(RoleAssignmentSpec {
                        project_name: None,
                        role: a.role.clone(),
                    }),
                })
                .collect(),
        })
        .collect()
}

pub fn build(data: FederatedAuthData, ctx: &mut ConvertContext<'_>) -> Vec<TargetObject> {
    let name = ctx.name(
        ResourceKind::FederatedAuth,
        &format!("{}-{}", ctx.project_name, data.settings.id),
    );
    let spec = FederatedAuthSpec {
        enabled: true,
        connection_secret_ref: ctx
            .include_secrets
            .then(|| ctx.local_ref(&ctx.credentials_secret)),
        domain_allow_list: data.org_config.domain_allow_list.clone(),
        domain_restriction_enabled: data.org_config.domain_restriction_enabled,
        sso_debug_enabled: data.identity_provider.and_then(|idp| idp.sso_debug_enabled),
        post_auth_role_grants: data.org_config.post_auth_role_grants.clone(),
        role_mappings: role_mappings(&data.org_config, &data.project_names),
    };
    vec![TargetObject::FederatedAuth(ctx.resource(
        ResourceKind::FederatedAuth,
        name,
        spec,
    ))]
}

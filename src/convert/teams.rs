//! AtlasTeam objects for the teams assigned to a project

use super::ConvertContext;
use crate::cloud::model::{Team, TeamAssignment};
use crate::cloud::CloudDataProvider;
use crate::error::{CloudContext, Error, Result};
use crate::resources::project::TeamRefSpec;
use crate::resources::team::TeamSpec;
use crate::resources::{ResourceKind, TargetObject};

#[derive(Debug)]
pub struct AssignedTeam {
    pub team: Team,
    pub usernames: Vec<String>,
    pub roles: Vec<String>,
}

pub async fn fetch(
    cloud: &dyn CloudDataProvider,
    ctx: &ConvertContext<'_>,
) -> Result<Vec<AssignedTeam>> {
    let project_id = ctx.project_id();
    if !ctx.supports(ResourceKind::Project, "teams") {
        tracing::debug!("Project schema has no teams, skipping teams of {}", project_id);
        return Ok(Vec::new());
    }
    let assignments = cloud
        .project_teams(project_id)
        .await
        .cloud_context(|| format!("list teams of project {}", project_id))?;

    let mut teams = Vec::with_capacity(assignments.len());
    for TeamAssignment {
        team_id,
        role_names,
    } in assignments
    {
        let lookup_failed = |what: &str, e: anyhow::Error| {
            Error::conversion(
                ResourceKind::Team.kind_name(),
                format!(
                    "failed to get {} for team {} of project {}: {:#}",
                    what, team_id, project_id, e
                ),
            )
        };

        let team = cloud
            .team_by_id(&ctx.org_id, &team_id)
            .await
            .map_err(|e| lookup_failed("details", e))?;
        let users = cloud
            .team_users(&ctx.org_id, &team_id)
            .await
            .map_err(|e| lookup_failed("members", e))?;

        teams.push(AssignedTeam {
            team,
            usernames: users.into_iter().map(|u| u.username).collect(),
            roles: role_names,
        });
    }
    Ok(teams)
}

/// Emit the teams and reference them from the AtlasProject in `out`
pub fn build(teams: Vec<AssignedTeam>, ctx: &mut ConvertContext<'_>, out: &mut Vec<TargetObject>) {
    let mut refs = Vec::with_capacity(teams.len());

    for AssignedTeam {
        team,
        usernames,
        roles,
    } in teams
    {
        let name = ctx.name(
            ResourceKind::Team,
            &format!("{}-team-{}", ctx.project_name, team.name),
        );
        refs.push(TeamRefSpec {
            team_ref: ctx.local_ref(&name),
            roles,
        });
        let spec = TeamSpec {
            name: team.name,
            usernames,
        };
        out.push(TargetObject::Team(ctx.resource(ResourceKind::Team, name, spec)));
    }

    let project_name = ctx.project_name.as_str();
    if let Some(TargetObject::Project(project)) = out
        .iter_mut()
        .find(|o| o.kind() == ResourceKind::Project && o.name() == project_name)
    {
        project.spec.teams.extend(refs);
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use super::*;
    use crate::cloud::snapshot::{OrganizationSnapshot, ProjectSnapshot, Snapshot, SnapshotProvider, TeamSnapshot};
    use crate::cloud::model::Project;
    use crate::resources::project::ProjectSpec;

    fn cloud(with_team: bool) -> SnapshotProvider {
        let teams = if with_team {
            vec![TeamSnapshot {
                id: "t1".into(),
                name: "Ops Team".into(),
                usernames: vec!["a@corp.io".into(), "b@corp.io".into()],
            }]
        } else {
            Vec::new()
        };
        SnapshotProvider::new(Snapshot {
            projects: vec![ProjectSnapshot {
                project: Project {
                    id: "p1".into(),
                    org_id: "o1".into(),
                    ..Default::default()
                },
                teams: vec![TeamAssignment {
                    team_id: "t1".into(),
                    role_names: vec!["GROUP_OWNER".into()],
                }],
                ..Default::default()
            }],
            organizations: vec![OrganizationSnapshot {
                id: "o1".into(),
                teams,
                ..Default::default()
            }],
        })
    }

    #[tokio::test]
    async fn test_teams_are_referenced_from_project() {
        let caps = capabilities(&[
            (ResourceKind::Project, &["teams"]),
            (ResourceKind::Team, &["name"]),
        ]);
        let creds = credentials();
        let mut ctx = context(&caps, &creds);
        let project = ctx.resource(ResourceKind::Project, "prod-cluster", ProjectSpec::default());
        let mut out = vec![TargetObject::Project(project)];

        let teams = fetch(&cloud(true), &ctx).await.unwrap();
        build(teams, &mut ctx, &mut out);

        assert_eq!(out.len(), 2);
        assert_eq!(out[1].name(), "prod-cluster-team-ops-team");
        let TargetObject::Project(project) = &out[0] else {
            panic!("expected project");
        };
        assert_eq!(project.spec.teams[0].team_ref.name, "prod-cluster-team-ops-team");
        assert_eq!(project.spec.teams[0].roles, vec!["GROUP_OWNER"]);
    }

    #[tokio::test]
    async fn test_failed_team_lookup_is_conversion_error() {
        let caps = capabilities(&[
            (ResourceKind::Project, &["teams"]),
            (ResourceKind::Team, &[]),
        ]);
        let creds = credentials();
        let ctx = context(&caps, &creds);

        let err = fetch(&cloud(false), &ctx).await.unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, Error::Conversion { .. }));
        assert!(message.contains("t1") && message.contains("p1"), "{}", message);
    }

    /// Without `teams` on the project there is nothing to reference a team
    #[tokio::test]
    async fn test_no_teams_without_project_field() {
        let caps = capabilities(&[
            (ResourceKind::Project, &["name"]),
            (ResourceKind::Team, &["name"]),
        ]);
        let creds = credentials();
        let mut ctx = context(&caps, &creds);
        let project = ctx.resource(ResourceKind::Project, "prod-cluster", ProjectSpec::default());
        let mut out = vec![TargetObject::Project(project)];

        let teams = fetch(&cloud(true), &ctx).await.unwrap();
        assert!(teams.is_empty());
        build(teams, &mut ctx, &mut out);
        assert_eq!(out.len(), 1);
    }
}

//! Export pipeline: one Atlas project in, a checked batch of operator objects out

use crate::capability::CapabilitySet;
use crate::cloud::{CloudDataProvider, CredentialsGetter};
use crate::convert::{ConvertContext, Converter};
use crate::error::{CloudContext, Error, Result};
use crate::naming::NameDictionary;
use crate::patcher::{NopPatcher, Patcher};
use crate::resources::{ObjectKey, ResourceKind, TargetObject};
use std::collections::HashSet;

/// Document separator; leads the output and follows every document
pub const YAML_SEPARATOR: &str = "---\r\n";

/// What to export and how
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    pub project_id: String,
    /// When set, the project must belong to this organization
    pub org_id: Option<String>,
    pub namespace: String,
    pub include_secrets: bool,
    pub independent: bool,
    /// Deployments to export; empty exports all of them
    pub cluster_names: Vec<String>,
    /// Data federations to export; empty exports all of them
    pub data_federation_names: Vec<String>,
}

pub struct Exporter<'a> {
    cloud: &'a dyn CloudDataProvider,
    credentials: &'a dyn CredentialsGetter,
    capabilities: &'a CapabilitySet,
    options: ExportOptions,
    patcher: Box<dyn Patcher + 'a>,
}

impl<'a> Exporter<'a> {
    pub fn new(
        cloud: &'a dyn CloudDataProvider,
        credentials: &'a dyn CredentialsGetter,
        capabilities: &'a CapabilitySet,
        options: ExportOptions,
    ) -> Self {
        Self {
            cloud,
            credentials,
            capabilities,
            options,
            patcher: Box::new(NopPatcher),
        }
    }

    pub fn with_patcher(mut self, patcher: impl Patcher + 'a) -> Self {
        self.patcher = Box::new(patcher);
        self
    }

    /// Convert, check and patch every object of the project
    pub async fn export(&self) -> Result<Vec<TargetObject>> {
        let options = &self.options;
        let project_id = options.project_id.as_str();
        let project = self
            .cloud
            .project(project_id)
            .await
            .cloud_context(|| format!("get project {}", project_id))?;

        if let Some(org_id) = options.org_id.as_deref() {
            if org_id != project.org_id {
                return Err(Error::Validation(format!(
                    "project {} belongs to organization {}, not {}",
                    project_id, project.org_id, org_id
                )));
            }
        }

        let mut names = NameDictionary::new();
        let project_name = names.assign(ResourceKind::Project, &project.name);
        let credentials_secret =
            names.assign(ResourceKind::Secret, &format!("{}-credentials", project_name));
        tracing::info!(
            "Exporting project {} ({}) as {} for operator {}",
            project.name,
            project.id,
            project_name,
            self.capabilities.version()
        );

        let mut ctx = ConvertContext {
            org_id: options.org_id.clone().unwrap_or_else(|| project.org_id.clone()),
            project,
            project_name,
            namespace: options.namespace.clone(),
            version: self.capabilities.version_label(),
            include_secrets: options.include_secrets,
            independent: options.independent,
            credentials_secret,
            cluster_names: options.cluster_names.clone(),
            data_federation_names: options.data_federation_names.clone(),
            capabilities: self.capabilities,
            credentials: self.credentials,
            names,
        };

        let mut objects = Vec::new();
        for converter in Converter::ORDER {
            if !converter.is_enabled(self.capabilities) {
                tracing::debug!(
                    "Skipping {}: not supported by operator {}",
                    converter.label(),
                    self.capabilities.version()
                );
                continue;
            }
            converter.run(self.cloud, &mut ctx, &mut objects).await?;
        }

        check_references(&objects)?;

        for obj in &mut objects {
            self.patcher.patch(obj).map_err(|source| Error::Patch {
                key: obj.key(),
                source,
            })?;
        }

        Ok(objects)
    }

    /// Export and serialize as a multi-document YAML stream
    pub async fn run(&self) -> Result<String> {
        let objects = self.export().await?;
        serialize(&objects)
    }
}

/// Every reference must point at an object of the same batch
pub fn check_references(objects: &[TargetObject]) -> Result<()> {
    let present: HashSet<ObjectKey> = objects.iter().map(TargetObject::key).collect();
    for obj in objects {
        if let Some(missing) = obj.references().into_iter().find(|r| !present.contains(r)) {
            return Err(Error::conversion(
                obj.kind().kind_name(),
                format!("{} references {}, which is not part of the export", obj.key(), missing),
            ));
        }
    }
    Ok(())
}

pub fn serialize(objects: &[TargetObject]) -> Result<String> {
    let mut output = String::from(YAML_SEPARATOR);
    for obj in objects {
        let document = serde_yaml::to_string(obj).map_err(|source| Error::Serialize {
            key: obj.key(),
            source,
        })?;
        output.push_str(&document);
        output.push_str(YAML_SEPARATOR);
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::deployment::DeploymentSpec;
    use crate::resources::team::TeamSpec;
    use crate::resources::{ProjectReference, Resource};

    fn team(name: &str) -> TargetObject {
        TargetObject::Team(Resource::new(
            ResourceKind::Team,
            name,
            "default",
            "2.5.0",
            TeamSpec {
                name: name.into(),
                usernames: Vec::new(),
            },
        ))
    }

    #[test]
    fn test_serialize_separators() {
        let output = serialize(&[team("a"), team("b")]).unwrap();
        assert!(output.starts_with("---\r\napiVersion: atlas.mongodb.com/v1\n"));
        assert!(output.ends_with("---\r\n"));
        assert_eq!(output.matches(YAML_SEPARATOR).count(), 3);
    }

    #[test]
    fn test_serialize_empty_batch() {
        assert_eq!(serialize(&[]).unwrap(), YAML_SEPARATOR);
    }

    #[test]
    fn test_dangling_reference_rejected() {
        let deployment = TargetObject::Deployment(Resource::new(
            ResourceKind::Deployment,
            "c0",
            "default",
            "2.5.0",
            DeploymentSpec {
                project: ProjectReference::project("prod", "default"),
                ..Default::default()
            },
        ));
        let err = check_references(&[deployment, team("prod")]).unwrap_err();
        assert!(matches!(err, Error::Conversion { kind: "AtlasDeployment", .. }));
        assert!(err.to_string().contains("AtlasProject default/prod"));
    }
}

//! AtlasDataFederation objects

use super::ConvertContext;
use crate::cloud::model::{is_terminal_state, DataFederation};
use crate::cloud::CloudDataProvider;
use crate::error::{CloudContext, Error, Result};
use crate::resources::data_federation::DataFederationSpec;
use crate::resources::{ResourceKind, TargetObject};

/// Live federated database instances, narrowed to the requested names
pub async fn fetch(
    cloud: &dyn CloudDataProvider,
    ctx: &ConvertContext<'_>,
) -> Result<Vec<DataFederation>> {
    let id = ctx.project_id();
    let mut federations = cloud
        .data_federations(id)
        .await
        .cloud_context(|| format!("list data federations of project {}", id))?;

    if !ctx.data_federation_names.is_empty() {
        if let Some(missing) = ctx
            .data_federation_names
            .iter()
            .find(|n| !federations.iter().any(|f| &f.name == *n))
        {
            return Err(Error::conversion(
                ResourceKind::DataFederation.kind_name(),
                format!("data federation not found: {}", missing),
            ));
        }
        federations.retain(|f| ctx.data_federation_names.contains(&f.name));
    }

    federations.retain(|f| {
        let live = !is_terminal_state(f.state.as_deref());
        if !live {
            tracing::debug!("Skipping data federation {} ({:?})", f.name, f.state);
        }
        live
    });
    Ok(federations)
}

pub fn build(federations: Vec<DataFederation>, ctx: &mut ConvertContext<'_>) -> Vec<TargetObject> {
    let kind = ResourceKind::DataFederation;
    let with_provider_config = ctx.supports(kind, "cloudProviderConfig");
    let with_region = ctx.supports(kind, "dataProcessRegion");
    let with_storage = ctx.supports(kind, "storage");

    federations
        .into_iter()
        .map(|federation| {
            let name = ctx.name(kind, &format!("{}-{}", ctx.project_name, federation.name));
            let spec = DataFederationSpec {
                project: ctx.project_reference(kind),
                name: federation.name,
                cloud_provider_config: federation
                    .cloud_provider_config
                    .filter(|_| with_provider_config),
                data_process_region: federation.data_process_region.filter(|_| with_region),
                storage: federation.storage.filter(|_| with_storage),
            };
            TargetObject::DataFederation(ctx.resource(kind, name, spec))
        })
        .collect()
}

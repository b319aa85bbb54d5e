//! Deriving a project's current members from what exists on the platform.

use crate::client::{ListFilter, Resource, ResourceClient};
use crate::environment::{Environment, EnvironmentSet};
use crate::error::{ProjectError, Result};

/// One existing resource of a project, paired with its catalog environment.
#[derive(Debug, Clone)]
pub struct Member<'a> {
    pub environment: &'a Environment,
    pub resource: Resource,
}

/// Lists the project's resources, in the order the platform returned them.
///
/// Resources that share the prefix but do not end in a catalog environment
/// are skipped. No match at all is [`ProjectError::ProjectNotFound`].
pub async fn discover<'a>(
    client: &dyn ResourceClient,
    environments: &'a EnvironmentSet,
    project: &str,
) -> Result<Vec<Member<'a>>> {
    let resources = client.list(&ListFilter::project(project)).await?;
    tracing::debug!(project, found = resources.len(), "listed project resources");

    let members: Vec<Member<'a>> = resources
        .into_iter()
        .filter_map(|resource| {
            environments
                .environment_of(project, &resource.name)
                .map(|environment| Member {
                    environment,
                    resource,
                })
        })
        .collect();

    if members.is_empty() {
        return Err(ProjectError::ProjectNotFound);
    }
    Ok(members)
}

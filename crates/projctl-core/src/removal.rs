//! Deleting a project from every environment in the catalog.

use std::io::Write;

use crate::client::ResourceClient;
use crate::environment::{EnvironmentSet, resource_name};
use crate::error::{EnvironmentFailure, ProjectError, Result};
use crate::progress;

pub struct BulkRemover<'a> {
    client: &'a dyn ResourceClient,
    environments: &'a EnvironmentSet,
}

impl<'a> BulkRemover<'a> {
    pub fn new(client: &'a dyn ResourceClient, environments: &'a EnvironmentSet) -> Self {
        Self {
            client,
            environments,
        }
    }

    /// Deletes `{project}-{env}` for every catalog environment, in catalog
    /// order, printing `Deleting from env "<env>"... ok|failed` as each call
    /// completes.
    ///
    /// A project may exist in only some environments, so a failure never
    /// stops the batch.
    ///
    /// # Errors
    ///
    /// [`ProjectError::ProjectNotFound`] when every environment answered
    /// "not found", [`ProjectError::BulkRemoval`] when any other
    /// combination of failures occurred.
    pub async fn remove<W: Write>(&self, project: &str, out: &mut W) -> Result<()> {
        if project.trim().is_empty() {
            return Err(ProjectError::MissingName);
        }

        let mut failures: Vec<EnvironmentFailure> = Vec::new();
        for env in self.environments.iter() {
            let resource = resource_name(project, env);
            progress::begin(out, &format!("Deleting from env {:?}", env.name))?;
            let result = self.client.delete(&resource).await;
            progress::finish(out, result.is_ok())?;
            if let Err(cause) = result {
                tracing::warn!(%resource, error = %cause, "failed to delete resource");
                failures.push(EnvironmentFailure {
                    environment: env.name.clone(),
                    cause,
                });
            }
        }

        if failures.is_empty() {
            tracing::info!(project, "project removed");
            return Ok(());
        }
        if failures.len() == self.environments.len() && failures.iter().all(|f| f.cause.is_not_found())
        {
            return Err(ProjectError::ProjectNotFound);
        }
        Err(ProjectError::BulkRemoval {
            project: project.to_string(),
            environments: failures.into_iter().map(|f| f.environment).collect(),
        })
    }
}

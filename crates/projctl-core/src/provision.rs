//! Creating a project's resources across environments.
//!
//! Creation is strictly sequential. The first failed call stops the batch
//! and every resource already created in it is deleted again before the
//! error is returned:
//!
//! - create fails at environment *k*: resources `[0, k)` are removed and
//!   nothing at or after *k* is attempted;
//! - an address call fails: every created resource is removed.
//!
//! Deletions during rollback are best-effort. Their failures are logged and
//! never replace the original error.

use crate::client::{CreateRequest, ResourceClient};
use crate::environment::{
    Environment, EnvironmentSet, resolve_address, resolve_pool_name, resource_name,
};
use crate::error::{ProjectError, ProvisionStage, Result};

/// Input for a brand new project.
#[derive(Debug, Clone, Default)]
pub struct ProvisionRequest {
    pub project: String,
    pub platform: String,
    pub team: String,
    pub plan: String,
    pub description: String,
    /// Target environments in the order they are created. Empty means the
    /// whole catalog.
    pub environments: Vec<String>,
}

/// Settings shared by every resource of one provisioning batch.
#[derive(Debug, Clone, Default)]
pub(crate) struct ResourceTemplate {
    pub platform: String,
    pub team: String,
    pub plan: String,
    pub description: String,
}

/// A resource created and addressed by this operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionedResource {
    pub name: String,
    pub environment: String,
    pub address: String,
    pub repository_url: Option<String>,
}

pub struct ProvisionOrchestrator<'a> {
    client: &'a dyn ResourceClient,
    environments: &'a EnvironmentSet,
}

impl<'a> ProvisionOrchestrator<'a> {
    pub fn new(client: &'a dyn ResourceClient, environments: &'a EnvironmentSet) -> Self {
        Self {
            client,
            environments,
        }
    }

    /// Creates one resource per requested environment and points each
    /// environment's address at it.
    ///
    /// # Errors
    ///
    /// Input problems are reported before any remote call. A failed remote
    /// call yields [`ProjectError::Provision`] after rollback.
    pub async fn provision(&self, request: &ProvisionRequest) -> Result<Vec<ProvisionedResource>> {
        if request.project.trim().is_empty() {
            return Err(ProjectError::MissingName);
        }
        if request.platform.trim().is_empty() {
            return Err(ProjectError::MissingPlatform);
        }
        let targets = self.environments.select_or_all(&request.environments)?;
        let template = ResourceTemplate {
            platform: request.platform.clone(),
            team: request.team.clone(),
            plan: request.plan.clone(),
            description: request.description.clone(),
        };
        let created = self
            .provision_environments(&request.project, &template, &targets)
            .await?;
        tracing::info!(
            project = %request.project,
            environments = created.len(),
            "project provisioned"
        );
        Ok(created)
    }

    /// Runs the create-then-address batch over already validated targets.
    pub(crate) async fn provision_environments(
        &self,
        project: &str,
        template: &ResourceTemplate,
        targets: &[&Environment],
    ) -> Result<Vec<ProvisionedResource>> {
        let mut created: Vec<ProvisionedResource> = Vec::with_capacity(targets.len());

        for env in targets {
            let request = CreateRequest {
                name: resource_name(project, env),
                platform: template.platform.clone(),
                plan: template.plan.clone(),
                team: template.team.clone(),
                pool: resolve_pool_name(env),
                description: template.description.clone(),
            };
            tracing::debug!(resource = %request.name, "creating resource");
            match self.client.create(&request).await {
                Ok(resource) => created.push(ProvisionedResource {
                    name: request.name,
                    environment: env.name.clone(),
                    address: resolve_address(project, env),
                    repository_url: resource.repository_url.filter(|url| !url.is_empty()),
                }),
                Err(cause) => {
                    self.rollback(&created).await;
                    return Err(ProjectError::Provision {
                        project: project.to_string(),
                        environment: env.name.clone(),
                        stage: ProvisionStage::Create,
                        cause,
                    });
                }
            }
        }

        for resource in &created {
            tracing::debug!(resource = %resource.name, address = %resource.address, "setting address");
            if let Err(cause) = self
                .client
                .set_address(&resource.name, &resource.address)
                .await
            {
                self.rollback(&created).await;
                return Err(ProjectError::Provision {
                    project: project.to_string(),
                    environment: resource.environment.clone(),
                    stage: ProvisionStage::Address,
                    cause,
                });
            }
        }

        Ok(created)
    }

    /// Best-effort removal of resources created earlier in the batch.
    async fn rollback(&self, created: &[ProvisionedResource]) {
        for resource in created {
            match self.client.delete(&resource.name).await {
                Ok(()) => tracing::debug!(resource = %resource.name, "rolled back"),
                Err(e) => tracing::warn!(
                    resource = %resource.name,
                    error = %e,
                    "rollback delete failed, resource may be left behind"
                ),
            }
        }
    }
}

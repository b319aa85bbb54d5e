//! Changing an existing project's environments and metadata.
//!
//! Execution order is fixed: additions, then removals, then metadata
//! updates on every environment that is still a member. Additions are
//! all-or-nothing (see [`crate::provision`]) and abort the whole operation
//! before anything is removed. Removals and updates are independent per
//! environment: every one is attempted and the failures are reported
//! together.

use std::io::Write;

use crate::client::{MetadataUpdate, ResourceClient};
use crate::discovery::discover;
use crate::environment::{Environment, EnvironmentSet, resource_name};
use crate::error::{EnvironmentFailure, ProjectError, Result};
use crate::progress;
use crate::provision::{ProvisionOrchestrator, ProvisionedResource, ResourceTemplate};

#[derive(Debug, Clone, Default)]
pub struct ReconcileRequest {
    pub project: String,
    pub changes: MetadataUpdate,
    pub add_environments: Vec<String>,
    pub remove_environments: Vec<String>,
}

/// What a successful reconcile did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileOutcome {
    pub added: Vec<ProvisionedResource>,
    pub removed: Vec<String>,
    pub updated: Vec<String>,
}

pub struct ReconcileOrchestrator<'a> {
    client: &'a dyn ResourceClient,
    environments: &'a EnvironmentSet,
}

impl<'a> ReconcileOrchestrator<'a> {
    pub fn new(client: &'a dyn ResourceClient, environments: &'a EnvironmentSet) -> Self {
        Self {
            client,
            environments,
        }
    }

    /// Applies the request, writing one status line per removal and update.
    ///
    /// # Errors
    ///
    /// Validation errors come first and leave the platform untouched. A
    /// failed addition is returned on its own. Otherwise every failed
    /// removal or update is collected into [`ProjectError::PartialFailure`].
    pub async fn reconcile<W: Write>(
        &self,
        request: &ReconcileRequest,
        out: &mut W,
    ) -> Result<ReconcileOutcome> {
        let project = request.project.as_str();
        if project.trim().is_empty() {
            return Err(ProjectError::MissingName);
        }
        let additions = self.environments.select(&request.add_environments)?;

        let members = discover(self.client, self.environments, project).await?;
        let current: Vec<&Environment> = members.iter().map(|m| m.environment).collect();
        let is_current = |name: &str| current.iter().any(|env| env.name == name);

        if let Some(env) = additions.iter().find(|env| is_current(env.name.as_str())) {
            return Err(ProjectError::DuplicateEnvironment(env.name.clone()));
        }
        let mut removals: Vec<&Environment> = Vec::new();
        for name in dedup(&request.remove_environments) {
            match current.iter().copied().find(|env| env.name == name) {
                Some(env) => removals.push(env),
                None => return Err(ProjectError::UndefinedEnvironment(name)),
            }
        }

        let mut outcome = ReconcileOutcome::default();

        if !additions.is_empty() {
            // The existing project supplies whatever the request leaves out.
            let reference = &members[0].resource;
            let template = ResourceTemplate {
                platform: reference.platform.clone(),
                team: request
                    .changes
                    .team
                    .clone()
                    .unwrap_or_else(|| reference.team_owner.clone()),
                plan: request
                    .changes
                    .plan
                    .clone()
                    .or_else(|| reference.plan.as_ref().map(|p| p.name.clone()))
                    .unwrap_or_default(),
                description: request
                    .changes
                    .description
                    .clone()
                    .unwrap_or_else(|| reference.description.clone()),
            };
            outcome.added = ProvisionOrchestrator::new(self.client, self.environments)
                .provision_environments(project, &template, &additions)
                .await?;
        }

        let mut failures = Vec::new();

        for env in &removals {
            let resource = resource_name(project, env);
            progress::begin(out, &format!("Removing from env {:?}", env.name))?;
            let result = self.client.delete(&resource).await;
            progress::finish(out, result.is_ok())?;
            match result {
                Ok(()) => outcome.removed.push(env.name.clone()),
                Err(cause) => {
                    tracing::warn!(%resource, error = %cause, "failed to remove environment");
                    failures.push(EnvironmentFailure {
                        environment: env.name.clone(),
                        cause,
                    });
                }
            }
        }

        if !request.changes.is_empty() {
            let survivors = self.environments.iter().filter(|env| {
                (is_current(env.name.as_str()) && !removals.iter().any(|gone| gone.name == env.name))
                    || additions.iter().any(|added| added.name == env.name)
            });
            for env in survivors {
                let resource = resource_name(project, env);
                progress::begin(out, &format!("Updating env {:?}", env.name))?;
                let result = self.client.update(&resource, &request.changes).await;
                progress::finish(out, result.is_ok())?;
                match result {
                    Ok(()) => outcome.updated.push(env.name.clone()),
                    Err(cause) => {
                        tracing::warn!(%resource, error = %cause, "failed to update environment");
                        failures.push(EnvironmentFailure {
                            environment: env.name.clone(),
                            cause,
                        });
                    }
                }
            }
        }

        if !failures.is_empty() {
            return Err(ProjectError::partial_failure(
                format!("update the project {project:?}"),
                failures,
            ));
        }
        tracing::info!(
            project,
            added = outcome.added.len(),
            removed = outcome.removed.len(),
            updated = outcome.updated.len(),
            "project reconciled"
        );
        Ok(outcome)
    }
}

/// Drops repeated names, keeping first occurrences in order.
fn dedup(names: &[String]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        if !seen.contains(name) {
            seen.push(name.clone());
        }
    }
    seen
}

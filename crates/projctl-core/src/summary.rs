//! Read-only views over projects: one project in detail, or all of them.

use std::collections::BTreeMap;

use time::OffsetDateTime;

use crate::client::{DeploymentRecord, ListFilter, Resource, ResourceClient, Unit};
use crate::discovery::discover;
use crate::environment::{Environment, EnvironmentSet, resource_name};
use crate::error::{ProjectError, Result};

/// Project-wide attributes, taken from one member resource.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectHeader {
    pub name: String,
    pub description: String,
    pub repository: String,
    pub platform: String,
    pub teams: Vec<String>,
    pub owner: String,
    pub team_owner: String,
}

/// State of the project in one environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentRow {
    pub environment: String,
    pub address: String,
    pub image_tag: String,
    pub commit: String,
    pub deployed_at: Option<OffsetDateTime>,
    pub units: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSummary {
    pub header: ProjectHeader,
    /// In catalog order.
    pub rows: Vec<EnvironmentRow>,
}

/// The project in a single environment, with the fields the summary
/// table leaves out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentDetail {
    pub header: ProjectHeader,
    pub row: EnvironmentRow,
    pub pool: String,
    pub plan: String,
    pub units: Vec<Unit>,
}

pub struct ProjectSummaryBuilder<'a> {
    client: &'a dyn ResourceClient,
    environments: &'a EnvironmentSet,
}

impl<'a> ProjectSummaryBuilder<'a> {
    pub fn new(client: &'a dyn ResourceClient, environments: &'a EnvironmentSet) -> Self {
        Self {
            client,
            environments,
        }
    }

    /// Fetches every member's details and last deployment.
    pub async fn build(&self, project: &str) -> Result<ProjectSummary> {
        if project.trim().is_empty() {
            return Err(ProjectError::MissingName);
        }
        let members = discover(self.client, self.environments, project).await?;

        let mut header = None;
        let mut rows = Vec::with_capacity(members.len());
        for member in &members {
            let detail = self.client.get(&member.resource.name).await?;
            let deployment = self.client.last_deployment(&member.resource.name).await?;
            if header.is_none() {
                header = Some(project_header(project, &detail));
            }
            rows.push(self.row(member.environment, &detail, deployment.as_ref()));
        }

        rows.sort_by_key(|row| self.environments.position(&row.environment));
        Ok(ProjectSummary {
            header: header.unwrap_or_default(),
            rows,
        })
    }

    /// Fetches the project's resource in one environment.
    ///
    /// # Errors
    ///
    /// [`ProjectError::ProjectNotFound`] when the project has no resource in
    /// that environment.
    pub async fn environment(&self, project: &str, environment: &str) -> Result<EnvironmentDetail> {
        let env = self.target(project, environment)?;
        let name = resource_name(project, env);
        let detail = match self.client.get(&name).await {
            Ok(detail) => detail,
            Err(e) if e.is_not_found() => return Err(ProjectError::ProjectNotFound),
            Err(e) => return Err(e.into()),
        };
        let deployment = self.client.last_deployment(&name).await?;

        Ok(EnvironmentDetail {
            header: project_header(project, &detail),
            row: self.row(env, &detail, deployment.as_ref()),
            pool: detail.pool,
            plan: detail.plan.map(|p| p.name).unwrap_or_default(),
            units: detail.units,
        })
    }

    /// Latest deployments of the project in one environment, newest first.
    pub async fn deployments(
        &self,
        project: &str,
        environment: &str,
        limit: usize,
    ) -> Result<Vec<DeploymentRecord>> {
        let env = self.target(project, environment)?;
        let records = self
            .client
            .deployments(&resource_name(project, env), limit)
            .await?;
        tracing::debug!(project, environment, count = records.len(), "deployments fetched");
        Ok(records)
    }

    fn target(&self, project: &str, environment: &str) -> Result<&'a Environment> {
        if project.trim().is_empty() {
            return Err(ProjectError::MissingName);
        }
        if environment.trim().is_empty() {
            return Err(ProjectError::MissingEnvironment);
        }
        self.environments
            .select(&[environment])?
            .into_iter()
            .next()
            .ok_or(ProjectError::MissingEnvironment)
    }

    fn row(
        &self,
        env: &Environment,
        detail: &Resource,
        deployment: Option<&DeploymentRecord>,
    ) -> EnvironmentRow {
        EnvironmentRow {
            environment: env.name.clone(),
            address: self
                .environments
                .address_for(env, &detail.cnames)
                .unwrap_or_default()
                .to_string(),
            image_tag: deployment.map(|d| d.image_tag().to_string()).unwrap_or_default(),
            commit: deployment.map(|d| d.commit.clone()).unwrap_or_default(),
            deployed_at: deployment.map(|d| d.timestamp),
            units: detail.unit_count(),
        }
    }
}

fn project_header(project: &str, detail: &Resource) -> ProjectHeader {
    ProjectHeader {
        name: project.to_string(),
        description: detail.description.clone(),
        repository: detail.repository_url.clone(),
        platform: detail.platform.clone(),
        teams: detail.teams.clone(),
        owner: detail.owner.clone(),
        team_owner: detail.team_owner.clone(),
    }
}

/// One project as seen across the whole platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectListing {
    pub name: String,
    /// `(environment, address)` in catalog order.
    pub environments: Vec<(String, String)>,
}

pub struct ProjectLister<'a> {
    client: &'a dyn ResourceClient,
    environments: &'a EnvironmentSet,
}

impl<'a> ProjectLister<'a> {
    pub fn new(client: &'a dyn ResourceClient, environments: &'a EnvironmentSet) -> Self {
        Self {
            client,
            environments,
        }
    }

    /// Groups every resource on the platform into projects, sorted by name.
    /// Resources outside the catalog's naming scheme are ignored.
    pub async fn list(&self) -> Result<Vec<ProjectListing>> {
        let resources = self.client.list(&ListFilter::default()).await?;

        let mut projects: BTreeMap<String, Vec<(usize, String, String)>> = BTreeMap::new();
        for resource in &resources {
            let Some((project, env)) = self.environments.membership(&resource.name) else {
                tracing::debug!(resource = %resource.name, "not part of any project");
                continue;
            };
            let address = self
                .environments
                .address_for(env, &resource.cnames)
                .unwrap_or_default()
                .to_string();
            let position = self.environments.position(&env.name).unwrap_or(usize::MAX);
            projects
                .entry(project.to_string())
                .or_default()
                .push((position, env.name.clone(), address));
        }

        Ok(projects
            .into_iter()
            .map(|(name, mut envs)| {
                envs.sort_by_key(|(position, _, _)| *position);
                ProjectListing {
                    name,
                    environments: envs.into_iter().map(|(_, env, addr)| (env, addr)).collect(),
                }
            })
            .collect())
    }
}

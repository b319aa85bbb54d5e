//! In-memory platform shared by the integration tests.
//!
//! Every call is recorded as `"<op> <resource>"` in the order it was
//! issued. Failures are scripted per `(op, resource)` pair and fire on every
//! matching call.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use projctl_core::{
    ClientError, ClientResult, CreateRequest, CreatedResource, DeploymentRecord, EnvVar,
    Environment, EnvironmentSet, ListFilter, MetadataUpdate, Plan, Resource, ResourceClient,
};
use regex::Regex;

/// dev, qa, stage, prod
pub fn catalog() -> EnvironmentSet {
    EnvironmentSet::new(vec![
        Environment::new("dev", "dev.example.com"),
        Environment::new("qa", "qa.example.com"),
        Environment::new("stage", "stage.example.com"),
        Environment::new("prod", "example.com"),
    ])
    .expect("valid catalog")
}

/// A resource as the platform would report it after provisioning.
pub fn resource(name: &str, cname: &str) -> Resource {
    Resource {
        name: name.to_string(),
        cnames: vec![cname.to_string()],
        description: "my nice project".to_string(),
        repository_url: format!("git@git.example.com:{name}.git"),
        platform: "python".to_string(),
        plan: Some(Plan {
            name: "medium".to_string(),
        }),
        teams: vec!["admin".to_string(), "sysop".to_string()],
        owner: "webmaster@example.com".to_string(),
        team_owner: "admin".to_string(),
        pool: String::new(),
        units: Vec::new(),
    }
}

#[derive(Default)]
struct State {
    calls: Vec<String>,
    resources: Vec<Resource>,
    failures: HashMap<(String, String), ClientError>,
    deployments: HashMap<String, Vec<DeploymentRecord>>,
    env_vars: HashMap<String, Vec<EnvVar>>,
    created: Vec<CreateRequest>,
    updates: Vec<(String, MetadataUpdate)>,
}

#[derive(Default)]
pub struct FakeClient {
    state: Mutex<State>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_resources(resources: Vec<Resource>) -> Self {
        let client = Self::default();
        client.state.lock().unwrap().resources = resources;
        client
    }

    /// Makes every `op` call on `resource` fail with `error`.
    pub fn fail(&self, op: &str, resource: &str, error: ClientError) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert((op.to_string(), resource.to_string()), error);
    }

    pub fn add_deployment(&self, resource: &str, record: DeploymentRecord) {
        self.state
            .lock()
            .unwrap()
            .deployments
            .entry(resource.to_string())
            .or_default()
            .push(record);
    }

    pub fn add_env_vars(&self, resource: &str, vars: Vec<EnvVar>) {
        self.state
            .lock()
            .unwrap()
            .env_vars
            .insert(resource.to_string(), vars);
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Recorded calls of one kind, by resource name.
    pub fn calls_to(&self, op: &str) -> Vec<String> {
        let prefix = format!("{op} ");
        self.calls()
            .into_iter()
            .filter_map(|call| call.strip_prefix(&prefix).map(str::to_string))
            .collect()
    }

    /// Calls that change something on the platform.
    pub fn mutating_calls(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| {
                !["list ", "get ", "last_deployment ", "deployments ", "env_vars "]
                    .iter()
                    .any(|read| call.starts_with(read))
            })
            .collect()
    }

    pub fn created(&self) -> Vec<CreateRequest> {
        self.state.lock().unwrap().created.clone()
    }

    pub fn updates(&self) -> Vec<(String, MetadataUpdate)> {
        self.state.lock().unwrap().updates.clone()
    }

    pub fn resource_names(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .resources
            .iter()
            .map(|r| r.name.clone())
            .collect()
    }

    fn record(&self, op: &str, resource: &str) -> ClientResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("{op} {resource}"));
        match state
            .failures
            .get(&(op.to_string(), resource.to_string()))
        {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ResourceClient for FakeClient {
    async fn create(&self, request: &CreateRequest) -> ClientResult<CreatedResource> {
        self.record("create", &request.name)?;
        let mut state = self.state.lock().unwrap();
        state.created.push(request.clone());
        state.resources.push(Resource {
            name: request.name.clone(),
            description: request.description.clone(),
            platform: request.platform.clone(),
            plan: Some(Plan {
                name: request.plan.clone(),
            }),
            team_owner: request.team.clone(),
            pool: request.pool.clone(),
            ..Resource::default()
        });
        Ok(CreatedResource {
            repository_url: Some(format!("git@git.example.com:{}.git", request.name)),
        })
    }

    async fn delete(&self, name: &str) -> ClientResult<()> {
        self.record("delete", name)?;
        let mut state = self.state.lock().unwrap();
        let before = state.resources.len();
        state.resources.retain(|r| r.name != name);
        if state.resources.len() == before {
            return Err(ClientError::not_found(name));
        }
        Ok(())
    }

    async fn set_address(&self, name: &str, address: &str) -> ClientResult<()> {
        self.record("set_address", name)?;
        let mut state = self.state.lock().unwrap();
        match state.resources.iter_mut().find(|r| r.name == name) {
            Some(resource) => {
                resource.cnames.push(address.to_string());
                Ok(())
            }
            None => Err(ClientError::not_found(name)),
        }
    }

    async fn get(&self, name: &str) -> ClientResult<Resource> {
        self.record("get", name)?;
        let state = self.state.lock().unwrap();
        state
            .resources
            .iter()
            .find(|r| r.name == name)
            .cloned()
            .ok_or_else(|| ClientError::not_found(name))
    }

    async fn list(&self, filter: &ListFilter) -> ClientResult<Vec<Resource>> {
        let pattern = filter.name_pattern.clone().unwrap_or_default();
        self.record("list", &pattern)?;
        let matcher = Regex::new(&pattern).map_err(|e| ClientError::http(400, e.to_string()))?;
        let state = self.state.lock().unwrap();
        Ok(state
            .resources
            .iter()
            .filter(|r| matcher.is_match(&r.name))
            .cloned()
            .collect())
    }

    async fn update(&self, name: &str, changes: &MetadataUpdate) -> ClientResult<()> {
        self.record("update", name)?;
        self.state
            .lock()
            .unwrap()
            .updates
            .push((name.to_string(), changes.clone()));
        Ok(())
    }

    async fn last_deployment(&self, name: &str) -> ClientResult<Option<DeploymentRecord>> {
        self.record("last_deployment", name)?;
        let state = self.state.lock().unwrap();
        Ok(state.deployments.get(name).and_then(|d| d.last()).cloned())
    }

    async fn deployments(&self, name: &str, limit: usize) -> ClientResult<Vec<DeploymentRecord>> {
        self.record("deployments", name)?;
        let state = self.state.lock().unwrap();
        Ok(state
            .deployments
            .get(name)
            .map(|d| d.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default())
    }

    async fn set_env_vars(
        &self,
        name: &str,
        vars: &[EnvVar],
        private: bool,
        _restart: bool,
    ) -> ClientResult<()> {
        self.record("set_env_vars", name)?;
        let mut state = self.state.lock().unwrap();
        let current = state.env_vars.entry(name.to_string()).or_default();
        for var in vars {
            current.retain(|v| v.name != var.name);
            current.push(EnvVar {
                public: !private,
                ..var.clone()
            });
        }
        Ok(())
    }

    async fn unset_env_vars(
        &self,
        name: &str,
        var_names: &[String],
        _restart: bool,
    ) -> ClientResult<()> {
        self.record("unset_env_vars", name)?;
        let mut state = self.state.lock().unwrap();
        if let Some(current) = state.env_vars.get_mut(name) {
            current.retain(|v| !var_names.contains(&v.name));
        }
        Ok(())
    }

    async fn env_vars(&self, name: &str) -> ClientResult<Vec<EnvVar>> {
        self.record("env_vars", name)?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .env_vars
            .get(name)
            .cloned()
            .unwrap_or_default())
    }
}

pub fn output(buf: Vec<u8>) -> String {
    String::from_utf8(buf).expect("utf-8 output")
}

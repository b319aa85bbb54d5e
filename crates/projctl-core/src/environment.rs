//! The environment catalog and every name derivation built on it.
//!
//! A project has no record of its own on the platform: its membership is
//! derived by matching resource names of the form `{project}-{env}` against
//! the catalog. All of that string matching lives here so callers never
//! inspect resource names themselves.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ProjectError, Result};

/// A named deployment target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub name: String,
    pub address_suffix: String,
}

impl Environment {
    pub fn new(name: impl Into<String>, address_suffix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address_suffix: address_suffix.into(),
        }
    }
}

#[derive(Debug)]
struct Matchers {
    /// `^(.+)-{env}$`, captures the project name.
    resource: Regex,
    /// `^([^.]+)\.{suffix}$`, captures the project part of an address.
    address: Regex,
}

impl Matchers {
    fn build(env: &Environment) -> Result<Self> {
        let resource = Regex::new(&format!("^(.+)-{}$", regex::escape(&env.name)))
            .map_err(|e| ProjectError::configuration(e.to_string()))?;
        let address = Regex::new(&format!(
            r"^([^.]+)\.{}$",
            regex::escape(&env.address_suffix)
        ))
        .map_err(|e| ProjectError::configuration(e.to_string()))?;
        Ok(Self { resource, address })
    }
}

/// Ordered, immutable catalog of environments.
///
/// Matchers are compiled once here; the catalog is read-only afterwards.
#[derive(Debug)]
pub struct EnvironmentSet {
    environments: Vec<Environment>,
    matchers: Vec<Matchers>,
}

impl EnvironmentSet {
    /// Builds the catalog, rejecting empty or duplicate names.
    pub fn new(environments: Vec<Environment>) -> Result<Self> {
        let mut matchers = Vec::with_capacity(environments.len());
        for (i, env) in environments.iter().enumerate() {
            if env.name.trim().is_empty() {
                return Err(ProjectError::configuration(format!(
                    "environment #{} has an empty name",
                    i + 1
                )));
            }
            if environments[..i].iter().any(|e| e.name == env.name) {
                return Err(ProjectError::configuration(format!(
                    "environment {:?} is defined more than once",
                    env.name
                )));
            }
            matchers.push(Matchers::build(env)?);
        }
        Ok(Self {
            environments,
            matchers,
        })
    }

    /// Environment names in catalog order.
    pub fn names(&self) -> Vec<&str> {
        self.environments.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Environment> {
        self.environments.iter().find(|e| e.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Environment> {
        self.environments.iter()
    }

    pub fn len(&self) -> usize {
        self.environments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.environments.is_empty()
    }

    /// Position of an environment in the catalog, used for row ordering.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.environments.iter().position(|e| e.name == name)
    }

    /// Resolves requested names to catalog entries, keeping the caller's
    /// order. Repeated names resolve once. Every invalid name is reported at
    /// once.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<&Environment>> {
        let invalid: Vec<String> = names
            .iter()
            .map(|name| name.as_ref())
            .filter(|name| !self.contains(name))
            .map(str::to_string)
            .collect();
        if !invalid.is_empty() {
            return Err(ProjectError::InvalidEnvironment {
                invalid,
                valid: self.names().into_iter().map(str::to_string).collect(),
            });
        }
        let mut selected: Vec<&Environment> = Vec::with_capacity(names.len());
        for env in names.iter().filter_map(|name| self.get(name.as_ref())) {
            if !selected.iter().any(|s| s.name == env.name) {
                selected.push(env);
            }
        }
        Ok(selected)
    }

    /// Like [`select`](Self::select), but an empty request means the whole
    /// catalog.
    pub fn select_or_all<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<&Environment>> {
        if names.is_empty() {
            Ok(self.environments.iter().collect())
        } else {
            self.select(names)
        }
    }

    /// Splits a resource name into its project and catalog environment.
    ///
    /// Environments are tried in catalog order; the first whose suffix
    /// matches wins.
    pub fn membership<'a>(&'a self, resource_name: &'a str) -> Option<(&'a str, &'a Environment)> {
        self.environments
            .iter()
            .zip(&self.matchers)
            .find_map(|(env, m)| {
                m.resource
                    .captures(resource_name)
                    .and_then(|c| c.get(1))
                    .map(|project| (project.as_str(), env))
            })
    }

    /// Environment of `resource_name` if it belongs to `project`.
    pub fn environment_of(&self, project: &str, resource_name: &str) -> Option<&Environment> {
        self.environments
            .iter()
            .zip(&self.matchers)
            .find(|(_, m)| {
                m.resource
                    .captures(resource_name)
                    .and_then(|c| c.get(1))
                    .is_some_and(|p| p.as_str() == project)
            })
            .map(|(env, _)| env)
    }

    /// The first address in `cnames` that belongs to `env`.
    pub fn address_for<'a>(&self, env: &Environment, cnames: &'a [String]) -> Option<&'a str> {
        let idx = self.position(&env.name)?;
        let matcher = &self.matchers[idx].address;
        cnames
            .iter()
            .find(|cname| matcher.is_match(cname))
            .map(String::as_str)
    }
}

/// `{project}-{env}`
pub fn resource_name(project: &str, env: &Environment) -> String {
    format!("{project}-{}", env.name)
}

/// `{project}.{suffix}`
pub fn resolve_address(project: &str, env: &Environment) -> String {
    format!("{project}.{}", env.address_suffix)
}

pub fn resolve_pool_name(env: &Environment) -> String {
    format!(r"{}\{}", env.name, env.address_suffix)
}

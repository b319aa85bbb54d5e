//! Propagating configuration variables to a project's environments.
//!
//! Setting and unsetting are independent per environment: every target is
//! attempted, a status line is printed for each, and failures are reported
//! together. Reading stops at the first failure.

use std::io::Write;

use crate::client::{EnvVar, ResourceClient};
use crate::environment::{Environment, EnvironmentSet, resource_name};
use crate::error::{ClientError, EnvironmentFailure, ProjectError, Result};
use crate::progress;

/// Parses `NAME=value` pairs. Surrounding double quotes on the value are
/// dropped.
pub fn parse_env_vars<S: AsRef<str>>(raw: &[S]) -> Result<Vec<EnvVar>> {
    raw.iter()
        .map(|item| {
            let item = item.as_ref();
            let (name, value) = item
                .split_once('=')
                .filter(|(name, _)| !name.is_empty())
                .ok_or_else(|| ProjectError::InvalidEnvVar(item.to_string()))?;
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            Ok(EnvVar {
                name: name.to_string(),
                value: value.to_string(),
                public: true,
            })
        })
        .collect()
}

pub struct EnvVarPropagator<'a> {
    client: &'a dyn ResourceClient,
    environments: &'a EnvironmentSet,
}

impl<'a> EnvVarPropagator<'a> {
    pub fn new(client: &'a dyn ResourceClient, environments: &'a EnvironmentSet) -> Self {
        Self {
            client,
            environments,
        }
    }

    /// Sets `raw_vars` (`NAME=value`) on the project in each target
    /// environment. An empty target list means the whole catalog.
    pub async fn set<W: Write>(
        &self,
        project: &str,
        targets: &[String],
        raw_vars: &[String],
        private: bool,
        restart: bool,
        out: &mut W,
    ) -> Result<()> {
        let targets = self.validate(project, targets)?;
        let vars = parse_env_vars(raw_vars)?;
        let mut failures = Vec::new();
        for env in targets {
            let resource = resource_name(project, env);
            let result = self
                .step(
                    out,
                    &format!("setting variables in environment {:?}", env.name),
                    self.client.set_env_vars(&resource, &vars, private, restart),
                )
                .await?;
            collect(&mut failures, env, result);
        }
        finish_batch(format!("set variables on project {project:?}"), failures)
    }

    /// Removes the named variables from each target environment.
    pub async fn unset<W: Write>(
        &self,
        project: &str,
        targets: &[String],
        var_names: &[String],
        restart: bool,
        out: &mut W,
    ) -> Result<()> {
        let targets = self.validate(project, targets)?;
        let mut failures = Vec::new();
        for env in targets {
            let resource = resource_name(project, env);
            let result = self
                .step(
                    out,
                    &format!("unsetting variables from environment {:?}", env.name),
                    self.client.unset_env_vars(&resource, var_names, restart),
                )
                .await?;
            collect(&mut failures, env, result);
        }
        finish_batch(format!("unset variables on project {project:?}"), failures)
    }

    /// Prints the variables of each target environment. Private values are
    /// masked.
    pub async fn get<W: Write>(&self, project: &str, targets: &[String], out: &mut W) -> Result<()> {
        let targets = self.validate(project, targets)?;
        for env in targets {
            let vars = self.client.env_vars(&resource_name(project, env)).await?;
            writeln!(out, "variables in {:?}:", env.name)?;
            writeln!(out)?;
            for var in &vars {
                if var.public {
                    writeln!(out, " {}={}", var.name, var.value)?;
                } else {
                    writeln!(out, " {}=*** (private variable)", var.name)?;
                }
            }
            write!(out, "\n\n")?;
        }
        Ok(())
    }

    fn validate(&self, project: &str, targets: &[String]) -> Result<Vec<&'a Environment>> {
        if project.trim().is_empty() {
            return Err(ProjectError::MissingName);
        }
        self.environments.select_or_all(targets)
    }

    async fn step<W: Write>(
        &self,
        out: &mut W,
        label: &str,
        call: impl Future<Output = std::result::Result<(), ClientError>>,
    ) -> Result<std::result::Result<(), ClientError>> {
        progress::begin(out, label)?;
        let result = call.await;
        progress::finish(out, result.is_ok())?;
        Ok(result)
    }
}

fn collect(
    failures: &mut Vec<EnvironmentFailure>,
    env: &Environment,
    result: std::result::Result<(), ClientError>,
) {
    if let Err(cause) = result {
        tracing::warn!(environment = %env.name, error = %cause, "variable change failed");
        failures.push(EnvironmentFailure {
            environment: env.name.clone(),
            cause,
        });
    }
}

fn finish_batch(operation: String, failures: Vec<EnvironmentFailure>) -> Result<()> {
    if failures.is_empty() {
        Ok(())
    } else {
        Err(ProjectError::partial_failure(operation, failures))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_value_pairs() {
        let vars = parse_env_vars(&[
            "USER_NAME=root",
            "EMPTY=",
            "URL=postgres://u:p@h/db?x=1",
            r#"PREFERRED_TEAM="some nice team""#,
        ])
        .unwrap();
        let pairs: Vec<(&str, &str)> = vars
            .iter()
            .map(|v| (v.name.as_str(), v.value.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("USER_NAME", "root"),
                ("EMPTY", ""),
                ("URL", "postgres://u:p@h/db?x=1"),
                ("PREFERRED_TEAM", "some nice team"),
            ]
        );
    }

    #[test]
    fn rejects_missing_separator_or_name() {
        for bad in ["ENV", "=value"] {
            let err = parse_env_vars(&[bad]).unwrap_err();
            assert_eq!(
                err.to_string(),
                "configuration vars must be specified in the form NAME=value"
            );
        }
    }
}

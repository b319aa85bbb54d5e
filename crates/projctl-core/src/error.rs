//! Error types for project lifecycle operations.
//!
//! [`ClientError`] describes the outcome of a single remote call, while
//! [`ProjectError`] is what an orchestrator hands back to the command layer.

use std::fmt;

/// Outcome of a failed call against the remote platform.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// The named resource does not exist on the platform.
    #[error("{resource} not found")]
    NotFound {
        /// Name of the resource that was looked up.
        resource: String,
    },

    /// The platform answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body, verbatim.
        body: String,
    },

    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(String),

    /// The response could not be decoded.
    #[error("invalid response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Creates a new `Http` error.
    #[must_use]
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    /// Creates a new `Transport` error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a new `Decode` error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Which step of provisioning failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionStage {
    /// Creating the environment's resource.
    Create,
    /// Pointing the public address at the resource.
    Address,
}

impl fmt::Display for ProvisionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => f.write_str("create"),
            Self::Address => f.write_str("configure"),
        }
    }
}

/// A failed per-environment call inside an otherwise independent batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentFailure {
    pub environment: String,
    pub cause: ClientError,
}

impl fmt::Display for EnvironmentFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.environment, self.cause)
    }
}

/// Errors returned by project operations.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    /// Local configuration is missing or corrupt.
    #[error(
        "unable to load environments file, please make sure that projctl is properly configured: {0}"
    )]
    Configuration(String),

    /// No project name was given.
    #[error("please provide the name of the project")]
    MissingName,

    /// Creation needs both a name and a platform.
    #[error("please provide the name and the platform")]
    MissingPlatform,

    /// A single-environment command was run without an environment.
    #[error("please provide the name of the environment")]
    MissingEnvironment,

    /// Requested environments that are not in the catalog.
    #[error(
        "invalid environments: {} (valid options are: {})",
        .invalid.join(", "),
        .valid.join(", ")
    )]
    InvalidEnvironment {
        invalid: Vec<String>,
        valid: Vec<String>,
    },

    /// An environment to add already holds a member of the project.
    #[error("env {0:?} is already defined in this project")]
    DuplicateEnvironment(String),

    /// An environment to remove holds no member of the project.
    #[error("env {0:?} is not defined in this project")]
    UndefinedEnvironment(String),

    /// No resource on the platform belongs to the project.
    #[error("project not found")]
    ProjectNotFound,

    /// A variable assignment is not of the form `NAME=value`. Carries the
    /// offending input.
    #[error("configuration vars must be specified in the form NAME=value")]
    InvalidEnvVar(String),

    /// Creating or addressing an environment failed mid-batch. Resources
    /// created earlier in the batch have already been removed.
    #[error("failed to {stage} the project {project:?} in env {environment:?}: {cause}")]
    Provision {
        project: String,
        environment: String,
        stage: ProvisionStage,
        cause: ClientError,
    },

    /// Some independent per-environment calls failed while others succeeded.
    #[error(
        "failed to {operation} in some environments: {}",
        .failures.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
    )]
    PartialFailure {
        operation: String,
        failures: Vec<EnvironmentFailure>,
    },

    /// Removing the whole project failed in the listed environments.
    #[error("failed to remove the project {project:?} from envs: {}", .environments.join(", "))]
    BulkRemoval {
        project: String,
        environments: Vec<String>,
    },

    /// A remote call failed outside any batch.
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Writing progress output failed.
    #[error("failed to write output")]
    Output(#[from] std::io::Error),
}

impl ProjectError {
    /// Create a new Configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a new PartialFailure error
    pub fn partial_failure(operation: impl Into<String>, failures: Vec<EnvironmentFailure>) -> Self {
        Self::PartialFailure {
            operation: operation.into(),
            failures,
        }
    }

    /// Environments named by a batch failure, in the order they were processed.
    #[must_use]
    pub fn failed_environments(&self) -> Vec<&str> {
        match self {
            Self::PartialFailure { failures, .. } => {
                failures.iter().map(|f| f.environment.as_str()).collect()
            }
            Self::BulkRemoval { environments, .. } => {
                environments.iter().map(String::as_str).collect()
            }
            Self::Provision { environment, .. } => vec![environment.as_str()],
            _ => Vec::new(),
        }
    }

    /// Returns `true` for errors raised before any remote call was issued.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingName
                | Self::MissingPlatform
                | Self::MissingEnvironment
                | Self::InvalidEnvironment { .. }
                | Self::DuplicateEnvironment(_)
                | Self::UndefinedEnvironment(_)
                | Self::InvalidEnvVar(_)
        )
    }
}

/// Result type for project operations
pub type Result<T> = std::result::Result<T, ProjectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages() {
        assert_eq!(
            ProjectError::DuplicateEnvironment("prod".into()).to_string(),
            r#"env "prod" is already defined in this project"#
        );
        assert_eq!(
            ProjectError::UndefinedEnvironment("stage".into()).to_string(),
            r#"env "stage" is not defined in this project"#
        );
        let err = ProjectError::InvalidEnvironment {
            invalid: vec!["staging".into()],
            valid: vec!["dev".into(), "qa".into(), "demo".into(), "prod".into()],
        };
        assert_eq!(
            err.to_string(),
            "invalid environments: staging (valid options are: dev, qa, demo, prod)"
        );
        assert!(err.is_validation());
    }

    #[test]
    fn missing_environment_is_a_validation_error() {
        let err = ProjectError::MissingEnvironment;
        assert_eq!(err.to_string(), "please provide the name of the environment");
        assert!(err.is_validation());
        assert!(err.failed_environments().is_empty());
    }

    #[test]
    fn provision_error_names_project_and_env() {
        let err = ProjectError::Provision {
            project: "superproj".into(),
            environment: "prod".into(),
            stage: ProvisionStage::Address,
            cause: ClientError::http(500, "{}"),
        };
        assert_eq!(
            err.to_string(),
            r#"failed to configure the project "superproj" in env "prod": HTTP 500: {}"#
        );
        assert_eq!(err.failed_environments(), vec!["prod"]);
    }

    #[test]
    fn partial_failure_lists_every_environment() {
        let err = ProjectError::partial_failure(
            "update the project",
            vec![
                EnvironmentFailure {
                    environment: "dev".into(),
                    cause: ClientError::not_found("proj-dev"),
                },
                EnvironmentFailure {
                    environment: "prod".into(),
                    cause: ClientError::transport("connection refused"),
                },
            ],
        );
        assert_eq!(
            err.to_string(),
            "failed to update the project in some environments: dev (proj-dev not found), \
             prod (request failed: connection refused)"
        );
        assert_eq!(err.failed_environments(), vec!["dev", "prod"]);
    }
}

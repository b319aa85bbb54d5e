//! # projctl-core
//!
//! Lifecycle orchestration for multi-environment projects.
//!
//! A project is a logical application realized as one resource per
//! environment on a remote platform (`{project}-{env}`). The platform has no
//! notion of a project, so every operation here derives membership from
//! resource names and drives the per-environment calls itself:
//!
//! - [`ProvisionOrchestrator`] creates a project, rolling back on failure
//! - [`ReconcileOrchestrator`] adds and removes environments and updates metadata
//! - [`BulkRemover`] deletes a project everywhere
//! - [`ProjectSummaryBuilder`] and [`ProjectLister`] are the read-only views
//! - [`EnvVarPropagator`] manages configuration variables across environments
//!
//! All remote access goes through the [`ResourceClient`] trait. Calls are
//! issued one at a time and awaited in order.
//!
//! ## Example
//!
//! ```ignore
//! use projctl_core::{BulkRemover, Environment, EnvironmentSet};
//!
//! async fn remove(client: &dyn projctl_core::ResourceClient) -> projctl_core::Result<()> {
//!     let envs = EnvironmentSet::new(vec![
//!         Environment::new("dev", "dev.example.com"),
//!         Environment::new("prod", "example.com"),
//!     ])?;
//!     BulkRemover::new(client, &envs)
//!         .remove("myproj", &mut std::io::stdout())
//!         .await
//! }
//! ```

#![forbid(unsafe_code)]

pub mod client;
pub mod discovery;
pub mod environment;
pub mod envvars;
pub mod error;
mod progress;
pub mod provision;
pub mod reconcile;
pub mod removal;
pub mod summary;

// Re-export main types
pub use client::{
    ClientResult, CreateRequest, CreatedResource, DeploymentRecord, EnvVar, ListFilter,
    MetadataUpdate, Plan, Resource, ResourceClient, Unit,
};
pub use environment::{
    Environment, EnvironmentSet, resolve_address, resolve_pool_name, resource_name,
};
pub use envvars::{EnvVarPropagator, parse_env_vars};
pub use error::{ClientError, EnvironmentFailure, ProjectError, ProvisionStage, Result};
pub use provision::{ProvisionOrchestrator, ProvisionRequest, ProvisionedResource};
pub use reconcile::{ReconcileOrchestrator, ReconcileOutcome, ReconcileRequest};
pub use removal::BulkRemover;
pub use summary::{
    EnvironmentDetail, EnvironmentRow, ProjectHeader, ProjectLister, ProjectListing, ProjectSummary,
    ProjectSummaryBuilder,
};

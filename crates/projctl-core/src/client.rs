//! The remote platform as seen by the orchestrators.
//!
//! [`ResourceClient`] is a narrow capability: one method per remote call,
//! each resolving to a typed [`ClientError`] instead of a raw status code.
//! The HTTP implementation lives in the command-line crate; tests use an
//! in-memory fake.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

use crate::error::ClientError;

/// Result type for a single remote call
pub type ClientResult<T> = std::result::Result<T, ClientError>;

/// Everything needed to create one environment's resource.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CreateRequest {
    pub name: String,
    pub platform: String,
    pub plan: String,
    pub team: String,
    pub pool: String,
    pub description: String,
}

/// Fields the platform hands back from a create call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CreatedResource {
    #[serde(default)]
    pub repository_url: Option<String>,
}

/// One environment-scoped resource as stored on the platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resource {
    pub name: String,
    #[serde(rename = "cname", deserialize_with = "null_as_empty")]
    pub cnames: Vec<String>,
    pub description: String,
    #[serde(rename = "repository")]
    pub repository_url: String,
    pub platform: String,
    pub plan: Option<Plan>,
    #[serde(deserialize_with = "null_as_empty")]
    pub teams: Vec<String>,
    pub owner: String,
    #[serde(rename = "teamowner")]
    pub team_owner: String,
    pub pool: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub units: Vec<Unit>,
}

/// The platform encodes empty lists as `null`.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Resource {
    pub fn unit_count(&self) -> usize {
        self.units.len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Plan {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Unit {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Status")]
    pub status: String,
}

/// Filter for [`ResourceClient::list`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    /// Server-side regular expression on resource names.
    pub name_pattern: Option<String>,
}

impl ListFilter {
    /// Resources whose name starts with `{project}-`.
    pub fn project(project: &str) -> Self {
        Self {
            name_pattern: Some(format!("^{}-", regex::escape(project))),
        }
    }
}

/// Metadata changes; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataUpdate {
    pub description: Option<String>,
    pub team: Option<String>,
    pub plan: Option<String>,
}

impl MetadataUpdate {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.team.is_none() && self.plan.is_none()
    }
}

/// Most recent completed build of a resource.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeploymentRecord {
    #[serde(rename = "ID", default)]
    pub id: String,
    #[serde(rename = "Commit", default)]
    pub commit: String,
    #[serde(rename = "Image", default)]
    pub image: String,
    #[serde(rename = "Timestamp", with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl DeploymentRecord {
    /// Tag portion of the deployed image (`registry/app:v12` gives `v12`).
    pub fn image_tag(&self) -> &str {
        match self.image.rsplit_once(':') {
            Some((repo, tag)) if !tag.contains('/') && !repo.is_empty() => tag,
            _ => "",
        }
    }
}

/// A configuration variable on a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVar {
    pub name: String,
    pub value: String,
    #[serde(default = "default_public")]
    pub public: bool,
}

fn default_public() -> bool {
    true
}

/// Remote calls against the platform, one resource at a time.
#[async_trait]
pub trait ResourceClient: Send + Sync {
    async fn create(&self, request: &CreateRequest) -> ClientResult<CreatedResource>;

    async fn delete(&self, name: &str) -> ClientResult<()>;

    async fn set_address(&self, name: &str, address: &str) -> ClientResult<()>;

    async fn get(&self, name: &str) -> ClientResult<Resource>;

    /// An empty result is a valid answer, distinct from a failed call.
    async fn list(&self, filter: &ListFilter) -> ClientResult<Vec<Resource>>;

    async fn update(&self, name: &str, changes: &MetadataUpdate) -> ClientResult<()>;

    /// `Ok(None)` when the resource has never been deployed.
    async fn last_deployment(&self, name: &str) -> ClientResult<Option<DeploymentRecord>>;

    /// Up to `limit` deployments, newest first.
    async fn deployments(&self, name: &str, limit: usize) -> ClientResult<Vec<DeploymentRecord>>;

    async fn set_env_vars(
        &self,
        name: &str,
        vars: &[EnvVar],
        private: bool,
        restart: bool,
    ) -> ClientResult<()>;

    async fn unset_env_vars(
        &self,
        name: &str,
        var_names: &[String],
        restart: bool,
    ) -> ClientResult<()>;

    async fn env_vars(&self, name: &str) -> ClientResult<Vec<EnvVar>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resource_decodes_platform_payload() {
        let payload = r#"{
            "name": "proj1-prod",
            "cname": ["proj1.example.com"],
            "description": "my nice project",
            "repository": "git@example.com:proj1-prod.git",
            "platform": "python",
            "teams": ["admin", "sysop"],
            "owner": "webmaster@example.com",
            "teamowner": "admin",
            "plan": {"name": "medium", "memory": 268435456},
            "units": [{"ID": "a1"}, {"ID": "a2"}]
        }"#;
        let resource: Resource = serde_json::from_str(payload).unwrap();
        assert_eq!(resource.cnames, vec!["proj1.example.com"]);
        assert_eq!(resource.team_owner, "admin");
        assert_eq!(resource.plan.unwrap().name, "medium");
        assert_eq!(resource.units.len(), 2);
    }

    #[test]
    fn resource_accepts_null_lists() {
        let payload = r#"{"name":"proj1-dev","cname":null,"teams":null,"units":null,"plan":null}"#;
        let resource: Resource = serde_json::from_str(payload).unwrap();
        assert_eq!(resource.name, "proj1-dev");
        assert!(resource.cnames.is_empty());
        assert!(resource.teams.is_empty());
        assert_eq!(resource.unit_count(), 0);
        assert_eq!(resource.plan, None);
    }

    #[test]
    fn image_tag_is_taken_after_last_colon() {
        let record = DeploymentRecord {
            id: "57cccb29".into(),
            commit: String::new(),
            image: "registry.example.com/tsuru/app-proj1-dev:v938".into(),
            timestamp: OffsetDateTime::UNIX_EPOCH,
        };
        assert_eq!(record.image_tag(), "v938");

        let untagged = DeploymentRecord {
            image: "localhost:5000/app-proj1-dev".into(),
            ..record
        };
        assert_eq!(untagged.image_tag(), "");
    }

    #[test]
    fn project_filter_anchors_prefix() {
        assert_eq!(
            ListFilter::project("proj.1").name_pattern.as_deref(),
            Some(r"^proj\.1-")
        );
    }
}

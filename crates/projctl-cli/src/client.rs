use anyhow::{Context, Result};
use async_trait::async_trait;
use projctl_core::{
    ClientError, ClientResult, CreateRequest, CreatedResource, DeploymentRecord, EnvVar,
    ListFilter, MetadataUpdate, Resource, ResourceClient,
};
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

/// [`ResourceClient`] over the platform's REST API, rooted at `{target}/1.0`.
pub struct PlatformClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<String>,
}

impl PlatformClient {
    pub fn new(target: &str, token: Option<String>) -> Result<Self> {
        let base = format!("{}/1.0", target.trim_end_matches('/'));
        let base_url = Url::parse(&base).with_context(|| format!("Invalid target URL: {target}"))?;
        if base_url.cannot_be_a_base() {
            anyhow::bail!("Invalid target URL: {target}");
        }
        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            token,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // cannot_be_a_base was ruled out in new()
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let req = self.http.request(method, url);
        match &self.token {
            Some(token) => req.header(AUTHORIZATION, format!("bearer {token}")),
            None => req,
        }
    }

    async fn send(&self, req: RequestBuilder, resource: &str) -> ClientResult<Response> {
        let resp = req
            .send()
            .await
            .map_err(|e| ClientError::transport(e.to_string()))?;
        let status = resp.status();
        tracing::debug!(%resource, %status, "platform responded");
        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::not_found(resource));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::http(status.as_u16(), body.trim()));
        }
        Ok(resp)
    }
}

/// Decodes a JSON body. `None` for 204 or an empty body.
async fn decode<T: DeserializeOwned>(resp: Response) -> ClientResult<Option<T>> {
    if resp.status() == StatusCode::NO_CONTENT {
        return Ok(None);
    }
    let body = resp
        .text()
        .await
        .map_err(|e| ClientError::transport(e.to_string()))?;
    if body.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(&body)
        .map(Some)
        .map_err(|e| ClientError::decode(e.to_string()))
}

#[async_trait]
impl ResourceClient for PlatformClient {
    async fn create(&self, request: &CreateRequest) -> ClientResult<CreatedResource> {
        let form = [
            ("name", request.name.as_str()),
            ("description", request.description.as_str()),
            ("platform", request.platform.as_str()),
            ("plan", request.plan.as_str()),
            ("teamOwner", request.team.as_str()),
            ("pool", request.pool.as_str()),
        ];
        let req = self
            .request(Method::POST, self.endpoint(&["apps"]))
            .form(&form);
        let resp = self.send(req, &request.name).await?;
        Ok(decode(resp).await?.unwrap_or_default())
    }

    async fn delete(&self, name: &str) -> ClientResult<()> {
        let req = self.request(Method::DELETE, self.endpoint(&["apps", name]));
        self.send(req, name).await?;
        Ok(())
    }

    async fn set_address(&self, name: &str, address: &str) -> ClientResult<()> {
        let req = self
            .request(Method::POST, self.endpoint(&["apps", name, "cname"]))
            .form(&[("cname", address)]);
        self.send(req, name).await?;
        Ok(())
    }

    async fn get(&self, name: &str) -> ClientResult<Resource> {
        let req = self.request(Method::GET, self.endpoint(&["apps", name]));
        let resp = self.send(req, name).await?;
        decode(resp)
            .await?
            .ok_or_else(|| ClientError::decode(format!("empty response for {name}")))
    }

    async fn list(&self, filter: &ListFilter) -> ClientResult<Vec<Resource>> {
        let mut req = self.request(Method::GET, self.endpoint(&["apps"]));
        if let Some(pattern) = &filter.name_pattern {
            req = req.query(&[("name", pattern)]);
        }
        let resp = self.send(req, "apps").await?;
        Ok(decode(resp).await?.unwrap_or_default())
    }

    async fn update(&self, name: &str, changes: &MetadataUpdate) -> ClientResult<()> {
        let form: Vec<(&str, &str)> = [
            ("description", changes.description.as_deref()),
            ("teamOwner", changes.team.as_deref()),
            ("plan", changes.plan.as_deref()),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v)))
        .collect();
        let req = self
            .request(Method::PUT, self.endpoint(&["apps", name]))
            .form(&form);
        self.send(req, name).await?;
        Ok(())
    }

    async fn last_deployment(&self, name: &str) -> ClientResult<Option<DeploymentRecord>> {
        let req = self
            .request(Method::GET, self.endpoint(&["deploys"]))
            .query(&[("limit", "1"), ("app", name)]);
        let resp = self.send(req, name).await?;
        let records: Vec<DeploymentRecord> = decode(resp).await?.unwrap_or_default();
        Ok(records.into_iter().next())
    }

    async fn deployments(&self, name: &str, limit: usize) -> ClientResult<Vec<DeploymentRecord>> {
        let limit = limit.to_string();
        let req = self
            .request(Method::GET, self.endpoint(&["deploys"]))
            .query(&[("limit", limit.as_str()), ("app", name)]);
        let resp = self.send(req, name).await?;
        Ok(decode(resp).await?.unwrap_or_default())
    }

    async fn set_env_vars(
        &self,
        name: &str,
        vars: &[EnvVar],
        private: bool,
        restart: bool,
    ) -> ClientResult<()> {
        let mut form: Vec<(String, String)> = Vec::with_capacity(vars.len() * 2 + 2);
        for (i, var) in vars.iter().enumerate() {
            form.push((format!("Envs.{i}.Name"), var.name.clone()));
            form.push((format!("Envs.{i}.Value"), var.value.clone()));
        }
        form.push(("Private".to_string(), private.to_string()));
        form.push(("NoRestart".to_string(), (!restart).to_string()));
        let req = self
            .request(Method::POST, self.endpoint(&["apps", name, "env"]))
            .form(&form);
        self.send(req, name).await?;
        Ok(())
    }

    async fn unset_env_vars(
        &self,
        name: &str,
        var_names: &[String],
        restart: bool,
    ) -> ClientResult<()> {
        let mut query: Vec<(&str, String)> =
            var_names.iter().map(|var| ("env", var.clone())).collect();
        query.push(("noRestart", (!restart).to_string()));
        let req = self
            .request(Method::DELETE, self.endpoint(&["apps", name, "env"]))
            .query(&query);
        self.send(req, name).await?;
        Ok(())
    }

    async fn env_vars(&self, name: &str) -> ClientResult<Vec<EnvVar>> {
        let req = self.request(Method::GET, self.endpoint(&["apps", name, "env"]));
        let resp = self.send(req, name).await?;
        Ok(decode(resp).await?.unwrap_or_default())
    }
}

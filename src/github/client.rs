//! REST client for the GitHub API.

use anyhow::anyhow;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::api::{FileContent, RepositoryApi, RepositoryInfo, WorkflowEntry, WorkflowList};
use super::Repository;
use crate::config::Settings;
use crate::error::{DispatchError, Result};

/// Workflows requested per listing call. Only the first page is read.
pub const WORKFLOWS_PER_PAGE: u32 = 100;

const API_VERSION: &str = "2022-11-28";

/// Blocking GitHub REST client.
///
/// Cloning is cheap and clones share the connection pool.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    base: Url,
    token: Option<String>,
}

#[derive(Deserialize)]
struct ApiMessage {
    message: String,
}

#[derive(Deserialize)]
struct EnvironmentList {
    #[serde(default)]
    environments: Vec<EnvironmentEntry>,
}

#[derive(Deserialize)]
struct EnvironmentEntry {
    name: String,
}

#[derive(Serialize)]
struct DispatchBody<'a> {
    #[serde(rename = "ref")]
    git_ref: &'a str,
    inputs: &'a BTreeMap<String, String>,
}

impl GitHubClient {
    /// Create a client from resolved settings.
    pub fn new(settings: &Settings) -> Result<Self> {
        let base = Url::parse(&settings.api_url)
            .map_err(|e| anyhow!("Invalid API URL '{}': {}", settings.api_url, e))?;
        if base.cannot_be_a_base() {
            return Err(anyhow!("Invalid API URL '{}'", settings.api_url).into());
        }

        let client = Client::builder()
            .user_agent(concat!("workflow-dispatch/", env!("CARGO_PKG_VERSION")))
            .timeout(settings.timeout)
            .build()
            .map_err(|e| anyhow!("Unable to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            base,
            token: settings.token.clone(),
        })
    }

    /// URL of `repos/{owner}/{repo}/{rest...}`, each segment percent-encoded.
    fn endpoint(&self, repo: &Repository, rest: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["repos", repo.owner.as_str(), repo.name.as_str()])
                .extend(rest);
        }
        url
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn send(&self, request: RequestBuilder, url: &Url) -> Result<Response> {
        let response = self
            .authorize(request)
            .send()
            .map_err(|e| DispatchError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().unwrap_or_default();
        let message = serde_json::from_str::<ApiMessage>(&body)
            .map(|m| m.message)
            .unwrap_or(body);
        Err(DispatchError::Api {
            status: status.as_u16(),
            url: url.to_string(),
            message,
        })
    }

    fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!("GET {}", url);
        let response = self.send(self.client.get(url.clone()), &url)?;
        response.json::<T>().map_err(|e| DispatchError::Transport {
            url: url.to_string(),
            message: format!("invalid response body: {}", e),
        })
    }
}

impl RepositoryApi for GitHubClient {
    fn list_workflows(&self, repo: &Repository) -> Result<Vec<WorkflowEntry>> {
        let mut url = self.endpoint(repo, &["actions", "workflows"]);
        url.query_pairs_mut()
            .append_pair("per_page", &WORKFLOWS_PER_PAGE.to_string());
        let list: WorkflowList = self.get_json(url)?;
        Ok(list.workflows)
    }

    fn get_content(
        &self,
        repo: &Repository,
        path: &str,
        git_ref: Option<&str>,
    ) -> Result<FileContent> {
        let mut rest = vec!["contents"];
        rest.extend(path.split('/').filter(|s| !s.is_empty()));
        let mut url = self.endpoint(repo, &rest);
        if let Some(git_ref) = git_ref.filter(|r| !r.is_empty()) {
            url.query_pairs_mut().append_pair("ref", git_ref);
        }
        self.get_json(url)
    }

    fn get_repository(&self, repo: &Repository) -> Result<RepositoryInfo> {
        self.get_json(self.endpoint(repo, &[]))
    }

    fn list_environments(&self, repo: &Repository) -> Result<Vec<String>> {
        let list: EnvironmentList = self.get_json(self.endpoint(repo, &["environments"]))?;
        Ok(list.environments.into_iter().map(|e| e.name).collect())
    }

    fn dispatch(
        &self,
        repo: &Repository,
        workflow: &str,
        git_ref: &str,
        inputs: &BTreeMap<String, String>,
    ) -> Result<()> {
        let url = self.endpoint(repo, &["actions", "workflows", workflow, "dispatches"]);
        tracing::debug!("POST {}", url);
        let body = DispatchBody { git_ref, inputs };
        self.send(self.client.post(url.clone()).json(&body), &url)?;
        Ok(())
    }
}

//! In-memory [`RepositoryApi`] for tests.
//!
//! `MockApi` serves a fixed set of workflow files and records every content
//! request and dispatch for later assertion.
//!
//! # Example
//!
//! ```
//! use workflow_dispatch::github::{MockApi, Repository, RepositoryApi};
//!
//! let api = MockApi::new().with_workflow_file(".github/workflows/ci.yml", "on: push\n");
//! let entries = api.list_workflows(&Repository::new("o", "r")).unwrap();
//! assert_eq!(entries.len(), 1);
//! ```

use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use super::{FileContent, Repository, RepositoryApi, RepositoryInfo, WorkflowEntry};
use crate::error::{DispatchError, Result};

/// A recorded dispatch call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchCall {
    pub workflow: String,
    pub git_ref: String,
    pub inputs: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
enum MockFile {
    Content(FileContent),
    Status(u16),
}

/// Mock repository API.
#[derive(Debug)]
pub struct MockApi {
    workflows: Vec<WorkflowEntry>,
    list_status: Option<u16>,
    files: HashMap<String, MockFile>,
    default_branch: String,
    environments: std::result::Result<Vec<String>, u16>,
    dispatch_status: Option<u16>,
    content_requests: Mutex<Vec<(String, Option<String>)>>,
    environment_requests: Mutex<usize>,
    dispatches: Mutex<Vec<DispatchCall>>,
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockApi {
    /// Create an empty mock whose default branch is `main`.
    pub fn new() -> Self {
        Self {
            workflows: Vec::new(),
            list_status: None,
            files: HashMap::new(),
            default_branch: "main".to_string(),
            environments: Ok(Vec::new()),
            dispatch_status: None,
            content_requests: Mutex::new(Vec::new()),
            environment_requests: Mutex::new(0),
            dispatches: Mutex::new(Vec::new()),
        }
    }

    /// List a workflow and serve its content base64 encoded.
    pub fn with_workflow_file(mut self, path: &str, yaml: &str) -> Self {
        self.workflows.push(entry(path));
        self.files.insert(
            path.to_string(),
            MockFile::Content(FileContent {
                content: encode_wrapped(yaml.as_bytes()),
                encoding: Some("base64".to_string()),
            }),
        );
        self
    }

    /// List a workflow whose content request fails with `status`.
    pub fn with_workflow_status(mut self, path: &str, status: u16) -> Self {
        self.workflows.push(entry(path));
        self.files.insert(path.to_string(), MockFile::Status(status));
        self
    }

    /// List a workflow and serve an arbitrary content payload for it.
    pub fn with_workflow_content(mut self, path: &str, content: FileContent) -> Self {
        self.workflows.push(entry(path));
        self.files
            .insert(path.to_string(), MockFile::Content(content));
        self
    }

    /// List a workflow entry without a path.
    pub fn with_pathless_workflow(mut self, name: &str) -> Self {
        self.workflows.push(WorkflowEntry {
            name: name.to_string(),
            path: String::new(),
        });
        self
    }

    /// Make the listing call fail with `status`.
    pub fn with_list_status(mut self, status: u16) -> Self {
        self.list_status = Some(status);
        self
    }

    /// Set the default branch name.
    pub fn with_default_branch(mut self, branch: &str) -> Self {
        self.default_branch = branch.to_string();
        self
    }

    /// Set the environment names.
    pub fn with_environments(mut self, names: &[&str]) -> Self {
        self.environments = Ok(names.iter().map(|n| n.to_string()).collect());
        self
    }

    /// Make the environments call fail with `status`.
    pub fn with_environments_status(mut self, status: u16) -> Self {
        self.environments = Err(status);
        self
    }

    /// Make dispatch calls fail with `status`.
    pub fn with_dispatch_status(mut self, status: u16) -> Self {
        self.dispatch_status = Some(status);
        self
    }

    /// Paths and refs of every content request, in arrival order.
    pub fn content_requests(&self) -> Vec<(String, Option<String>)> {
        lock(&self.content_requests).clone()
    }

    /// Number of environment listing calls.
    pub fn environment_requests(&self) -> usize {
        *lock(&self.environment_requests)
    }

    /// Every dispatch call made.
    pub fn dispatches(&self) -> Vec<DispatchCall> {
        lock(&self.dispatches).clone()
    }
}

impl RepositoryApi for MockApi {
    fn list_workflows(&self, repo: &Repository) -> Result<Vec<WorkflowEntry>> {
        match self.list_status {
            Some(status) => Err(api_error(status, &format!("{}/actions/workflows", repo))),
            None => Ok(self.workflows.clone()),
        }
    }

    fn get_content(
        &self,
        repo: &Repository,
        path: &str,
        git_ref: Option<&str>,
    ) -> Result<FileContent> {
        lock(&self.content_requests).push((path.to_string(), git_ref.map(String::from)));
        match self.files.get(path) {
            Some(MockFile::Content(content)) => Ok(content.clone()),
            Some(MockFile::Status(status)) => {
                Err(api_error(*status, &format!("{}/contents/{}", repo, path)))
            }
            None => Err(api_error(404, &format!("{}/contents/{}", repo, path))),
        }
    }

    fn get_repository(&self, _repo: &Repository) -> Result<RepositoryInfo> {
        Ok(RepositoryInfo {
            default_branch: self.default_branch.clone(),
        })
    }

    fn list_environments(&self, repo: &Repository) -> Result<Vec<String>> {
        *lock(&self.environment_requests) += 1;
        match &self.environments {
            Ok(names) => Ok(names.clone()),
            Err(status) => Err(api_error(*status, &format!("{}/environments", repo))),
        }
    }

    fn dispatch(
        &self,
        repo: &Repository,
        workflow: &str,
        git_ref: &str,
        inputs: &BTreeMap<String, String>,
    ) -> Result<()> {
        if let Some(status) = self.dispatch_status {
            return Err(api_error(status, &format!("{}/dispatches", repo)));
        }
        lock(&self.dispatches).push(DispatchCall {
            workflow: workflow.to_string(),
            git_ref: git_ref.to_string(),
            inputs: inputs.clone(),
        });
        Ok(())
    }
}

fn entry(path: &str) -> WorkflowEntry {
    WorkflowEntry {
        name: crate::workflow::workflow_name(path).to_string(),
        path: path.to_string(),
    }
}

fn api_error(status: u16, url: &str) -> DispatchError {
    DispatchError::Api {
        status,
        url: url.to_string(),
        message: format!("mock status {}", status),
    }
}

/// Base64 with a newline every 60 characters, as the contents API returns it.
fn encode_wrapped(bytes: &[u8]) -> String {
    let encoded = STANDARD.encode(bytes);
    let lines: Vec<&str> = encoded
        .as_bytes()
        .chunks(60)
        .filter_map(|chunk| std::str::from_utf8(chunk).ok())
        .collect();
    let mut wrapped = lines.join("\n");
    wrapped.push('\n');
    wrapped
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

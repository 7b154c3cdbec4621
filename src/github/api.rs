//! The repository API surface used by locators and dispatch.

use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;

use super::Repository;
use crate::error::Result;

/// One workflow definition as listed by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct WorkflowEntry {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,

    /// Path of the workflow file. Empty (or `null` on the wire) for some
    /// generated workflows.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub path: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Response of the workflow listing call.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkflowList {
    #[serde(default)]
    pub workflows: Vec<WorkflowEntry>,
}

/// File content as returned by the contents call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FileContent {
    /// Encoded file body.
    #[serde(default)]
    pub content: String,

    /// Transport encoding of `content`, normally `base64`.
    #[serde(default)]
    pub encoding: Option<String>,
}

/// Repository metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RepositoryInfo {
    pub default_branch: String,
}

/// Calls against a hosted repository.
///
/// Implementations must be safe to share between threads; the remote
/// locator issues content requests concurrently through one instance.
pub trait RepositoryApi: Send + Sync {
    /// List the first page of workflow definitions.
    fn list_workflows(&self, repo: &Repository) -> Result<Vec<WorkflowEntry>>;

    /// Fetch a file at `git_ref`, or at the default branch when `None`.
    fn get_content(
        &self,
        repo: &Repository,
        path: &str,
        git_ref: Option<&str>,
    ) -> Result<FileContent>;

    /// Fetch repository metadata.
    fn get_repository(&self, repo: &Repository) -> Result<RepositoryInfo>;

    /// List deployment environment names.
    fn list_environments(&self, repo: &Repository) -> Result<Vec<String>>;

    /// Trigger a `workflow_dispatch` run.
    fn dispatch(
        &self,
        repo: &Repository,
        workflow: &str,
        git_ref: &str,
        inputs: &BTreeMap<String, String>,
    ) -> Result<()>;
}

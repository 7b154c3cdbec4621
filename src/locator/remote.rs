//! Workflow discovery through the repository API.
//!
//! Listing is a single call; each listed workflow file is then fetched and
//! parsed on its own thread. Every thread reports exactly one result on an
//! unbounded channel, so no sender can block once the collector stops caring,
//! and the scope joins every thread before the call returns.

use anyhow::anyhow;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::mpsc;
use std::thread;

use super::Locator;
use crate::error::{DispatchError, Result};
use crate::github::{FileContent, Repository, RepositoryApi, WorkflowEntry};
use crate::workflow::{parse_workflow, workflow_name, Catalog, Workflow};

/// Finds dispatchable workflows of a hosted repository at a given ref.
pub struct RemoteLocator<'a> {
    api: &'a dyn RepositoryApi,
    repository: Repository,
    git_ref: Option<String>,
}

impl<'a> RemoteLocator<'a> {
    /// Locate workflows of `repository`; `git_ref` of `None` means the default branch.
    pub fn new(api: &'a dyn RepositoryApi, repository: Repository, git_ref: Option<String>) -> Self {
        Self {
            api,
            repository,
            git_ref,
        }
    }

    /// Fetch and parse one listed workflow.
    ///
    /// `Ok(None)` covers everything that is skipped rather than failed:
    /// entries without a path, files missing at the requested ref, invalid
    /// files, and workflows without `workflow_dispatch`.
    fn fetch_workflow(&self, entry: &WorkflowEntry) -> Result<Option<Workflow>> {
        if entry.path.is_empty() {
            tracing::debug!("Skipping workflow {:?}: no path", entry.name);
            return Ok(None);
        }

        let file = match self
            .api
            .get_content(&self.repository, &entry.path, self.git_ref.as_deref())
        {
            Ok(file) => file,
            Err(e) if e.is_not_found() => {
                tracing::debug!(
                    "Skipping {}: not present at {}",
                    entry.path,
                    self.git_ref.as_deref().unwrap_or("default branch")
                );
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        let bytes = decode_content(&file).map_err(|e| {
            DispatchError::Other(anyhow!(
                "Unable to decode workflow content for workflow {}: {}",
                entry.path,
                e
            ))
        })?;

        let workflow = match parse_workflow(workflow_name(&entry.path), &bytes) {
            Ok(workflow) => workflow,
            Err(e) => {
                tracing::warn!("Workflow \"{}\" is invalid: {}", entry.path, e);
                return Ok(None);
            }
        };

        Ok(workflow.dispatchable.then_some(workflow))
    }
}

impl Locator for RemoteLocator<'_> {
    fn list_workflows(&self) -> Result<Catalog> {
        let entries = self.api.list_workflows(&self.repository)?;
        tracing::debug!("{} lists {} workflows", self.repository, entries.len());

        let (tx, rx) = mpsc::channel();
        thread::scope(|scope| {
            for entry in &entries {
                let tx = tx.clone();
                scope.spawn(move || {
                    // The receiver outlives the scope, so this cannot fail.
                    let _ = tx.send(self.fetch_workflow(entry));
                });
            }
            drop(tx);

            let mut catalog = Catalog::new();
            let mut first_error = None;
            for result in rx.iter().take(entries.len()) {
                match result {
                    Ok(Some(workflow)) => {
                        catalog.insert(workflow.name.clone(), workflow);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        if first_error.is_none() {
                            first_error = Some(e);
                        }
                    }
                }
            }

            match first_error {
                Some(e) => Err(e),
                None => Ok(catalog),
            }
        })
    }
}

/// Decode a contents API payload into raw file bytes.
pub fn decode_content(file: &FileContent) -> anyhow::Result<Vec<u8>> {
    match file.encoding.as_deref() {
        None | Some("base64") => {
            let compact: String = file
                .content
                .chars()
                .filter(|c| !c.is_ascii_whitespace())
                .collect();
            Ok(STANDARD.decode(compact)?)
        }
        Some("utf-8") | Some("utf8") => Ok(file.content.clone().into_bytes()),
        Some(other) => Err(anyhow!("unsupported content encoding '{}'", other)),
    }
}

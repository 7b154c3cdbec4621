//! Workflow discovery in a local checkout.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::Locator;
use crate::error::{DispatchError, Result};
use crate::workflow::{is_workflow_file, parse_workflow, Catalog, WORKFLOWS_DIR};

/// Name of the directory that marks a repository root.
pub const REPOSITORY_MARKER: &str = ".git";

/// Finds dispatchable workflows in the working copy containing a directory.
#[derive(Debug, Clone)]
pub struct LocalLocator {
    start: PathBuf,
}

impl LocalLocator {
    /// Locate workflows for the repository containing `start`.
    pub fn new(start: impl Into<PathBuf>) -> Self {
        Self {
            start: start.into(),
        }
    }
}

impl Locator for LocalLocator {
    fn list_workflows(&self) -> Result<Catalog> {
        let root = find_repository_root(&self.start)?;
        list_workflows_in(&root.join(WORKFLOWS_DIR))
    }
}

/// Walk up from `start` to the first directory containing a `.git` directory.
pub fn find_repository_root(start: &Path) -> Result<PathBuf> {
    let start = std::path::absolute(start)?;
    let mut current = start.as_path();
    loop {
        let marker = current.join(REPOSITORY_MARKER);
        match fs::metadata(&marker) {
            Ok(meta) if meta.is_dir() => return Ok(current.to_path_buf()),
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(DispatchError::Io(e)),
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => {
                return Err(DispatchError::RepositoryRootNotFound {
                    start: start.clone(),
                })
            }
        }
    }
}

/// Read every workflow file directly inside `dir`.
///
/// Files that fail to parse are logged and skipped; listing or read failures
/// abort the whole call.
pub fn list_workflows_in(dir: &Path) -> Result<Catalog> {
    let listing_error = |source| DispatchError::WorkflowDirectory {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(listing_error)? {
        let entry = entry.map_err(listing_error)?;
        if entry.file_type().map_err(listing_error)?.is_dir() {
            continue;
        }
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if is_workflow_file(&file_name) {
            files.push((file_name, entry.path()));
        }
    }
    files.sort();

    let mut catalog = Catalog::new();
    for (file_name, path) in files {
        let bytes = fs::read(&path).map_err(|source| DispatchError::WorkflowRead {
            path: path.clone(),
            source,
        })?;

        let workflow = match parse_workflow(&file_name, &bytes) {
            Ok(workflow) => workflow,
            Err(e) => {
                tracing::warn!("Workflow \"{}\" is invalid: {}", file_name, e);
                continue;
            }
        };

        if !workflow.dispatchable {
            tracing::debug!("Skipping {}: not dispatchable", file_name);
            continue;
        }
        catalog.insert(workflow.name.clone(), workflow);
    }

    Ok(catalog)
}

//! Error types for workflow discovery and dispatch.
//!
//! This module defines [`DispatchError`], the primary error type used
//! throughout the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Parse failures of a single workflow file are reported as [`ParseError`]
//!   and are usually logged and skipped by the locators rather than returned
//! - Everything that aborts a whole locate or dispatch call is a `DispatchError`
//! - Use `anyhow::Error` (via `DispatchError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

use crate::workflow::ParseError;

/// Core error type for workflow discovery and dispatch.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// A workflow file could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// No `.git` directory was found above the starting directory.
    #[error("Unable to find repository root above {}", start.display())]
    RepositoryRootNotFound { start: PathBuf },

    /// The workflows directory could not be listed.
    #[error("Unable to list workflows in {}: {source}", path.display())]
    WorkflowDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A workflow file could not be read.
    #[error("Unable to read workflow file {}: {source}", path.display())]
    WorkflowRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The API answered with a non-success status.
    #[error("HTTP {status} from {url}: {message}")]
    Api {
        status: u16,
        url: String,
        message: String,
    },

    /// The API could not be reached or its response could not be read.
    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// A repository argument was not `[HOST/]OWNER/REPO`.
    #[error("Invalid repository '{value}': expected [HOST/]OWNER/REPO")]
    InvalidRepository { value: String },

    /// A supplied input was malformed or not accepted by the workflow.
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// The requested workflow is not in the catalog.
    #[error("Unknown workflow: {name}")]
    UnknownWorkflow { name: String },

    /// The repository has no workflow accepting manual dispatch.
    #[error("No dispatchable workflows found in repository")]
    NoDispatchableWorkflows,

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DispatchError {
    /// Whether this is an API "not found" response.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}

/// Result type alias for workflow dispatch operations.
pub type Result<T> = std::result::Result<T, DispatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_root_not_found_displays_start() {
        let err = DispatchError::RepositoryRootNotFound {
            start: PathBuf::from("/tmp/nowhere"),
        };
        assert!(err.to_string().contains("/tmp/nowhere"));
    }

    #[test]
    fn workflow_read_displays_path_and_cause() {
        let err = DispatchError::WorkflowRead {
            path: PathBuf::from(".github/workflows/ci.yml"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("ci.yml"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn api_error_displays_status_and_url() {
        let err = DispatchError::Api {
            status: 500,
            url: "https://api.github.com/repos/o/r".into(),
            message: "boom".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("500"));
        assert!(msg.contains("repos/o/r"));
    }

    #[test]
    fn is_not_found_only_for_404() {
        let not_found = DispatchError::Api {
            status: 404,
            url: String::new(),
            message: String::new(),
        };
        let server_error = DispatchError::Api {
            status: 502,
            url: String::new(),
            message: String::new(),
        };
        assert!(not_found.is_not_found());
        assert!(!server_error.is_not_found());
        assert!(!DispatchError::NoDispatchableWorkflows.is_not_found());
    }

    #[test]
    fn parse_error_converts() {
        let err: DispatchError = ParseError::MissingChoiceOptions {
            input: "target".into(),
        }
        .into();
        assert!(matches!(err, DispatchError::Parse(_)));
        assert!(err.to_string().contains("target"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: DispatchError = io_err.into();
        assert!(matches!(err, DispatchError::Io(_)));
    }

    #[test]
    fn result_type_alias_works() {
        fn returns_error() -> Result<()> {
            Err(DispatchError::UnknownWorkflow {
                name: "ci.yml".into(),
            })
        }
        assert!(returns_error().is_err());
    }
}

//! workflow-dispatch - Find and trigger manually dispatchable GitHub Actions workflows.
//!
//! Workflow files are read either from a local checkout or from a hosted
//! repository at a chosen ref. Those accepting the `workflow_dispatch`
//! trigger are collected together with their declared inputs, which can then
//! be filled in (from arguments or prompts) and sent as a dispatch request.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - API host, URL and token settings
//! - [`error`] - Error types and result aliases
//! - [`github`] - Repository API trait, HTTP client and helpers
//! - [`inputs`] - Collecting values for dispatch inputs
//! - [`locator`] - Finding dispatchable workflows on disk or remotely
//! - [`ui`] - Interactive prompts, spinners, and terminal output
//! - [`workflow`] - Workflow model and manifest parser
//!
//! # Example
//!
//! ```
//! use workflow_dispatch::github::{MockApi, Repository};
//! use workflow_dispatch::locator::{Locator, RemoteLocator};
//!
//! let api = MockApi::new()
//!     .with_workflow_file(".github/workflows/deploy.yml", "on: workflow_dispatch\n")
//!     .with_workflow_file(".github/workflows/ci.yml", "on: push\n");
//!
//! let catalog = RemoteLocator::new(&api, Repository::new("octo", "widgets"), None)
//!     .list_workflows()
//!     .unwrap();
//! assert_eq!(catalog.keys().collect::<Vec<_>>(), ["deploy.yml"]);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod github;
pub mod inputs;
pub mod locator;
pub mod ui;
pub mod workflow;

pub use error::{DispatchError, Result};

//! Access to hosted repositories through the GitHub REST API.
//!
//! - [`api`] - The [`RepositoryApi`] trait and its payload types
//! - [`client`] - [`GitHubClient`], the `reqwest` implementation
//! - [`repository`] - [`Repository`] references
//! - [`refs`] - Ref normalisation and default branch lookup
//! - [`environments`] - Environment names for `environment` inputs
//! - [`mock`] - [`MockApi`], an in-memory API for tests

pub mod api;
pub mod client;
pub mod environments;
pub mod mock;
pub mod refs;
pub mod repository;

pub use api::{FileContent, RepositoryApi, RepositoryInfo, WorkflowEntry, WorkflowList};
pub use client::{GitHubClient, WORKFLOWS_PER_PAGE};
pub use environments::environment_names;
pub use mock::{DispatchCall, MockApi};
pub use refs::{branch_name, default_ref, normalize_ref};
pub use repository::Repository;

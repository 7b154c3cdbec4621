//! Configuration for reaching the repository API.
//!
//! Settings are resolved from command-line flags first, then environment
//! variables:
//! - `GH_HOST` - default GitHub host
//! - `GH_TOKEN` / `GITHUB_TOKEN` - access token
//!   (`GH_ENTERPRISE_TOKEN` / `GITHUB_ENTERPRISE_TOKEN` are tried first for
//!   hosts other than github.com)
//! - `WORKFLOW_DISPATCH_API_URL` - explicit API base URL

pub mod settings;

pub use settings::{api_url_for_host, Settings, API_URL_ENV, DEFAULT_HOST, HOST_ENV};

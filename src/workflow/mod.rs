//! Workflow files and their dispatch input schemas.
//!
//! - [`model`] - [`Workflow`], [`Input`] and [`InputType`]
//! - [`parse`] - Reading a workflow file into a [`Workflow`]
//!
//! # Example
//!
//! ```
//! use workflow_dispatch::workflow::{parse_workflow, InputType};
//!
//! let yaml = r#"
//! on:
//!   workflow_dispatch:
//!     inputs:
//!       dry_run:
//!         type: boolean
//!         default: true
//! "#;
//! let workflow = parse_workflow("release.yml", yaml.as_bytes()).unwrap();
//! assert!(workflow.dispatchable);
//! assert_eq!(workflow.inputs[0].input_type, InputType::Boolean);
//! assert_eq!(workflow.inputs[0].default, "true");
//! ```

pub mod model;
pub mod parse;

pub use model::{Catalog, Input, InputType, Workflow};
pub use parse::{display_value, parse_workflow, ParseError, DISPATCH_TRIGGER};

/// Directory, relative to the repository root, that holds workflow files.
pub const WORKFLOWS_DIR: &str = ".github/workflows";

/// File extensions recognised as workflow files.
pub const WORKFLOW_EXTENSIONS: &[&str] = &[".yml", ".yaml"];

/// Check whether a file name has a workflow file extension.
pub fn is_workflow_file(file_name: &str) -> bool {
    WORKFLOW_EXTENSIONS
        .iter()
        .any(|ext| file_name.ends_with(ext))
}

/// The workflow name for a path: its final `/`-separated component.
pub fn workflow_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

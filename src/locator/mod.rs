//! Discovery of dispatchable workflows.
//!
//! A locator turns a repository into a [`Catalog`] of the workflows that
//! accept manual dispatch. Two sources are supported:
//!
//! - [`local`] - A working copy on disk, found by walking up to `.git`
//! - [`remote`] - A hosted repository at a ref, read through the API
//!
//! Both skip files that fail to parse and fail only on errors that make the
//! whole listing untrustworthy.

pub mod local;
pub mod remote;

pub use local::{find_repository_root, list_workflows_in, LocalLocator, REPOSITORY_MARKER};
pub use remote::{decode_content, RemoteLocator};

use crate::error::Result;
use crate::workflow::Catalog;

/// A source of dispatchable workflows.
pub trait Locator {
    /// All dispatchable workflows, keyed by file name.
    fn list_workflows(&self) -> Result<Catalog>;
}

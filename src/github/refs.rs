//! Git ref helpers.

use super::{Repository, RepositoryApi};
use crate::error::Result;

const REFS_PREFIX: &str = "refs/";
const HEADS_PREFIX: &str = "refs/heads/";

/// Qualify a short branch name as `refs/heads/<name>`.
///
/// Values already starting with `refs/` are returned unchanged.
pub fn normalize_ref(git_ref: &str) -> String {
    if git_ref.starts_with(REFS_PREFIX) {
        git_ref.to_string()
    } else {
        format!("{}{}", HEADS_PREFIX, git_ref)
    }
}

/// The fully qualified ref of the repository's default branch.
pub fn default_ref(api: &dyn RepositoryApi, repo: &Repository) -> Result<String> {
    let info = api.get_repository(repo)?;
    tracing::debug!("Default branch of {} is {}", repo, info.default_branch);
    Ok(normalize_ref(&info.default_branch))
}

/// The branch name of a `refs/heads/` ref, or the ref itself.
pub fn branch_name(git_ref: &str) -> &str {
    git_ref.strip_prefix(HEADS_PREFIX).unwrap_or(git_ref)
}

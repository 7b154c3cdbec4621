//! Deployment environment lookup for `environment` inputs.

use super::{Repository, RepositoryApi};
use crate::error::Result;

/// Environment names configured on a repository.
///
/// The environments API is not available on every plan and answers 404
/// there; that is logged and treated as "no environments".
pub fn environment_names(api: &dyn RepositoryApi, repo: &Repository) -> Result<Vec<String>> {
    match api.list_environments(repo) {
        Ok(names) => Ok(names),
        Err(e) if e.is_not_found() => {
            tracing::warn!(
                "Got a 404 listing environments for {}; the environments API is limited to some plans",
                repo
            );
            Ok(Vec::new())
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DispatchError;
    use crate::github::MockApi;

    #[test]
    fn returns_environment_names() {
        let api = MockApi::new().with_environments(&["staging", "production"]);
        let names = environment_names(&api, &Repository::new("o", "r")).unwrap();
        assert_eq!(names, ["staging", "production"]);
    }

    #[test]
    fn not_found_yields_empty_list() {
        let api = MockApi::new().with_environments_status(404);
        let names = environment_names(&api, &Repository::new("o", "r")).unwrap();
        assert!(names.is_empty());
    }

    #[test]
    fn other_errors_propagate() {
        let api = MockApi::new().with_environments_status(403);
        let err = environment_names(&api, &Repository::new("o", "r")).unwrap_err();
        assert!(matches!(err, DispatchError::Api { status: 403, .. }));
    }
}

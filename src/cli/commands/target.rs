//! Resolving the repository and API client a command talks to.

use crate::config::Settings;
use crate::error::Result;
use crate::github::{GitHubClient, Repository};

/// A repository together with a client for its host.
pub struct Target {
    pub repository: Repository,
    pub client: GitHubClient,
}

/// Resolve `--repository` / `--hostname` into a [`Target`].
///
/// A two-part `OWNER/REPO` lives on the host named by `--hostname`, `GH_HOST`,
/// or github.com, in that order.
pub fn connect(repository: &str, hostname: Option<&str>) -> Result<Target> {
    let repository = resolve_repository(repository, hostname, &Settings::from_env(hostname))?;
    let settings = Settings::from_env(Some(&repository.host));
    tracing::debug!("Using API at {} for {}", settings.api_url, repository);

    Ok(Target {
        client: GitHubClient::new(&settings)?,
        repository,
    })
}

fn resolve_repository(
    value: &str,
    hostname: Option<&str>,
    defaults: &Settings,
) -> Result<Repository> {
    let mut repository = Repository::parse(value, hostname)?;
    if hostname.is_none() && value.split('/').count() == 2 {
        repository.host = defaults.host.clone();
    }
    Ok(repository)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings_with_host(host: Option<&str>) -> Settings {
        let mut env = HashMap::new();
        if let Some(host) = host {
            env.insert("GH_HOST".to_string(), host.to_string());
        }
        Settings::resolve(None, &env)
    }

    #[test]
    fn short_form_uses_default_host() {
        let repo = resolve_repository("octo/widgets", None, &settings_with_host(None)).unwrap();
        assert_eq!(repo.host, "github.com");
    }

    #[test]
    fn short_form_uses_gh_host() {
        let repo =
            resolve_repository("octo/widgets", None, &settings_with_host(Some("ghe.io"))).unwrap();
        assert_eq!(repo.host, "ghe.io");
    }

    #[test]
    fn explicit_host_in_repository_wins_over_gh_host() {
        let repo = resolve_repository(
            "git.corp/octo/widgets",
            None,
            &settings_with_host(Some("ghe.io")),
        )
        .unwrap();
        assert_eq!(repo.host, "git.corp");
    }

    #[test]
    fn hostname_flag_applies_to_short_form() {
        let repo =
            resolve_repository("octo/widgets", Some("ghe.io"), &settings_with_host(None)).unwrap();
        assert_eq!(repo.host, "ghe.io");
    }
}

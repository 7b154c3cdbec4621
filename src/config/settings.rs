//! Runtime settings resolved from flags and environment variables.

use std::collections::HashMap;
use std::time::Duration;

/// Host used when none is given.
pub const DEFAULT_HOST: &str = "github.com";

/// Environment variable that overrides the API base URL.
pub const API_URL_ENV: &str = "WORKFLOW_DISPATCH_API_URL";

/// Environment variable naming the default host.
pub const HOST_ENV: &str = "GH_HOST";

const TOKEN_ENVS: &[&str] = &["GH_TOKEN", "GITHUB_TOKEN"];
const ENTERPRISE_TOKEN_ENVS: &[&str] = &["GH_ENTERPRISE_TOKEN", "GITHUB_ENTERPRISE_TOKEN"];

/// Settings for talking to the repository API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Hostname of the GitHub instance.
    pub host: String,
    /// Base URL for REST calls, always ending in `/`.
    pub api_url: String,
    /// Access token, if one was found.
    pub token: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Settings {
    /// Resolve settings from the process environment.
    pub fn from_env(hostname: Option<&str>) -> Self {
        let env: HashMap<String, String> = std::env::vars().collect();
        Self::resolve(hostname, &env)
    }

    /// Resolve settings from an explicit environment map.
    ///
    /// The host comes from `hostname`, then `GH_HOST`, then `github.com`.
    pub fn resolve(hostname: Option<&str>, env: &HashMap<String, String>) -> Self {
        let host = hostname
            .map(String::from)
            .or_else(|| non_empty(env, HOST_ENV))
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let api_url = non_empty(env, API_URL_ENV)
            .map(|url| with_trailing_slash(&url))
            .unwrap_or_else(|| api_url_for_host(&host));

        let token_envs: Vec<&str> = if host == DEFAULT_HOST {
            TOKEN_ENVS.to_vec()
        } else {
            ENTERPRISE_TOKEN_ENVS
                .iter()
                .chain(TOKEN_ENVS)
                .copied()
                .collect()
        };
        let token = token_envs.iter().find_map(|key| non_empty(env, key));

        Self {
            host,
            api_url,
            token,
            timeout: Duration::from_secs(30),
        }
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Settings pointing at an explicit API URL, with no token.
    pub fn for_api_url(api_url: &str) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            api_url: with_trailing_slash(api_url),
            token: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// REST API base URL for a host.
pub fn api_url_for_host(host: &str) -> String {
    if host == DEFAULT_HOST {
        "https://api.github.com/".to_string()
    } else {
        format!("https://{}/api/v3/", host)
    }
}

fn non_empty(env: &HashMap<String, String>, key: &str) -> Option<String> {
    env.get(key).filter(|v| !v.is_empty()).cloned()
}

fn with_trailing_slash(url: &str) -> String {
    if url.ends_with('/') {
        url.to_string()
    } else {
        format!("{}/", url)
    }
}

//! Repository references.

use std::fmt;

use crate::config::DEFAULT_HOST;
use crate::error::{DispatchError, Result};

/// A repository on a GitHub host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repository {
    pub host: String,
    pub owner: String,
    pub name: String,
}

impl Repository {
    /// Create a repository on github.com.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse `OWNER/REPO` or `HOST/OWNER/REPO`.
    ///
    /// `hostname` is used for the two-part form; github.com otherwise.
    pub fn parse(value: &str, hostname: Option<&str>) -> Result<Self> {
        let invalid = || DispatchError::InvalidRepository {
            value: value.to_string(),
        };

        let parts: Vec<&str> = value.split('/').collect();
        if parts.iter().any(|p| p.trim().is_empty()) {
            return Err(invalid());
        }

        match parts.as_slice() {
            [owner, name] => Ok(Self {
                host: hostname.unwrap_or(DEFAULT_HOST).to_string(),
                owner: owner.to_string(),
                name: name.trim_end_matches(".git").to_string(),
            }),
            [host, owner, name] => {
                if hostname.is_some_and(|h| !h.eq_ignore_ascii_case(host)) {
                    return Err(invalid());
                }
                Ok(Self {
                    host: host.to_lowercase(),
                    owner: owner.to_string(),
                    name: name.trim_end_matches(".git").to_string(),
                })
            }
            _ => Err(invalid()),
        }
    }

    /// `OWNER/REPO`.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host == DEFAULT_HOST {
            write!(f, "{}/{}", self.owner, self.name)
        } else {
            write!(f, "{}/{}/{}", self.host, self.owner, self.name)
        }
    }
}

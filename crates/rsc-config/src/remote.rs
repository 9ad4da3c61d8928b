//! Remote repository configuration.

use serde::{Deserialize, Serialize};

use crate::credentials::CredentialProvider;

fn default_branch() -> String {
    "main".to_string()
}

fn default_author_name() -> String {
    "RSC Portal".to_string()
}

fn default_author_email() -> String {
    "portal@localhost".to_string()
}

const fn default_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemoteConfig {
    /// Remote repository URL (e.g., `https://github.com/owner/repo.git`).
    /// Local paths and `file://` URLs are used verbatim.
    #[serde(default)]
    pub url: String,

    /// Access token embedded into HTTPS endpoints.
    #[serde(default)]
    pub token: String,

    /// Remote branch that receives pushes and is pulled from.
    #[serde(default = "default_branch")]
    pub branch: String,

    /// Commit author name for sync commits.
    #[serde(default = "default_author_name")]
    pub author_name: String,

    /// Commit author email for sync commits.
    #[serde(default = "default_author_email")]
    pub author_email: String,

    /// Upper bound for any single git subprocess, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            token: String::new(),
            branch: default_branch(),
            author_name: default_author_name(),
            author_email: default_author_email(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl RemoteConfig {
    /// Check if both the remote URL and the token are set.
    pub fn is_configured(&self) -> bool {
        !self.url.trim().is_empty() && !self.token.trim().is_empty()
    }
}

impl CredentialProvider for RemoteConfig {
    fn has_remote_credential(&self) -> bool {
        self.is_configured()
    }

    fn remote_endpoint(&self) -> Option<String> {
        let url = self.url.trim();
        if url.is_empty() {
            return None;
        }
        let token = self.token.trim();

        for scheme in ["https://", "http://"] {
            if let Some(rest) = url.strip_prefix(scheme) {
                let host_part = rest.split('/').next().unwrap_or(rest);
                if token.is_empty() || host_part.contains('@') {
                    return Some(url.to_string());
                }
                return Some(format!("{scheme}{token}@{rest}"));
            }
        }
        Some(url.to_string())
    }

    fn redact(&self, text: &str) -> String {
        let token = self.token.trim();
        if token.is_empty() {
            text.to_string()
        } else {
            text.replace(token, "***")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_not_configured() {
        let config = RemoteConfig::default();
        assert!(!config.is_configured());
        assert!(!config.has_remote_credential());
        assert_eq!(config.remote_endpoint(), None);
        assert_eq!(config.branch, "main");
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn url_without_token_is_not_configured() {
        let config = RemoteConfig {
            url: "https://github.com/owner/repo.git".into(),
            ..Default::default()
        };
        assert!(!config.is_configured());
    }

    #[test]
    fn token_is_embedded_into_https_endpoint() {
        let config = RemoteConfig {
            url: "https://github.com/owner/repo.git".into(),
            token: "ghp_secret".into(),
            ..Default::default()
        };
        assert!(config.is_configured());
        assert_eq!(
            config.remote_endpoint().as_deref(),
            Some("https://ghp_secret@github.com/owner/repo.git")
        );
    }

    #[test]
    fn existing_userinfo_is_left_alone() {
        let config = RemoteConfig {
            url: "https://bot@github.com/owner/repo.git".into(),
            token: "ghp_secret".into(),
            ..Default::default()
        };
        assert_eq!(
            config.remote_endpoint().as_deref(),
            Some("https://bot@github.com/owner/repo.git")
        );
    }

    #[test]
    fn local_paths_are_verbatim() {
        let config = RemoteConfig {
            url: "/srv/git/portal.git".into(),
            token: "unused".into(),
            ..Default::default()
        };
        assert_eq!(
            config.remote_endpoint().as_deref(),
            Some("/srv/git/portal.git")
        );
    }

    #[test]
    fn redact_hides_token() {
        let config = RemoteConfig {
            url: "https://github.com/owner/repo.git".into(),
            token: "ghp_secret".into(),
            ..Default::default()
        };
        let message = "fatal: unable to access 'https://ghp_secret@github.com/owner/repo.git/'";
        let redacted = config.redact(message);
        assert!(!redacted.contains("ghp_secret"));
        assert!(redacted.contains("https://***@github.com"));
    }
}

//! # rsc-secrets
//!
//! Optional external secret store for portal configuration. The remote sync
//! token is the usual reason to use one: it should not sit in a config file
//! inside the very repository it pushes to.
//!
//! The backend is chosen by `RSC_SECRETS__BACKEND` (`none` or `infisical`).
//! Fetched secrets become config overrides under the same key convention as
//! environment variables (`RSC_REMOTE__TOKEN`).

mod backend;
mod error;

use std::str::FromStr;

pub use error::SecretError;

use crate::backend::InfisicalSettings;

const BACKEND_VAR: &str = "RSC_SECRETS__BACKEND";
const OVERRIDE_PREFIX: &str = "RSC_";
const REMOTE_TOKEN_KEY: &str = "RSC_REMOTE__TOKEN";

/// Secret names accepted as the remote token when `RSC_REMOTE__TOKEN` is
/// not itself stored.
const REMOTE_TOKEN_ALIASES: &[&str] = &["GITHUB_TOKEN"];

/// Result of resolving external secrets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretOverrides {
    Disabled,
    Values(Vec<(String, String)>),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SecretsBackend {
    None,
    Infisical,
}

impl FromStr for SecretsBackend {
    type Err = SecretError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "off" | "disabled" => Ok(Self::None),
            "infisical" => Ok(Self::Infisical),
            other => Err(SecretError::UnsupportedBackend(other.to_string())),
        }
    }
}

fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// Resolve overrides from the backend named in the environment.
///
/// # Errors
///
/// Returns `SecretError` if the backend name is unknown, its settings are
/// incomplete, or the backend request fails.
pub async fn load_env_overrides() -> Result<SecretOverrides, SecretError> {
    let backend: SecretsBackend = env_lookup(BACKEND_VAR).unwrap_or_default().parse()?;
    match backend {
        SecretsBackend::None => Ok(SecretOverrides::Disabled),
        SecretsBackend::Infisical => {
            let settings = InfisicalSettings::from_lookup(&env_lookup)?;
            let fetched = settings.fetch().await?;
            Ok(SecretOverrides::Values(portal_overrides(fetched)))
        }
    }
}

/// Keep `RSC_*` keys, map a remote-token alias onto `RSC_REMOTE__TOKEN`
/// when that key is absent, and sort by key for deterministic layering.
fn portal_overrides(values: impl IntoIterator<Item = (String, String)>) -> Vec<(String, String)> {
    let mut alias_token = None;
    let mut overrides = Vec::new();
    for (key, value) in values {
        if key.starts_with(OVERRIDE_PREFIX) {
            overrides.push((key, value));
        } else if alias_token.is_none() && REMOTE_TOKEN_ALIASES.contains(&key.as_str()) {
            alias_token = Some(value);
        }
    }

    if let Some(token) = alias_token
        && !overrides.iter().any(|(key, _)| key == REMOTE_TOKEN_KEY)
    {
        overrides.push((REMOTE_TOKEN_KEY.to_string(), token));
    }
    overrides.sort_by(|a, b| a.0.cmp(&b.0));
    overrides
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
            .block_on(future)
    }

    #[test]
    fn backend_names() {
        assert_eq!("".parse::<SecretsBackend>().unwrap(), SecretsBackend::None);
        assert_eq!(" Off ".parse::<SecretsBackend>().unwrap(), SecretsBackend::None);
        assert_eq!(
            " Infisical ".parse::<SecretsBackend>().unwrap(),
            SecretsBackend::Infisical
        );
        assert!(matches!(
            "vault".parse::<SecretsBackend>(),
            Err(SecretError::UnsupportedBackend(name)) if name == "vault"
        ));
    }

    #[test]
    fn unset_backend_disables_overrides() {
        figment::Jail::expect_with(|_jail| {
            let overrides = block_on(load_env_overrides());
            assert_eq!(overrides.unwrap(), SecretOverrides::Disabled);
            Ok(())
        });
    }

    #[test]
    fn infisical_without_settings_is_an_error() {
        figment::Jail::expect_with(|jail| {
            jail.set_env(BACKEND_VAR, "infisical");
            let result = block_on(load_env_overrides());
            assert!(matches!(result, Err(SecretError::MissingSetting { .. })));
            Ok(())
        });
    }

    #[test]
    fn only_prefixed_secrets_become_overrides() {
        let values = portal_overrides(pairs(&[
            ("RSC_REMOTE__TOKEN", "t"),
            ("GITHUB_TOKEN", "ignored"),
            ("OTHER", "x"),
            ("RSC_ACCESS__ADMIN_KEY", "k"),
        ]));
        assert_eq!(
            values,
            pairs(&[("RSC_ACCESS__ADMIN_KEY", "k"), ("RSC_REMOTE__TOKEN", "t")])
        );
    }

    #[test]
    fn github_token_alias_fills_remote_token() {
        let values = portal_overrides(pairs(&[("GITHUB_TOKEN", "ghp"), ("RSC_REMOTE__URL", "u")]));
        assert_eq!(
            values,
            pairs(&[("RSC_REMOTE__TOKEN", "ghp"), ("RSC_REMOTE__URL", "u")])
        );
    }
}

//! # rsc-config
//!
//! Layered configuration loading for the portal using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`RSC_*` prefix, `__` as separator)
//! 2. External secret overrides (same key convention, see `rsc-secrets`)
//! 3. Project-level `{root}/.rsc/config.toml`
//! 4. User-level `~/.config/rsc/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `RSC_REMOTE__TOKEN` -> `remote.token`,
//! `RSC_STORAGE__RESULTS_DIR` -> `storage.results_dir`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use rsc_config::PortalConfig;
//! use std::path::Path;
//!
//! let config = PortalConfig::load_with_dotenv(Path::new(".")).expect("config");
//! if config.remote.is_configured() {
//!     println!("syncing to {}", config.remote.url);
//! }
//! ```

mod access;
mod credentials;
mod error;
mod general;
mod remote;
mod storage;

pub use access::AccessConfig;
pub use credentials::CredentialProvider;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use remote::RemoteConfig;
pub use storage::StorageConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "RSC_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PortalConfig {
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub access: AccessConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl PortalConfig {
    /// Load configuration from TOML files and environment variables.
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        Self::load_with_env_overrides(root, &[])
    }

    /// Load configuration after reading `{root}/.env` (or the current
    /// directory's `.env`) into the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load_with_dotenv(root: &Path) -> Result<Self, ConfigError> {
        let env_path = root.join(".env");
        if env_path.exists() {
            let _ = dotenvy::from_path(&env_path);
        } else {
            let _ = dotenvy::dotenv();
        }
        Self::load(root)
    }

    /// Load configuration with externally resolved secret overrides.
    ///
    /// Overrides use the environment key convention (`RSC_REMOTE__TOKEN`) and
    /// sit below the real process environment, so a locally exported value
    /// always wins.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load_with_env_overrides(
        root: &Path,
        overrides: &[(String, String)],
    ) -> Result<Self, ConfigError> {
        let config: Self = Self::figment_with_overrides(root, overrides).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Build the figment provider chain for a portal root.
    ///
    /// Public so tests can inspect the figment directly or add providers.
    #[must_use]
    pub fn figment(root: &Path) -> Figment {
        Self::figment_with_overrides(root, &[])
    }

    fn figment_with_overrides(root: &Path, overrides: &[(String, String)]) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = Self::project_config_path(root);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        for (key, value) in overrides {
            if let Some(path) = override_key_path(key) {
                figment = figment.merge(Serialized::default(&path, value));
            }
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Path to the project-local config file under a portal root.
    #[must_use]
    pub fn project_config_path(root: &Path) -> PathBuf {
        root.join(".rsc").join("config.toml")
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("rsc").join("config.toml"))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.general.min_score > self.general.max_score {
            return Err(ConfigError::InvalidValue {
                field: "general.min_score".into(),
                reason: format!(
                    "min_score ({}) exceeds max_score ({})",
                    self.general.min_score, self.general.max_score
                ),
            });
        }
        if self.remote.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "remote.timeout_secs".into(),
                reason: "timeout must be at least one second".into(),
            });
        }
        Ok(())
    }
}

/// `RSC_REMOTE__TOKEN` -> `remote.token`. Keys without the prefix are ignored.
fn override_key_path(key: &str) -> Option<String> {
    let stripped = key.strip_prefix(ENV_PREFIX)?;
    if stripped.is_empty() {
        return None;
    }
    Some(stripped.to_ascii_lowercase().replace("__", "."))
}

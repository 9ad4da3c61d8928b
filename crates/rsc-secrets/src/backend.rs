//! Infisical universal-auth backend.

use infisical::{AuthMethod, Client, secrets::ListSecretsRequest};

use crate::error::SecretError;

const DEFAULT_BASE_URL: &str = "https://app.infisical.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct InfisicalSettings {
    pub base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub project_id: String,
    pub environment: String,
    pub path: String,
}

impl InfisicalSettings {
    /// Read `RSC_INFISICAL__*` settings through `lookup`.
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, SecretError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or(SecretError::MissingSetting {
                    backend: "infisical",
                    name,
                })
        };
        Ok(Self {
            base_url: lookup("RSC_INFISICAL__BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            client_id: required("RSC_INFISICAL__CLIENT_ID")?,
            client_secret: required("RSC_INFISICAL__CLIENT_SECRET")?,
            project_id: required("RSC_INFISICAL__PROJECT_ID")?,
            environment: required("RSC_INFISICAL__ENVIRONMENT")?,
            path: lookup("RSC_INFISICAL__PATH").unwrap_or_else(|| "/".into()),
        })
    }

    /// Every secret in the configured folder, as key/value pairs.
    pub async fn fetch(&self) -> Result<Vec<(String, String)>, SecretError> {
        let mut client = Client::builder().base_url(&self.base_url).build().await?;
        client
            .login(AuthMethod::new_universal_auth(&self.client_id, &self.client_secret))
            .await?;

        let request = ListSecretsRequest::builder(&self.project_id, &self.environment)
            .path(&self.path)
            .recursive(true)
            .expand_secret_references(true)
            .build();

        Ok(client
            .secrets()
            .list(request)
            .await?
            .into_iter()
            .map(|secret| (secret.secret_key, secret.secret_value))
            .collect())
    }
}

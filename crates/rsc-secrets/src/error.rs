use thiserror::Error;

#[derive(Debug, Error)]
pub enum SecretError {
    #[error("unsupported secrets backend '{0}' (expected 'none' or 'infisical')")]
    UnsupportedBackend(String),
    #[error("secrets backend '{backend}' needs {name}")]
    MissingSetting {
        backend: &'static str,
        name: &'static str,
    },
    #[error("infisical error: {0}")]
    Infisical(#[from] infisical::InfisicalError),
}

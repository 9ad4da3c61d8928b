use std::path::Path;

use anyhow::Context;
use rsc_config::PortalConfig;

/// Load `.env`, external secrets and the layered config for a portal root.
pub async fn load_config(root: &Path) -> anyhow::Result<PortalConfig> {
    load_dotenv(root)?;

    let env_overrides = match rsc_secrets::load_env_overrides().await {
        Ok(rsc_secrets::SecretOverrides::Disabled) => Vec::new(),
        Ok(rsc_secrets::SecretOverrides::Values(values)) => values,
        Err(error) => {
            if is_ci() {
                return Err(anyhow::anyhow!(
                    "failed to load configured secret backend in CI: {error}"
                ));
            }

            tracing::warn!(%error, "failed to load external secrets; continuing with local config");
            Vec::new()
        }
    };

    let config = PortalConfig::load_with_env_overrides(root, &env_overrides)
        .context("failed to load portal configuration")?;
    if !config.remote.is_configured() {
        tracing::info!("no remote configured; running in local-only mode");
    }
    Ok(config)
}

fn is_ci() -> bool {
    std::env::var("CI").is_ok_and(|value| value.eq_ignore_ascii_case("true"))
}

fn load_dotenv(root: &Path) -> anyhow::Result<()> {
    let env_path = root.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
        return Ok(());
    }
    dotenvy::dotenv().ok();
    Ok(())
}

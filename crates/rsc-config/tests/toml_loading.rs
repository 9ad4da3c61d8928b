//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for sandboxed file and env var manipulation.

use figment::Jail;
use pretty_assertions::assert_eq;
use rsc_config::{CredentialProvider, PortalConfig};
use rsc_core::GuardPolicy;

#[test]
fn loads_project_config_from_rsc_dir() {
    Jail::expect_with(|jail| {
        jail.create_dir(".rsc")?;
        jail.create_file(
            ".rsc/config.toml",
            r#"
[storage]
workbook = "records.json"
results_dir = "Uploads"
lock_timeout_secs = 3

[remote]
url = "https://github.com/school/portal-data.git"
token = "toml-token"
branch = "records"
timeout_secs = 15

[access]
admin_key = "root-key"

[access.class_passwords]
"JSS 1" = "jss1-pass"
"SS 3" = "ss3-pass"

[general]
guard_policy = "fail_closed"
min_score = 5
max_score = 9
"#,
        )?;

        let config = PortalConfig::load(jail.directory()).expect("config loads");

        assert_eq!(config.storage.workbook, "records.json");
        assert_eq!(config.storage.results_dir, "Uploads");
        assert_eq!(config.storage.audit_log, "security_audit.csv");
        assert_eq!(config.storage.lock_timeout_secs, 3);
        assert_eq!(config.remote.branch, "records");
        assert_eq!(config.remote.timeout_secs, 15);
        assert!(config.remote.has_remote_credential());
        assert_eq!(config.access.password_for("JSS 1"), Some("jss1-pass"));
        assert_eq!(config.access.password_for("SS 3"), Some("ss3-pass"));
        assert!(config.access.has_admin_key());
        assert_eq!(config.general.guard_policy, GuardPolicy::FailClosed);
        assert_eq!(config.general.min_score, 5);
        assert_eq!(config.general.max_score, 9);
        Ok(())
    });
}

#[test]
fn env_beats_project_file() {
    Jail::expect_with(|jail| {
        jail.create_dir(".rsc")?;
        jail.create_file(
            ".rsc/config.toml",
            r#"
[remote]
url = "https://github.com/school/portal-data.git"
token = "toml-token"
"#,
        )?;
        jail.set_env("RSC_REMOTE__TOKEN", "env-token");
        jail.set_env("RSC_STORAGE__RESULTS_DIR", "EnvResults");

        let config = PortalConfig::load(jail.directory()).expect("config loads");
        assert_eq!(config.remote.token, "env-token");
        assert_eq!(config.storage.results_dir, "EnvResults");
        Ok(())
    });
}

#[test]
fn missing_files_fall_back_to_defaults() {
    Jail::expect_with(|jail| {
        let config = PortalConfig::load(jail.directory()).expect("config loads");
        assert!(!config.remote.has_remote_credential());
        assert_eq!(config.remote.remote_endpoint(), None);
        assert_eq!(config.general.guard_policy, GuardPolicy::FailOpen);
        Ok(())
    });
}

#[test]
fn inverted_score_range_fails_to_load() {
    Jail::expect_with(|jail| {
        jail.set_env("RSC_GENERAL__MIN_SCORE", "10");
        jail.set_env("RSC_GENERAL__MAX_SCORE", "2");
        assert!(PortalConfig::load(jail.directory()).is_err());
        Ok(())
    });
}

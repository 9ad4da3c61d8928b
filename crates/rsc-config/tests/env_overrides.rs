use figment::Jail;
use rsc_config::PortalConfig;

#[test]
fn external_overrides_fill_config_values() {
    Jail::expect_with(|jail| {
        let overrides = vec![
            (
                "RSC_REMOTE__URL".to_string(),
                "https://github.com/school/portal-data.git".to_string(),
            ),
            ("RSC_REMOTE__TOKEN".to_string(), "tok_from_external".to_string()),
        ];

        let config = PortalConfig::load_with_env_overrides(jail.directory(), &overrides)
            .expect("config loads");
        assert_eq!(config.remote.token, "tok_from_external");
        assert!(config.remote.is_configured());
        Ok(())
    });
}

#[test]
fn process_env_beats_external_overrides() {
    Jail::expect_with(|jail| {
        jail.set_env("RSC_REMOTE__TOKEN", "tok_from_env");
        let overrides = vec![(
            "RSC_REMOTE__TOKEN".to_string(),
            "tok_from_external".to_string(),
        )];

        let config = PortalConfig::load_with_env_overrides(jail.directory(), &overrides)
            .expect("config loads");
        assert_eq!(config.remote.token, "tok_from_env");
        Ok(())
    });
}

#[test]
fn unprefixed_overrides_are_ignored() {
    Jail::expect_with(|jail| {
        let overrides = vec![("GITHUB_TOKEN".to_string(), "ignored".to_string())];
        let config = PortalConfig::load_with_env_overrides(jail.directory(), &overrides)
            .expect("config loads");
        assert!(config.remote.token.is_empty());
        Ok(())
    });
}

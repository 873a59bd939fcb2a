use depot_config::{ConfigError, DepotConfig};
use depot_core::enums::MergeOrder;
use figment::Jail;

#[test]
fn env_vars_override_defaults() {
    Jail::expect_with(|jail| {
        jail.set_env("DEPOT_DATABASE__PATH", "/tmp/override.db");
        jail.set_env("DEPOT_SESSION__REVALIDATE_AFTER_SECS", "300");
        jail.set_env("DEPOT_INBOX__MERGE_ORDER", "chronological");

        let config = DepotConfig::load().expect("config loads");
        assert_eq!(config.database.path, "/tmp/override.db");
        assert_eq!(config.session.revalidate_after_secs, 300);
        assert_eq!(config.inbox.merge_order, MergeOrder::Chronological);
        Ok(())
    });
}

#[test]
fn env_beats_project_toml() {
    Jail::expect_with(|jail| {
        std::fs::create_dir_all(jail.directory().join(".depot")).expect("mkdir");
        jail.create_file(
            ".depot/config.toml",
            r#"
            [inbox]
            default_limit = 25
            "#,
        )?;
        jail.set_env("DEPOT_INBOX__DEFAULT_LIMIT", "7");

        let config = DepotConfig::load().expect("config loads");
        assert_eq!(config.inbox.default_limit, 7);
        Ok(())
    });
}

#[test]
fn invalid_env_combination_is_rejected() {
    Jail::expect_with(|jail| {
        jail.set_env("DEPOT_SESSION__MUTATION_MAX_AGE_SECS", "90");
        jail.set_env("DEPOT_SESSION__REVALIDATE_AFTER_SECS", "30");

        let err = DepotConfig::load().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        Ok(())
    });
}

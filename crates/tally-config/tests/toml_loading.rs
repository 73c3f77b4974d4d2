//! Integration tests for TOML configuration loading.
//!
//! Uses `figment::Jail` for sandboxed files and env vars.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;
use tally_config::TallyConfig;

fn from_toml() -> figment::Result<TallyConfig> {
    Figment::from(Serialized::defaults(TallyConfig::default()))
        .merge(Toml::file("config.toml"))
        .merge(Env::prefixed("TALLY_").split("__"))
        .extract()
}

#[test]
fn loads_review_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[review]
quorum_threshold = 2
required_areas = ["field", "management"]
admins = ["usr-ana", "usr-ops"]
triage_limit = 5
"#,
        )?;

        let config = from_toml()?;
        assert_eq!(config.review.quorum_threshold, 2);
        assert_eq!(
            config.review.required_areas,
            vec!["field".to_string(), "management".to_string()]
        );
        assert_eq!(config.review.admins.len(), 2);
        assert_eq!(config.review.triage_limit, 5);
        assert!(config.validate().is_ok());
        Ok(())
    });
}

#[test]
fn loads_remote_database_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[database]
path = "replica.db"
url = "libsql://reviews-acme.turso.io"
auth_token = "token"
"#,
        )?;

        let config = from_toml()?;
        assert_eq!(config.database.path, "replica.db");
        assert!(config.database.is_remote_configured());
        Ok(())
    });
}

#[test]
fn missing_sections_keep_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[general]\ndefault_limit = 50\n")?;

        let config = from_toml()?;
        assert_eq!(config.general.default_limit, 50);
        assert_eq!(config.review.quorum_threshold, 3);
        assert_eq!(config.database.path, ".tally/review.db");
        Ok(())
    });
}

#[test]
fn env_var_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.set_env("TALLY_DATABASE__URL", "libsql://from-env.turso.io");
        jail.create_file(
            "config.toml",
            r#"
[database]
url = "libsql://from-toml.turso.io"
auth_token = "toml-token"
"#,
        )?;

        let config = from_toml()?;
        assert_eq!(config.database.url, "libsql://from-env.turso.io");
        assert_eq!(config.database.auth_token, "toml-token");
        Ok(())
    });
}

/// Typo'd env keys are silently ignored by figment.
#[test]
fn typo_env_var_silently_ignored() {
    Jail::expect_with(|jail| {
        jail.set_env("TALLY_REVIEW__QUORUM_TRESHOLD", "9");
        jail.create_file("config.toml", "")?;

        let config = from_toml()?;
        assert_eq!(config.review.quorum_threshold, 3);
        Ok(())
    });
}

#[test]
fn invalid_values_fail_validation() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            "[review]\nquorum_threshold = 0\n",
        )?;

        let config = from_toml()?;
        let err = config.validate().expect_err("zero threshold must be rejected");
        assert!(err.to_string().contains("review.quorum_threshold"));
        Ok(())
    });
}

#[test]
fn blank_required_area_fails_validation() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            "[review]\nrequired_areas = [\"field\", \"  \"]\n",
        )?;

        let config = from_toml()?;
        let err = config.validate().expect_err("blank area must be rejected");
        assert!(err.to_string().contains("review.required_areas"));
        Ok(())
    });
}

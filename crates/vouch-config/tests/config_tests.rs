// SPDX-FileCopyrightText: 2026 Vouch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for configuration loading and merging.

use vouch_config::{load_and_validate_str, load_config_from_str, VouchConfig};

#[test]
fn empty_toml_yields_defaults() {
    let config = load_config_from_str("").unwrap();
    assert_eq!(config.service.name, "vouch");
    assert_eq!(config.service.log_level, "info");
    assert_eq!(config.gateway.host, "127.0.0.1");
    assert_eq!(config.gateway.port, 8000);
    assert_eq!(config.review.ttl_secs, 300);
    assert_eq!(config.review.sweep_interval_secs, 60);
    assert!(config.telegram.bot_token.is_none());
    assert!(config.telegram.allowed_users.is_empty());
}

#[test]
fn toml_overrides_defaults() {
    let config = load_config_from_str(
        r#"
        [gateway]
        host = "0.0.0.0"
        port = 9000

        [review]
        ttl_secs = 120

        [telegram]
        bot_token = "123:abc"
        allowed_users = ["42", "@reviewer"]
        "#,
    )
    .unwrap();
    assert_eq!(config.gateway.host, "0.0.0.0");
    assert_eq!(config.gateway.port, 9000);
    assert_eq!(config.review.ttl_secs, 120);
    // Untouched sections keep their defaults.
    assert_eq!(config.review.sweep_interval_secs, 60);
    assert_eq!(config.telegram.bot_token.as_deref(), Some("123:abc"));
    assert_eq!(config.telegram.allowed_users.len(), 2);
}

#[test]
fn unknown_key_is_rejected() {
    let result = load_config_from_str(
        r#"
        [review]
        ttl_seconds = 300
        "#,
    );
    assert!(result.is_err(), "misspelled key must be rejected");
}

#[test]
fn unknown_section_is_rejected() {
    let result = load_config_from_str("[sweeper]\ninterval = 60\n");
    assert!(result.is_err());
}

#[test]
fn validation_runs_after_parse() {
    let errors = load_and_validate_str(
        r#"
        [review]
        ttl_secs = 0
        "#,
    )
    .unwrap_err();
    assert!(!errors.is_empty());
}

#[test]
fn env_overrides_toml() {
    figment::Jail::expect_with(|jail| {
        jail.create_file(
            "vouch.toml",
            r#"
            [review]
            ttl_secs = 100
            "#,
        )?;
        jail.set_env("VOUCH_REVIEW_TTL_SECS", "200");
        jail.set_env("VOUCH_TELEGRAM_BOT_TOKEN", "999:zzz");

        let config = vouch_config::load_config().expect("config should load");
        assert_eq!(config.review.ttl_secs, 200);
        // Underscore-containing key maps to telegram.bot_token, not
        // telegram.bot.token.
        assert_eq!(config.telegram.bot_token.as_deref(), Some("999:zzz"));
        Ok(())
    });
}

#[test]
fn config_is_serializable() {
    // Round-trip through TOML so defaults can be written out as a template.
    let config = VouchConfig::default();
    let rendered = toml::to_string(&config).unwrap();
    let reparsed = load_config_from_str(&rendered).unwrap();
    assert_eq!(reparsed.gateway.port, config.gateway.port);
}

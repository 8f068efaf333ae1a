//! Shared fixtures and helper functions for config tests.

use crate::config::AppConfig;
use ortho_config::MergeComposer;
use rstest::fixture;
use std::sync::Arc;

/// Fixture providing an `AppConfig` parsed from a full TOML example.
#[fixture]
pub fn app_config_from_full_toml() -> AppConfig {
    let toml = r#"
        api_endpoint = "https://api.sys.example.com"
        access_token = "bearer-token"

        [connection]
        skip_ssl_validation = true
        request_timeout_secs = 10

        [polling]
        interval_secs = 1
        async_timeout_mins = 20
        staging_timeout_mins = 30
        startup_timeout_mins = 2
    "#;

    toml::from_str(toml).expect("TOML parsing should succeed")
}

/// Fixture providing an `AppConfig` parsed from a minimal TOML example.
#[fixture]
pub fn app_config_from_partial_toml() -> AppConfig {
    let toml = r#"
        api_endpoint = "https://api.sys.example.com"

        [polling]
        interval_secs = 5
    "#;

    toml::from_str(toml).expect("TOML parsing should succeed")
}

/// Helper: Creates a `MergeComposer` with defaults layer already pushed.
pub fn create_composer_with_defaults() -> Result<MergeComposer, serde_json::Error> {
    let mut composer = MergeComposer::new();
    let defaults = ortho_config::serde_json::to_value(AppConfig::default())?;
    composer.push_defaults(defaults);
    Ok(composer)
}

/// Helper: Merges layers from a composer into `AppConfig`.
pub fn merge_config(composer: MergeComposer) -> Result<AppConfig, Arc<ortho_config::OrthoError>> {
    AppConfig::merge_from_layers(composer.layers())
}

/// Helper: Asserts that a config has all default values.
pub fn assert_config_has_defaults(config: &AppConfig) {
    assert!(config.api_endpoint.is_none(), "api_endpoint should be None");
    assert!(config.access_token.is_none(), "access_token should be None");
    assert!(
        !config.connection.skip_ssl_validation,
        "connection.skip_ssl_validation should be false"
    );
    assert_eq!(config.connection.request_timeout_secs, 30);
    assert_eq!(config.polling.interval_secs, 3);
    assert_eq!(config.polling.async_timeout_mins, 0);
    assert_eq!(config.polling.staging_timeout_mins, 15);
    assert_eq!(config.polling.startup_timeout_mins, 5);
}

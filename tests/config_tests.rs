use pretty_assertions::assert_eq;
use serial_test::serial;
use sportly::config::{Config, DEFAULT_GEOCODING_BASE_URL};
use std::env;

mod common;

const VARS: [&str; 10] = [
    "DATABASE_URL",
    "JWT_SECRET",
    "JWT_EXPIRATION_DAYS",
    "HOST",
    "PORT",
    "ENVIRONMENT",
    "CLIENT_BASE_URL",
    "FEED_UTC_OFFSET_MINUTES",
    "GEOCODING_API_KEY",
    "GEOCODING_BASE_URL",
];

/// Runs `f` with the given variables set and everything else in `VARS`
/// cleared, restoring the previous environment afterwards.
fn with_env<F: FnOnce()>(values: &[(&str, &str)], f: F) {
    common::setup_test_env();
    let original: Vec<(&str, Option<String>)> =
        VARS.iter().map(|key| (*key, env::var(key).ok())).collect();

    unsafe {
        for key in VARS {
            env::remove_var(key);
        }
        for (key, value) in values {
            env::set_var(key, value);
        }
    }

    f();

    unsafe {
        for (key, value) in original {
            match value {
                Some(value) => env::set_var(key, value),
                None => env::remove_var(key),
            }
        }
    }
}

#[test]
#[serial]
fn test_config_defaults() {
    with_env(&[], || {
        let config = Config::from_env_only().unwrap();

        assert_eq!(config.database_url, "postgres://@localhost:5432/sportly");
        assert_eq!(config.jwt_expiration_days, 30);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.environment, "development");
        assert_eq!(config.client_base_url, "http://localhost:3000");
        assert_eq!(config.feed_utc_offset_minutes, 420);
        assert_eq!(config.geocoding_api_key, None);
        assert_eq!(config.geocoding_base_url, DEFAULT_GEOCODING_BASE_URL);
        assert!(config.is_development());
        assert_eq!(config.feed_offset().unwrap().local_minus_utc(), 7 * 3600);
    });
}

#[test]
#[serial]
fn test_config_custom_values() {
    with_env(
        &[
            ("DATABASE_URL", "postgres://sportly@db:5432/sportly"),
            ("JWT_SECRET", "test-secret"),
            ("JWT_EXPIRATION_DAYS", "7"),
            ("HOST", "0.0.0.0"),
            ("PORT", "3000"),
            ("ENVIRONMENT", "production"),
            ("FEED_UTC_OFFSET_MINUTES", "-300"),
            ("GEOCODING_API_KEY", "maps-key"),
        ],
        || {
            let config = Config::from_env_only().unwrap();

            assert_eq!(config.database_url, "postgres://sportly@db:5432/sportly");
            assert_eq!(config.jwt_secret, "test-secret");
            assert_eq!(config.jwt_expiration_days, 7);
            assert_eq!(config.server_address(), "0.0.0.0:3000");
            assert!(config.is_production());
            assert_eq!(config.feed_offset().unwrap().local_minus_utc(), -300 * 60);
            assert_eq!(config.geocoding_api_key.as_deref(), Some("maps-key"));
        },
    );
}

#[test]
#[serial]
fn test_config_invalid_numbers_fall_back() {
    with_env(
        &[("PORT", "not-a-port"), ("JWT_EXPIRATION_DAYS", "soon")],
        || {
            let config = Config::from_env_only().unwrap();
            assert_eq!(config.port, 8080);
            assert_eq!(config.jwt_expiration_days, 30);
        },
    );
}

#[test]
#[serial]
fn test_config_rejects_out_of_range_offset() {
    with_env(&[("FEED_UTC_OFFSET_MINUTES", "100000")], || {
        assert!(Config::from_env_only().is_err());
    });
}

#[test]
#[serial]
fn test_blank_geocoding_key_is_unset() {
    with_env(&[("GEOCODING_API_KEY", "  ")], || {
        let config = Config::from_env_only().unwrap();
        assert_eq!(config.geocoding_api_key, None);
    });
}

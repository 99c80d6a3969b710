mod common;

use betfair_session::config::Config;
use betfair_session::{Error, LoginMethod};
use common::TEST_PEM;
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn test_config_new_with_valid_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");

    let config_content = r#"
[betfair]
username = "test_user"
password = "test_pass"
api_key = "test_key"
"#;

    fs::write(&config_path, config_content).unwrap();

    let original_dir = std::env::current_dir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();

    let result = Config::new();

    std::env::set_current_dir(original_dir).unwrap();

    let config = result.unwrap();
    assert_eq!(config.betfair.username, "test_user");
    assert_eq!(config.betfair.password, "test_pass");
    assert_eq!(config.betfair.api_key, "test_key");
    assert_eq!(config.betfair.login_method, LoginMethod::Interactive);
    assert!(!config.betfair.keep_alive);
}

const ENV_VARS: [&str; 6] = [
    "BETFAIR_USERNAME",
    "BETFAIR_PASSWORD",
    "BETFAIR_API_KEY",
    "BETFAIR_LOGIN_METHOD",
    "BETFAIR_CERT_PATH",
    "BETFAIR_KEEP_ALIVE",
];

// The only test in this binary that touches BETFAIR_* variables, so the
// cases run in sequence against shared process state.
#[test]
fn test_config_from_env() {
    std::env::set_var("BETFAIR_USERNAME", "env_user");
    std::env::set_var("BETFAIR_PASSWORD", "env_pass");
    std::env::set_var("BETFAIR_API_KEY", "env_key");
    std::env::remove_var("BETFAIR_LOGIN_METHOD");
    std::env::remove_var("BETFAIR_CERT_PATH");
    std::env::remove_var("BETFAIR_KEEP_ALIVE");

    let config = Config::from_env().unwrap();
    assert_eq!(config.betfair.username, "env_user");
    assert_eq!(config.betfair.api_key, "env_key");
    assert_eq!(config.betfair.login_method, LoginMethod::Interactive);
    assert!(!config.betfair.keep_alive);

    for (value, expected) in [("1", true), ("true", true), ("TRUE", true), ("0", false)] {
        std::env::set_var("BETFAIR_KEEP_ALIVE", value);
        let config = Config::from_env().unwrap();
        assert_eq!(config.betfair.keep_alive, expected, "BETFAIR_KEEP_ALIVE={value}");
    }

    std::env::set_var("BETFAIR_LOGIN_METHOD", "certificate");
    std::env::set_var("BETFAIR_CERT_PATH", "/tmp/client.pem");
    let config = Config::from_env().unwrap();
    assert_eq!(config.betfair.login_method, LoginMethod::CertificateBased);
    assert_eq!(config.betfair.cert_path.as_deref(), Some("/tmp/client.pem"));

    std::env::set_var("BETFAIR_LOGIN_METHOD", "pfx");
    let err = Config::from_env().unwrap_err();
    assert!(matches!(err, Error::Configuration(ref msg) if msg.contains("pfx")));

    std::env::set_var("BETFAIR_LOGIN_METHOD", "interactive");
    std::env::remove_var("BETFAIR_API_KEY");
    let err = Config::from_env().unwrap_err();
    assert!(matches!(err, Error::Configuration(ref msg) if msg.contains("BETFAIR_API_KEY")));

    for name in ENV_VARS {
        std::env::remove_var(name);
    }
}

#[test]
fn test_config_from_missing_file() {
    let dir = tempdir().unwrap();
    let result = Config::from_file(dir.path().join("missing.toml"));
    assert!(matches!(result, Err(Error::Configuration(_))));
}

#[test]
fn test_config_with_invalid_toml() {
    let result = Config::from_toml_str(
        r#"
[betfair
username = "test_user"
"#,
    );
    assert!(matches!(result, Err(Error::Configuration(_))));
}

#[test]
fn test_config_missing_required_field() {
    let result = Config::from_toml_str(
        r#"
[betfair]
username = "test_user"
password = "test_pass"
"#,
    );
    assert!(result.is_err());
}

#[test]
fn test_certificate_account_from_file() {
    let dir = tempdir().unwrap();
    let cert_path = dir.path().join("client.pem");
    fs::write(&cert_path, TEST_PEM).unwrap();

    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        format!(
            r#"
[betfair]
username = "test_user"
password = "test_pass"
api_key = "test_key"
login_method = "certificate"
cert_path = "{}"
keep_alive = true
"#,
            cert_path.display()
        ),
    )
    .unwrap();

    let config = Config::from_file(&config_path).unwrap();
    let account = config.account().unwrap();

    assert_eq!(account.login_method, LoginMethod::CertificateBased);
    assert!(account.keep_alive);
    assert_eq!(account.client_certificate.as_ref().unwrap().chain_len(), 1);
}

#[test]
fn test_certificate_login_requires_cert_path() {
    let config = Config::from_toml_str(
        r#"
[betfair]
username = "test_user"
password = "test_pass"
api_key = "test_key"
login_method = "certificate"
"#,
    )
    .unwrap();

    let err = config.account().unwrap_err();
    assert!(err.to_string().contains("cert_path"));
}

#[test]
fn test_session_section_overrides_defaults() {
    let config = Config::from_toml_str(
        r#"
[betfair]
username = "test_user"
password = "test_pass"
api_key = "test_key"

[session]
client_timeout_secs = 30
pool_capacity = 8
"#,
    )
    .unwrap();

    let session = config.session_config().unwrap();
    assert_eq!(session.client_timeout, Duration::from_secs(30));
    assert_eq!(session.pool_capacity, 8);
    assert_eq!(session.keep_alive_interval, Duration::from_secs(600));
}

#[test]
fn test_zero_pool_capacity_is_rejected() {
    let config = Config::from_toml_str(
        r#"
[betfair]
username = "test_user"
password = "test_pass"
api_key = "test_key"

[session]
pool_capacity = 0
"#,
    )
    .unwrap();

    assert!(matches!(
        config.session_config(),
        Err(Error::Configuration(_))
    ));
}

#[test]
fn test_endpoint_overrides_keep_other_defaults() {
    let config = Config::from_toml_str(
        r#"
[betfair]
username = "test_user"
password = "test_pass"
api_key = "test_key"

[endpoints]
keep_alive = "https://identitysso.betfair.es/api/keepAlive"

[endpoints.betting]
es = "https://api.betfair.es/exchange/betting/json-rpc/v1"
"#,
    )
    .unwrap();

    let endpoints = &config.endpoints;
    assert_eq!(endpoints.keep_alive, "https://identitysso.betfair.es/api/keepAlive");
    assert_eq!(
        endpoints.interactive_login,
        "https://identitysso-api.betfair.com/api/login"
    );
    assert_eq!(
        endpoints.betting_for("ES").unwrap(),
        "https://api.betfair.es/exchange/betting/json-rpc/v1"
    );
    assert!(endpoints.betting_for("uk").is_err());
}

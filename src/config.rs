use crate::account::{Account, ClientCertificate, LoginMethod};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_POOL_CAPACITY: usize = 100;
pub const DEFAULT_KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(10 * 60);

const INTERACTIVE_LOGIN_URL: &str = "https://identitysso-api.betfair.com/api/login";
const CERT_LOGIN_URL: &str = "https://identitysso-api.betfair.com/api/certlogin";
const KEEP_ALIVE_URL: &str = "https://identitysso.betfair.com/api/keepAlive";
const BETTING_URL_UK: &str = "https://api.betfair.com/exchange/betting/json-rpc/v1";
const BETTING_URL_AU: &str = "https://api-au.betfair.com/exchange/betting/json-rpc/v1";
const NAVIGATION_URL_FORMAT: &str =
    "https://api.betfair.com/exchange/betting/rest/v1/{locale}/navigation/menu.json";

/// Remote endpoints used by a session and the API layer on top of it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub interactive_login: String,
    pub certificate_login: String,
    pub keep_alive: String,
    /// JSON-RPC betting endpoint per exchange name (lower case).
    pub betting: BTreeMap<String, String>,
    /// Navigation menu URL; `{locale}` is substituted per request.
    pub navigation: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        let mut betting = BTreeMap::new();
        betting.insert("uk".to_string(), BETTING_URL_UK.to_string());
        betting.insert("au".to_string(), BETTING_URL_AU.to_string());

        Self {
            interactive_login: INTERACTIVE_LOGIN_URL.to_string(),
            certificate_login: CERT_LOGIN_URL.to_string(),
            keep_alive: KEEP_ALIVE_URL.to_string(),
            betting,
            navigation: NAVIGATION_URL_FORMAT.to_string(),
        }
    }
}

impl Endpoints {
    /// Point every endpoint at one base URL. Used against local mock servers.
    pub fn with_base_url(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        let mut betting = BTreeMap::new();
        betting.insert("uk".to_string(), format!("{base}/exchange/betting/json-rpc/v1"));
        betting.insert("au".to_string(), format!("{base}/au/exchange/betting/json-rpc/v1"));

        Self {
            interactive_login: format!("{base}/api/login"),
            certificate_login: format!("{base}/api/certlogin"),
            keep_alive: format!("{base}/api/keepAlive"),
            betting,
            navigation: format!("{base}/exchange/betting/rest/v1/{{locale}}/navigation/menu.json"),
        }
    }

    pub fn login_for(&self, method: LoginMethod) -> &str {
        match method {
            LoginMethod::Interactive => &self.interactive_login,
            LoginMethod::CertificateBased => &self.certificate_login,
        }
    }

    /// Resolve an exchange name (case-insensitive) to its betting endpoint.
    pub fn betting_for(&self, exchange: &str) -> Result<&str> {
        self.betting
            .get(&exchange.to_ascii_lowercase())
            .map(String::as_str)
            .ok_or_else(|| Error::configuration(format!("invalid exchange name `{exchange}`")))
    }

    pub fn navigation_for(&self, locale: &str) -> String {
        self.navigation.replace("{locale}", locale)
    }
}

/// Settings that shape one session's transport, pool and keep-alive loop.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub client_timeout: Duration,
    pub pool_capacity: usize,
    pub keep_alive_interval: Duration,
    pub endpoints: Endpoints,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            client_timeout: DEFAULT_CLIENT_TIMEOUT,
            pool_capacity: DEFAULT_POOL_CAPACITY,
            keep_alive_interval: DEFAULT_KEEP_ALIVE_INTERVAL,
            endpoints: Endpoints::default(),
        }
    }
}

impl SessionConfig {
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_pool_capacity(mut self, capacity: usize) -> Self {
        self.pool_capacity = capacity;
        self
    }

    pub fn with_client_timeout(mut self, timeout: Duration) -> Self {
        self.client_timeout = timeout;
        self
    }

    pub fn with_keep_alive_interval(mut self, interval: Duration) -> Self {
        self.keep_alive_interval = interval;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.pool_capacity == 0 {
            return Err(Error::configuration("pool capacity must be greater than 0"));
        }
        if self.client_timeout.is_zero() {
            return Err(Error::configuration("client timeout must be greater than 0"));
        }
        if self.keep_alive_interval.is_zero() {
            return Err(Error::configuration(
                "keep-alive interval must be greater than 0",
            ));
        }
        if self.endpoints.betting.is_empty() {
            return Err(Error::configuration(
                "at least one betting endpoint must be configured",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BetfairConfig {
    pub username: String,
    pub password: String,
    pub api_key: String,
    #[serde(default)]
    pub login_method: LoginMethod,
    /// PEM file holding the client certificate and its private key.
    #[serde(default)]
    pub cert_path: Option<String>,
    #[serde(default)]
    pub keep_alive: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionSection {
    pub client_timeout_secs: Option<u64>,
    pub pool_capacity: Option<usize>,
    pub keep_alive_interval_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub betfair: BetfairConfig,
    #[serde(default)]
    pub session: SessionSection,
    #[serde(default)]
    pub endpoints: Endpoints,
}

impl Config {
    /// Load `config.toml` from the working directory.
    pub fn new() -> Result<Self> {
        Self::from_file("config.toml")
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config_str = fs::read_to_string(path)
            .map_err(|e| Error::configuration(format!("cannot read {}: {e}", path.display())))?;
        let config = Self::from_toml_str(&config_str)?;
        info!(
            path = %path.display(),
            username = %config.betfair.username,
            login_method = ?config.betfair.login_method,
            "Loaded config"
        );
        Ok(config)
    }

    pub fn from_toml_str(config_str: &str) -> Result<Self> {
        toml::from_str(config_str).map_err(|e| Error::configuration(format!("invalid config: {e}")))
    }

    /// Build a config from `BETFAIR_*` environment variables, loading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let required = |name: &str| {
            env::var(name).map_err(|_| Error::configuration(format!("{name} must be set")))
        };

        let login_method = match env::var("BETFAIR_LOGIN_METHOD").ok().as_deref() {
            None | Some("") | Some("interactive") => LoginMethod::Interactive,
            Some("certificate") | Some("certificate_based") => LoginMethod::CertificateBased,
            Some(other) => {
                return Err(Error::configuration(format!(
                    "unknown BETFAIR_LOGIN_METHOD `{other}`"
                )))
            }
        };

        Ok(Self {
            betfair: BetfairConfig {
                username: required("BETFAIR_USERNAME")?,
                password: required("BETFAIR_PASSWORD")?,
                api_key: required("BETFAIR_API_KEY")?,
                login_method,
                cert_path: env::var("BETFAIR_CERT_PATH").ok(),
                keep_alive: env::var("BETFAIR_KEEP_ALIVE")
                    .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                    .unwrap_or(false),
            },
            session: SessionSection::default(),
            endpoints: Endpoints::default(),
        })
    }

    /// Build the account descriptor, reading the certificate if the login method needs one.
    pub fn account(&self) -> Result<Account> {
        let betfair = &self.betfair;
        let client_certificate = match (&betfair.cert_path, betfair.login_method) {
            (Some(path), _) => Some(ClientCertificate::from_pem_file(path)?),
            (None, LoginMethod::CertificateBased) => {
                return Err(Error::configuration(
                    "login_method = \"certificate\" requires cert_path",
                ))
            }
            (None, LoginMethod::Interactive) => None,
        };

        let account = Account {
            username: betfair.username.clone(),
            password: betfair.password.clone(),
            application_key: betfair.api_key.clone(),
            client_certificate,
            keep_alive: betfair.keep_alive,
            login_method: betfair.login_method,
        };
        account.validate()?;
        Ok(account)
    }

    pub fn session_config(&self) -> Result<SessionConfig> {
        let defaults = SessionConfig::default();
        let config = SessionConfig {
            client_timeout: self
                .session
                .client_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.client_timeout),
            pool_capacity: self.session.pool_capacity.unwrap_or(defaults.pool_capacity),
            keep_alive_interval: self
                .session
                .keep_alive_interval_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.keep_alive_interval),
            endpoints: self.endpoints.clone(),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_config_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.client_timeout, Duration::from_secs(10));
        assert_eq!(config.pool_capacity, 100);
        assert_eq!(config.keep_alive_interval, Duration::from_secs(600));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let config = SessionConfig::default().with_pool_capacity(0);
        assert!(matches!(config.validate(), Err(Error::Configuration(_))));
    }

    #[test]
    fn test_betting_endpoint_lookup_ignores_case() {
        let endpoints = Endpoints::default();
        assert_eq!(endpoints.betting_for("UK").unwrap(), BETTING_URL_UK);
        assert_eq!(endpoints.betting_for("au").unwrap(), BETTING_URL_AU);

        let err = endpoints.betting_for("mars").unwrap_err();
        assert_eq!(err.to_string(), "invalid configuration: invalid exchange name `mars`");
    }

    #[test]
    fn test_navigation_locale_substitution() {
        let endpoints = Endpoints::default();
        assert_eq!(
            endpoints.navigation_for("es"),
            "https://api.betfair.com/exchange/betting/rest/v1/es/navigation/menu.json"
        );
    }

    #[test]
    fn test_base_url_endpoints() {
        let endpoints = Endpoints::with_base_url("http://127.0.0.1:1234/");
        assert_eq!(endpoints.interactive_login, "http://127.0.0.1:1234/api/login");
        assert_eq!(
            endpoints.login_for(LoginMethod::CertificateBased),
            "http://127.0.0.1:1234/api/certlogin"
        );
        assert_eq!(
            endpoints.navigation_for("en"),
            "http://127.0.0.1:1234/exchange/betting/rest/v1/en/navigation/menu.json"
        );
    }
}

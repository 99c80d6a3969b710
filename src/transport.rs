use crate::account::{Account, LoginMethod};
use crate::config::SessionConfig;
use crate::error::{Error, Result};
use reqwest::Client;
use tracing::debug;

pub(crate) const APPLICATION_JSON: &str = "application/json";
pub(crate) const X_APPLICATION: &str = "X-Application";
pub(crate) const X_AUTHENTICATION: &str = "X-Authentication";

/// Build the HTTP client for one session.
///
/// Certificate accounts present their client certificate on every TLS
/// handshake made through this client, including the login call.
pub fn build_client(account: &Account, config: &SessionConfig) -> Result<Client> {
    let mut builder = Client::builder()
        .timeout(config.client_timeout)
        .connect_timeout(config.client_timeout)
        .pool_max_idle_per_host(config.pool_capacity);

    if account.login_method == LoginMethod::CertificateBased {
        let certificate = account.client_certificate.as_ref().ok_or_else(|| {
            Error::configuration("certificate login requires a client certificate")
        })?;
        debug!(
            chain_len = certificate.chain_len(),
            "Configuring client certificate"
        );
        builder = builder.identity(certificate.to_identity()?);
    }

    builder
        .build()
        .map_err(|e| Error::configuration(format!("cannot build HTTP client: {e}")))
}

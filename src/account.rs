use crate::error::{Error, Result};
use rustls_pki_types::{CertificateDer, PrivateKeyDer};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// How the account presents its credentials at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginMethod {
    /// Username and password posted to the interactive login endpoint.
    #[default]
    Interactive,
    /// Client TLS certificate presented to the certificate login endpoint.
    #[serde(alias = "certificate")]
    CertificateBased,
}

/// PEM bundle holding a client certificate chain and its private key.
#[derive(Clone)]
pub struct ClientCertificate {
    pem: Vec<u8>,
    chain_len: usize,
}

impl ClientCertificate {
    /// Parse a PEM bundle. At least one certificate and one private key are required.
    pub fn from_pem(pem: impl Into<Vec<u8>>) -> Result<Self> {
        let pem = pem.into();

        let chain: Vec<CertificateDer<'static>> = rustls_pemfile::certs(&mut pem.as_slice())
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| Error::configuration(format!("unreadable client certificate: {e}")))?;
        if chain.is_empty() {
            return Err(Error::configuration(
                "client certificate PEM contains no certificate",
            ));
        }

        let key: Option<PrivateKeyDer<'static>> = rustls_pemfile::private_key(&mut pem.as_slice())
            .map_err(|e| Error::configuration(format!("unreadable private key: {e}")))?;
        if key.is_none() {
            return Err(Error::configuration(
                "client certificate PEM contains no private key",
            ));
        }

        Ok(Self {
            pem,
            chain_len: chain.len(),
        })
    }

    pub fn from_pem_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let pem = std::fs::read(path).map_err(|e| {
            Error::configuration(format!("cannot read certificate {}: {e}", path.display()))
        })?;
        Self::from_pem(pem)
    }

    /// Number of certificates in the chain.
    pub fn chain_len(&self) -> usize {
        self.chain_len
    }

    pub(crate) fn to_identity(&self) -> Result<reqwest::Identity> {
        reqwest::Identity::from_pem(&self.pem)
            .map_err(|e| Error::configuration(format!("unusable client certificate: {e}")))
    }
}

impl fmt::Debug for ClientCertificate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCertificate")
            .field("chain_len", &self.chain_len)
            .finish_non_exhaustive()
    }
}

/// Credentials for one Betfair identity. Immutable once built.
#[derive(Clone)]
pub struct Account {
    pub username: String,
    pub password: String,
    pub application_key: String,
    pub client_certificate: Option<ClientCertificate>,
    pub keep_alive: bool,
    pub login_method: LoginMethod,
}

impl Account {
    pub fn interactive(
        username: impl Into<String>,
        password: impl Into<String>,
        application_key: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            application_key: application_key.into(),
            client_certificate: None,
            keep_alive: false,
            login_method: LoginMethod::Interactive,
        }
    }

    pub fn certificate(
        username: impl Into<String>,
        password: impl Into<String>,
        application_key: impl Into<String>,
        certificate: ClientCertificate,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            application_key: application_key.into(),
            client_certificate: Some(certificate),
            keep_alive: false,
            login_method: LoginMethod::CertificateBased,
        }
    }

    pub fn with_keep_alive(mut self, enabled: bool) -> Self {
        self.keep_alive = enabled;
        self
    }

    /// Check that the fields required by the login method are present.
    pub fn validate(&self) -> Result<()> {
        if self.application_key.is_empty() {
            return Err(Error::configuration("application key must not be empty"));
        }
        match self.login_method {
            LoginMethod::Interactive if self.username.is_empty() => Err(Error::configuration(
                "interactive login requires a username",
            )),
            LoginMethod::CertificateBased if self.client_certificate.is_none() => Err(
                Error::configuration("certificate login requires a client certificate"),
            ),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("application_key", &self.application_key)
            .field("client_certificate", &self.client_certificate)
            .field("keep_alive", &self.keep_alive)
            .field("login_method", &self.login_method)
            .finish()
    }
}

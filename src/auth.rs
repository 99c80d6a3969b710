use crate::account::{Account, LoginMethod};
use crate::config::Endpoints;
use crate::dto::auth::{CertificateLoginResponse, InteractiveLoginResponse};
use crate::error::{Error, Result};
use crate::transport::{APPLICATION_JSON, X_APPLICATION};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use tracing::{debug, info};

/// Performs the login handshake and hands back a session token.
///
/// Implementations must not touch session state; the session stores the token.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn login(&self, account: &Account) -> Result<String>;
}

/// Logs in against the Betfair identity endpoints.
#[derive(Debug, Clone)]
pub struct HttpAuthenticator {
    client: Client,
    endpoints: Endpoints,
}

impl HttpAuthenticator {
    pub fn new(client: Client, endpoints: Endpoints) -> Self {
        Self { client, endpoints }
    }

    async fn post_credentials(&self, account: &Account) -> Result<Vec<u8>> {
        let endpoint = self.endpoints.login_for(account.login_method);
        let form = [
            ("username", account.username.as_str()),
            ("password", account.password.as_str()),
        ];

        let response = self
            .client
            .post(endpoint)
            .header(ACCEPT, APPLICATION_JSON)
            .header(X_APPLICATION, account.application_key.as_str())
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        debug!(
            %status,
            login_method = ?account.login_method,
            "Login response received ({} bytes)",
            body.len()
        );
        Ok(body.to_vec())
    }
}

#[async_trait]
impl Authenticator for HttpAuthenticator {
    async fn login(&self, account: &Account) -> Result<String> {
        let body = self.post_credentials(account).await?;

        let token = match account.login_method {
            LoginMethod::Interactive => {
                let response: InteractiveLoginResponse = serde_json::from_slice(&body)?;
                if !response.is_success() {
                    let reason = if response.error.is_empty() {
                        response.status
                    } else {
                        response.error
                    };
                    return Err(Error::authentication(reason));
                }
                response.token
            }
            LoginMethod::CertificateBased => {
                let response: CertificateLoginResponse = serde_json::from_slice(&body)?;
                if !response.is_success() {
                    return Err(Error::authentication(response.login_status));
                }
                response.session_token
            }
        };

        if token.is_empty() {
            return Err(Error::authentication("login succeeded without a session token"));
        }

        info!(
            username = %account.username,
            login_method = ?account.login_method,
            "Login succeeded"
        );
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn authenticator(server: &Server) -> HttpAuthenticator {
        HttpAuthenticator::new(Client::new(), Endpoints::with_base_url(&server.url()))
    }

    #[tokio::test]
    async fn test_interactive_login_posts_form() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/login")
            .match_header("accept", "application/json")
            .match_header("x-application", "app-key")
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("username".into(), "punter".into()),
                Matcher::UrlEncoded("password".into(), "p&ss=word".into()),
            ]))
            .with_body(r#"{"token":"abc123","product":"app-key","status":"SUCCESS","error":""}"#)
            .create_async()
            .await;

        let account = Account::interactive("punter", "p&ss=word", "app-key");
        let token = authenticator(&server).login(&account).await.unwrap();

        assert_eq!(token, "abc123");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_interactive_failure_uses_error_field() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/login")
            .with_body(r#"{"token":"","status":"FAIL","error":"INVALID_USERNAME_OR_PASSWORD"}"#)
            .create_async()
            .await;

        let account = Account::interactive("punter", "wrong", "app-key");
        let err = authenticator(&server).login(&account).await.unwrap_err();

        assert!(matches!(
            err,
            Error::Authentication { ref reason } if reason == "INVALID_USERNAME_OR_PASSWORD"
        ));
    }

    #[tokio::test]
    async fn test_certificate_login_reads_session_token() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/certlogin")
            .with_body(r#"{"sessionToken":"cert-token","loginStatus":"SUCCESS"}"#)
            .create_async()
            .await;

        let mut account = Account::interactive("punter", "secret", "app-key");
        account.login_method = LoginMethod::CertificateBased;
        let token = authenticator(&server).login(&account).await.unwrap();

        assert_eq!(token, "cert-token");
    }

    #[tokio::test]
    async fn test_success_without_token_is_rejected() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/login")
            .with_body(r#"{"status":"SUCCESS"}"#)
            .create_async()
            .await;

        let account = Account::interactive("punter", "secret", "app-key");
        let err = authenticator(&server).login(&account).await.unwrap_err();
        assert!(matches!(err, Error::Authentication { .. }));
    }

    #[tokio::test]
    async fn test_non_json_body_is_decode_error() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/login")
            .with_status(503)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let account = Account::interactive("punter", "secret", "app-key");
        let err = authenticator(&server).login(&account).await.unwrap_err();
        assert!(err.is_decode());
    }
}

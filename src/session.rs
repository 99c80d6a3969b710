//! Authenticated session over one Betfair identity.
//!
//! A [`Session`] owns the write-once session token, the admission pool and the
//! HTTP client. The token is fetched lazily on first use; concurrent callers
//! share a single login attempt.

use crate::account::Account;
use crate::auth::{Authenticator, HttpAuthenticator};
use crate::config::SessionConfig;
use crate::dto::auth::KeepAliveResponse;
use crate::error::{Error, Result};
use crate::keep_alive::{self, KeepAliveMonitor, KeepAliveReport, KeepAliveState};
use crate::pool::ConnectionPool;
use crate::transport::{self, APPLICATION_JSON, X_APPLICATION, X_AUTHENTICATION};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::{Arc, OnceLock, Weak};
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// `None` until the shared login attempt settles.
type LoginOutcome = Option<Result<String>>;

#[derive(Default)]
struct TokenState {
    in_flight: Option<watch::Receiver<LoginOutcome>>,
    keep_alive_started: bool,
    keep_alive_task: Option<JoinHandle<()>>,
}

struct SessionInner {
    account: Arc<Account>,
    config: SessionConfig,
    client: Client,
    authenticator: Arc<dyn Authenticator>,
    pool: ConnectionPool,
    token: OnceLock<String>,
    state: Mutex<TokenState>,
    keep_alive_monitor: KeepAliveMonitor,
    shutdown: CancellationToken,
}

impl Drop for SessionInner {
    fn drop(&mut self) {
        self.shutdown.cancel();
        self.pool.close();
    }
}

/// Cheap to clone; every clone shares the same token, pool and keep-alive loop.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

/// Non-owning handle held by the keep-alive loop.
#[derive(Clone)]
pub(crate) struct WeakSession(Weak<SessionInner>);

impl WeakSession {
    pub(crate) fn upgrade(&self) -> Option<Session> {
        self.0.upgrade().map(|inner| Session { inner })
    }
}

impl Session {
    /// Build a session with the default HTTP transport and authenticator.
    pub fn new(account: Arc<Account>, config: SessionConfig) -> Result<Self> {
        let client = transport::build_client(&account, &config)?;
        Self::with_client(account, config, client)
    }

    /// Build a session on a caller-supplied HTTP client.
    pub fn with_client(
        account: Arc<Account>,
        config: SessionConfig,
        client: Client,
    ) -> Result<Self> {
        let authenticator = Arc::new(HttpAuthenticator::new(
            client.clone(),
            config.endpoints.clone(),
        ));
        Self::from_parts(account, config, client, authenticator)
    }

    /// Build a session that logs in through `authenticator`.
    pub fn with_authenticator(
        account: Arc<Account>,
        config: SessionConfig,
        authenticator: Arc<dyn Authenticator>,
    ) -> Result<Self> {
        let client = transport::build_client(&account, &config)?;
        Self::from_parts(account, config, client, authenticator)
    }

    fn from_parts(
        account: Arc<Account>,
        config: SessionConfig,
        client: Client,
        authenticator: Arc<dyn Authenticator>,
    ) -> Result<Self> {
        account.validate()?;
        config.validate()?;

        let pool = ConnectionPool::new(config.pool_capacity);
        debug!(
            username = %account.username,
            login_method = ?account.login_method,
            pool_capacity = config.pool_capacity,
            "Session created"
        );

        Ok(Self {
            inner: Arc::new(SessionInner {
                account,
                config,
                client,
                authenticator,
                pool,
                token: OnceLock::new(),
                state: Mutex::new(TokenState::default()),
                keep_alive_monitor: KeepAliveMonitor::new(),
                shutdown: CancellationToken::new(),
            }),
        })
    }

    pub(crate) fn downgrade(&self) -> WeakSession {
        WeakSession(Arc::downgrade(&self.inner))
    }

    /// Return the session token, logging in on first use.
    ///
    /// Concurrent callers wait on one shared login. A failed login leaves the
    /// session without a token so the next call tries again. Fails with
    /// [`Error::Cancelled`] once the session is shut down.
    pub async fn get_token(&self) -> Result<String> {
        if self.inner.shutdown.is_cancelled() {
            return Err(Error::Cancelled);
        }
        if let Some(token) = self.inner.token.get() {
            return Ok(token.clone());
        }

        let mut rx = {
            let mut state = self.inner.state.lock().await;
            if let Some(token) = self.inner.token.get() {
                return Ok(token.clone());
            }
            if self.inner.shutdown.is_cancelled() {
                return Err(Error::Cancelled);
            }
            match state.in_flight.clone() {
                Some(rx) => rx,
                None => {
                    let (tx, rx) = watch::channel(None);
                    state.in_flight = Some(rx.clone());
                    self.spawn_login(tx);
                    rx
                }
            }
        };

        let outcome = tokio::select! {
            _ = self.inner.shutdown.cancelled() => return Err(Error::Cancelled),
            outcome = rx.wait_for(Option::is_some) => outcome.ok().and_then(|o| (*o).clone()),
        };

        match outcome {
            Some(result) => result,
            None => {
                // The login task went away without publishing a result.
                let mut state = self.inner.state.lock().await;
                if state.in_flight.as_ref().is_some_and(|r| r.same_channel(&rx)) {
                    state.in_flight = None;
                }
                Err(Error::Internal(
                    "login task ended without a result".to_string(),
                ))
            }
        }
    }

    /// The login runs on its own task so a caller dropping its future does not
    /// abort the attempt other callers are waiting on.
    fn spawn_login(&self, tx: watch::Sender<LoginOutcome>) {
        let session = self.clone();
        tokio::spawn(async move {
            debug!(username = %session.inner.account.username, "Logging in");
            let result = tokio::select! {
                _ = session.inner.shutdown.cancelled() => Err(Error::Cancelled),
                result = session.inner.authenticator.login(&session.inner.account) => result,
            };
            session.finish_login(result, tx).await;
        });
    }

    async fn finish_login(&self, result: Result<String>, tx: watch::Sender<LoginOutcome>) {
        let mut state = self.inner.state.lock().await;
        state.in_flight = None;

        let result = match result {
            Ok(token) => {
                let token = self.inner.token.get_or_init(|| token).clone();
                info!(username = %self.inner.account.username, "Session token acquired");

                if self.inner.account.keep_alive
                    && !state.keep_alive_started
                    && !self.inner.shutdown.is_cancelled()
                {
                    state.keep_alive_started = true;
                    state.keep_alive_task = Some(
                        keep_alive::start(
                            self.downgrade(),
                            self.inner.config.keep_alive_interval,
                            self.inner.keep_alive_monitor.clone(),
                            self.inner.shutdown.clone(),
                        )
                        .await,
                    );
                }
                Ok(token)
            }
            Err(err) => {
                warn!(username = %self.inner.account.username, error = %err, "Login failed");
                Err(err)
            }
        };

        tx.send_replace(Some(result));
    }

    /// Extend the lifetime of the current token. Does not rotate it.
    pub async fn keep_alive(&self) -> Result<()> {
        let endpoint = self.inner.config.endpoints.keep_alive.clone();
        let response: KeepAliveResponse = self.request(Method::POST, &endpoint, Vec::new()).await?;

        if !response.is_success() {
            let reason = if response.error.is_empty() {
                response.status
            } else {
                response.error
            };
            return Err(Error::authentication(reason));
        }
        Ok(())
    }

    /// Send one authenticated exchange and return the raw response body.
    ///
    /// A pool permit is held from just before the request is sent until the
    /// body has been read. Non-2xx statuses are logged and the body is still
    /// returned for the caller to decode.
    pub async fn execute_authenticated(
        &self,
        method: Method,
        endpoint: &str,
        body: Vec<u8>,
    ) -> Result<Vec<u8>> {
        let url = parse_endpoint(&method, endpoint)?;
        let token = self.get_token().await?;

        let _permit = tokio::select! {
            _ = self.inner.shutdown.cancelled() => return Err(Error::Cancelled),
            permit = self.inner.pool.acquire() => permit?,
        };

        let mut request = self
            .inner
            .client
            .request(method.clone(), url)
            .header(ACCEPT, APPLICATION_JSON)
            .header(X_APPLICATION, self.inner.account.application_key.as_str())
            .header(X_AUTHENTICATION, token.as_str());
        if !body.is_empty() {
            request = request.header(CONTENT_TYPE, APPLICATION_JSON).body(body);
        }

        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let bytes = response.bytes().await?;
            Ok::<_, Error>((status, bytes))
        };

        let (status, bytes) = tokio::select! {
            _ = self.inner.shutdown.cancelled() => return Err(Error::Cancelled),
            exchange = exchange => exchange?,
        };

        debug!(%method, endpoint, %status, "Exchange completed ({} bytes)", bytes.len());
        if !status.is_success() {
            warn!(%method, endpoint, %status, "Exchange returned non-success status");
        }
        Ok(bytes.to_vec())
    }

    /// Like [`Session::execute_authenticated`], decoding the body as JSON.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        body: Vec<u8>,
    ) -> Result<T> {
        let bytes = self.execute_authenticated(method, endpoint, body).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Current token without logging in.
    pub fn token(&self) -> Option<&str> {
        self.inner.token.get().map(String::as_str)
    }

    pub fn account(&self) -> &Account {
        &self.inner.account
    }

    pub fn config(&self) -> &SessionConfig {
        &self.inner.config
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.inner.pool
    }

    pub async fn keep_alive_state(&self) -> KeepAliveState {
        self.inner.keep_alive_monitor.get_state().await
    }

    pub async fn last_keep_alive(&self) -> Option<KeepAliveReport> {
        self.inner.keep_alive_monitor.last_report().await
    }

    pub fn keep_alive_monitor(&self) -> &KeepAliveMonitor {
        &self.inner.keep_alive_monitor
    }

    /// Stop the keep-alive loop and fail every pending and future operation
    /// with [`Error::Cancelled`].
    pub async fn shutdown(&self) {
        self.inner.shutdown.cancel();
        self.inner.pool.close();

        let task = self.inner.state.lock().await.keep_alive_task.take();
        if let Some(task) = task {
            if let Err(err) = task.await {
                warn!(error = %err, "Keep-alive task ended abnormally");
            }
        }
        info!(username = %self.inner.account.username, "Session shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.shutdown.is_cancelled()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("username", &self.inner.account.username)
            .field("login_method", &self.inner.account.login_method)
            .field("has_token", &self.inner.token.get().is_some())
            .field("pool", &self.inner.pool)
            .finish_non_exhaustive()
    }
}

fn parse_endpoint(method: &Method, endpoint: &str) -> Result<Url> {
    if *method != Method::GET && *method != Method::POST {
        return Err(Error::configuration(format!(
            "unsupported HTTP method `{method}`"
        )));
    }

    let url = Url::parse(endpoint)
        .map_err(|e| Error::configuration(format!("invalid endpoint `{endpoint}`: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(Error::configuration(format!(
            "unsupported endpoint scheme `{scheme}`"
        ))),
    }
}

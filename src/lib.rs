//! # betfair-session
//!
//! Session and connection management for the Betfair Exchange API: lazy,
//! single-flight login, an optional background keep-alive loop, and a bounded
//! pool that caps how many requests a session has in flight.
//!
//! ## Quick Start
//!
//! ```no_run
//! use betfair_session::{BettingApi, Config, RequestOptions, Session};
//! use betfair_session::dto::market::MarketFilter;
//! use std::sync::Arc;
//!
//! # async fn example() -> anyhow::Result<()> {
//! // Load configuration from config.toml
//! let config = Config::new()?;
//! let session = Session::new(Arc::new(config.account()?), config.session_config()?)?;
//!
//! // The first call logs in; later calls reuse the token
//! let api = BettingApi::new(session.clone());
//! let event_types = api
//!     .list_event_types(MarketFilter::default(), &RequestOptions::default())
//!     .await?;
//!
//! session.shutdown().await;
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - **Lazy login**: the token is fetched on first use, once, however many tasks ask for it
//! - **Interactive and certificate login**: username/password or a client TLS certificate
//! - **Keep-alive**: optional background loop that extends the token every ten minutes
//! - **Connection pool**: fixed number of permits gating concurrent requests
//! - **Betting API**: JSON-RPC listing calls and the navigation menu
//!
//! ## Configuration
//!
//! Create a `config.toml` file with your Betfair credentials:
//!
//! ```toml
//! [betfair]
//! username = "your_username"
//! password = "your_password"
//! api_key = "your_api_key"
//! login_method = "certificate"
//! cert_path = "/path/to/client.pem"
//! keep_alive = true
//!
//! [session]
//! pool_capacity = 100
//! client_timeout_secs = 10
//! ```
//!
//! ## Certificate Setup
//!
//! Combine the certificate and its private key into one PEM file:
//!
//! ```bash
//! cat client.crt client.key > client.pem
//! ```

pub mod account;
pub mod api;
pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod keep_alive;
pub mod pool;
pub mod session;
pub mod transport;

// Re-export commonly used types at the crate root
pub use account::{Account, ClientCertificate, LoginMethod};
pub use api::{BettingApi, RequestOptions};
pub use auth::{Authenticator, HttpAuthenticator};
pub use config::{Config, Endpoints, SessionConfig};
pub use error::{Error, Result};
pub use keep_alive::{KeepAliveMonitor, KeepAliveReport, KeepAliveState, KeepAliveStats};
pub use pool::{ConnectionPool, PoolPermit};
pub use session::Session;

//! HTTP client and service layer for the Investright API.
//!
//! [`InvestrightClient`] is the entry point for trading calls. Services
//! returned by [`orders`](InvestrightClient::orders),
//! [`portfolio`](InvestrightClient::portfolio) and
//! [`market_data`](InvestrightClient::market_data) share the client's
//! connection pool and token.
//!
//! # Example
//!
//! ```no_run
//! use investright_rs::{ClientConfig, InvestrightClient, Token};
//! use std::time::Duration;
//!
//! # async fn example() -> investright_rs::Result<()> {
//! let config = ClientConfig::default().with_timeout(Duration::from_secs(10));
//! let client = InvestrightClient::with_config(&Token::new("access-token"), config)?;
//!
//! let holdings = client.portfolio().holdings().await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod http;

pub use config::{BackoffPolicy, ClientConfig, DEFAULT_API_BASE_URL, DEFAULT_AUTH_BASE_URL};
pub use http::InvestrightClient;
pub(crate) use http::ClientInner;

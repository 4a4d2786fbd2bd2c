//! # investright-rs
//!
//! An async Rust client for the HDFC Securities Investright trading API.
//!
//! The crate has two entry points:
//!
//! - [`AuthClient`] runs the OAuth 2.0 authorization-code flow and turns
//!   codes and refresh tokens into [`Token`]s.
//! - [`InvestrightClient`] places, modifies and cancels orders and reads
//!   positions, holdings, trades and market data with a token.
//!
//! Every trading call returns a [`NormalizedResponse`]: either
//! `{"status":"success","data":...}` or
//! `{"status":"error","message":...,"code":...}`. Broker rejections land
//! in the error envelope with the broker's code passed through. Bad input,
//! rate limiting and transport failures are returned as [`Error`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use investright_rs::{AuthClient, Credentials, InvestrightClient};
//! use investright_rs::models::{OrderRequestBuilder, OrderType, Product, Side};
//!
//! #[tokio::main]
//! async fn main() -> investright_rs::Result<()> {
//!     let auth = AuthClient::new(Credentials::from_env()?)?;
//!     println!("Log in at {}", auth.generate_auth_url()?);
//!
//!     let response = auth.get_access_token("code-from-redirect").await?;
//!     let Some(token) = response.into_data() else {
//!         return Ok(());
//!     };
//!
//!     let client = InvestrightClient::new(&token)?;
//!     let order = OrderRequestBuilder::new()
//!         .symbol("INFY")
//!         .exchange("NSE")
//!         .side(Side::Buy)
//!         .quantity(1)
//!         .order_type(OrderType::Market)
//!         .product(Product::Mis)
//!         .build()?;
//!
//!     let ack = client.orders().place(&order).await?;
//!     println!("{}", serde_json::to_string(&ack)?);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod models;
pub mod symbols;

// Re-export primary types at crate root for convenience
pub use error::{Error, Result};
pub use models::{Exchange, NormalizedResponse, OrderId, Symbol};
pub use client::{BackoffPolicy, ClientConfig, InvestrightClient};
pub use auth::{AuthClient, Credentials, Token, TokenState};

/// Prelude module for convenient imports.
///
/// ```rust
/// use investright_rs::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::models::{
        // Primitives
        Exchange, OrderId, Symbol,
        // Enums
        Interval, OrderType, Product, Side, Validity,
        // Orders
        ModifyOrderRequest, Order, OrderAck, OrderRequest, OrderRequestBuilder,
        // Portfolio
        Holding, Position, Trade,
        // Market data
        Candle, History, HistoryRequest, MarketDepth, Quote,
        // Envelope
        NormalizedResponse,
    };
    pub use crate::client::{BackoffPolicy, ClientConfig, InvestrightClient};
    pub use crate::auth::{AuthClient, Credentials, ExposeSecret, Token, TokenState};
    pub use crate::symbols::{IdentityMapper, StaticMapper, SymbolMapper};
}

//! Authentication for the Investright API.
//!
//! The broker uses the OAuth 2.0 authorization-code flow:
//!
//! 1. Send the user to [`AuthClient::generate_auth_url`].
//! 2. Exchange the code from the redirect with
//!    [`AuthClient::get_access_token`].
//! 3. When the access token expires, call [`AuthClient::refresh_token`]
//!    and rebind the trading client with the new [`Token`].
//!
//! ```no_run
//! use investright_rs::auth::{AuthClient, Credentials};
//! use investright_rs::InvestrightClient;
//!
//! # async fn example() -> investright_rs::Result<()> {
//! let auth = AuthClient::new(Credentials::from_env()?)?;
//! let token = auth
//!     .get_access_token("code-from-callback")
//!     .await?
//!     .into_data()
//!     .expect("login rejected");
//!
//! let client = InvestrightClient::new(&token)?;
//! let positions = client.portfolio().positions().await?;
//! # Ok(())
//! # }
//! ```

mod client;
mod credentials;
mod token;

pub use client::{AuthClient, AUTH_SCOPE, DEFAULT_STATE};
pub use credentials::{Credentials, API_KEY_VAR, API_SECRET_VAR, REDIRECT_URI_VAR};
pub use secrecy::ExposeSecret;
pub use token::{Token, TokenState};

//! OAuth 2.0 authorization-code flow against the broker.

use chrono::Utc;
use reqwest::header::{HeaderValue, AUTHORIZATION};
use secrecy::ExposeSecret;
use serde_json::Value;
use url::Url;

use super::credentials::Credentials;
use super::token::{Token, TokenResponse};
use crate::client::ClientConfig;
use crate::error::is_error_body;
use crate::models::NormalizedResponse;
use crate::{Error, Result};

/// Scope requested in the authorization URL.
pub const AUTH_SCOPE: &str = "trading placement";

/// `state` parameter used when the caller does not supply one.
pub const DEFAULT_STATE: &str = "investright_state";

/// Client for the broker's OAuth endpoints.
///
/// The client is stateless apart from its credentials: tokens go in and
/// out by value and are never cached.
///
/// # Example
///
/// ```no_run
/// use investright_rs::auth::{AuthClient, Credentials};
///
/// # async fn example() -> investright_rs::Result<()> {
/// let auth = AuthClient::new(Credentials::from_env()?)?;
/// println!("Open {} to log in", auth.generate_auth_url()?);
///
/// let response = auth.get_access_token("code-from-callback").await?;
/// match response.into_data() {
///     Some(token) => println!("expires at {:?}", token.expires_at()),
///     None => println!("login rejected"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    credentials: Credentials,
    config: ClientConfig,
}

impl AuthClient {
    /// Create an auth client with default configuration.
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_config(credentials, ClientConfig::default())
    }

    /// Create an auth client reading credentials from the environment.
    pub fn from_env() -> Result<Self> {
        Self::new(Credentials::from_env()?)
    }

    /// Create an auth client with custom configuration.
    pub fn with_config(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        Ok(Self {
            http: config.http_client()?,
            credentials,
            config,
        })
    }

    /// The credentials this client authenticates with.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Build the URL the user opens in a browser to grant access.
    ///
    /// Pure: no request is made.
    pub fn generate_auth_url(&self) -> Result<Url> {
        self.generate_auth_url_with_state(DEFAULT_STATE)
    }

    /// Build the authorization URL with a caller-chosen `state` value.
    pub fn generate_auth_url_with_state(&self, state: &str) -> Result<Url> {
        let base = format!("{}/oauth/authorize", self.config.auth_base_url);
        Url::parse_with_params(
            &base,
            &[
                ("client_id", self.credentials.client_id()),
                ("redirect_uri", self.credentials.redirect_uri()),
                ("response_type", "code"),
                ("state", state),
                ("scope", AUTH_SCOPE),
            ],
        )
        .map_err(|e| Error::Config(format!("Invalid auth base URL {base}: {e}")))
    }

    /// Exchange a one-time authorization code for a token pair.
    ///
    /// A rejection by the token endpoint comes back as an error envelope
    /// carrying the broker's code.
    pub async fn get_access_token(&self, auth_code: &str) -> Result<NormalizedResponse<Token>> {
        if auth_code.trim().is_empty() {
            return Err(Error::InvalidInput("authorization code is required".to_string()));
        }

        let form = [
            ("grant_type", "authorization_code"),
            ("code", auth_code),
            ("redirect_uri", self.credentials.redirect_uri()),
            ("client_id", self.credentials.client_id()),
            ("client_secret", self.credentials.client_secret()),
        ];
        NormalizedResponse::from_result(self.token_request(&form).await)
    }

    /// Exchange a refresh token for a new token pair.
    ///
    /// Every refresh may rotate the refresh token. The returned token
    /// carries only what the broker sent back; if no new refresh token was
    /// issued, the caller has to authorize again once it expires.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<NormalizedResponse<Token>> {
        if refresh_token.trim().is_empty() {
            return Err(Error::InvalidInput("refresh token is required".to_string()));
        }

        let form = [
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", self.credentials.client_id()),
            ("client_secret", self.credentials.client_secret()),
        ];
        NormalizedResponse::from_result(self.token_request(&form).await)
    }

    /// Refresh `token` using its refresh token.
    ///
    /// `token` is left untouched; on failure the caller still holds it.
    pub async fn refresh(&self, token: &Token) -> Result<NormalizedResponse<Token>> {
        let refresh_token = token
            .refresh_token()
            .ok_or_else(|| Error::InvalidInput("token has no refresh token".to_string()))?;
        self.refresh_token(refresh_token.expose_secret()).await
    }

    /// Check whether the broker still accepts `token`.
    ///
    /// Fetches the account profile with a short timeout and reports whether
    /// it succeeded. Transport failures are returned as errors.
    pub async fn validate_token(&self, token: &Token) -> Result<bool> {
        let url = format!("{}/account/profile", self.config.api_base_url);
        let bearer = HeaderValue::from_str(&token.bearer())
            .map_err(|_| Error::InvalidInput("Invalid token format".to_string()))?;

        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, bearer)
            .timeout(self.config.validation_timeout)
            .send()
            .await?;

        let valid = response.status().is_success();
        if !valid {
            tracing::debug!(status = response.status().as_u16(), "token validation failed");
        }
        Ok(valid)
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<Token> {
        let url = format!("{}/oauth/token", self.config.auth_base_url);
        tracing::debug!(url = %url, "requesting token");

        let response = self
            .http
            .post(&url)
            .basic_auth(
                self.credentials.client_id(),
                Some(self.credentials.client_secret()),
            )
            .form(form)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "token request failed"))?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        let body: Value = serde_json::from_str(&text).unwrap_or(Value::String(text));

        if !(200..300).contains(&status) || is_error_body(&body) {
            tracing::warn!(status, "token endpoint rejected request");
            return Err(Error::from_auth_response(status, &body));
        }

        let token: TokenResponse = match body.get("data") {
            Some(data) if data.is_object() => serde_json::from_value(data.clone())?,
            _ => serde_json::from_value(body.clone())?,
        };
        if token.access_token.is_empty() {
            return Err(Error::from_auth_response(status, &body));
        }
        Ok(token.into_token(Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> AuthClient {
        AuthClient::new(Credentials::new(
            "my-key",
            "my-secret",
            "http://localhost:8000/auth/callback",
        ))
        .unwrap()
    }

    #[test]
    fn test_auth_url_contains_client_and_redirect() {
        let url = client().generate_auth_url().unwrap();
        assert_eq!(url.path(), "/oauth/authorize");

        let params: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(params.contains(&("client_id".into(), "my-key".into())));
        assert!(params.contains(&(
            "redirect_uri".into(),
            "http://localhost:8000/auth/callback".into()
        )));
        assert!(params.contains(&("response_type".into(), "code".into())));
        assert!(params.contains(&("scope".into(), AUTH_SCOPE.into())));
        assert!(params.contains(&("state".into(), DEFAULT_STATE.into())));
    }

    #[test]
    fn test_auth_url_custom_state() {
        let url = client().generate_auth_url_with_state("csrf-123").unwrap();
        assert!(url.query_pairs().any(|(k, v)| k == "state" && v == "csrf-123"));
    }

    #[test]
    fn test_auth_url_bad_base_is_config_error() {
        let auth = AuthClient::with_config(
            Credentials::new("k", "s", "u"),
            ClientConfig::default().with_auth_base_url("not a url"),
        )
        .unwrap();
        assert!(matches!(auth.generate_auth_url(), Err(Error::Config(_))));
    }

    #[tokio::test]
    async fn test_empty_code_rejected_locally() {
        let err = client().get_access_token("  ").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_refresh_without_refresh_token() {
        let err = client().refresh(&Token::new("a")).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}

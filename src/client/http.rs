//! HTTP client for the Investright trading API.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, RETRY_AFTER};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::api::{MarketDataService, OrdersService, PortfolioService};
use crate::auth::Token;
use crate::error::is_error_body;
use crate::symbols::SymbolMapper;
use crate::{Error, Result};

use super::config::ClientConfig;

/// Default wait when a 429 carries no usable `Retry-After` header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// The main client for the broker's trading API.
///
/// The client is bound to one access token. After a refresh, build a new
/// client with [`with_token`](Self::with_token); the connection pool is
/// shared between the two.
///
/// # Example
///
/// ```no_run
/// use investright_rs::{InvestrightClient, Token};
///
/// # async fn example() -> investright_rs::Result<()> {
/// let client = InvestrightClient::new(&Token::new("access-token"))?;
///
/// let book = client.orders().book().await?;
/// if let Some(orders) = book.data() {
///     println!("{} orders today", orders.len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct InvestrightClient {
    pub(crate) inner: Arc<ClientInner>,
}

pub(crate) struct ClientInner {
    pub(crate) http: reqwest::Client,
    pub(crate) token: Token,
    pub(crate) config: ClientConfig,
}

impl InvestrightClient {
    /// Create a client for `token` with default configuration.
    pub fn new(token: &Token) -> Result<Self> {
        Self::with_config(token, ClientConfig::default())
    }

    /// Create a client for `token` with custom configuration.
    pub fn with_config(token: &Token, config: ClientConfig) -> Result<Self> {
        let http = config.http_client()?;
        Ok(Self {
            inner: Arc::new(ClientInner {
                http,
                token: token.clone(),
                config,
            }),
        })
    }

    /// A client bound to a different token, sharing this client's
    /// connection pool and configuration.
    pub fn with_token(&self, token: &Token) -> Self {
        Self {
            inner: Arc::new(ClientInner {
                http: self.inner.http.clone(),
                token: token.clone(),
                config: self.inner.config.clone(),
            }),
        }
    }

    /// Get the orders service.
    pub fn orders(&self) -> OrdersService {
        OrdersService::new(self.inner.clone())
    }

    /// Get the positions and holdings service.
    pub fn portfolio(&self) -> PortfolioService {
        PortfolioService::new(self.inner.clone())
    }

    /// Get the market data service.
    pub fn market_data(&self) -> MarketDataService {
        MarketDataService::new(self.inner.clone())
    }

    /// The token this client sends.
    pub fn token(&self) -> &Token {
        &self.inner.token
    }

    /// The client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }
}

impl ClientInner {
    pub(crate) fn mapper(&self) -> &dyn SymbolMapper {
        self.config.symbol_mapper.as_ref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url, path)
    }

    /// Build request headers with authentication.
    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&self.token.bearer())
                .map_err(|_| Error::InvalidInput("Invalid token format".to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Make a GET request.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        tracing::debug!(method = "GET", url = %url, "sending request");
        let request = self.http.get(&url).headers(self.build_headers()?);
        self.send(request).await
    }

    /// Make a GET request with query parameters.
    pub(crate) async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T> {
        let url = self.url(path);
        tracing::debug!(method = "GET", url = %url, "sending request");
        let request = self.http.get(&url).headers(self.build_headers()?).query(query);
        self.send(request).await
    }

    /// Make a POST request.
    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.url(path);
        tracing::debug!(method = "POST", url = %url, "sending request");
        let request = self.http.post(&url).headers(self.build_headers()?).json(body);
        self.send(request).await
    }

    /// Make a PUT request.
    pub(crate) async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.url(path);
        tracing::debug!(method = "PUT", url = %url, "sending request");
        let request = self.http.put(&url).headers(self.build_headers()?).json(body);
        self.send(request).await
    }

    /// Make a DELETE request.
    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        tracing::debug!(method = "DELETE", url = %url, "sending request");
        let request = self.http.delete(&url).headers(self.build_headers()?);
        self.send(request).await
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
        let response = request
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "request failed"))?;
        self.handle_response(response).await
    }

    /// Handle an API response.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        let status_code = status.as_u16();

        if status_code == 429 {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            tracing::warn!(retry_after, "rate limited by broker");
            return Err(Error::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        let text = response.text().await?;
        let body = parse_body(&text);

        if status_code == 401 {
            return Err(Error::from_auth_response(status_code, &body));
        }

        if !status.is_success() || is_error_body(&body) {
            return Err(Error::from_broker_response(status_code, &body));
        }

        Ok(serde_json::from_value(body)?)
    }
}

/// Empty bodies read as `null`; non-JSON bodies are kept as a string so
/// the error message can carry them.
fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

impl std::fmt::Debug for InvestrightClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvestrightClient")
            .field("token", &self.inner.token)
            .field("config", &self.inner.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(""), Value::Null);
        assert_eq!(parse_body("  \n"), Value::Null);
        assert_eq!(parse_body(r#"{"a":1}"#)["a"], 1);
        assert_eq!(parse_body("Bad Gateway"), Value::String("Bad Gateway".into()));
    }

    #[test]
    fn test_with_token_shares_config() {
        let client = InvestrightClient::with_config(
            &Token::new("first"),
            ClientConfig::default().with_api_base_url("http://127.0.0.1:1"),
        )
        .unwrap();
        let rebound = client.with_token(&Token::new("second"));
        assert_eq!(rebound.config().api_base_url, "http://127.0.0.1:1");
        assert_eq!(rebound.token().bearer(), "Bearer second");
    }
}

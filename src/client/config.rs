//! Client configuration options.

use std::sync::Arc;
use std::time::Duration;

use crate::symbols::{IdentityMapper, SymbolMapper};

/// Base URL of the trading REST API.
pub const DEFAULT_API_BASE_URL: &str = "https://developer.hdfcsec.com/oapi/v1";

/// Base URL of the OAuth endpoints.
pub const DEFAULT_AUTH_BASE_URL: &str = "https://developer.hdfcsec.com";

/// Configuration shared by [`AuthClient`](crate::auth::AuthClient) and
/// [`InvestrightClient`](crate::InvestrightClient).
///
/// # Example
///
/// ```
/// use investright_rs::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_timeout(Duration::from_secs(10))
///     .with_user_agent("my-app/1.0");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Timeout for trading and token requests
    pub timeout: Duration,
    /// Timeout for token validation calls
    pub validation_timeout: Duration,
    /// User-Agent header value
    pub user_agent: String,
    /// Trading API base URL, without a trailing slash
    pub api_base_url: String,
    /// OAuth base URL, without a trailing slash
    pub auth_base_url: String,
    /// Symbol translation between platform and broker
    pub symbol_mapper: Arc<dyn SymbolMapper>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            validation_timeout: Duration::from_secs(5),
            user_agent: format!("investright-rs/{} (Rust)", env!("CARGO_PKG_VERSION")),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            auth_base_url: DEFAULT_AUTH_BASE_URL.to_string(),
            symbol_mapper: Arc::new(IdentityMapper),
        }
    }
}

impl ClientConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the timeout used by token validation.
    pub fn with_validation_timeout(mut self, timeout: Duration) -> Self {
        self.validation_timeout = timeout;
        self
    }

    /// Set the User-Agent header.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Point the trading API at another base URL.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Point the OAuth endpoints at another base URL.
    pub fn with_auth_base_url(mut self, url: impl Into<String>) -> Self {
        self.auth_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Use a symbol mapper other than the identity mapping.
    pub fn with_symbol_mapper(mut self, mapper: impl SymbolMapper + 'static) -> Self {
        self.symbol_mapper = Arc::new(mapper);
        self
    }

    pub(crate) fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()
    }
}

/// Exponential backoff for callers that retry rate-limited requests.
///
/// The client itself never retries. The broker publishes no fixed rate
/// limit, so callers that receive [`Error::RateLimited`](crate::Error::RateLimited)
/// are expected to back off and try again on their own schedule.
///
/// # Example
///
/// ```
/// use investright_rs::BackoffPolicy;
/// use std::time::Duration;
///
/// let policy = BackoffPolicy::default();
/// assert_eq!(policy.backoff_for_attempt(1), Duration::from_secs(1));
/// ```
#[derive(Debug, Clone)]
pub struct BackoffPolicy {
    /// Attempts after which `delay_for` gives up
    pub max_retries: u32,
    /// Delay before the first retry
    pub initial_backoff: Duration,
    /// Upper bound on any computed delay
    pub max_backoff: Duration,
    /// HTTP status codes worth retrying
    pub retry_statuses: Vec<u16>,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
            retry_statuses: vec![429, 502, 503, 504],
        }
    }
}

impl BackoffPolicy {
    /// Set how many retries `delay_for` allows.
    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    /// Set the delay before the first retry.
    pub fn with_initial_backoff(mut self, duration: Duration) -> Self {
        self.initial_backoff = duration;
        self
    }

    /// Cap the computed delay.
    pub fn with_max_backoff(mut self, duration: Duration) -> Self {
        self.max_backoff = duration;
        self
    }

    /// Backoff duration for a zero-based attempt number.
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }

    /// Delay before retrying after `err`, or `None` when the error should
    /// not be retried or the attempts are used up.
    ///
    /// A `Retry-After` hint from the broker takes precedence over the
    /// computed backoff.
    pub fn delay_for(&self, err: &crate::Error, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_retries || !err.is_retryable() {
            return None;
        }
        Some(
            err.retry_after()
                .unwrap_or_else(|| self.backoff_for_attempt(attempt)),
        )
    }

    /// Whether a response with `status` is worth retrying.
    pub fn should_retry_status(&self, status: u16) -> bool {
        self.retry_statuses.contains(&status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.validation_timeout, Duration::from_secs(5));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let config = ClientConfig::default().with_api_base_url("http://127.0.0.1:9000/");
        assert_eq!(config.api_base_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn test_backoff() {
        let policy = BackoffPolicy::default();
        assert_eq!(policy.backoff_for_attempt(0), Duration::from_millis(500));
        assert_eq!(policy.backoff_for_attempt(2), Duration::from_secs(2));
    }

    #[test]
    fn test_backoff_max() {
        let policy = BackoffPolicy::default()
            .with_initial_backoff(Duration::from_secs(10))
            .with_max_backoff(Duration::from_secs(30));
        assert_eq!(policy.backoff_for_attempt(3), Duration::from_secs(30));
        assert_eq!(policy.backoff_for_attempt(40), Duration::from_secs(30));
    }

    #[test]
    fn test_delay_prefers_retry_after() {
        let policy = BackoffPolicy::default();
        let err = Error::RateLimited { retry_after_secs: 7 };
        assert_eq!(policy.delay_for(&err, 0), Some(Duration::from_secs(7)));
        assert_eq!(policy.delay_for(&err, 3), None);
        assert_eq!(policy.delay_for(&Error::InvalidInput("x".into()), 0), None);
    }

    #[test]
    fn test_should_retry_status() {
        let policy = BackoffPolicy::default();
        assert!(policy.should_retry_status(429));
        assert!(!policy.should_retry_status(401));
    }
}

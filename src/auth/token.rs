//! Access/refresh token pair and its lifecycle state.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// An OAuth token pair issued by the broker.
///
/// The token belongs to the caller: the auth client produces new tokens
/// but never stores or mutates one it was handed.
#[derive(Clone)]
pub struct Token {
    access_token: SecretString,
    refresh_token: Option<SecretString>,
    expires_at: Option<DateTime<Utc>>,
}

/// Where a token is in its lifecycle.
///
/// ```text
/// Unauthenticated --get_access_token--> Valid --expiry--> Expired --refresh_token--> Valid
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    /// No token has been obtained yet
    Unauthenticated,
    /// The access token can be used
    Valid,
    /// The access token has passed its expiry
    Expired,
}

impl TokenState {
    /// State of an optional token at the current time.
    pub fn of(token: Option<&Token>) -> Self {
        token.map_or(TokenState::Unauthenticated, Token::state)
    }
}

impl Token {
    /// Wrap an access token obtained elsewhere.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: SecretString::from(access_token.into()),
            refresh_token: None,
            expires_at: None,
        }
    }

    /// Attach a refresh token.
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(SecretString::from(refresh_token.into()));
        self
    }

    /// Set the expiry time.
    pub fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// The access token.
    pub fn access_token(&self) -> &SecretString {
        &self.access_token
    }

    /// The refresh token, if the broker issued one.
    pub fn refresh_token(&self) -> Option<&SecretString> {
        self.refresh_token.as_ref()
    }

    /// When the access token expires, if the broker said so.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expires_at
    }

    /// Check if the access token has expired.
    ///
    /// Tokens without a known expiry are treated as valid until the broker
    /// rejects them.
    pub fn is_expired(&self) -> bool {
        self.expires_within(Duration::zero())
    }

    /// Check if the access token expires within `buffer`.
    pub fn expires_within(&self, buffer: Duration) -> bool {
        self.expires_at
            .is_some_and(|expires_at| Utc::now() + buffer >= expires_at)
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TokenState {
        if self.is_expired() {
            TokenState::Expired
        } else {
            TokenState::Valid
        }
    }

    pub(crate) fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token.expose_secret())
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("access_token", &"[REDACTED]")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Body of a successful `/oauth/token` response.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub(crate) access_token: String,
    #[serde(default)]
    pub(crate) refresh_token: Option<String>,
    #[serde(default)]
    pub(crate) expires_in: Option<i64>,
}

impl TokenResponse {
    /// Convert into a [`Token`], anchoring `expires_in` at `received_at`.
    ///
    /// An `expires_in` too large to represent leaves the expiry unknown.
    ///
    /// Only the refresh token carried by this response is kept; an older
    /// refresh token is never assumed to still be usable.
    pub(crate) fn into_token(self, received_at: DateTime<Utc>) -> Token {
        Token {
            access_token: SecretString::from(self.access_token),
            refresh_token: self
                .refresh_token
                .filter(|t| !t.is_empty())
                .map(SecretString::from),
            expires_at: self
                .expires_in
                .and_then(Duration::try_seconds)
                .and_then(|lifetime| received_at.checked_add_signed(lifetime)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_machine() {
        assert_eq!(TokenState::of(None), TokenState::Unauthenticated);

        let fresh = Token::new("a").with_expires_at(Utc::now() + Duration::minutes(10));
        assert_eq!(TokenState::of(Some(&fresh)), TokenState::Valid);

        let stale = Token::new("a").with_expires_at(Utc::now() - Duration::seconds(1));
        assert_eq!(stale.state(), TokenState::Expired);
    }

    #[test]
    fn test_unknown_expiry_is_valid() {
        let token = Token::new("a");
        assert!(!token.is_expired());
        assert!(!token.expires_within(Duration::hours(24)));
    }

    #[test]
    fn test_expires_within_buffer() {
        let token = Token::new("a").with_expires_at(Utc::now() + Duration::seconds(30));
        assert!(token.expires_within(Duration::seconds(60)));
        assert!(!token.is_expired());
    }

    #[test]
    fn test_token_response_conversion() {
        let now = Utc::now();
        let resp = TokenResponse {
            access_token: "acc".into(),
            refresh_token: Some(String::new()),
            expires_in: Some(3600),
        };
        let token = resp.into_token(now);
        assert_eq!(token.access_token().expose_secret(), "acc");
        assert!(token.refresh_token().is_none());
        assert_eq!(token.expires_at(), Some(now + Duration::seconds(3600)));
        assert_eq!(token.bearer(), "Bearer acc");
    }

    #[test]
    fn test_out_of_range_expiry_is_unknown() {
        let now = Utc::now();
        for secs in [i64::MAX, i64::MIN] {
            let resp = TokenResponse {
                access_token: "acc".into(),
                refresh_token: None,
                expires_in: Some(secs),
            };
            assert_eq!(resp.into_token(now).expires_at(), None);
        }
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let token = Token::new("super-secret-token").with_refresh_token("also-secret");
        let debug = format!("{token:?}");
        assert!(!debug.contains("super-secret-token"));
        assert!(!debug.contains("also-secret"));
        assert!(debug.contains("REDACTED"));
    }
}

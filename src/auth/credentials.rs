//! OAuth application credentials.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

use crate::{Error, Result};

/// Environment variable holding the OAuth client id.
pub const API_KEY_VAR: &str = "BROKER_API_KEY";
/// Environment variable holding the OAuth client secret.
pub const API_SECRET_VAR: &str = "BROKER_API_SECRET";
/// Environment variable holding the registered redirect URI.
pub const REDIRECT_URI_VAR: &str = "BROKER_REDIRECT_URI";

/// Application credentials registered with the broker.
///
/// Read once at startup and never modified afterwards.
///
/// # Example
///
/// ```no_run
/// use investright_rs::auth::Credentials;
///
/// # fn example() -> investright_rs::Result<()> {
/// let credentials = Credentials::from_env()?;
/// println!("client id: {}", credentials.client_id());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Credentials {
    client_id: String,
    client_secret: SecretString,
    redirect_uri: String,
}

impl Credentials {
    /// Create credentials from explicit values.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: impl Into<String>,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: SecretString::from(client_secret.into()),
            redirect_uri: redirect_uri.into(),
        }
    }

    /// Read `BROKER_API_KEY`, `BROKER_API_SECRET` and `BROKER_REDIRECT_URI`
    /// from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first variable that is unset
    /// or empty.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read the credentials through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &str| -> Result<String> {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Error::Config(format!("{name} environment variable not set")))
        };

        Ok(Self::new(
            require(API_KEY_VAR)?,
            require(API_SECRET_VAR)?,
            require(REDIRECT_URI_VAR)?,
        ))
    }

    /// The OAuth client id (API key).
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The registered redirect URI.
    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    pub(crate) fn client_secret(&self) -> &str {
        self.client_secret.expose_secret()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_from_lookup() {
        let creds = Credentials::from_lookup(env(&[
            (API_KEY_VAR, "key"),
            (API_SECRET_VAR, "secret"),
            (REDIRECT_URI_VAR, "http://localhost/cb"),
        ]))
        .unwrap();
        assert_eq!(creds.client_id(), "key");
        assert_eq!(creds.client_secret(), "secret");
        assert_eq!(creds.redirect_uri(), "http://localhost/cb");
    }

    #[test]
    fn test_missing_variable_is_config_error() {
        let err = Credentials::from_lookup(env(&[(API_KEY_VAR, "key"), (API_SECRET_VAR, "s")]))
            .unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m.contains(REDIRECT_URI_VAR)));
    }

    #[test]
    fn test_empty_variable_is_config_error() {
        let err = Credentials::from_lookup(env(&[
            (API_KEY_VAR, "  "),
            (API_SECRET_VAR, "s"),
            (REDIRECT_URI_VAR, "u"),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m.contains(API_KEY_VAR)));
    }

    #[test]
    fn test_debug_redacts_secret() {
        let creds = Credentials::new("key", "super-secret", "u");
        let debug = format!("{creds:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("REDACTED"));
    }
}

//! Newtype identifiers used across requests and responses.
//!
//! Wrapping plain strings keeps order ids, symbols and exchange codes from
//! being swapped by accident at call sites.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new value from a string.
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Get the value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns `true` if the value is empty or whitespace.
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

string_newtype!(
    /// A broker-assigned order id.
    ///
    /// ```
    /// use investright_rs::OrderId;
    ///
    /// let id = OrderId::new("240101000000123");
    /// assert_eq!(id.to_string(), "240101000000123");
    /// ```
    OrderId
);

string_newtype!(
    /// A platform trading symbol (e.g. "INFY", "NIFTY24JANFUT").
    Symbol
);

string_newtype!(
    /// An exchange segment code (e.g. "NSE", "BSE", "NFO").
    Exchange
);

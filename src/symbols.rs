//! Translation between platform symbols and broker symbols.
//!
//! The broker may name instruments differently from the host platform
//! (derivatives especially). Lookup tables live with the platform, so this
//! crate only defines the seam and an identity default.

use std::collections::HashMap;
use std::fmt;

use crate::models::{Exchange, Symbol};

/// Maps symbols between the platform's naming and the broker's.
///
/// Implementations return `None` when they have no mapping; callers then
/// fall back to the symbol unchanged.
pub trait SymbolMapper: Send + Sync + fmt::Debug {
    /// Broker symbol for a platform symbol.
    fn to_broker(&self, symbol: &Symbol, exchange: &Exchange) -> Option<String>;

    /// Platform symbol for a broker symbol.
    fn from_broker(&self, symbol: &str, exchange: &Exchange) -> Option<Symbol>;
}

/// Mapper that leaves every symbol unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityMapper;

impl SymbolMapper for IdentityMapper {
    fn to_broker(&self, symbol: &Symbol, _exchange: &Exchange) -> Option<String> {
        Some(symbol.as_str().to_string())
    }

    fn from_broker(&self, symbol: &str, _exchange: &Exchange) -> Option<Symbol> {
        Some(Symbol::new(symbol))
    }
}

/// In-memory mapping table keyed by `(exchange, symbol)`.
///
/// ```
/// use investright_rs::symbols::{StaticMapper, SymbolMapper};
/// use investright_rs::{Exchange, Symbol};
///
/// let mapper = StaticMapper::new().with("NFO", "NIFTY24JANFUT", "NIFTY 25JAN24 FUT");
/// let nfo = Exchange::new("NFO");
/// assert_eq!(
///     mapper.to_broker(&Symbol::new("NIFTY24JANFUT"), &nfo).as_deref(),
///     Some("NIFTY 25JAN24 FUT")
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticMapper {
    to_broker: HashMap<(String, String), String>,
    from_broker: HashMap<(String, String), Symbol>,
}

impl StaticMapper {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a platform/broker symbol pair for an exchange.
    pub fn with(
        mut self,
        exchange: impl Into<String>,
        platform: impl Into<String>,
        broker: impl Into<String>,
    ) -> Self {
        let exchange = exchange.into();
        let platform = platform.into();
        let broker = broker.into();
        self.to_broker
            .insert((exchange.clone(), platform.clone()), broker.clone());
        self.from_broker
            .insert((exchange, broker), Symbol::new(platform));
        self
    }
}

impl SymbolMapper for StaticMapper {
    fn to_broker(&self, symbol: &Symbol, exchange: &Exchange) -> Option<String> {
        self.to_broker
            .get(&(exchange.as_str().to_string(), symbol.as_str().to_string()))
            .cloned()
    }

    fn from_broker(&self, symbol: &str, exchange: &Exchange) -> Option<Symbol> {
        self.from_broker
            .get(&(exchange.as_str().to_string(), symbol.to_string()))
            .cloned()
    }
}

/// Broker symbol for `symbol`, falling back to the symbol itself.
pub(crate) fn broker_symbol(
    mapper: &dyn SymbolMapper,
    symbol: &Symbol,
    exchange: &Exchange,
) -> String {
    mapper
        .to_broker(symbol, exchange)
        .unwrap_or_else(|| symbol.as_str().to_string())
}

/// Platform symbol for a broker `symbol`, falling back to the symbol itself.
pub(crate) fn platform_symbol(
    mapper: &dyn SymbolMapper,
    symbol: &str,
    exchange: &Exchange,
) -> Symbol {
    mapper
        .from_broker(symbol, exchange)
        .unwrap_or_else(|| Symbol::new(symbol))
}

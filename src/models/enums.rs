//! Enumeration types for orders and market data.
//!
//! Each enum serializes to the platform's names (`"MARKET"`, `"MIS"`, ...).
//! Where the broker uses a different code on the wire, `wire_code` and
//! `from_wire_code` translate between the two.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Direction of an order or trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy
    #[default]
    Buy,
    /// Sell
    Sell,
}

impl Side {
    /// Code sent to the broker.
    pub fn wire_code(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }

    /// Parse a broker side code, case-insensitively.
    pub fn from_wire_code(code: &str) -> Option<Self> {
        code.parse().ok()
    }
}

/// How an order should be priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    /// Execute at the prevailing market price
    #[default]
    Market,
    /// Execute at the limit price or better
    Limit,
    /// Market order triggered at the trigger price
    StopLoss,
    /// Limit order triggered at the trigger price
    StopLossLimit,
}

impl OrderType {
    /// Code sent to the broker.
    pub fn wire_code(&self) -> &'static str {
        match self {
            OrderType::Market => "MKT",
            OrderType::Limit => "LMT",
            OrderType::StopLoss => "SL",
            OrderType::StopLossLimit => "SLL",
        }
    }

    /// Parse a broker order type code.
    pub fn from_wire_code(code: &str) -> Option<Self> {
        match code {
            "MKT" => Some(OrderType::Market),
            "LMT" => Some(OrderType::Limit),
            "SL" => Some(OrderType::StopLoss),
            "SLL" => Some(OrderType::StopLossLimit),
            _ => None,
        }
    }

    /// Returns `true` if orders of this type carry a limit price.
    pub fn has_limit_price(&self) -> bool {
        matches!(self, OrderType::Limit | OrderType::StopLossLimit)
    }

    /// Returns `true` if orders of this type carry a trigger price.
    pub fn has_trigger_price(&self) -> bool {
        matches!(self, OrderType::StopLoss | OrderType::StopLossLimit)
    }
}

/// Product (margin treatment) of an order or position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Product {
    /// Intraday, squared off the same day
    #[default]
    #[serde(rename = "MIS", alias = "INTRADAY")]
    Mis,
    /// Cash and carry (delivery)
    #[serde(rename = "CNC", alias = "DELIVERY")]
    Cnc,
    /// Normal margin for derivatives
    #[serde(rename = "NRML", alias = "MARGIN")]
    Nrml,
}

impl Product {
    /// Code sent to the broker.
    pub fn wire_code(&self) -> &'static str {
        match self {
            Product::Mis => "MIS",
            Product::Cnc => "CNC",
            Product::Nrml => "NRML",
        }
    }

    /// Parse a broker product code.
    pub fn from_wire_code(code: &str) -> Option<Self> {
        code.parse().ok()
    }
}

/// How long an order stays active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Validity {
    /// Expires at the end of the session
    #[default]
    Day,
    /// Immediate or cancel
    Ioc,
    /// Good till cancelled
    Gtc,
}

impl Validity {
    /// Code sent to the broker.
    pub fn wire_code(&self) -> &'static str {
        match self {
            Validity::Day => "DAY",
            Validity::Ioc => "IOC",
            Validity::Gtc => "GTC",
        }
    }
}

/// Candle interval for historical data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    /// One minute
    #[serde(rename = "1m")]
    OneMinute,
    /// Five minutes
    #[serde(rename = "5m")]
    FiveMinutes,
    /// Fifteen minutes
    #[serde(rename = "15m")]
    FifteenMinutes,
    /// Thirty minutes
    #[serde(rename = "30m")]
    ThirtyMinutes,
    /// One hour
    #[serde(rename = "60m")]
    SixtyMinutes,
    /// One trading day
    #[serde(rename = "1d")]
    Day,
}

impl Interval {
    /// Interval code used in query strings.
    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::OneMinute => "1m",
            Interval::FiveMinutes => "5m",
            Interval::FifteenMinutes => "15m",
            Interval::ThirtyMinutes => "30m",
            Interval::SixtyMinutes => "60m",
            Interval::Day => "1d",
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BUY" | "B" => Ok(Side::Buy),
            "SELL" | "S" => Ok(Side::Sell),
            other => Err(Error::InvalidInput(format!("Unknown side: {other}"))),
        }
    }
}

impl FromStr for OrderType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "MARKET" | "MKT" => Ok(OrderType::Market),
            "LIMIT" | "LMT" => Ok(OrderType::Limit),
            "STOP_LOSS" | "SL" | "SL-M" => Ok(OrderType::StopLoss),
            "STOP_LOSS_LIMIT" | "SLL" => Ok(OrderType::StopLossLimit),
            other => Err(Error::InvalidInput(format!("Unknown order type: {other}"))),
        }
    }
}

impl FromStr for Product {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "MIS" | "INTRADAY" => Ok(Product::Mis),
            "CNC" | "DELIVERY" => Ok(Product::Cnc),
            "NRML" | "MARGIN" => Ok(Product::Nrml),
            other => Err(Error::InvalidInput(format!("Unknown product: {other}"))),
        }
    }
}

impl FromStr for Validity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DAY" => Ok(Validity::Day),
            "IOC" => Ok(Validity::Ioc),
            "GTC" => Ok(Validity::Gtc),
            other => Err(Error::InvalidInput(format!("Unknown validity: {other}"))),
        }
    }
}

impl FromStr for Interval {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1m" => Ok(Interval::OneMinute),
            "5m" => Ok(Interval::FiveMinutes),
            "15m" => Ok(Interval::FifteenMinutes),
            "30m" => Ok(Interval::ThirtyMinutes),
            "60m" | "1h" => Ok(Interval::SixtyMinutes),
            "1d" | "D" => Ok(Interval::Day),
            other => Err(Error::InvalidInput(format!("Unknown interval: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_type_wire_codes() {
        for ty in [
            OrderType::Market,
            OrderType::Limit,
            OrderType::StopLoss,
            OrderType::StopLossLimit,
        ] {
            assert_eq!(OrderType::from_wire_code(ty.wire_code()), Some(ty));
        }
        assert_eq!(OrderType::from_wire_code("XYZ"), None);
    }

    #[test]
    fn test_product_aliases() {
        let p: Product = serde_json::from_str("\"INTRADAY\"").unwrap();
        assert_eq!(p, Product::Mis);
        let p: Product = serde_json::from_str("\"DELIVERY\"").unwrap();
        assert_eq!(p, Product::Cnc);
        assert_eq!("margin".parse::<Product>().unwrap(), Product::Nrml);
        assert_eq!(serde_json::to_string(&Product::Cnc).unwrap(), "\"CNC\"");
    }

    #[test]
    fn test_order_type_platform_names() {
        assert_eq!(
            serde_json::to_string(&OrderType::StopLossLimit).unwrap(),
            "\"STOP_LOSS_LIMIT\""
        );
        assert_eq!("limit".parse::<OrderType>().unwrap(), OrderType::Limit);
    }

    #[test]
    fn test_unknown_side_is_invalid_input() {
        assert!(matches!("HOLD".parse::<Side>(), Err(Error::InvalidInput(_))));
        assert_eq!(Side::from_wire_code("sell"), Some(Side::Sell));
    }

    #[test]
    fn test_interval_codes() {
        assert_eq!(Interval::FifteenMinutes.to_string(), "15m");
        assert_eq!("1d".parse::<Interval>().unwrap(), Interval::Day);
        assert!("2m".parse::<Interval>().is_err());
    }
}

//! Market data snapshot models: quotes, candles and depth.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::Interval;
use super::primitives::{Exchange, Symbol};
use crate::{Error, Result};

/// A live quote snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Platform trading symbol
    pub symbol: Symbol,
    /// Exchange segment
    pub exchange: Exchange,
    /// Last traded price
    pub ltp: Decimal,
    /// Session open
    pub open: Decimal,
    /// Session high
    pub high: Decimal,
    /// Session low
    pub low: Decimal,
    /// Previous close
    pub close: Decimal,
    /// Traded volume
    pub volume: u64,
    /// Best bid
    pub bid: Decimal,
    /// Best ask
    pub ask: Decimal,
    /// Open interest (derivatives only)
    pub oi: u64,
    /// Change from previous close
    pub change: Decimal,
    /// Change from previous close, in percent
    pub change_percent: Decimal,
    /// Quote time as reported by the broker
    pub timestamp: Option<String>,
}

/// Parameters for a historical data request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRequest {
    /// Platform trading symbol
    pub symbol: Symbol,
    /// Exchange segment
    pub exchange: Exchange,
    /// Candle interval
    pub interval: Interval,
    /// First day of the range (inclusive)
    pub start_date: NaiveDate,
    /// Last day of the range (inclusive)
    pub end_date: NaiveDate,
}

impl HistoryRequest {
    /// Create a new history request.
    pub fn new(
        symbol: impl Into<Symbol>,
        exchange: impl Into<Exchange>,
        interval: Interval,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            exchange: exchange.into(),
            interval,
            start_date,
            end_date,
        }
    }

    /// Check that the request is well-formed.
    pub fn validate(&self) -> Result<()> {
        if self.symbol.is_blank() {
            return Err(Error::InvalidInput("symbol is required".to_string()));
        }
        if self.exchange.is_blank() {
            return Err(Error::InvalidInput("exchange is required".to_string()));
        }
        if self.start_date > self.end_date {
            return Err(Error::InvalidInput(format!(
                "start_date {} is after end_date {}",
                self.start_date, self.end_date
            )));
        }
        Ok(())
    }
}

/// Candle open time, as the broker sent it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CandleTime {
    /// Seconds since the Unix epoch
    Epoch(i64),
    /// Formatted date or date-time
    Text(String),
}

impl CandleTime {
    /// Interpret the candle time as a UTC timestamp.
    ///
    /// Accepts epoch seconds, RFC 3339, `YYYY-MM-DD HH:MM:SS` and plain
    /// `YYYY-MM-DD` dates.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        match self {
            CandleTime::Epoch(secs) => DateTime::from_timestamp(*secs, 0),
            CandleTime::Text(text) => DateTime::parse_from_rfc3339(text)
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
                        .ok()
                        .map(|dt| dt.and_utc())
                })
                .or_else(|| {
                    NaiveDate::parse_from_str(text, "%Y-%m-%d")
                        .ok()
                        .and_then(|d| d.and_hms_opt(0, 0, 0))
                        .map(|dt| dt.and_utc())
                }),
        }
    }
}

/// One OHLCV candle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Candle open time
    pub timestamp: CandleTime,
    /// Open
    pub open: Decimal,
    /// High
    pub high: Decimal,
    /// Low
    pub low: Decimal,
    /// Close
    pub close: Decimal,
    /// Volume
    pub volume: u64,
}

/// Historical candles for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    /// Platform trading symbol
    pub symbol: Symbol,
    /// Exchange segment
    pub exchange: Exchange,
    /// Candle interval
    pub interval: Interval,
    /// Candles in the order the broker returned them
    pub candles: Vec<Candle>,
}

/// One price level of market depth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepthLevel {
    /// Price
    pub price: Decimal,
    /// Quantity resting at this price
    pub quantity: u64,
    /// Number of orders at this price
    pub orders: u64,
}

/// Market depth (order book snapshot).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketDepth {
    /// Platform trading symbol
    pub symbol: Symbol,
    /// Exchange segment
    pub exchange: Exchange,
    /// Buy side, best price first
    pub bids: Vec<DepthLevel>,
    /// Sell side, best price first
    pub asks: Vec<DepthLevel>,
}

impl MarketDepth {
    /// Best bid level.
    pub fn best_bid(&self) -> Option<&DepthLevel> {
        self.bids.first()
    }

    /// Best ask level.
    pub fn best_ask(&self) -> Option<&DepthLevel> {
        self.asks.first()
    }

    /// Difference between best ask and best bid.
    pub fn spread(&self) -> Option<Decimal> {
        Some(self.best_ask()?.price - self.best_bid()?.price)
    }

    /// Total quantity resting on the buy side.
    pub fn total_bid_quantity(&self) -> u64 {
        self.bids.iter().map(|l| l.quantity).sum()
    }

    /// Total quantity resting on the sell side.
    pub fn total_ask_quantity(&self) -> u64 {
        self.asks.iter().map(|l| l.quantity).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_history_request_range() {
        let ok =
            HistoryRequest::new("INFY", "NSE", Interval::Day, date(2024, 1, 1), date(2024, 1, 31));
        assert!(ok.validate().is_ok());

        let reversed =
            HistoryRequest::new("INFY", "NSE", Interval::Day, date(2024, 2, 1), date(2024, 1, 1));
        assert!(matches!(reversed.validate(), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_candle_time_parsing() {
        let epoch = CandleTime::Epoch(1_704_067_200);
        assert_eq!(epoch.to_datetime().unwrap().date_naive(), date(2024, 1, 1));

        let text = CandleTime::Text("2024-01-02 09:15:00".into());
        assert_eq!(text.to_datetime().unwrap().to_rfc3339(), "2024-01-02T09:15:00+00:00");

        let day = CandleTime::Text("2024-01-03".into());
        assert_eq!(day.to_datetime().unwrap().date_naive(), date(2024, 1, 3));

        assert!(CandleTime::Text("yesterday".into()).to_datetime().is_none());
    }

    #[test]
    fn test_depth_helpers() {
        let depth = MarketDepth {
            symbol: Symbol::new("INFY"),
            exchange: Exchange::new("NSE"),
            bids: vec![
                DepthLevel {
                    price: dec!(1499.5),
                    quantity: 10,
                    orders: 2,
                },
                DepthLevel {
                    price: dec!(1499.0),
                    quantity: 5,
                    orders: 1,
                },
            ],
            asks: vec![DepthLevel {
                price: dec!(1500.0),
                quantity: 7,
                orders: 3,
            }],
        };
        assert_eq!(depth.spread(), Some(dec!(0.5)));
        assert_eq!(depth.total_bid_quantity(), 15);
        assert_eq!(depth.total_ask_quantity(), 7);
    }
}

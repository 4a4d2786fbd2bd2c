//! Trade book, position and holding models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{Product, Side};
use super::primitives::{Exchange, OrderId, Symbol};

/// An executed trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Exchange trade id
    pub trade_id: String,
    /// Order that produced the trade
    pub order_id: OrderId,
    /// Platform trading symbol
    pub symbol: Symbol,
    /// Exchange segment
    pub exchange: Exchange,
    /// Buy or sell, when the broker reported a known side
    pub side: Option<Side>,
    /// Executed quantity
    pub quantity: i64,
    /// Execution price
    pub price: Decimal,
    /// Execution time as reported by the broker
    pub timestamp: String,
}

/// An open (intraday or carried) position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Platform trading symbol
    pub symbol: Symbol,
    /// Exchange segment
    pub exchange: Exchange,
    /// Net quantity; negative for short positions
    pub quantity: i64,
    /// Margin product
    pub product: Product,
    /// Average entry price
    pub price: Decimal,
    /// Profit and loss
    pub pnl: Decimal,
    /// Profit and loss as a percentage
    pub pnl_percentage: Decimal,
}

impl Position {
    /// Returns `true` if the position has a non-zero net quantity.
    pub fn is_open(&self) -> bool {
        self.quantity != 0
    }
}

/// A delivery holding in the demat account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Platform trading symbol
    pub symbol: Symbol,
    /// Exchange segment
    pub exchange: Exchange,
    /// Quantity held
    pub quantity: i64,
    /// Average acquisition price
    pub price: Decimal,
    /// Current market value
    pub value: Decimal,
    /// Profit and loss
    pub pnl: Decimal,
}

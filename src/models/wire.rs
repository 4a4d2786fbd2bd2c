//! Broker-native request and response shapes.
//!
//! Nothing in here is public: every wire type is converted into a
//! normalized model (see the sibling modules) before it leaves the crate.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::enums::{Interval, OrderType, Product, Side};
use super::market_data::{Candle, CandleTime, DepthLevel, History, MarketDepth, Quote};
use super::order::{Order, OrderAck, OrderRequest};
use super::portfolio::{Holding, Position, Trade};
use super::primitives::{Exchange, OrderId, Symbol};
use crate::symbols::{broker_symbol, platform_symbol, SymbolMapper};

/// Order body for `POST /orders` and `PUT /orders/{id}`.
#[derive(Debug, Serialize)]
pub(crate) struct WireOrderRequest {
    symbol: String,
    exchange: String,
    side: &'static str,
    quantity: u32,
    order_type: &'static str,
    product: &'static str,
    validity: &'static str,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    price: Option<Decimal>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    stop_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disclosed_quantity: Option<u32>,
}

impl WireOrderRequest {
    pub(crate) fn new(order: &OrderRequest, mapper: &dyn SymbolMapper) -> Self {
        Self {
            symbol: broker_symbol(mapper, &order.symbol, &order.exchange),
            exchange: order.exchange.as_str().to_string(),
            side: order.side.wire_code(),
            quantity: order.quantity,
            order_type: order.order_type.wire_code(),
            product: order.product.wire_code(),
            validity: order.validity.wire_code(),
            // zero prices mean "not set" to the broker
            price: order.price.filter(|p| !p.is_zero()),
            stop_price: order.trigger_price.filter(|p| !p.is_zero()),
            disclosed_quantity: order.disclosed_quantity.filter(|q| *q > 0),
        }
    }
}

/// Response payloads are sometimes wrapped in `{"data": ...}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Wrapped<T> {
    Data { data: T },
    Bare(T),
}

impl<T> Wrapped<T> {
    pub(crate) fn into_inner(self) -> T {
        match self {
            Wrapped::Data { data } | Wrapped::Bare(data) => data,
        }
    }
}

/// Ids arrive as strings or numbers depending on the endpoint.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

fn decimal_or_zero(value: Option<Decimal>) -> Decimal {
    value.unwrap_or_default()
}

fn side_of(code: &str) -> Option<Side> {
    Side::from_wire_code(code)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct WireOrder {
    #[serde(deserialize_with = "lenient_string")]
    order_id: String,
    symbol: String,
    exchange: String,
    side: String,
    quantity: Option<i64>,
    price: Option<Decimal>,
    #[serde(alias = "stop_price")]
    trigger_price: Option<Decimal>,
    order_type: String,
    product: String,
    status: Option<String>,
    filled_quantity: Option<i64>,
    pending_quantity: Option<i64>,
    average_price: Option<Decimal>,
    created_at: String,
    message: Option<String>,
}

impl WireOrder {
    pub(crate) fn into_order(self, mapper: &dyn SymbolMapper) -> Order {
        let exchange = Exchange::new(self.exchange);
        Order {
            order_id: OrderId::new(self.order_id),
            symbol: platform_symbol(mapper, &self.symbol, &exchange),
            exchange,
            side: side_of(&self.side),
            quantity: self.quantity.unwrap_or_default(),
            price: decimal_or_zero(self.price),
            trigger_price: decimal_or_zero(self.trigger_price),
            order_type: OrderType::from_wire_code(&self.order_type).unwrap_or_default(),
            product: Product::from_wire_code(&self.product).unwrap_or_default(),
            order_status: self.status.unwrap_or_default(),
            filled_quantity: self.filled_quantity.unwrap_or_default(),
            pending_quantity: self.pending_quantity.unwrap_or_default(),
            average_price: decimal_or_zero(self.average_price),
            timestamp: self.created_at,
        }
    }

    /// Acknowledgement for a request on `requested`; the broker's id wins
    /// when it sends one.
    pub(crate) fn into_ack(self, requested: Option<&OrderId>) -> OrderAck {
        let order_id = match (self.order_id.is_empty(), requested) {
            (true, Some(id)) => id.clone(),
            _ => OrderId::new(self.order_id),
        };
        OrderAck {
            order_id,
            order_status: self.status.filter(|s| !s.is_empty() && s != "success"),
            message: self.message,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct WireOrderBook {
    pub(crate) orders: Vec<WireOrder>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct WireTrade {
    #[serde(deserialize_with = "lenient_string")]
    trade_id: String,
    #[serde(deserialize_with = "lenient_string")]
    order_id: String,
    symbol: String,
    exchange: String,
    side: String,
    quantity: Option<i64>,
    price: Option<Decimal>,
    executed_at: String,
}

impl WireTrade {
    pub(crate) fn into_trade(self, mapper: &dyn SymbolMapper) -> Trade {
        let exchange = Exchange::new(self.exchange);
        Trade {
            trade_id: self.trade_id,
            order_id: OrderId::new(self.order_id),
            symbol: platform_symbol(mapper, &self.symbol, &exchange),
            exchange,
            side: side_of(&self.side),
            quantity: self.quantity.unwrap_or_default(),
            price: decimal_or_zero(self.price),
            timestamp: self.executed_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct WireTradeBook {
    pub(crate) trades: Vec<WireTrade>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct WirePosition {
    symbol: String,
    exchange: String,
    quantity: Option<i64>,
    product: String,
    average_price: Option<Decimal>,
    pnl: Option<Decimal>,
    pnl_percentage: Option<Decimal>,
}

impl WirePosition {
    pub(crate) fn into_position(self, mapper: &dyn SymbolMapper) -> Position {
        let exchange = Exchange::new(self.exchange);
        Position {
            symbol: platform_symbol(mapper, &self.symbol, &exchange),
            exchange,
            quantity: self.quantity.unwrap_or_default(),
            product: Product::from_wire_code(&self.product).unwrap_or_default(),
            price: decimal_or_zero(self.average_price),
            pnl: decimal_or_zero(self.pnl),
            pnl_percentage: decimal_or_zero(self.pnl_percentage),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct WirePositions {
    pub(crate) positions: Vec<WirePosition>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct WireHolding {
    symbol: String,
    exchange: String,
    quantity: Option<i64>,
    average_price: Option<Decimal>,
    value: Option<Decimal>,
    pnl: Option<Decimal>,
}

impl WireHolding {
    pub(crate) fn into_holding(self, mapper: &dyn SymbolMapper) -> Holding {
        let exchange = Exchange::new(self.exchange);
        Holding {
            symbol: platform_symbol(mapper, &self.symbol, &exchange),
            exchange,
            quantity: self.quantity.unwrap_or_default(),
            price: decimal_or_zero(self.average_price),
            value: decimal_or_zero(self.value),
            pnl: decimal_or_zero(self.pnl),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct WireHoldings {
    pub(crate) holdings: Vec<WireHolding>,
}

fn to_count(value: Option<Decimal>) -> u64 {
    value.and_then(|v| v.to_u64()).unwrap_or_default()
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct WireQuote {
    symbol: Option<String>,
    exchange: Option<String>,
    #[serde(alias = "last_price")]
    ltp: Option<Decimal>,
    open: Option<Decimal>,
    high: Option<Decimal>,
    low: Option<Decimal>,
    #[serde(alias = "prev_close")]
    close: Option<Decimal>,
    volume: Option<Decimal>,
    #[serde(alias = "bid_price")]
    bid: Option<Decimal>,
    #[serde(alias = "ask_price")]
    ask: Option<Decimal>,
    #[serde(alias = "open_interest")]
    oi: Option<Decimal>,
    #[serde(alias = "net_change")]
    change: Option<Decimal>,
    change_percent: Option<Decimal>,
    #[serde(alias = "last_trade_time")]
    timestamp: Option<String>,
}

impl WireQuote {
    /// `symbol`/`exchange` are the requested ones; the body's own fields
    /// are preferred when present.
    pub(crate) fn into_quote(
        self,
        symbol: &Symbol,
        exchange: &Exchange,
        mapper: &dyn SymbolMapper,
    ) -> Quote {
        let exchange = self.exchange.map(Exchange::new).unwrap_or_else(|| exchange.clone());
        let symbol = match self.symbol {
            Some(s) => platform_symbol(mapper, &s, &exchange),
            None => symbol.clone(),
        };
        Quote {
            symbol,
            exchange,
            ltp: decimal_or_zero(self.ltp),
            open: decimal_or_zero(self.open),
            high: decimal_or_zero(self.high),
            low: decimal_or_zero(self.low),
            close: decimal_or_zero(self.close),
            volume: to_count(self.volume),
            bid: decimal_or_zero(self.bid),
            ask: decimal_or_zero(self.ask),
            oi: to_count(self.oi),
            change: decimal_or_zero(self.change),
            change_percent: decimal_or_zero(self.change_percent),
            timestamp: self.timestamp,
        }
    }
}

/// Candles come either as `[time, o, h, l, c, v]` arrays or as objects.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum WireCandle {
    Row(CandleTime, Decimal, Decimal, Decimal, Decimal, Decimal),
    RowNoVolume(CandleTime, Decimal, Decimal, Decimal, Decimal),
    Object {
        #[serde(alias = "time", alias = "date")]
        timestamp: CandleTime,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        #[serde(default)]
        volume: Option<Decimal>,
    },
}

impl From<WireCandle> for Candle {
    fn from(candle: WireCandle) -> Self {
        match candle {
            WireCandle::Row(timestamp, open, high, low, close, volume) => Candle {
                timestamp,
                open,
                high,
                low,
                close,
                volume: to_count(Some(volume)),
            },
            WireCandle::RowNoVolume(timestamp, open, high, low, close) => Candle {
                timestamp,
                open,
                high,
                low,
                close,
                volume: 0,
            },
            WireCandle::Object {
                timestamp,
                open,
                high,
                low,
                close,
                volume,
            } => Candle {
                timestamp,
                open,
                high,
                low,
                close,
                volume: to_count(volume),
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct WireHistory {
    candles: Vec<WireCandle>,
}

impl WireHistory {
    pub(crate) fn into_history(
        self,
        symbol: Symbol,
        exchange: Exchange,
        interval: Interval,
    ) -> History {
        History {
            symbol,
            exchange,
            interval,
            candles: self.candles.into_iter().map(Candle::from).collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct WireDepthLevel {
    price: Option<Decimal>,
    quantity: Option<Decimal>,
    orders: Option<Decimal>,
}

impl From<WireDepthLevel> for DepthLevel {
    fn from(level: WireDepthLevel) -> Self {
        DepthLevel {
            price: decimal_or_zero(level.price),
            quantity: to_count(level.quantity),
            orders: to_count(level.orders),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct WireDepth {
    #[serde(alias = "buy")]
    bids: Vec<WireDepthLevel>,
    #[serde(alias = "sell")]
    asks: Vec<WireDepthLevel>,
}

impl WireDepth {
    pub(crate) fn into_depth(self, symbol: Symbol, exchange: Exchange) -> MarketDepth {
        MarketDepth {
            symbol,
            exchange,
            bids: self.bids.into_iter().map(DepthLevel::from).collect(),
            asks: self.asks.into_iter().map(DepthLevel::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{OrderRequestBuilder, Validity};
    use crate::symbols::{IdentityMapper, StaticMapper};
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_order_request_wire_codes() {
        let order = OrderRequestBuilder::new()
            .symbol("NIFTY24JANFUT")
            .exchange("NFO")
            .side(Side::Sell)
            .quantity(50)
            .order_type(OrderType::StopLossLimit)
            .price(dec!(21500.5))
            .trigger_price(dec!(21510))
            .product(Product::Nrml)
            .validity(Validity::Ioc)
            .build()
            .unwrap();
        let mapper = StaticMapper::new().with("NFO", "NIFTY24JANFUT", "NIFTY 25JAN24 FUT");

        let wire = serde_json::to_value(WireOrderRequest::new(&order, &mapper)).unwrap();
        assert_eq!(
            wire,
            json!({
                "symbol": "NIFTY 25JAN24 FUT",
                "exchange": "NFO",
                "side": "SELL",
                "quantity": 50,
                "order_type": "SLL",
                "product": "NRML",
                "validity": "IOC",
                "price": 21500.5,
                "stop_price": 21510.0
            })
        );
    }

    #[test]
    fn test_wire_order_normalization() {
        let wire: WireOrder = serde_json::from_value(json!({
            "order_id": 240101000123_u64,
            "symbol": "INFY",
            "exchange": "NSE",
            "side": "BUY",
            "quantity": 10,
            "price": 1500.25,
            "order_type": "LMT",
            "product": "CNC",
            "status": "OPEN",
            "filled_quantity": 4,
            "pending_quantity": 6,
            "average_price": "1500.10",
            "created_at": "2024-01-01T09:15:00Z"
        }))
        .unwrap();

        let order = wire.into_order(&IdentityMapper);
        assert_eq!(order.order_id.as_str(), "240101000123");
        assert_eq!(order.order_type, OrderType::Limit);
        assert_eq!(order.product, Product::Cnc);
        assert_eq!(order.price, dec!(1500.25));
        assert_eq!(order.average_price, dec!(1500.10));
        assert_eq!(order.pending_quantity, 6);
    }

    #[test]
    fn test_unknown_codes_fall_back() {
        let wire: WireOrder =
            serde_json::from_value(json!({ "order_type": "??", "side": "X" })).unwrap();
        let order = wire.into_order(&IdentityMapper);
        assert_eq!(order.order_type, OrderType::Market);
        assert_eq!(order.product, Product::Mis);
        assert_eq!(order.side, None);
    }

    #[test]
    fn test_ack_uses_requested_id_when_missing() {
        let requested = OrderId::new("77");
        let ack = WireOrder::default().into_ack(Some(&requested));
        assert_eq!(ack.order_id, requested);
    }

    #[test]
    fn test_wrapped_payload() {
        let bare: Wrapped<WireQuote> = serde_json::from_value(json!({ "ltp": 10 })).unwrap();
        let data: Wrapped<WireQuote> =
            serde_json::from_value(json!({ "data": { "ltp": 11 } })).unwrap();
        let nse = Exchange::new("NSE");
        let sym = Symbol::new("INFY");
        assert_eq!(bare.into_inner().into_quote(&sym, &nse, &IdentityMapper).ltp, dec!(10));
        assert_eq!(data.into_inner().into_quote(&sym, &nse, &IdentityMapper).ltp, dec!(11));
    }

    #[test]
    fn test_candle_shapes() {
        let history: WireHistory = serde_json::from_value(json!({
            "candles": [
                [1704067200, 100, 110, 95, 105, 1000],
                ["2024-01-02", 105, 112, 101, 111],
                {
                    "time": "2024-01-03 09:15:00",
                    "open": 1,
                    "high": 2,
                    "low": 0.5,
                    "close": 1.5,
                    "volume": 42
                }
            ]
        }))
        .unwrap();
        let history =
            history.into_history(Symbol::new("INFY"), Exchange::new("NSE"), Interval::Day);
        assert_eq!(history.candles.len(), 3);
        assert_eq!(history.candles[0].volume, 1000);
        assert_eq!(history.candles[1].volume, 0);
        assert_eq!(history.candles[2].low, dec!(0.5));
        assert_eq!(history.candles[2].volume, 42);
    }

    #[test]
    fn test_depth_aliases() {
        let depth: WireDepth = serde_json::from_value(json!({
            "buy": [{ "price": 99.5, "quantity": 10, "orders": 2 }],
            "sell": [{ "price": 100, "quantity": 3, "orders": 1 }]
        }))
        .unwrap();
        let depth = depth.into_depth(Symbol::new("X"), Exchange::new("NSE"));
        assert_eq!(depth.best_bid().unwrap().quantity, 10);
        assert_eq!(depth.best_ask().unwrap().price, dec!(100));
    }
}

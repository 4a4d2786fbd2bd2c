//! Order request and order book models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::enums::*;
use super::primitives::{Exchange, OrderId, Symbol};
use crate::{Error, Result};

/// A new order to be submitted to the broker.
///
/// The request is validated structurally before it is sent: required
/// fields must be present, and order types that carry a limit or trigger
/// price must have one. No price or quantity business rules are applied.
///
/// # Example
///
/// ```
/// use investright_rs::models::{OrderRequestBuilder, OrderType, Product, Side};
/// use rust_decimal_macros::dec;
///
/// let order = OrderRequestBuilder::new()
///     .symbol("INFY")
///     .exchange("NSE")
///     .side(Side::Buy)
///     .quantity(10)
///     .order_type(OrderType::Limit)
///     .price(dec!(1500.50))
///     .product(Product::Cnc)
///     .build()
///     .unwrap();
/// assert_eq!(order.symbol.as_str(), "INFY");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Platform trading symbol
    pub symbol: Symbol,
    /// Exchange segment
    pub exchange: Exchange,
    /// Buy or sell
    pub side: Side,
    /// Number of shares or contracts
    pub quantity: u32,
    /// Pricing of the order
    pub order_type: OrderType,
    /// Margin product
    pub product: Product,
    /// How long the order stays active
    #[serde(default)]
    pub validity: Validity,
    /// Limit price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    /// Trigger price for stop-loss orders
    #[serde(default, alias = "stop_price", skip_serializing_if = "Option::is_none")]
    pub trigger_price: Option<Decimal>,
    /// Quantity disclosed to the market
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disclosed_quantity: Option<u32>,
}

/// An order modification.
///
/// The broker replaces the whole order on modify, so a modification
/// carries the same fields as a new order.
pub type ModifyOrderRequest = OrderRequest;

impl OrderRequest {
    /// Parse an order from platform JSON and validate it.
    ///
    /// Missing or malformed fields are reported as
    /// [`Error::InvalidInput`].
    pub fn from_json(value: Value) -> Result<Self> {
        let order: OrderRequest = serde_json::from_value(value)
            .map_err(|e| Error::InvalidInput(format!("Malformed order: {e}")))?;
        order.validate()?;
        Ok(order)
    }

    /// Check that every required field is present.
    pub fn validate(&self) -> Result<()> {
        if self.symbol.is_blank() {
            return Err(Error::InvalidInput("symbol is required".to_string()));
        }
        if self.exchange.is_blank() {
            return Err(Error::InvalidInput("exchange is required".to_string()));
        }
        if self.quantity == 0 {
            return Err(Error::InvalidInput("quantity is required".to_string()));
        }
        if self.order_type.has_limit_price() && !is_set(self.price) {
            return Err(Error::InvalidInput(format!(
                "{:?} orders require a price",
                self.order_type
            )));
        }
        if self.order_type.has_trigger_price() && !is_set(self.trigger_price) {
            return Err(Error::InvalidInput(format!(
                "{:?} orders require a trigger_price",
                self.order_type
            )));
        }
        Ok(())
    }
}

/// Zero prices are not sent to the broker, so they count as missing.
fn is_set(price: Option<Decimal>) -> bool {
    price.is_some_and(|p| !p.is_zero())
}

/// Builder for [`OrderRequest`].
///
/// `validity` defaults to [`Validity::Day`]; every other non-optional field
/// must be set.
#[derive(Debug, Default, Clone)]
pub struct OrderRequestBuilder {
    symbol: Option<Symbol>,
    exchange: Option<Exchange>,
    side: Option<Side>,
    quantity: Option<u32>,
    order_type: Option<OrderType>,
    product: Option<Product>,
    validity: Validity,
    price: Option<Decimal>,
    trigger_price: Option<Decimal>,
    disclosed_quantity: Option<u32>,
}

impl OrderRequestBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the trading symbol.
    pub fn symbol(mut self, symbol: impl Into<Symbol>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    /// Set the exchange.
    pub fn exchange(mut self, exchange: impl Into<Exchange>) -> Self {
        self.exchange = Some(exchange.into());
        self
    }

    /// Set the side.
    pub fn side(mut self, side: Side) -> Self {
        self.side = Some(side);
        self
    }

    /// Set the quantity.
    pub fn quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// Set the order type.
    pub fn order_type(mut self, order_type: OrderType) -> Self {
        self.order_type = Some(order_type);
        self
    }

    /// Set the product.
    pub fn product(mut self, product: Product) -> Self {
        self.product = Some(product);
        self
    }

    /// Set the validity.
    pub fn validity(mut self, validity: Validity) -> Self {
        self.validity = validity;
        self
    }

    /// Set the limit price.
    pub fn price(mut self, price: Decimal) -> Self {
        self.price = Some(price);
        self
    }

    /// Set the trigger price.
    pub fn trigger_price(mut self, price: Decimal) -> Self {
        self.trigger_price = Some(price);
        self
    }

    /// Set the disclosed quantity.
    pub fn disclosed_quantity(mut self, quantity: u32) -> Self {
        self.disclosed_quantity = Some(quantity);
        self
    }

    /// Build the order, validating all fields.
    pub fn build(self) -> Result<OrderRequest> {
        fn required<T>(value: Option<T>, name: &str) -> Result<T> {
            value.ok_or_else(|| Error::InvalidInput(format!("{name} is required")))
        }

        let order = OrderRequest {
            symbol: required(self.symbol, "symbol")?,
            exchange: required(self.exchange, "exchange")?,
            side: required(self.side, "side")?,
            quantity: required(self.quantity, "quantity")?,
            order_type: required(self.order_type, "order_type")?,
            product: required(self.product, "product")?,
            validity: self.validity,
            price: self.price,
            trigger_price: self.trigger_price,
            disclosed_quantity: self.disclosed_quantity,
        };
        order.validate()?;
        Ok(order)
    }
}

/// Broker acknowledgement of a place, modify or cancel request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderAck {
    /// Id of the affected order
    pub order_id: OrderId,
    /// Order status reported with the acknowledgement, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_status: Option<String>,
    /// Broker message, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// An order as listed in the order book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Broker order id
    pub order_id: OrderId,
    /// Platform trading symbol
    pub symbol: Symbol,
    /// Exchange segment
    pub exchange: Exchange,
    /// Buy or sell, when the broker reported a known side
    pub side: Option<Side>,
    /// Ordered quantity
    pub quantity: i64,
    /// Limit price
    pub price: Decimal,
    /// Trigger price
    pub trigger_price: Decimal,
    /// Pricing of the order
    pub order_type: OrderType,
    /// Margin product
    pub product: Product,
    /// Broker order status, verbatim
    pub order_status: String,
    /// Quantity filled so far
    pub filled_quantity: i64,
    /// Quantity still open
    pub pending_quantity: i64,
    /// Average fill price
    pub average_price: Decimal,
    /// Order creation time as reported by the broker
    pub timestamp: String,
}

impl Order {
    /// Returns `true` if the order has been filled completely.
    pub fn is_complete(&self) -> bool {
        self.quantity > 0 && self.filled_quantity >= self.quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn market_buy() -> OrderRequestBuilder {
        OrderRequestBuilder::new()
            .symbol("INFY")
            .exchange("NSE")
            .side(Side::Buy)
            .quantity(1)
            .order_type(OrderType::Market)
            .product(Product::Mis)
    }

    #[test]
    fn test_builder_defaults_validity() {
        let order = market_buy().build().unwrap();
        assert_eq!(order.validity, Validity::Day);
        assert_eq!(order.price, None);
    }

    #[test]
    fn test_builder_requires_symbol() {
        let err = OrderRequestBuilder::new()
            .exchange("NSE")
            .side(Side::Buy)
            .quantity(1)
            .order_type(OrderType::Market)
            .product(Product::Mis)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(ref m) if m.contains("symbol")));
    }

    #[test]
    fn test_limit_requires_price() {
        let err = market_buy().order_type(OrderType::Limit).build().unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let order = market_buy()
            .order_type(OrderType::Limit)
            .price(dec!(1500))
            .build();
        assert!(order.is_ok());
    }

    #[test]
    fn test_stop_loss_requires_trigger() {
        let err = market_buy()
            .order_type(OrderType::StopLossLimit)
            .price(dec!(10))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(ref m) if m.contains("trigger_price")));
    }

    #[test]
    fn test_zero_prices_count_as_missing() {
        let err = market_buy()
            .order_type(OrderType::Limit)
            .price(Decimal::ZERO)
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(ref m) if m.contains("price")));

        let err = market_buy()
            .order_type(OrderType::StopLoss)
            .trigger_price(dec!(0.00))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(ref m) if m.contains("trigger_price")));

        // market orders never carry a price, so zero is harmless there
        assert!(market_buy().price(Decimal::ZERO).build().is_ok());
    }

    #[test]
    fn test_zero_quantity_rejected() {
        assert!(market_buy().quantity(0).build().is_err());
    }

    #[test]
    fn test_from_json_platform_order() {
        let order = OrderRequest::from_json(json!({
            "symbol": "INFY",
            "exchange": "NSE",
            "side": "SELL",
            "quantity": 5,
            "order_type": "STOP_LOSS",
            "product": "DELIVERY",
            "stop_price": 1490.0
        }))
        .unwrap();
        assert_eq!(order.side, Side::Sell);
        assert_eq!(order.product, Product::Cnc);
        assert_eq!(order.trigger_price, Some(dec!(1490)));
    }

    #[test]
    fn test_from_json_missing_symbol() {
        let err = OrderRequest::from_json(json!({
            "exchange": "NSE",
            "side": "BUY",
            "quantity": 5,
            "order_type": "MARKET",
            "product": "MIS"
        }))
        .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(ref m) if m.contains("symbol")));
    }

    #[test]
    fn test_order_complete() {
        let order = Order {
            order_id: OrderId::new("1"),
            symbol: Symbol::new("INFY"),
            exchange: Exchange::new("NSE"),
            side: Some(Side::Buy),
            quantity: 10,
            price: Decimal::ZERO,
            trigger_price: Decimal::ZERO,
            order_type: OrderType::Market,
            product: Product::Mis,
            order_status: "COMPLETE".into(),
            filled_quantity: 10,
            pending_quantity: 0,
            average_price: dec!(1500),
            timestamp: String::new(),
        };
        assert!(order.is_complete());
    }
}

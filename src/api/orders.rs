//! Orders service for order placement and management.

use std::sync::Arc;

use crate::client::ClientInner;
use crate::models::wire::{WireOrder, WireOrderBook, WireOrderRequest, WireTradeBook, Wrapped};
use crate::models::{
    ModifyOrderRequest, NormalizedResponse, Order, OrderAck, OrderId, OrderRequest, Trade,
};
use crate::{Error, Result};

/// Service for order operations.
///
/// Every call validates its input locally first; a malformed request fails
/// with [`Error::InvalidInput`] and nothing is sent to the broker.
///
/// # Example
///
/// ```no_run
/// use investright_rs::models::{OrderRequestBuilder, OrderType, Product, Side};
/// use rust_decimal_macros::dec;
///
/// # async fn example(client: investright_rs::InvestrightClient) -> investright_rs::Result<()> {
/// let order = OrderRequestBuilder::new()
///     .symbol("INFY")
///     .exchange("NSE")
///     .side(Side::Buy)
///     .quantity(10)
///     .order_type(OrderType::Limit)
///     .price(dec!(1500.50))
///     .product(Product::Cnc)
///     .build()?;
///
/// let response = client.orders().place(&order).await?;
/// match response.data() {
///     Some(ack) => println!("Order ID: {}", ack.order_id),
///     None => println!("Rejected: {:?}", response.message()),
/// }
/// # Ok(())
/// # }
/// ```
pub struct OrdersService {
    inner: Arc<ClientInner>,
}

impl OrdersService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Place a new order.
    ///
    /// On success the acknowledgement carries the broker's order id.
    pub async fn place(&self, order: &OrderRequest) -> Result<NormalizedResponse<OrderAck>> {
        order.validate()?;
        let wire = WireOrderRequest::new(order, self.inner.mapper());
        tracing::debug!(
            symbol = %order.symbol,
            exchange = %order.exchange,
            side = order.side.wire_code(),
            quantity = order.quantity,
            "placing order"
        );

        let result = self
            .inner
            .post::<Option<Wrapped<WireOrder>>, _>("/orders", &wire)
            .await
            .map(|body| unwrap_order(body).into_ack(None));
        NormalizedResponse::from_result(result)
    }

    /// Modify an open order.
    ///
    /// The broker replaces the order wholesale, so `order` must carry every
    /// field, not only the changed ones.
    pub async fn modify(
        &self,
        order_id: &OrderId,
        order: &ModifyOrderRequest,
    ) -> Result<NormalizedResponse<OrderAck>> {
        require_order_id(order_id)?;
        order.validate()?;
        let wire = WireOrderRequest::new(order, self.inner.mapper());

        let result = self
            .inner
            .put::<Option<Wrapped<WireOrder>>, _>(&order_path(order_id), &wire)
            .await
            .map(|body| unwrap_order(body).into_ack(Some(order_id)));
        NormalizedResponse::from_result(result)
    }

    /// Cancel an open order.
    ///
    /// An empty success body acknowledges the requested id.
    pub async fn cancel(&self, order_id: &OrderId) -> Result<NormalizedResponse<OrderAck>> {
        require_order_id(order_id)?;

        let result = self
            .inner
            .delete::<Option<Wrapped<WireOrder>>>(&order_path(order_id))
            .await
            .map(|body| unwrap_order(body).into_ack(Some(order_id)));
        NormalizedResponse::from_result(result)
    }

    /// Get a single order, including its current status.
    ///
    /// An empty success body yields an order carrying only the requested id.
    pub async fn get(&self, order_id: &OrderId) -> Result<NormalizedResponse<Order>> {
        require_order_id(order_id)?;

        let result = self
            .inner
            .get::<Option<Wrapped<WireOrder>>>(&order_path(order_id))
            .await
            .map(|body| {
                let mut order = unwrap_order(body).into_order(self.inner.mapper());
                if order.order_id.is_blank() {
                    order.order_id = order_id.clone();
                }
                order
            });
        NormalizedResponse::from_result(result)
    }

    /// Get today's order book.
    pub async fn book(&self) -> Result<NormalizedResponse<Vec<Order>>> {
        let mapper = self.inner.mapper();
        let result = self
            .inner
            .get::<Option<Wrapped<WireOrderBook>>>("/orders")
            .await
            .map(|body| {
                body.map(Wrapped::into_inner)
                    .unwrap_or_default()
                    .orders
                    .into_iter()
                    .map(|o| o.into_order(mapper))
                    .collect()
            });
        NormalizedResponse::from_result(result)
    }

    /// Get today's executed trades.
    pub async fn trades(&self) -> Result<NormalizedResponse<Vec<Trade>>> {
        let mapper = self.inner.mapper();
        let result = self
            .inner
            .get::<Option<Wrapped<WireTradeBook>>>("/trades")
            .await
            .map(|body| {
                body.map(Wrapped::into_inner)
                    .unwrap_or_default()
                    .trades
                    .into_iter()
                    .map(|t| t.into_trade(mapper))
                    .collect()
            });
        NormalizedResponse::from_result(result)
    }
}

fn require_order_id(order_id: &OrderId) -> Result<()> {
    if order_id.is_blank() {
        return Err(Error::InvalidInput("order_id is required".to_string()));
    }
    Ok(())
}

fn order_path(order_id: &OrderId) -> String {
    format!("/orders/{}", urlencoding::encode(order_id.as_str()))
}

fn unwrap_order(body: Option<Wrapped<WireOrder>>) -> WireOrder {
    body.map(Wrapped::into_inner).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_path_is_encoded() {
        assert_eq!(order_path(&OrderId::new("240101/7")), "/orders/240101%2F7");
    }

    #[test]
    fn test_blank_order_id_rejected() {
        assert!(matches!(
            require_order_id(&OrderId::new(" ")),
            Err(Error::InvalidInput(_))
        ));
        assert!(require_order_id(&OrderId::new("1")).is_ok());
    }
}

//! Positions and holdings.

use std::sync::Arc;

use crate::client::ClientInner;
use crate::models::wire::{WireHoldings, WirePositions, Wrapped};
use crate::models::{Exchange, Holding, NormalizedResponse, Position, Product, Symbol};
use crate::{Error, Result};

/// Service for position and holding queries.
///
/// # Example
///
/// ```no_run
/// # async fn example(client: investright_rs::InvestrightClient) -> investright_rs::Result<()> {
/// let positions = client.portfolio().positions().await?;
/// for position in positions.data().into_iter().flatten() {
///     println!("{} {} @ {}", position.symbol, position.quantity, position.price);
/// }
/// # Ok(())
/// # }
/// ```
pub struct PortfolioService {
    inner: Arc<ClientInner>,
}

impl PortfolioService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Get all positions for the day, including closed ones.
    pub async fn positions(&self) -> Result<NormalizedResponse<Vec<Position>>> {
        NormalizedResponse::from_result(self.fetch_positions().await)
    }

    /// Find the open position for `symbol` on `exchange` under `product`.
    ///
    /// Succeeds with `None` when there is no such position or it is flat.
    pub async fn open_position(
        &self,
        symbol: &Symbol,
        exchange: &Exchange,
        product: Product,
    ) -> Result<NormalizedResponse<Option<Position>>> {
        if symbol.is_blank() {
            return Err(Error::InvalidInput("symbol is required".to_string()));
        }
        if exchange.is_blank() {
            return Err(Error::InvalidInput("exchange is required".to_string()));
        }

        let result = self.fetch_positions().await.map(|positions| {
            positions.into_iter().find(|p| {
                p.is_open()
                    && p.symbol == *symbol
                    && p.exchange.as_str().eq_ignore_ascii_case(exchange.as_str())
                    && p.product == product
            })
        });
        NormalizedResponse::from_result(result)
    }

    /// Get delivery holdings.
    pub async fn holdings(&self) -> Result<NormalizedResponse<Vec<Holding>>> {
        let mapper = self.inner.mapper();
        let result = self
            .inner
            .get::<Option<Wrapped<WireHoldings>>>("/holdings")
            .await
            .map(|body| {
                body.map(Wrapped::into_inner)
                    .unwrap_or_default()
                    .holdings
                    .into_iter()
                    .map(|h| h.into_holding(mapper))
                    .collect()
            });
        NormalizedResponse::from_result(result)
    }

    async fn fetch_positions(&self) -> Result<Vec<Position>> {
        let mapper = self.inner.mapper();
        let body = self
            .inner
            .get::<Option<Wrapped<WirePositions>>>("/positions")
            .await?;
        Ok(body
            .map(Wrapped::into_inner)
            .unwrap_or_default()
            .positions
            .into_iter()
            .map(|p| p.into_position(mapper))
            .collect())
    }
}

//! Market data snapshots: quotes, historical candles and depth.

use std::sync::Arc;

use crate::client::ClientInner;
use crate::models::wire::{WireDepth, WireHistory, WireQuote, Wrapped};
use crate::models::{
    Exchange, History, HistoryRequest, MarketDepth, NormalizedResponse, Quote, Symbol,
};
use crate::symbols::broker_symbol;
use crate::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Service for market data.
///
/// # Example
///
/// ```no_run
/// use investright_rs::{Exchange, Symbol};
///
/// # async fn example(client: investright_rs::InvestrightClient) -> investright_rs::Result<()> {
/// let quote = client
///     .market_data()
///     .quotes(&Symbol::new("INFY"), &Exchange::new("NSE"))
///     .await?;
/// if let Some(q) = quote.data() {
///     println!("INFY last traded at {}", q.ltp);
/// }
/// # Ok(())
/// # }
/// ```
pub struct MarketDataService {
    inner: Arc<ClientInner>,
}

impl MarketDataService {
    pub(crate) fn new(inner: Arc<ClientInner>) -> Self {
        Self { inner }
    }

    /// Get a live quote.
    ///
    /// An empty success body yields a zeroed quote for the requested symbol.
    pub async fn quotes(
        &self,
        symbol: &Symbol,
        exchange: &Exchange,
    ) -> Result<NormalizedResponse<Quote>> {
        let query = self.instrument_query(symbol, exchange)?;
        let mapper = self.inner.mapper();

        let result = self
            .inner
            .get_with_query::<Option<Wrapped<WireQuote>>, _>("/quotes", &query)
            .await
            .map(|body| {
                body.map(Wrapped::into_inner)
                    .unwrap_or_default()
                    .into_quote(symbol, exchange, mapper)
            });
        NormalizedResponse::from_result(result)
    }

    /// Get historical candles for a date range.
    pub async fn history(&self, request: &HistoryRequest) -> Result<NormalizedResponse<History>> {
        request.validate()?;
        let symbol = broker_symbol(self.inner.mapper(), &request.symbol, &request.exchange);
        let start = request.start_date.format(DATE_FORMAT).to_string();
        let end = request.end_date.format(DATE_FORMAT).to_string();
        let query = [
            ("symbol", symbol.as_str()),
            ("exchange", request.exchange.as_str()),
            ("interval", request.interval.as_str()),
            ("start_date", start.as_str()),
            ("end_date", end.as_str()),
        ];

        let result = self
            .inner
            .get_with_query::<Option<Wrapped<WireHistory>>, _>("/history", &query)
            .await
            .map(|body| {
                body.map(Wrapped::into_inner).unwrap_or_default().into_history(
                    request.symbol.clone(),
                    request.exchange.clone(),
                    request.interval,
                )
            });
        NormalizedResponse::from_result(result)
    }

    /// Get market depth.
    pub async fn depth(
        &self,
        symbol: &Symbol,
        exchange: &Exchange,
    ) -> Result<NormalizedResponse<MarketDepth>> {
        let query = self.instrument_query(symbol, exchange)?;

        let result = self
            .inner
            .get_with_query::<Option<Wrapped<WireDepth>>, _>("/depth", &query)
            .await
            .map(|body| {
                body.map(Wrapped::into_inner)
                    .unwrap_or_default()
                    .into_depth(symbol.clone(), exchange.clone())
            });
        NormalizedResponse::from_result(result)
    }

    fn instrument_query(
        &self,
        symbol: &Symbol,
        exchange: &Exchange,
    ) -> Result<[(&'static str, String); 2]> {
        if symbol.is_blank() {
            return Err(Error::InvalidInput("symbol is required".to_string()));
        }
        if exchange.is_blank() {
            return Err(Error::InvalidInput("exchange is required".to_string()));
        }
        Ok([
            ("symbol", broker_symbol(self.inner.mapper(), symbol, exchange)),
            ("exchange", exchange.as_str().to_string()),
        ])
    }
}

//! API service modules for Investright endpoints.
//!
//! Each service covers one area of the trading API and returns every
//! broker outcome as a [`NormalizedResponse`](crate::models::NormalizedResponse).

mod market_data;
mod orders;
mod portfolio;

pub use market_data::MarketDataService;
pub use orders::OrdersService;
pub use portfolio::PortfolioService;

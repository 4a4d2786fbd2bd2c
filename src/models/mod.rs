//! Data models for the Investright API.
//!
//! - [`primitives`] - Identifier newtypes (`OrderId`, `Symbol`, `Exchange`)
//! - [`enums`] - Sides, order types, products, validity and intervals
//! - [`order`] - Order requests, acknowledgements and order book entries
//! - [`portfolio`] - Trades, positions and holdings
//! - [`market_data`] - Quotes, candles and market depth
//! - [`response`] - The normalized response envelope

pub mod primitives;
pub mod enums;
pub mod order;
pub mod portfolio;
pub mod market_data;
pub mod response;
pub(crate) mod wire;

pub use primitives::*;
pub use enums::*;
pub use order::*;
pub use portfolio::*;
pub use market_data::*;
pub use response::*;

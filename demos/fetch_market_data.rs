//! Market data example.
//!
//! Fetches a quote, a month of daily candles and the order book for one
//! symbol, then lists open positions.
//!
//! Requires BROKER_ACCESS_TOKEN.
//!
//! Run with: cargo run --example fetch_market_data -- [SYMBOL]

use chrono::{Duration, Utc};
use investright_rs::models::{HistoryRequest, Interval};
use investright_rs::{Exchange, InvestrightClient, Symbol, Token};

#[tokio::main]
async fn main() -> investright_rs::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let access_token = std::env::var("BROKER_ACCESS_TOKEN")
        .expect("BROKER_ACCESS_TOKEN environment variable required");
    let client = InvestrightClient::new(&Token::new(access_token))?;

    let symbol = Symbol::new(std::env::args().nth(1).unwrap_or_else(|| "INFY".to_string()));
    let exchange = Exchange::new("NSE");

    // Quote
    match client.market_data().quotes(&symbol, &exchange).await?.into_data() {
        Some(quote) => println!(
            "{} LTP {} (O {} H {} L {} C {}) vol {}",
            quote.symbol, quote.ltp, quote.open, quote.high, quote.low, quote.close, quote.volume
        ),
        None => println!("No quote for {symbol}"),
    }

    // Daily candles for the last 30 days
    let end = Utc::now().date_naive();
    let request = HistoryRequest::new(
        symbol.clone(),
        exchange.clone(),
        Interval::Day,
        end - Duration::days(30),
        end,
    );
    if let Some(history) = client.market_data().history(&request).await?.into_data() {
        println!("\nLast {} daily candles:", history.candles.len());
        for candle in history.candles.iter().rev().take(5) {
            println!(
                "  {:?} O {} H {} L {} C {}",
                candle.timestamp.to_datetime(),
                candle.open,
                candle.high,
                candle.low,
                candle.close
            );
        }
    }

    // Depth
    if let Some(depth) = client.market_data().depth(&symbol, &exchange).await?.into_data() {
        println!(
            "\nBest bid {:?} / best ask {:?}, spread {:?}",
            depth.best_bid().map(|l| l.price),
            depth.best_ask().map(|l| l.price),
            depth.spread()
        );
    }

    // Positions
    let positions = client.portfolio().positions().await?;
    println!("\nOpen positions:");
    for position in positions.data().into_iter().flatten().filter(|p| p.is_open()) {
        println!(
            "  {} {} x{} P&L {}",
            position.exchange, position.symbol, position.quantity, position.pnl
        );
    }

    println!("\nDone!");
    Ok(())
}

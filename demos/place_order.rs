//! Order placement example.
//!
//! Places a small limit order far from the market, checks its status and
//! cancels it.
//!
//! Requires BROKER_ACCESS_TOKEN.
//!
//! Run with: cargo run --example place_order

use investright_rs::models::{OrderRequestBuilder, OrderType, Product, Side, Validity};
use investright_rs::{InvestrightClient, Token};
use rust_decimal_macros::dec;

#[tokio::main]
async fn main() -> investright_rs::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let access_token = std::env::var("BROKER_ACCESS_TOKEN")
        .expect("BROKER_ACCESS_TOKEN environment variable required");
    let client = InvestrightClient::new(&Token::new(access_token))?;

    // Build a limit order to buy 1 share of INFY well below the market
    let order = OrderRequestBuilder::new()
        .symbol("INFY")
        .exchange("NSE")
        .side(Side::Buy)
        .quantity(1)
        .order_type(OrderType::Limit)
        .price(dec!(100.00))
        .product(Product::Cnc)
        .validity(Validity::Day)
        .build()?;

    println!("Placing order...");
    let placed = client.orders().place(&order).await?;
    println!("{}", serde_json::to_string_pretty(&placed)?);

    let Some(ack) = placed.into_data() else {
        return Ok(());
    };

    let status = client.orders().get(&ack.order_id).await?;
    if let Some(order) = status.data() {
        println!(
            "\nOrder {} is {} ({} of {} filled)",
            order.order_id, order.order_status, order.filled_quantity, order.quantity
        );
    }

    println!("\nCancelling order...");
    let cancelled = client.orders().cancel(&ack.order_id).await?;
    println!("{}", serde_json::to_string_pretty(&cancelled)?);

    println!("\nDone!");
    Ok(())
}

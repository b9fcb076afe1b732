//! Replays a fixed sequence of orders through the exchange registry.
//!
//! Each of the first five instruments receives one buy followed by one crossing
//! sell, and every resulting trade is printed by the trade listener.

use matchbook_rs::prelude::*;
use std::sync::Arc;
use tracing::{info, warn};

const ORDERS: [(Side, usize, u64, u64); 10] = [
    (Side::Buy, 0, 50, 100),
    (Side::Sell, 0, 30, 100),
    (Side::Buy, 1, 40, 150),
    (Side::Sell, 1, 40, 150),
    (Side::Buy, 2, 25, 200),
    (Side::Sell, 2, 25, 200),
    (Side::Buy, 3, 100, 250),
    (Side::Sell, 3, 100, 250),
    (Side::Buy, 4, 60, 300),
    (Side::Sell, 4, 60, 300),
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let listener: TradeListener = Arc::new(|trade: &TradeEvent| {
        info!(
            "Matched {} shares of instrument {} at {}",
            trade.quantity, trade.instrument, trade.price
        );
    });

    let registry = ExchangeRegistry::with_config(
        RegistryConfig::new().with_trade_listener(listener),
    )?;

    for (id, (side, instrument, quantity, price)) in ORDERS.into_iter().enumerate() {
        if let Err(e) = registry.submit(side, instrument, quantity, price, OrderId::from_u64(id as u64))
        {
            warn!("Order {} rejected: {}", id, e);
        }
    }

    for instrument in 0..5 {
        if let Some(book) = registry.book(instrument) {
            info!(
                "Instrument {} - Best Bid: {:?}, Best Ask: {:?}, Resting: {}",
                instrument,
                book.best_bid(),
                book.best_ask(),
                book.resting_order_count()
            );
        }
    }

    if let Some(book) = registry.book(0) {
        for level in book.buy_levels(5) {
            info!(
                "Instrument 0 bid level {}: {} open across {} orders",
                level.price, level.quantity, level.order_count
            );
        }
        info!("Instrument 0 snapshot: {}", book.snapshot_to_json(10)?);
    }

    Ok(())
}

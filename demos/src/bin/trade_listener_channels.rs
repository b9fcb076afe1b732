//! Example demonstrating trade routing with channels across several instruments
//!
//! This example shows how to:
//! 1. Plug a channel based TradeListener into every book of a registry
//! 2. Drain the trades of all instruments on a single processor thread
//! 3. Submit orders to the same instrument from several threads at once
//! 4. Check the books afterwards

use matchbook_rs::prelude::*;
use std::sync::Arc;
use std::thread;
use tracing::{info, warn};

const INSTRUMENTS: usize = 3;
const SUBMITTERS: u64 = 4;
const ORDERS_PER_SUBMITTER: u64 = 50;

/// Add resting liquidity around 50_000 on one instrument
fn add_liquidity(registry: &ExchangeRegistry, instrument: usize) {
    info!("Adding liquidity to instrument {}", instrument);

    for i in 1..=5 {
        let base = 1_000 * instrument as u64;

        // Asks: 50010, 50020, ...
        let ask_id = OrderId::from_u64(base + i);
        if let Err(e) = registry.submit(Side::Sell, instrument, 100, 50_000 + i * 10, ask_id) {
            warn!("Failed to add ask order {}: {}", ask_id, e);
        }

        // Bids: 49980, 49970, ...
        let bid_id = OrderId::from_u64(base + 100 + i);
        if let Err(e) = registry.submit(Side::Buy, instrument, 100, 49_990 - i * 10, bid_id) {
            warn!("Failed to add bid order {}: {}", bid_id, e);
        }
    }
}

/// Several threads trade against the same instrument at once
fn run_submitters(registry: &Arc<ExchangeRegistry>, instrument: usize) {
    let handles: Vec<_> = (0..SUBMITTERS)
        .map(|t| {
            let registry = Arc::clone(registry);
            thread::spawn(move || {
                for i in 0..ORDERS_PER_SUBMITTER {
                    let id = OrderId::from_u64(1_000_000 * (t + 1) + 10_000 * instrument as u64 + i);
                    let (side, price) = if (i + t) % 2 == 0 {
                        (Side::Buy, 50_000 + (i % 3) * 10)
                    } else {
                        (Side::Sell, 49_990 - (i % 3) * 10)
                    };
                    if let Err(e) = registry.submit(side, instrument, 7, price, id) {
                        warn!("Submitter {} failed on order {}: {}", t, id, e);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        if handle.join().is_err() {
            warn!("Submitter thread panicked on instrument {}", instrument);
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("Starting trade routing example");

    let mut router = TradeRouterStd::new();
    let registry = Arc::new(ExchangeRegistry::with_config(
        RegistryConfig::new()
            .with_instruments(INSTRUMENTS)
            .with_trade_listener(router.listener()),
    )?);

    // Start the trade processor
    let processor = router.start_trade_processor()?;

    for instrument in 0..INSTRUMENTS {
        add_liquidity(&registry, instrument);
    }
    info!("Liquidity added to all books");

    for instrument in 0..INSTRUMENTS {
        run_submitters(&registry, instrument);
    }

    // Show book states
    for book in registry.books() {
        info!(
            "Instrument {} - Best Bid: {:?}, Best Ask: {:?}, Spread: {:?}, Trades: {}, Volume: {}",
            book.instrument(),
            book.best_bid(),
            book.best_ask(),
            book.spread(),
            book.trade_count(),
            book.traded_volume()
        );
    }

    // Dropping every listener closes the channel and lets the processor finish.
    drop(registry);
    drop(router);
    match processor.join() {
        Ok(processed) => info!("Processor handled {} trades", processed),
        Err(_) => warn!("Trade processor panicked"),
    }

    info!("Example completed successfully");
    Ok(())
}

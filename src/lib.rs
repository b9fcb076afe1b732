//! # Per-Instrument Concurrent Matching Engine
//!
//! A continuous double-auction matching engine written in Rust. Every instrument
//! owns an order book made of two price-ordered order lists (buy and sell). Orders
//! submitted from any number of threads are published into those lists without
//! locks, and each submission immediately runs a matching pass that crosses the
//! best buy against the best sell while their prices overlap.
//!
//! ## Key Features
//!
//! - **Lock-Free Order Lists**: Each side of a book is a concurrent skip list keyed
//!   by price-time priority. New orders are fully built before they are published
//!   with compare-and-swap, so an insertion is never lost and never observed half
//!   linked.
//!
//! - **Strict Price-Time Priority**: Buy lists iterate by descending price, sell lists
//!   by ascending price, and orders at the same price always keep their arrival order.
//!
//! - **Exactly-Once Matching**: The matching pass of an instrument is serialized by a
//!   lock owned by that instrument alone. Two threads can never trade the same
//!   quantity twice, and instruments never contend with each other.
//!
//! - **Trade Event Sink**: Every trade is reported synchronously to an optional
//!   [`TradeListener`], in the exact order the trades happen. Channel based routers
//!   for std threads and tokio tasks are included.
//!
//! - **Checksummed Snapshots**: Resting orders can be captured as a JSON snapshot
//!   protected with a SHA-256 checksum for inspection and replication.
//!
//! ## Matching Rules
//!
//! 1. A trade happens whenever `best_buy.price >= best_sell.price`.
//! 2. The traded quantity is the smaller of the two remaining quantities.
//! 3. The trade price follows the book's [`TradePricePolicy`]. The default prices
//!    every cross at the sell order's limit; [`TradePricePolicy::Resting`] prices it
//!    at the limit of whichever order arrived first.
//! 4. Orders whose remaining quantity reaches zero leave the book immediately.
//!
//! ## Example
//!
//! ```
//! use matchbook_rs::prelude::*;
//!
//! let registry = ExchangeRegistry::new();
//!
//! registry
//!     .submit(Side::Buy, 0, 50, 100, OrderId::from_u64(1))
//!     .expect("valid order");
//! registry
//!     .submit(Side::Sell, 0, 30, 100, OrderId::from_u64(2))
//!     .expect("valid order");
//!
//! let book = registry.book(0).expect("instrument 0 exists");
//! assert_eq!(book.trade_count(), 1);
//! assert_eq!(book.best_bid(), Some(100));
//! assert_eq!(book.best_ask(), None);
//! ```
//!
//! ## Concurrency Model
//!
//! - Insertion into a side is lock-free; the per-book arrival ticket decides the
//!   order of records that share a price.
//! - The matching pass and cancellations of one instrument take that instrument's
//!   matching lock. This lock is the serialization point of the instrument.
//! - Readers (best prices, depth, snapshots) never block, but their view of the two
//!   sides is not atomic while writers are active.

pub mod orderbook;

pub mod prelude;
mod utils;

pub use orderbook::manager::{TradeRouterStd, TradeRouterTokio};
pub use orderbook::registry::{ExchangeRegistry, MAX_INSTRUMENTS, RegistryConfig};
pub use orderbook::snapshot::RestingOrder;
pub use orderbook::trade::{TradeEvent, TradeListener, TradePricePolicy};
pub use orderbook::{
    LevelSummary, OrderBook, OrderBookError, OrderBookSnapshot, OrderBookSnapshotPackage,
    OrderRecord, PriceLevelList, PriorityKey,
};
pub use utils::current_time_millis;

pub use pricelevel::{OrderId, Side};

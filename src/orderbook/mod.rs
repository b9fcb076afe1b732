//! OrderBook implementation for price-time ordered order lists and order matching.

pub mod book;
pub mod error;
pub mod level_list;
/// Channel based routing of trade events out of the books.
pub mod manager;
mod matching;
pub mod order;
/// Fixed-size table of order books, one per instrument.
pub mod registry;
pub mod snapshot;
/// Trade events, the trade listener sink and the trade price policy.
pub mod trade;

pub use book::OrderBook;
pub use error::OrderBookError;
pub use level_list::{LevelSummary, PriceLevelList};
pub use order::{OrderRecord, PriorityKey};
pub use snapshot::{
    ORDERBOOK_SNAPSHOT_FORMAT_VERSION, OrderBookSnapshot, OrderBookSnapshotPackage, RestingOrder,
};

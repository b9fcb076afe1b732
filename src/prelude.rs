//! Convenience re-exports for the most commonly used types.
//!
//! ```
//! use matchbook_rs::prelude::*;
//! ```

pub use crate::orderbook::manager::{TradeRouterStd, TradeRouterTokio};
pub use crate::orderbook::registry::{ExchangeRegistry, MAX_INSTRUMENTS, RegistryConfig};
pub use crate::orderbook::snapshot::{
    ORDERBOOK_SNAPSHOT_FORMAT_VERSION, OrderBookSnapshot, OrderBookSnapshotPackage, RestingOrder,
};
pub use crate::orderbook::trade::{TradeEvent, TradeListener, TradePricePolicy};
pub use crate::orderbook::{
    LevelSummary, OrderBook, OrderBookError, OrderRecord, PriceLevelList, PriorityKey,
};
pub use crate::utils::current_time_millis;
pub use pricelevel::{OrderId, Side};

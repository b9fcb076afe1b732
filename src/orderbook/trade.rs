use super::order::OrderRecord;
use pricelevel::OrderId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// One match between a buy order and a sell order of the same instrument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeEvent {
    /// Unique id of this trade.
    pub trade_id: Uuid,
    /// Instrument both orders belong to.
    pub instrument: usize,
    /// Execution price.
    pub price: u64,
    /// Matched quantity.
    pub quantity: u64,
    /// Id of the buy order.
    pub buy_order_id: OrderId,
    /// Id of the sell order.
    pub sell_order_id: OrderId,
    /// Execution time in milliseconds since the Unix epoch.
    pub timestamp: u64,
}

/// Sink for trade events.
///
/// Called synchronously from the matching pass, once per trade and in execution
/// order, while the instrument's matching lock is held. A listener must not submit
/// to or cancel on the instrument that produced the event.
pub type TradeListener = Arc<dyn Fn(&TradeEvent) + Send + Sync>;

/// How the execution price of a crossing pair is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TradePricePolicy {
    /// Always trade at the sell order's limit price.
    #[default]
    SellSide,
    /// Trade at the limit price of whichever order arrived first.
    Resting,
}

impl TradePricePolicy {
    /// Execution price for a crossing `buy` and `sell`.
    pub fn execution_price(self, buy: &OrderRecord, sell: &OrderRecord) -> u64 {
        match self {
            TradePricePolicy::SellSide => sell.price(),
            TradePricePolicy::Resting => {
                if buy.sequence() < sell.sequence() {
                    buy.price()
                } else {
                    sell.price()
                }
            }
        }
    }
}

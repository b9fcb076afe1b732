//! Resting order records and the priority key that orders them inside a list.

use crate::utils::current_time_millis;
use pricelevel::{OrderId, Side};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// One order resting in a [`PriceLevelList`](super::PriceLevelList).
///
/// Everything except the remaining quantity is fixed at construction. The remaining
/// quantity is only decremented by the matching pass of the owning book, which holds
/// that book's matching lock while doing so; readers may load it at any time.
#[derive(Debug)]
pub struct OrderRecord {
    id: OrderId,
    side: Side,
    instrument: usize,
    price: u64,
    original_quantity: u64,
    quantity: AtomicU64,
    sequence: u64,
    timestamp: u64,
}

impl OrderRecord {
    /// Builds a record with its full quantity remaining.
    pub fn new(
        id: OrderId,
        side: Side,
        instrument: usize,
        price: u64,
        quantity: u64,
        sequence: u64,
    ) -> Self {
        Self {
            id,
            side,
            instrument,
            price,
            original_quantity: quantity,
            quantity: AtomicU64::new(quantity),
            sequence,
            timestamp: current_time_millis(),
        }
    }

    /// Caller assigned order id.
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// Buy or sell.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Index of the instrument this order trades.
    pub fn instrument(&self) -> usize {
        self.instrument
    }

    /// Limit price in ticks.
    pub fn price(&self) -> u64 {
        self.price
    }

    /// Quantity at submission.
    pub fn original_quantity(&self) -> u64 {
        self.original_quantity
    }

    /// Quantity still open.
    pub fn remaining(&self) -> u64 {
        self.quantity.load(Ordering::Acquire)
    }

    /// Quantity already traded.
    pub fn filled(&self) -> u64 {
        self.original_quantity - self.remaining()
    }

    /// Arrival ticket within the owning book. Lower tickets arrived first.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Creation time in milliseconds since the Unix epoch.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// True once nothing is left to trade.
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Priority of this record inside its side's list.
    pub fn priority_key(&self) -> PriorityKey {
        PriorityKey::new(self.side, self.price, self.sequence)
    }

    /// Takes `quantity` out of the remaining quantity and returns what is left.
    ///
    /// # Panics
    /// Panics when `quantity` exceeds the remaining quantity. An over-fill means the
    /// book is corrupt and continuing would spread the damage.
    pub(crate) fn fill(&self, quantity: u64) -> u64 {
        let previous = self.quantity.fetch_sub(quantity, Ordering::AcqRel);
        assert!(
            previous >= quantity,
            "order {} over-filled: {} remaining, {} requested",
            self.id,
            previous,
            quantity
        );
        previous - quantity
    }
}

impl fmt::Display for OrderRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} {} {}/{}@{} (instrument {}, seq {})",
            self.side,
            self.id,
            self.remaining(),
            self.original_quantity,
            self.price,
            self.instrument,
            self.sequence
        )
    }
}

/// Sort key of a record inside a list: best price first, then earliest arrival.
///
/// Sell prices are used as is. Buy prices are mirrored (`u64::MAX - price`) so that
/// ascending key order walks buys from the highest price down. The arrival ticket
/// breaks ties, which keeps equal-price records first-in-first-out on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PriorityKey {
    rank: u64,
    sequence: u64,
}

impl PriorityKey {
    /// Key for a `side` order at `price` holding arrival ticket `sequence`.
    pub fn new(side: Side, price: u64, sequence: u64) -> Self {
        let rank = match side {
            Side::Buy => u64::MAX - price,
            Side::Sell => price,
        };
        Self { rank, sequence }
    }
}

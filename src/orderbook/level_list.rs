//! One side of an instrument's book: resting orders in strict price-time priority.
//!
//! The list is a concurrent skip list keyed by [`PriorityKey`]. Inserting a record
//! builds the node first and then publishes it with a compare-and-swap on the
//! predecessor links; a lost race re-reads the neighbourhood and tries again, so no
//! insertion is ever dropped and a half-linked node is never visible. Removal is by
//! key: unlinking the head can never overwrite a better order that was published in
//! the meantime, and only one thread can win the removal of a given entry.

use super::order::{OrderRecord, PriorityKey};
use crossbeam_skiplist::SkipMap;
use crossbeam_skiplist::map::Entry;
use pricelevel::Side;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::trace;

/// Aggregated view of every record resting at one price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSummary {
    /// Price of the level.
    pub price: u64,
    /// Sum of the remaining quantities at this price.
    pub quantity: u128,
    /// Number of records at this price.
    pub order_count: usize,
}

/// Price-time ordered chain of resting orders for one side of one instrument.
pub struct PriceLevelList {
    side: Side,
    orders: SkipMap<PriorityKey, Arc<OrderRecord>>,
}

impl PriceLevelList {
    /// Creates an empty list for `side`.
    pub fn new(side: Side) -> Self {
        Self {
            side,
            orders: SkipMap::new(),
        }
    }

    /// The side this list holds.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Publishes `record` at its priority position and returns the key it lives under.
    ///
    /// Equal-price records already in the list keep precedence because they hold
    /// lower arrival tickets. Never fails; contention only costs retries.
    pub fn insert(&self, record: Arc<OrderRecord>) -> PriorityKey {
        debug_assert_eq!(record.side(), self.side);
        debug_assert!(record.remaining() > 0);

        let key = record.priority_key();
        trace!(
            "{:?} list: inserting order {} {}@{} (seq {})",
            self.side,
            record.id(),
            record.remaining(),
            record.price(),
            record.sequence()
        );
        self.orders.insert(key, record);
        key
    }

    /// The best-priority entry, if any.
    pub fn head(&self) -> Option<Entry<'_, PriorityKey, Arc<OrderRecord>>> {
        self.orders.front()
    }

    /// Unlinks `head` if its remaining quantity reached zero and returns the released
    /// record.
    ///
    /// Returns `None` when the record still has quantity, or when another remover
    /// already unlinked it.
    pub fn pop_if_head_exhausted(
        &self,
        head: &Entry<'_, PriorityKey, Arc<OrderRecord>>,
    ) -> Option<Arc<OrderRecord>> {
        let record = head.value();
        if !record.is_exhausted() {
            return None;
        }

        if head.remove() {
            trace!("{:?} list: order {} exhausted", self.side, record.id());
            Some(Arc::clone(record))
        } else {
            None
        }
    }

    /// Unlinks the record stored under `key`, wherever it sits in the list.
    pub fn remove(&self, key: &PriorityKey) -> Option<Arc<OrderRecord>> {
        self.orders.remove(key).map(|entry| Arc::clone(entry.value()))
    }

    /// Looks up the record stored under `key`.
    pub fn get(&self, key: &PriorityKey) -> Option<Arc<OrderRecord>> {
        self.orders.get(key).map(|entry| Arc::clone(entry.value()))
    }

    /// Price of the best-priority record.
    pub fn best_price(&self) -> Option<u64> {
        self.orders.front().map(|entry| entry.value().price())
    }

    /// Number of resting records.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// True when nothing rests on this side.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Sum of the remaining quantities of every resting record.
    pub fn total_quantity(&self) -> u128 {
        self.orders
            .iter()
            .map(|entry| u128::from(entry.value().remaining()))
            .sum()
    }

    /// Up to `depth` records in priority order.
    pub fn orders(&self, depth: usize) -> Vec<Arc<OrderRecord>> {
        self.orders
            .iter()
            .take(depth)
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    /// Up to `depth` price levels in priority order, with their aggregated quantity.
    pub fn levels(&self, depth: usize) -> Vec<LevelSummary> {
        let mut levels: Vec<LevelSummary> = Vec::new();

        for entry in self.orders.iter() {
            let record = entry.value();
            if let Some(level) = levels.last_mut() {
                if level.price == record.price() {
                    level.quantity += u128::from(record.remaining());
                    level.order_count += 1;
                    continue;
                }
            }

            if levels.len() == depth {
                break;
            }
            levels.push(LevelSummary {
                price: record.price(),
                quantity: u128::from(record.remaining()),
                order_count: 1,
            });
        }

        levels
    }
}

impl std::fmt::Debug for PriceLevelList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriceLevelList")
            .field("side", &self.side)
            .field("orders", &self.orders.len())
            .finish()
    }
}

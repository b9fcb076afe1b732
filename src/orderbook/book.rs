//! Core OrderBook implementation pairing a buy list and a sell list for one instrument

use super::error::OrderBookError;
use super::level_list::{LevelSummary, PriceLevelList};
use super::order::{OrderRecord, PriorityKey};
use super::snapshot::{OrderBookSnapshot, OrderBookSnapshotPackage, RestingOrder};
use super::trade::{TradeEvent, TradeListener, TradePricePolicy};
use crate::utils::current_time_millis;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use pricelevel::{OrderId, Side, UuidGenerator};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace};
use uuid::Uuid;

/// The OrderBook holds the buy and sell lists of one instrument and crosses them.
///
/// Insertion into either list is lock-free. The matching pass and cancellations take
/// the book's own matching lock, which is never shared with any other book.
pub struct OrderBook {
    /// Index of the instrument traded in this book
    pub(super) instrument: usize,

    /// Buy orders, best (highest) price first
    pub(super) buy: PriceLevelList,

    /// Sell orders, best (lowest) price first
    pub(super) sell: PriceLevelList,

    /// Live order id to (side, key) so a record can be found without walking a list
    pub(super) order_locations: DashMap<OrderId, (Side, PriorityKey)>,

    /// Arrival tickets shared by both sides
    pub(super) next_sequence: AtomicU64,

    /// Serializes matching passes and removals for this instrument
    pub(super) matching: Mutex<()>,

    /// Generator for unique trade ids
    pub(super) transaction_id_generator: UuidGenerator,

    /// How crossing pairs are priced
    pub(super) price_policy: TradePricePolicy,

    /// The last price at which a trade occurred
    pub(super) last_trade_price: AtomicU64,

    /// Flag indicating if there was a trade
    pub(super) has_traded: AtomicBool,

    /// Number of trades executed so far
    pub(super) trade_count: AtomicU64,

    /// Sum of the quantities of every trade so far
    pub(super) traded_volume: AtomicU64,

    /// listens to trades produced by the matching pass
    pub trade_listener: Option<TradeListener>,
}

impl OrderBook {
    /// Create a new order book for `instrument` with the default price policy
    pub fn new(instrument: usize) -> Self {
        Self::with_policy(instrument, TradePricePolicy::default(), None)
    }

    /// Create a new order book for `instrument` with a trade listener
    pub fn with_trade_listener(instrument: usize, trade_listener: TradeListener) -> Self {
        Self::with_policy(instrument, TradePricePolicy::default(), Some(trade_listener))
    }

    /// Create a new order book with an explicit price policy and optional listener
    pub fn with_policy(
        instrument: usize,
        price_policy: TradePricePolicy,
        trade_listener: Option<TradeListener>,
    ) -> Self {
        // Create a unique namespace for this order book's trade ids
        let namespace = Uuid::new_v4();

        Self {
            instrument,
            buy: PriceLevelList::new(Side::Buy),
            sell: PriceLevelList::new(Side::Sell),
            order_locations: DashMap::new(),
            next_sequence: AtomicU64::new(0),
            matching: Mutex::new(()),
            transaction_id_generator: UuidGenerator::new(namespace),
            price_policy,
            last_trade_price: AtomicU64::new(0),
            has_traded: AtomicBool::new(false),
            trade_count: AtomicU64::new(0),
            traded_volume: AtomicU64::new(0),
            trade_listener,
        }
    }

    /// Get the instrument index of this order book
    pub fn instrument(&self) -> usize {
        self.instrument
    }

    /// Get the price policy used for crossing pairs
    pub fn price_policy(&self) -> TradePricePolicy {
        self.price_policy
    }

    /// The list holding orders of `side`
    pub fn side(&self, side: Side) -> &PriceLevelList {
        match side {
            Side::Buy => &self.buy,
            Side::Sell => &self.sell,
        }
    }

    /// Insert a new order and run a matching pass.
    ///
    /// Returns a handle on the submitted record; its remaining quantity shows how much
    /// of it traded. The order is rejected without touching the book when `quantity`
    /// is zero or when `id` is already resting here.
    pub fn submit(
        &self,
        side: Side,
        quantity: u64,
        price: u64,
        id: OrderId,
    ) -> Result<Arc<OrderRecord>, OrderBookError> {
        let record = self.add_order(side, quantity, price, id)?;
        self.match_orders();
        Ok(record)
    }

    /// Validate and publish an order without matching it.
    pub(super) fn add_order(
        &self,
        side: Side,
        quantity: u64,
        price: u64,
        id: OrderId,
    ) -> Result<Arc<OrderRecord>, OrderBookError> {
        if quantity == 0 {
            return Err(OrderBookError::InvalidOrder {
                message: format!("order {id}: quantity must be greater than zero"),
            });
        }

        match self.order_locations.entry(id) {
            Entry::Occupied(_) => Err(OrderBookError::DuplicateOrderId { order_id: id }),
            Entry::Vacant(slot) => {
                let sequence = self.next_sequence.fetch_add(1, Ordering::Relaxed);
                let record = Arc::new(OrderRecord::new(
                    id,
                    side,
                    self.instrument,
                    price,
                    quantity,
                    sequence,
                ));

                // The slot stays locked until the location is stored, so a pass that
                // fills this record right away removes a location that already exists.
                let key = self.side(side).insert(Arc::clone(&record));
                slot.insert((side, key));

                trace!(
                    "Order book {}: added {:?} order {} {}@{} (seq {})",
                    self.instrument, side, id, quantity, price, sequence
                );
                Ok(record)
            }
        }
    }

    /// Cancel a resting order and return it with the quantity it still had open.
    pub fn cancel(&self, id: OrderId) -> Result<Arc<OrderRecord>, OrderBookError> {
        let _guard = self.lock_matching();

        let (_, (side, key)) = self
            .order_locations
            .remove(&id)
            .ok_or(OrderBookError::OrderNotFound { order_id: id })?;

        let record = self
            .side(side)
            .remove(&key)
            .ok_or(OrderBookError::OrderNotFound { order_id: id })?;

        debug!(
            "Order book {}: cancelled {:?} order {} with {} open",
            self.instrument,
            side,
            id,
            record.remaining()
        );
        Ok(record)
    }

    /// Get a resting order by its ID
    pub fn get_order(&self, id: OrderId) -> Option<Arc<OrderRecord>> {
        let (side, key) = *self.order_locations.get(&id)?;
        self.side(side).get(&key)
    }

    /// Get the best bid price, if any
    pub fn best_bid(&self) -> Option<u64> {
        self.buy.best_price()
    }

    /// Get the best ask price, if any
    pub fn best_ask(&self) -> Option<u64> {
        self.sell.best_price()
    }

    /// Get the mid price (average of best bid and best ask)
    pub fn mid_price(&self) -> Option<f64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some((bid as f64 + ask as f64) / 2.0),
            _ => None,
        }
    }

    /// Get the spread (best ask - best bid)
    pub fn spread(&self) -> Option<u64> {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => Some(ask.saturating_sub(bid)),
            _ => None,
        }
    }

    /// Get the last trade price, if any
    pub fn last_trade_price(&self) -> Option<u64> {
        if self.has_traded.load(Ordering::Acquire) {
            Some(self.last_trade_price.load(Ordering::Relaxed))
        } else {
            None
        }
    }

    /// Number of trades executed in this book
    pub fn trade_count(&self) -> u64 {
        self.trade_count.load(Ordering::Relaxed)
    }

    /// Total quantity traded in this book, saturating at `u64::MAX`
    pub fn traded_volume(&self) -> u64 {
        self.traded_volume.load(Ordering::Relaxed)
    }

    /// Number of orders resting on both sides
    pub fn resting_order_count(&self) -> usize {
        self.buy.len() + self.sell.len()
    }

    /// Up to `depth` buy orders, best first
    pub fn buy_orders(&self, depth: usize) -> Vec<Arc<OrderRecord>> {
        self.buy.orders(depth)
    }

    /// Up to `depth` sell orders, best first
    pub fn sell_orders(&self, depth: usize) -> Vec<Arc<OrderRecord>> {
        self.sell.orders(depth)
    }

    /// Up to `depth` aggregated buy levels, best first
    pub fn buy_levels(&self, depth: usize) -> Vec<LevelSummary> {
        self.buy.levels(depth)
    }

    /// Up to `depth` aggregated sell levels, best first
    pub fn sell_levels(&self, depth: usize) -> Vec<LevelSummary> {
        self.sell.levels(depth)
    }

    /// Create a snapshot of up to `depth` resting orders per side.
    ///
    /// The two sides are read without the matching lock, so the snapshot is only a
    /// consistent picture when no writer is active.
    pub fn create_snapshot(&self, depth: usize) -> OrderBookSnapshot {
        OrderBookSnapshot {
            instrument: self.instrument,
            timestamp: current_time_millis(),
            buys: self
                .buy
                .orders(depth)
                .iter()
                .map(|record| RestingOrder::from(record.as_ref()))
                .collect(),
            sells: self
                .sell
                .orders(depth)
                .iter()
                .map(|record| RestingOrder::from(record.as_ref()))
                .collect(),
        }
    }

    /// Create a checksum-protected snapshot package of the book.
    pub fn create_snapshot_package(
        &self,
        depth: usize,
    ) -> Result<OrderBookSnapshotPackage, OrderBookError> {
        OrderBookSnapshotPackage::new(self.create_snapshot(depth))
    }

    /// Serialize a checksum-protected snapshot package to JSON.
    pub fn snapshot_to_json(&self, depth: usize) -> Result<String, OrderBookError> {
        self.create_snapshot_package(depth)?.to_json()
    }

    /// Acquire the matching lock. A poisoned lock guards no data, so it is reused.
    pub(super) fn lock_matching(&self) -> MutexGuard<'_, ()> {
        self.matching.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record trade statistics and hand the event to the listener
    pub(super) fn publish_trade(&self, event: &TradeEvent) {
        self.last_trade_price.store(event.price, Ordering::Relaxed);
        self.has_traded.store(true, Ordering::Release);
        self.trade_count.fetch_add(1, Ordering::Relaxed);
        // Only the matching pass writes here, so the update never retries.
        let _ = self
            .traded_volume
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |volume| {
                Some(volume.saturating_add(event.quantity))
            });

        if let Some(ref listener) = self.trade_listener {
            listener(event);
        }
    }

    /// Next unique trade id
    pub(super) fn next_trade_id(&self) -> Uuid {
        self.transaction_id_generator.next()
    }
}

impl std::fmt::Debug for OrderBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderBook")
            .field("instrument", &self.instrument)
            .field("buy", &self.buy)
            .field("sell", &self.sell)
            .field("price_policy", &self.price_policy)
            .field("trade_count", &self.trade_count())
            .finish()
    }
}

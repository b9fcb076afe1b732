//! Top-level entry point: a fixed table of order books indexed by instrument.
//!
//! The table is built once and never resized, so resolving an instrument is a plain
//! slice index and books of different instruments share nothing mutable.

use super::book::OrderBook;
use super::error::OrderBookError;
use super::order::OrderRecord;
use super::snapshot::OrderBookSnapshot;
use super::trade::{TradeListener, TradePricePolicy};
use pricelevel::{OrderId, Side};
use std::sync::Arc;
use tracing::{debug, info};

/// Default number of instruments in a registry.
pub const MAX_INSTRUMENTS: usize = 1024;

/// Construction parameters for an [`ExchangeRegistry`].
#[derive(Clone)]
pub struct RegistryConfig {
    /// Number of instruments; valid ids are `0..instruments`.
    pub instruments: usize,
    /// Price policy applied by every book.
    pub price_policy: TradePricePolicy,
    /// Listener shared by every book.
    pub trade_listener: Option<TradeListener>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            instruments: MAX_INSTRUMENTS,
            price_policy: TradePricePolicy::default(),
            trade_listener: None,
        }
    }
}

impl RegistryConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of instruments.
    #[must_use]
    pub fn with_instruments(mut self, instruments: usize) -> Self {
        self.instruments = instruments;
        self
    }

    /// Sets the trade price policy.
    #[must_use]
    pub fn with_price_policy(mut self, price_policy: TradePricePolicy) -> Self {
        self.price_policy = price_policy;
        self
    }

    /// Sets the trade listener shared by every book.
    #[must_use]
    pub fn with_trade_listener(mut self, trade_listener: TradeListener) -> Self {
        self.trade_listener = Some(trade_listener);
        self
    }
}

impl std::fmt::Debug for RegistryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryConfig")
            .field("instruments", &self.instruments)
            .field("price_policy", &self.price_policy)
            .field("trade_listener", &self.trade_listener.is_some())
            .finish()
    }
}

/// Maps instrument ids to their order books and accepts order submissions.
///
/// Share it between threads with an `Arc` or a scoped borrow; every operation takes
/// `&self`.
#[derive(Debug)]
pub struct ExchangeRegistry {
    books: Box<[OrderBook]>,
}

impl ExchangeRegistry {
    /// Creates a registry of [`MAX_INSTRUMENTS`] books with default settings.
    pub fn new() -> Self {
        let config = RegistryConfig::default();
        Self::build(&config)
    }

    /// Creates a registry from `config`.
    ///
    /// Fails with [`OrderBookError::InvalidOperation`] when no instrument is requested.
    pub fn with_config(config: RegistryConfig) -> Result<Self, OrderBookError> {
        if config.instruments == 0 {
            return Err(OrderBookError::InvalidOperation {
                message: "a registry needs at least one instrument".to_string(),
            });
        }
        Ok(Self::build(&config))
    }

    fn build(config: &RegistryConfig) -> Self {
        let books: Box<[OrderBook]> = (0..config.instruments)
            .map(|instrument| {
                OrderBook::with_policy(
                    instrument,
                    config.price_policy,
                    config.trade_listener.clone(),
                )
            })
            .collect();

        info!(
            "Exchange registry ready: {} instruments, {:?} pricing",
            books.len(),
            config.price_policy
        );
        Self { books }
    }

    /// Submits an order and runs the matching pass of its instrument.
    ///
    /// Fails with [`OrderBookError::InvalidOrder`] when `instrument` is out of range or
    /// `quantity` is zero, and with [`OrderBookError::DuplicateOrderId`] when `id`
    /// already rests in that instrument's book. Nothing is mutated on failure.
    pub fn submit(
        &self,
        side: Side,
        instrument: usize,
        quantity: u64,
        price: u64,
        id: OrderId,
    ) -> Result<Arc<OrderRecord>, OrderBookError> {
        let book = self.resolve(instrument, id)?;
        let result = book.submit(side, quantity, price, id);
        if let Err(ref error) = result {
            debug!("Rejected order {} on instrument {}: {}", id, instrument, error);
        }
        result
    }

    /// Cancels a resting order of `instrument`.
    pub fn cancel(
        &self,
        instrument: usize,
        id: OrderId,
    ) -> Result<Arc<OrderRecord>, OrderBookError> {
        self.resolve(instrument, id)?.cancel(id)
    }

    /// The book of `instrument`, if the id is in range.
    pub fn book(&self, instrument: usize) -> Option<&OrderBook> {
        self.books.get(instrument)
    }

    /// Iterates over every book in instrument order.
    pub fn books(&self) -> impl Iterator<Item = &OrderBook> {
        self.books.iter()
    }

    /// Number of instruments.
    pub fn instruments(&self) -> usize {
        self.books.len()
    }

    /// Snapshot of up to `depth` resting orders per side of `instrument`.
    pub fn snapshot(&self, instrument: usize, depth: usize) -> Option<OrderBookSnapshot> {
        self.book(instrument).map(|book| book.create_snapshot(depth))
    }

    /// Number of orders resting across every book.
    pub fn total_resting_orders(&self) -> usize {
        self.books.iter().map(OrderBook::resting_order_count).sum()
    }

    fn resolve(&self, instrument: usize, id: OrderId) -> Result<&OrderBook, OrderBookError> {
        self.books
            .get(instrument)
            .ok_or_else(|| OrderBookError::InvalidOrder {
                message: format!(
                    "order {id}: instrument {instrument} is outside 0..{}",
                    self.books.len()
                ),
            })
    }
}

impl Default for ExchangeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

//! Order book snapshot for market data

use super::error::OrderBookError;
use super::order::OrderRecord;
use pricelevel::{OrderId, Side};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::trace;

/// A resting order as captured in a snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestingOrder {
    /// Order id
    pub id: OrderId,
    /// Buy or sell
    pub side: Side,
    /// Limit price
    pub price: u64,
    /// Quantity still open when the snapshot was taken
    pub quantity: u64,
    /// Quantity at submission
    pub original_quantity: u64,
    /// Arrival ticket within the book
    pub sequence: u64,
    /// Submission time (milliseconds since epoch)
    pub timestamp: u64,
}

impl From<&OrderRecord> for RestingOrder {
    fn from(record: &OrderRecord) -> Self {
        Self {
            id: record.id(),
            side: record.side(),
            price: record.price(),
            quantity: record.remaining(),
            original_quantity: record.original_quantity(),
            sequence: record.sequence(),
            timestamp: record.timestamp(),
        }
    }
}

/// A snapshot of the order book state at a specific point in time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBookSnapshot {
    /// The instrument of the book
    pub instrument: usize,

    /// Timestamp when the snapshot was created (milliseconds since epoch)
    pub timestamp: u64,

    /// Resting buy orders, best first
    pub buys: Vec<RestingOrder>,

    /// Resting sell orders, best first
    pub sells: Vec<RestingOrder>,
}

impl OrderBookSnapshot {
    /// Get the best bid price and the quantity of the first order there
    pub fn best_bid(&self) -> Option<(u64, u64)> {
        let bid = self.buys.first().map(|order| (order.price, order.quantity));
        trace!("best_bid: {:?}", bid);
        bid
    }

    /// Get the best ask price and the quantity of the first order there
    pub fn best_ask(&self) -> Option<(u64, u64)> {
        let ask = self.sells.first().map(|order| (order.price, order.quantity));
        trace!("best_ask: {:?}", ask);
        ask
    }

    /// Get the spread (best ask - best bid)
    pub fn spread(&self) -> Option<u64> {
        match (self.best_bid(), self.best_ask()) {
            (Some((bid_price, _)), Some((ask_price, _))) => {
                Some(ask_price.saturating_sub(bid_price))
            }
            _ => None,
        }
    }

    /// True when the best bid reaches the best ask
    pub fn is_crossed(&self) -> bool {
        matches!(
            (self.best_bid(), self.best_ask()),
            (Some((bid, _)), Some((ask, _))) if bid >= ask
        )
    }

    /// Calculate the total open quantity on the buy side
    pub fn total_bid_volume(&self) -> u128 {
        Self::volume(&self.buys)
    }

    /// Calculate the total open quantity on the sell side
    pub fn total_ask_volume(&self) -> u128 {
        Self::volume(&self.sells)
    }

    /// Calculate the total value on the buy side (price * quantity).
    ///
    /// `None` when the sum does not fit in a `u128`.
    pub fn total_bid_value(&self) -> Option<u128> {
        Self::value(&self.buys)
    }

    /// Calculate the total value on the sell side (price * quantity).
    ///
    /// `None` when the sum does not fit in a `u128`.
    pub fn total_ask_value(&self) -> Option<u128> {
        Self::value(&self.sells)
    }

    fn volume(orders: &[RestingOrder]) -> u128 {
        orders.iter().map(|order| u128::from(order.quantity)).sum()
    }

    fn value(orders: &[RestingOrder]) -> Option<u128> {
        // A single u64 * u64 product always fits, only the running sum can overflow.
        orders.iter().try_fold(0u128, |total, order| {
            total.checked_add(u128::from(order.price) * u128::from(order.quantity))
        })
    }
}

/// Format version used for checksum-enabled order book snapshots.
pub const ORDERBOOK_SNAPSHOT_FORMAT_VERSION: u32 = 1;

/// Wrapper that provides checksum validation for `OrderBookSnapshot` instances.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBookSnapshotPackage {
    /// Version of the snapshot schema for forward compatibility.
    pub version: u32,
    /// Snapshot payload.
    pub snapshot: OrderBookSnapshot,
    /// Hex-encoded checksum of the serialized snapshot.
    pub checksum: String,
}

impl OrderBookSnapshotPackage {
    /// Creates a new snapshot package computing the checksum of the snapshot contents.
    pub fn new(snapshot: OrderBookSnapshot) -> Result<Self, OrderBookError> {
        let checksum = Self::compute_checksum(&snapshot)?;

        Ok(Self {
            version: ORDERBOOK_SNAPSHOT_FORMAT_VERSION,
            snapshot,
            checksum,
        })
    }

    /// Serializes the package to JSON.
    pub fn to_json(&self) -> Result<String, OrderBookError> {
        serde_json::to_string(self).map_err(|error| OrderBookError::SerializationError {
            message: error.to_string(),
        })
    }

    /// Deserializes the package from JSON.
    pub fn from_json(data: &str) -> Result<Self, OrderBookError> {
        serde_json::from_str(data).map_err(|error| OrderBookError::DeserializationError {
            message: error.to_string(),
        })
    }

    /// Validates the checksum and version.
    pub fn validate(&self) -> Result<(), OrderBookError> {
        if self.version != ORDERBOOK_SNAPSHOT_FORMAT_VERSION {
            return Err(OrderBookError::InvalidOperation {
                message: format!(
                    "Unsupported snapshot version: {} (expected {})",
                    self.version, ORDERBOOK_SNAPSHOT_FORMAT_VERSION
                ),
            });
        }

        let computed = Self::compute_checksum(&self.snapshot)?;
        if computed != self.checksum {
            return Err(OrderBookError::ChecksumMismatch {
                expected: self.checksum.clone(),
                actual: computed,
            });
        }

        Ok(())
    }

    /// Consumes the package and returns the validated snapshot.
    pub fn into_snapshot(self) -> Result<OrderBookSnapshot, OrderBookError> {
        self.validate()?;
        Ok(self.snapshot)
    }

    fn compute_checksum(snapshot: &OrderBookSnapshot) -> Result<String, OrderBookError> {
        let payload =
            serde_json::to_vec(snapshot).map_err(|error| OrderBookError::SerializationError {
                message: error.to_string(),
            })?;

        let mut hasher = Sha256::new();
        hasher.update(payload);

        let checksum_bytes = hasher.finalize();
        Ok(format!("{:x}", checksum_bytes))
    }
}

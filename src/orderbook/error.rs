//! Error types for order submission, cancellation and snapshots.

use pricelevel::OrderId;
use std::fmt;

/// Errors returned by the order book and the exchange registry.
///
/// Lost compare-and-swap races are retried internally and never show up here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderBookError {
    /// The order was rejected before touching any book.
    InvalidOrder {
        /// Why the order was rejected.
        message: String,
    },

    /// An order with the same id is already resting in the book.
    DuplicateOrderId {
        /// The id that is already in use.
        order_id: OrderId,
    },

    /// No resting order with this id exists in the book.
    OrderNotFound {
        /// The id that was looked up.
        order_id: OrderId,
    },

    /// The requested operation is not valid in the current state.
    InvalidOperation {
        /// Description of the problem.
        message: String,
    },

    /// A snapshot could not be encoded.
    SerializationError {
        /// Underlying serializer message.
        message: String,
    },

    /// A snapshot could not be decoded.
    DeserializationError {
        /// Underlying deserializer message.
        message: String,
    },

    /// The snapshot checksum does not match its contents.
    ChecksumMismatch {
        /// Checksum carried by the package.
        expected: String,
        /// Checksum computed from the payload.
        actual: String,
    },
}

impl fmt::Display for OrderBookError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderBookError::InvalidOrder { message } => {
                write!(f, "invalid order: {message}")
            }
            OrderBookError::DuplicateOrderId { order_id } => {
                write!(f, "order {order_id} is already resting in the book")
            }
            OrderBookError::OrderNotFound { order_id } => {
                write!(f, "order {order_id} not found")
            }
            OrderBookError::InvalidOperation { message } => {
                write!(f, "invalid operation: {message}")
            }
            OrderBookError::SerializationError { message } => {
                write!(f, "serialization error: {message}")
            }
            OrderBookError::DeserializationError { message } => {
                write!(f, "deserialization error: {message}")
            }
            OrderBookError::ChecksumMismatch { expected, actual } => {
                write!(f, "checksum mismatch: expected {expected}, computed {actual}")
            }
        }
    }
}

impl std::error::Error for OrderBookError {}

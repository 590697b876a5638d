//! Order book types.

use rust_decimal::Decimal;

/// Event timestamp (non-negative, caller-defined unit).
pub type Timestamp = u64;

/// Order identifier, unique while the order is resting.
pub type OrderId = i64;

/// Order price.
///
/// Exact decimal: magnitudes up to about ±7.9e28 with at most 28 decimal
/// places. Log prices outside that range are rejected at parse time.
pub type Price = Decimal;

/// A resting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    /// Order identifier.
    pub id: OrderId,
    /// Limit price.
    pub price: Price,
}

impl Order {
    /// Create a new order.
    pub fn new(id: OrderId, price: Price) -> Self {
        Self { id, price }
    }
}

/// Result of inserting into the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The order is now resting.
    Inserted,
    /// An order with the same id was already resting; the book is unchanged.
    Duplicate {
        /// Price of the order that kept its place.
        resting_price: Price,
    },
}

impl InsertOutcome {
    /// Whether the insert changed the book.
    pub fn is_inserted(&self) -> bool {
        matches!(self, InsertOutcome::Inserted)
    }
}

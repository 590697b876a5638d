//! Resting order book with keyed and price-ordered views.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use super::types::{InsertOutcome, Order, OrderId, Price};

/// Set of resting orders, indexed by id and by price.
///
/// - `orders`: id -> order, amortized O(1) insert/erase.
/// - `by_price`: `(price, id)` pairs in ascending order; the last entry is the
///   highest price. Ids are unique, so each order has exactly one entry.
///
/// Both views are updated inside `insert`/`erase` and always hold the same
/// orders.
#[derive(Debug, Clone, Default)]
pub struct DualIndexBook {
    orders: HashMap<OrderId, Order>,
    by_price: BTreeSet<(Price, OrderId)>,
}

impl DualIndexBook {
    /// Create an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty book with room for `capacity` orders in the id index.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            orders: HashMap::with_capacity(capacity),
            by_price: BTreeSet::new(),
        }
    }

    /// Add an order.
    ///
    /// Inserting an id that is already resting is a no-op: the original
    /// order keeps its price and `InsertOutcome::Duplicate` is returned.
    pub fn insert(&mut self, id: OrderId, price: Price) -> InsertOutcome {
        if let Some(existing) = self.orders.get(&id) {
            debug!(order_id = id, resting_price = %existing.price, "duplicate insert ignored");
            return InsertOutcome::Duplicate {
                resting_price: existing.price,
            };
        }

        self.orders.insert(id, Order::new(id, price));
        self.by_price.insert((price, id));
        InsertOutcome::Inserted
    }

    /// Remove the order with the given id, returning it if it was resting.
    pub fn erase(&mut self, id: OrderId) -> Option<Order> {
        let order = self.orders.remove(&id)?;
        self.by_price.remove(&(order.price, id));
        Some(order)
    }

    /// Highest resting price, or `None` if the book is empty.
    pub fn max_price(&self) -> Option<Price> {
        self.by_price.last().map(|&(price, _)| price)
    }

    /// One of the orders resting at the highest price.
    pub fn best_order(&self) -> Option<&Order> {
        self.by_price
            .last()
            .and_then(|(_, id)| self.orders.get(id))
    }

    /// Look up a resting order.
    pub fn get(&self, id: OrderId) -> Option<&Order> {
        self.orders.get(&id)
    }

    /// Check whether an order is resting.
    pub fn contains(&self, id: OrderId) -> bool {
        self.orders.contains_key(&id)
    }

    /// Number of resting orders.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Check if no orders are resting.
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Resting orders by descending price.
    pub fn orders(&self) -> impl Iterator<Item = &Order> + '_ {
        self.by_price
            .iter()
            .rev()
            .filter_map(|(_, id)| self.orders.get(id))
    }
}

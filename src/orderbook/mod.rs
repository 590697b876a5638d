//! Order book module.
//!
//! This module handles:
//! - Order types (ids, prices, timestamps)
//! - The dual-index resting order book (by id and by price)

pub mod book;
pub mod types;

pub use book::DualIndexBook;
pub use types::{InsertOutcome, Order, OrderId, Price, Timestamp};

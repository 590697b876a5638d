//! Time-weighted statistics over the order book.

pub mod accumulator;

pub use accumulator::{TimeWeightedAccumulator, TimestampPolicy};

//! Time-weighted average of the highest resting price in an order book.
//!
//! Replays a time-ordered log of order inserts and erases against a
//! single-instrument book and integrates the book's maximum price over time.
//! Each interval between consecutive events is weighted by the max price that
//! prevailed during it, and only intervals where the book was non-empty count:
//!
//! ```text
//! t=0   insert #1 @ 10
//! t=5   insert #2 @ 20    [0,5)   max 10  ->  50
//! t=10  erase  #1         [5,10)  max 20  -> 100
//! t=15  erase  #2         [10,15) max 20  -> 100
//! ─────────────────────────────────────────────
//! average = 250 / 15 ≈ 16.667
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`orderbook`]: Dual-index resting order book
//! - [`stats`]: Time-weighted accumulator
//! - [`replay`]: Event types, log parsing and replay sessions
//! - [`metrics`]: Replay counters and timings

pub mod config;
pub mod error;
pub mod metrics;
pub mod orderbook;
pub mod replay;
pub mod stats;

pub use config::Config;
pub use error::{AppError, Result};
pub use orderbook::DualIndexBook;
pub use replay::{replay, replay_reader, Event, EventReplayer, ReplayOptions, ReplayReport};
pub use stats::{TimeWeightedAccumulator, TimestampPolicy};

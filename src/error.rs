//! Unified error types for the replay tool.

use thiserror::Error;

use crate::orderbook::Timestamp;

/// Unified error type for the replay tool.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Replay error.
    #[error("replay error: {0}")]
    Replay(#[from] ReplayError),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors parsing a single event log line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A required field is absent.
    #[error("missing {field}")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// Timestamp is not a non-negative integer.
    #[error("invalid timestamp {0:?}")]
    InvalidTimestamp(String),

    /// Operation is neither `I` nor `E`.
    #[error("invalid operation {0:?}, expected I or E")]
    InvalidOperation(String),

    /// Order id is not an integer.
    #[error("invalid order id {0:?}")]
    InvalidOrderId(String),

    /// Price is not a decimal number.
    #[error("invalid price {0:?}")]
    InvalidPrice(String),

    /// Price is a number but has no exact `Decimal` representation.
    #[error("price {0} is outside the supported range (±7.9e28, at most 28 decimal places)")]
    PriceOutOfRange(String),

    /// Line has more fields than its operation takes.
    #[error("unexpected trailing field {0:?}")]
    TrailingField(String),
}

impl ParseError {
    /// Whether the line is broken, as opposed to well-formed but carrying a
    /// value the book cannot hold exactly.
    pub fn is_malformed(&self) -> bool {
        !matches!(self, ParseError::PriceOutOfRange(_))
    }
}

/// Time-weighted accumulator errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StatsError {
    /// Timestamp moved backwards under the reject policy.
    #[error("timestamp {new} is earlier than last seen {last}")]
    OutOfOrder {
        /// Last accepted timestamp.
        last: Timestamp,
        /// Offending timestamp.
        new: Timestamp,
    },

    /// Duration or weighted sum no longer fits.
    #[error("accumulator overflow at timestamp {timestamp}")]
    Overflow {
        /// Timestamp of the event that overflowed.
        timestamp: Timestamp,
    },
}

/// Event replay errors.
#[derive(Error, Debug)]
pub enum ReplayError {
    /// Malformed line under the abort policy.
    #[error("line {line}: {source}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// What was wrong with it.
        source: ParseError,
    },

    /// Well-formed line whose price cannot be represented; never skipped.
    #[error("line {line}: {source}")]
    Unrepresentable {
        /// 1-based line number.
        line: usize,
        /// What could not be represented.
        source: ParseError,
    },

    /// Accumulator rejected an event.
    #[error(transparent)]
    Stats(#[from] StatsError),

    /// Reading the event log failed.
    #[error("failed to read event log: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;

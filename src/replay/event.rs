//! Order events and the line-oriented event log format.
//!
//! Each line is `<timestamp> <I|E> <orderId> [<price>]`, whitespace
//! separated; the price is present on insert lines only.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;

use crate::error::ParseError;
use crate::orderbook::{OrderId, Price, Timestamp};

/// Insert operation code.
pub const INSERT_OP: &str = "I";
/// Erase operation code.
pub const ERASE_OP: &str = "E";

/// A timestamped book mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Add a resting order.
    Insert {
        /// Event time.
        timestamp: Timestamp,
        /// Order id.
        order_id: OrderId,
        /// Order price.
        price: Price,
    },
    /// Remove a resting order.
    Erase {
        /// Event time.
        timestamp: Timestamp,
        /// Order id.
        order_id: OrderId,
    },
}

impl Event {
    /// Create an insert event.
    pub fn insert(timestamp: Timestamp, order_id: OrderId, price: Price) -> Self {
        Event::Insert {
            timestamp,
            order_id,
            price,
        }
    }

    /// Create an erase event.
    pub fn erase(timestamp: Timestamp, order_id: OrderId) -> Self {
        Event::Erase {
            timestamp,
            order_id,
        }
    }

    /// Event time.
    pub fn timestamp(&self) -> Timestamp {
        match self {
            Event::Insert { timestamp, .. } | Event::Erase { timestamp, .. } => *timestamp,
        }
    }

    /// Order id the event refers to.
    pub fn order_id(&self) -> OrderId {
        match self {
            Event::Insert { order_id, .. } | Event::Erase { order_id, .. } => *order_id,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Insert {
                timestamp,
                order_id,
                price,
            } => write!(f, "{timestamp} {INSERT_OP} {order_id} {price}"),
            Event::Erase {
                timestamp,
                order_id,
            } => write!(f, "{timestamp} {ERASE_OP} {order_id}"),
        }
    }
}

/// Most significant digits a `Decimal` mantissa holds without rounding.
const MAX_PRICE_DIGITS: usize = 28;

fn significant_digits(mantissa: &str) -> usize {
    mantissa
        .chars()
        .filter(char::is_ascii_digit)
        .skip_while(|c| *c == '0')
        .count()
}

/// Accepts plain decimals as well as scientific notation (`1.5e2`).
///
/// Prices are kept exactly, so a number that only fits a float (beyond
/// ±7.9e28, or finer than 1e-28) is `PriceOutOfRange` rather than rounded.
fn parse_price(raw: &str) -> Result<Price, ParseError> {
    let parsed = match raw.find(|c: char| c == 'e' || c == 'E') {
        Some(exp_at) if significant_digits(&raw[..exp_at]) <= MAX_PRICE_DIGITS => {
            Decimal::from_scientific(raw).ok()
        }
        Some(_) => None,
        None => Decimal::from_str_exact(raw).ok(),
    };

    parsed.ok_or_else(|| match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => ParseError::PriceOutOfRange(raw.to_string()),
        _ => ParseError::InvalidPrice(raw.to_string()),
    })
}

impl FromStr for Event {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut fields = line.split_whitespace();
        let mut next = |field: &'static str| fields.next().ok_or(ParseError::MissingField { field });

        let raw = next("timestamp")?;
        let timestamp: Timestamp = raw
            .parse()
            .map_err(|_| ParseError::InvalidTimestamp(raw.to_string()))?;

        let op = next("operation")?;
        if op != INSERT_OP && op != ERASE_OP {
            return Err(ParseError::InvalidOperation(op.to_string()));
        }

        let raw = next("order id")?;
        let order_id: OrderId = raw
            .parse()
            .map_err(|_| ParseError::InvalidOrderId(raw.to_string()))?;

        let event = if op == INSERT_OP {
            let price = parse_price(next("price")?)?;
            Event::insert(timestamp, order_id, price)
        } else {
            Event::erase(timestamp, order_id)
        };

        match fields.next() {
            Some(extra) => Err(ParseError::TrailingField(extra.to_string())),
            None => Ok(event),
        }
    }
}

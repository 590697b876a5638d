//! Time-weighted average of the book's highest price.

use rust_decimal::Decimal;
use strum::{Display, EnumString};
use tracing::warn;

use crate::error::StatsError;
use crate::orderbook::{Price, Timestamp};

/// What to do when a timestamp is earlier than the last one seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Default)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum TimestampPolicy {
    /// Treat the elapsed time as zero and keep going.
    #[default]
    Clamp,
    /// Fail the event.
    Reject,
}

/// Integrates the highest resting price over event time.
///
/// Only intervals during which the book was non-empty at the start count
/// towards the average.
#[derive(Debug, Clone, Default)]
pub struct TimeWeightedAccumulator {
    policy: TimestampPolicy,
    first_timestamp: Option<Timestamp>,
    last_timestamp: Option<Timestamp>,
    total_nonempty_duration: u64,
    weighted_price_sum: Price,
    clamped: u64,
}

impl TimeWeightedAccumulator {
    /// Create an accumulator with the default (clamp) policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an accumulator with the given out-of-order policy.
    pub fn with_policy(policy: TimestampPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Move the clock to `timestamp`.
    ///
    /// `max_price` must be the book's highest price *before* the event at
    /// `timestamp` is applied (`None` if the book was empty). It is the price
    /// that prevailed over the interval being closed.
    ///
    /// Under `Clamp`, a timestamp earlier than the last one contributes no
    /// duration and the clock stays at the later time. On error nothing is
    /// changed.
    pub fn advance(
        &mut self,
        timestamp: Timestamp,
        max_price: Option<Price>,
    ) -> Result<(), StatsError> {
        let Some(last) = self.last_timestamp else {
            self.first_timestamp = Some(timestamp);
            self.last_timestamp = Some(timestamp);
            return Ok(());
        };

        if timestamp < last {
            return match self.policy {
                TimestampPolicy::Reject => Err(StatsError::OutOfOrder {
                    last,
                    new: timestamp,
                }),
                TimestampPolicy::Clamp => {
                    warn!(last, timestamp, "out-of-order timestamp clamped");
                    self.clamped += 1;
                    Ok(())
                }
            };
        }

        let elapsed = timestamp - last;
        if let Some(price) = max_price.filter(|_| elapsed > 0) {
            let overflow = StatsError::Overflow { timestamp };
            let duration = self
                .total_nonempty_duration
                .checked_add(elapsed)
                .ok_or_else(|| overflow.clone())?;
            let weighted = Decimal::from(elapsed)
                .checked_mul(price)
                .and_then(|w| self.weighted_price_sum.checked_add(w))
                .ok_or(overflow)?;

            self.total_nonempty_duration = duration;
            self.weighted_price_sum = weighted;
        }

        self.last_timestamp = Some(timestamp);
        Ok(())
    }

    /// Time-weighted average of the highest price, or `None` if the book was
    /// never non-empty for a positive duration.
    pub fn average(&self) -> Option<Price> {
        if self.total_nonempty_duration == 0 {
            return None;
        }
        self.weighted_price_sum
            .checked_div(Decimal::from(self.total_nonempty_duration))
    }

    /// Out-of-order policy in effect.
    pub fn policy(&self) -> TimestampPolicy {
        self.policy
    }

    /// First timestamp observed.
    pub fn first_timestamp(&self) -> Option<Timestamp> {
        self.first_timestamp
    }

    /// Latest timestamp observed.
    pub fn last_timestamp(&self) -> Option<Timestamp> {
        self.last_timestamp
    }

    /// Total time during which the book was non-empty.
    pub fn total_nonempty_duration(&self) -> u64 {
        self.total_nonempty_duration
    }

    /// Sum of `duration * max price` over non-empty intervals.
    pub fn weighted_price_sum(&self) -> Price {
        self.weighted_price_sum
    }

    /// Number of out-of-order timestamps that were clamped.
    pub fn clamped(&self) -> u64 {
        self.clamped
    }
}

//! Drives events through the book and the time-weighted accumulator.

use serde::Serialize;
use tracing::{debug, info, warn};

use super::event::Event;
use crate::error::StatsError;
use crate::metrics;
use crate::orderbook::{DualIndexBook, InsertOutcome, Price, Timestamp};
use crate::stats::{TimeWeightedAccumulator, TimestampPolicy};

/// Running counters for one replay session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    /// Events applied (inserts and erases, including no-ops).
    pub events: u64,
    /// Insert events.
    pub inserts: u64,
    /// Erase events.
    pub erases: u64,
    /// Inserts ignored because the id was already resting.
    pub duplicate_inserts: u64,
    /// Erases for ids that were not resting.
    pub unknown_erases: u64,
    /// Malformed log lines skipped by the reader.
    pub skipped_lines: u64,
}

/// Final result of a replay session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    /// Time-weighted average of the highest resting price.
    pub average: Option<Price>,
    /// Total time the book was non-empty.
    pub nonempty_duration: u64,
    /// First timestamp seen.
    pub first_timestamp: Option<Timestamp>,
    /// Last timestamp seen.
    pub last_timestamp: Option<Timestamp>,
    /// Orders still resting at the end.
    pub resting_orders: usize,
    /// Out-of-order timestamps that were clamped.
    pub clamped_timestamps: u64,
    /// Event counters.
    #[serde(flatten)]
    pub summary: ReplaySummary,
}

/// One replay session: an order book plus its time-weighted statistic.
#[derive(Debug, Clone, Default)]
pub struct EventReplayer {
    book: DualIndexBook,
    accumulator: TimeWeightedAccumulator,
    summary: ReplaySummary,
}

impl EventReplayer {
    /// Create a session with the default timestamp policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with the given out-of-order policy.
    pub fn with_policy(policy: TimestampPolicy) -> Self {
        Self {
            accumulator: TimeWeightedAccumulator::with_policy(policy),
            ..Self::default()
        }
    }

    /// Apply one event.
    ///
    /// The accumulator is advanced with the book's pre-mutation max price
    /// before the insert/erase takes effect. If the accumulator rejects the
    /// event, the book is left untouched.
    pub fn apply(&mut self, event: &Event) -> Result<(), StatsError> {
        self.advance(event.timestamp())?;

        match *event {
            Event::Insert {
                order_id, price, ..
            } => {
                self.summary.inserts += 1;
                if let InsertOutcome::Duplicate { resting_price } = self.book.insert(order_id, price)
                {
                    warn!(
                        order_id,
                        %resting_price,
                        ignored_price = %price,
                        "insert for resting order id ignored"
                    );
                    self.summary.duplicate_inserts += 1;
                    metrics::inc_duplicate_inserts();
                }
            }
            Event::Erase { order_id, .. } => {
                self.summary.erases += 1;
                if self.book.erase(order_id).is_none() {
                    debug!(order_id, "erase for unknown order id");
                    self.summary.unknown_erases += 1;
                    metrics::inc_unknown_erases();
                }
            }
        }

        self.summary.events += 1;
        metrics::inc_events_applied();
        debug!(%event, max_price = ?self.book.max_price(), "event applied");
        Ok(())
    }

    /// Advance the clock to `timestamp` without changing the book.
    ///
    /// Closes the interval since the last event at the current max price.
    pub fn observe(&mut self, timestamp: Timestamp) -> Result<(), StatsError> {
        self.advance(timestamp)
    }

    fn advance(&mut self, timestamp: Timestamp) -> Result<(), StatsError> {
        let clamped_before = self.accumulator.clamped();
        self.accumulator.advance(timestamp, self.book.max_price())?;
        if self.accumulator.clamped() > clamped_before {
            metrics::inc_clamped_timestamps();
        }
        Ok(())
    }

    /// Count a malformed line that was skipped upstream.
    pub fn record_skipped_line(&mut self) {
        self.summary.skipped_lines += 1;
        metrics::inc_skipped_lines();
    }

    /// Time-weighted average so far.
    pub fn average(&self) -> Option<Price> {
        self.accumulator.average()
    }

    /// Current order book.
    pub fn book(&self) -> &DualIndexBook {
        &self.book
    }

    /// Current accumulator state.
    pub fn accumulator(&self) -> &TimeWeightedAccumulator {
        &self.accumulator
    }

    /// Counters so far.
    pub fn summary(&self) -> ReplaySummary {
        self.summary
    }

    /// Snapshot the session result.
    pub fn report(&self) -> ReplayReport {
        ReplayReport {
            average: self.accumulator.average(),
            nonempty_duration: self.accumulator.total_nonempty_duration(),
            first_timestamp: self.accumulator.first_timestamp(),
            last_timestamp: self.accumulator.last_timestamp(),
            resting_orders: self.book.len(),
            clamped_timestamps: self.accumulator.clamped(),
            summary: self.summary,
        }
    }

    /// End the session and return its result.
    pub fn finish(self) -> ReplayReport {
        let report = self.report();
        info!(
            events = report.summary.events,
            duplicate_inserts = report.summary.duplicate_inserts,
            unknown_erases = report.summary.unknown_erases,
            clamped = report.clamped_timestamps,
            resting = report.resting_orders,
            average = ?report.average,
            "replay finished"
        );
        report
    }
}

/// Replay a sequence of events in a fresh session.
pub fn replay<'a, I>(events: I, policy: TimestampPolicy) -> Result<ReplayReport, StatsError>
where
    I: IntoIterator<Item = &'a Event>,
{
    let mut replayer = EventReplayer::with_policy(policy);
    for event in events {
        replayer.apply(event)?;
    }
    Ok(replayer.finish())
}

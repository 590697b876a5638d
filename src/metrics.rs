//! Replay metrics.
//!
//! Counters and a duration histogram are emitted through the `metrics`
//! facade. Nothing is exported unless the embedding process installs a
//! recorder.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use tracing::debug;

// === Metric Name Constants ===

/// Events applied to the book counter metric name.
pub const METRIC_EVENTS_APPLIED: &str = "replay_events_applied_total";
/// Duplicate inserts counter metric name.
pub const METRIC_DUPLICATE_INSERTS: &str = "replay_duplicate_inserts_total";
/// Erases of unknown ids counter metric name.
pub const METRIC_UNKNOWN_ERASES: &str = "replay_unknown_erases_total";
/// Clamped out-of-order timestamps counter metric name.
pub const METRIC_CLAMPED_TIMESTAMPS: &str = "replay_clamped_timestamps_total";
/// Skipped malformed lines counter metric name.
pub const METRIC_SKIPPED_LINES: &str = "replay_skipped_lines_total";
/// Whole-log replay duration metric name.
pub const METRIC_REPLAY_DURATION: &str = "replay_duration_ms";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_REPLAY_DURATION,
        "Time to replay a full event log in milliseconds"
    );

    describe_counter!(
        METRIC_EVENTS_APPLIED,
        "Total number of insert/erase events applied"
    );
    describe_counter!(
        METRIC_DUPLICATE_INSERTS,
        "Total number of inserts ignored because the id was already resting"
    );
    describe_counter!(
        METRIC_UNKNOWN_ERASES,
        "Total number of erases for ids that were not resting"
    );
    describe_counter!(
        METRIC_CLAMPED_TIMESTAMPS,
        "Total number of out-of-order timestamps clamped"
    );
    describe_counter!(
        METRIC_SKIPPED_LINES,
        "Total number of malformed event log lines skipped"
    );

    debug!("Metrics initialized");
}

/// Increment events applied counter.
pub fn inc_events_applied() {
    counter!(METRIC_EVENTS_APPLIED).increment(1);
}

/// Increment duplicate inserts counter.
pub fn inc_duplicate_inserts() {
    counter!(METRIC_DUPLICATE_INSERTS).increment(1);
}

/// Increment unknown erases counter.
pub fn inc_unknown_erases() {
    counter!(METRIC_UNKNOWN_ERASES).increment(1);
}

/// Increment clamped timestamps counter.
pub fn inc_clamped_timestamps() {
    counter!(METRIC_CLAMPED_TIMESTAMPS).increment(1);
}

/// Increment skipped lines counter.
pub fn inc_skipped_lines() {
    counter!(METRIC_SKIPPED_LINES).increment(1);
}

/// RAII guard for timing operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    metric_name: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given metric.
    pub fn new(metric_name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            metric_name,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        histogram!(self.metric_name).record(self.elapsed_ms());
    }
}

/// Create a latency timer for a full replay.
pub fn timer_replay() -> LatencyTimer {
    LatencyTimer::new(METRIC_REPLAY_DURATION)
}

//! Replay of a line-oriented event log.

use std::io::BufRead;

use strum::{Display, EnumString};
use tracing::{instrument, warn};

use super::event::Event;
use super::replayer::{EventReplayer, ReplayReport};
use crate::error::ReplayError;
use crate::metrics;
use crate::orderbook::Timestamp;
use crate::stats::TimestampPolicy;

/// What to do with a line that does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Default)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum MalformedLinePolicy {
    /// Log and skip the line.
    #[default]
    Skip,
    /// Stop the replay with an error.
    Abort,
}

/// Options for replaying an event log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayOptions {
    /// Out-of-order timestamp handling.
    pub timestamp_policy: TimestampPolicy,
    /// Malformed line handling.
    pub malformed_lines: MalformedLinePolicy,
    /// Close the final interval at this time after the last event.
    pub until: Option<Timestamp>,
}

impl ReplayOptions {
    /// Set the timestamp policy.
    pub fn with_timestamp_policy(mut self, policy: TimestampPolicy) -> Self {
        self.timestamp_policy = policy;
        self
    }

    /// Set the malformed line policy.
    pub fn with_malformed_lines(mut self, policy: MalformedLinePolicy) -> Self {
        self.malformed_lines = policy;
        self
    }

    /// Set the observation end time.
    pub fn with_until(mut self, until: Timestamp) -> Self {
        self.until = Some(until);
        self
    }
}

/// Blank lines and `#` comments carry no event.
fn is_ignorable(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Replay every event in `reader` in a fresh session.
#[instrument(skip(reader))]
pub fn replay_reader<R: BufRead>(
    reader: R,
    options: &ReplayOptions,
) -> Result<ReplayReport, ReplayError> {
    let _timer = metrics::timer_replay();
    let mut replayer = EventReplayer::with_policy(options.timestamp_policy);

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = index + 1;
        if is_ignorable(&line) {
            continue;
        }

        let event = match line.parse::<Event>() {
            Ok(event) => event,
            Err(source) if !source.is_malformed() => {
                return Err(ReplayError::Unrepresentable {
                    line: line_no,
                    source,
                })
            }
            Err(source) => match options.malformed_lines {
                MalformedLinePolicy::Abort => {
                    return Err(ReplayError::Malformed {
                        line: line_no,
                        source,
                    })
                }
                MalformedLinePolicy::Skip => {
                    warn!(line = line_no, error = %source, "skipping malformed line");
                    replayer.record_skipped_line();
                    continue;
                }
            },
        };

        replayer.apply(&event)?;
    }

    if let Some(until) = options.until {
        replayer.observe(until)?;
    }

    Ok(replayer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ParseError, StatsError};
    use rust_decimal_macros::dec;
    use std::io::Cursor;

    const LOG: &str = "\
# sample
0 I 1 10.0
5 I 2 20.0

10 E 1
15 E 2
";

    #[test]
    fn replays_log_text() {
        let report = replay_reader(Cursor::new(LOG), &ReplayOptions::default()).unwrap();

        assert_eq!(report.summary.events, 4);
        assert_eq!(report.nonempty_duration, 15);
        assert_eq!(report.average, Some(dec!(250) / dec!(15)));
    }

    #[test]
    fn skips_malformed_lines_by_default() {
        let log = "0 I 1 10\nbogus\n10 E 1\n";
        let report = replay_reader(Cursor::new(log), &ReplayOptions::default()).unwrap();

        assert_eq!(report.summary.skipped_lines, 1);
        assert_eq!(report.summary.events, 2);
        assert_eq!(report.average, Some(dec!(10)));
    }

    #[test]
    fn aborts_on_malformed_line() {
        let log = "0 I 1 10\n3 I 2\n10 E 1\n";
        let options = ReplayOptions::default().with_malformed_lines(MalformedLinePolicy::Abort);

        match replay_reader(Cursor::new(log), &options) {
            Err(ReplayError::Malformed { line, source }) => {
                assert_eq!(line, 2);
                assert_eq!(source, ParseError::MissingField { field: "price" });
            }
            other => panic!("expected malformed line error, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_price_stops_replay_even_when_skipping() {
        let log = "0 I 1 10\n1 I 2 1e30\n10 E 1\n";
        let options = ReplayOptions::default().with_malformed_lines(MalformedLinePolicy::Skip);

        match replay_reader(Cursor::new(log), &options) {
            Err(ReplayError::Unrepresentable { line, source }) => {
                assert_eq!(line, 2);
                assert_eq!(source, ParseError::PriceOutOfRange("1e30".into()));
            }
            other => panic!("expected unrepresentable price error, got {other:?}"),
        }
    }

    #[test]
    fn reject_policy_surfaces_out_of_order() {
        let log = "5 I 1 10\n4 E 1\n";
        let options = ReplayOptions::default().with_timestamp_policy(TimestampPolicy::Reject);

        let err = replay_reader(Cursor::new(log), &options).unwrap_err();
        assert!(matches!(
            err,
            ReplayError::Stats(StatsError::OutOfOrder { last: 5, new: 4 })
        ));
    }

    #[test]
    fn until_closes_final_interval() {
        let options = ReplayOptions::default().with_until(100);
        let report = replay_reader(Cursor::new("0 I 1 7.5\n"), &options).unwrap();

        assert_eq!(report.nonempty_duration, 100);
        assert_eq!(report.average, Some(dec!(7.5)));
        assert_eq!(report.resting_orders, 1);
    }

    #[test]
    fn policy_names_parse() {
        assert_eq!("abort".parse::<MalformedLinePolicy>().unwrap(), MalformedLinePolicy::Abort);
        assert_eq!(MalformedLinePolicy::Skip.to_string(), "skip");
    }
}

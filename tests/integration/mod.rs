//! Integration tests for the max price replay.
//!
//! Run with: cargo test --test integration

use std::fs;
use std::io::{BufReader, Cursor};

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use maxprice_twap::replay::{MalformedLinePolicy, ReplaySummary};
use maxprice_twap::{replay, replay_reader, Event, EventReplayer, ReplayOptions, TimestampPolicy};

fn two_order_events() -> Vec<Event> {
    vec![
        Event::insert(0, 1, dec!(10.0)),
        Event::insert(5, 2, dec!(20.0)),
        Event::erase(10, 1),
        Event::erase(15, 2),
    ]
}

/// Deterministic pseudo-random event stream with non-decreasing timestamps.
fn generated_events(seed: u64, count: usize) -> Vec<Event> {
    let mut state = seed;
    let mut next = move || {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        state >> 33
    };

    let mut timestamp = 0;
    (0..count)
        .map(|_| {
            timestamp += next() % 4;
            let order_id = (next() % 32) as i64;
            if next() % 2 == 0 {
                Event::insert(timestamp, order_id, Decimal::new((next() % 5_000) as i64, 2))
            } else {
                Event::erase(timestamp, order_id)
            }
        })
        .collect()
}

#[test]
fn two_overlapping_orders() {
    let report = replay(&two_order_events(), TimestampPolicy::Clamp).unwrap();

    // 5 * 10 + 5 * 20 + 5 * 20 = 250 over 15
    let average = report.average.unwrap();
    assert_eq!(average, dec!(250) / dec!(15));
    assert_eq!(average.round_dp(3), dec!(16.667));
    assert_eq!(report.nonempty_duration, 15);
}

#[test]
fn always_empty_book_has_no_average() {
    let mut replayer = EventReplayer::new();
    for t in 0..10 {
        replayer.apply(&Event::insert(t * 10, 1, dec!(99))).unwrap();
        replayer.apply(&Event::erase(t * 10, 1)).unwrap();
    }

    assert_eq!(replayer.average(), None);
    assert_eq!(replayer.report().nonempty_duration, 0);
}

#[test]
fn single_order_observed_later_averages_to_its_price() {
    let mut replayer = EventReplayer::new();
    replayer.apply(&Event::insert(0, 1, dec!(42.125))).unwrap();
    replayer.observe(100).unwrap();

    assert_eq!(replayer.average(), Some(dec!(42.125)));
}

#[test]
fn same_timestamp_insert_erase_adds_no_weight() {
    let mut with_flash = two_order_events();
    with_flash.insert(2, Event::insert(5, 77, dec!(1000)));
    with_flash.insert(3, Event::erase(5, 77));

    let baseline = replay(&two_order_events(), TimestampPolicy::Clamp).unwrap();
    let flashed = replay(&with_flash, TimestampPolicy::Clamp).unwrap();

    assert_eq!(flashed.average, baseline.average);
    assert_eq!(flashed.nonempty_duration, baseline.nonempty_duration);
}

#[test]
fn unknown_erase_changes_nothing() {
    let mut events = two_order_events();
    events.insert(2, Event::erase(7, 404));

    let baseline = replay(&two_order_events(), TimestampPolicy::Clamp).unwrap();
    let report = replay(&events, TimestampPolicy::Clamp).unwrap();

    assert_eq!(report.average, baseline.average);
    assert_eq!(report.summary.unknown_erases, 1);
}

#[test]
fn duplicate_insert_keeps_original_price() {
    let mut replayer = EventReplayer::new();
    replayer.apply(&Event::insert(0, 1, dec!(10))).unwrap();
    replayer.apply(&Event::insert(5, 1, dec!(500))).unwrap();
    replayer.observe(10).unwrap();

    assert_eq!(replayer.book().get(1).map(|o| o.price), Some(dec!(10)));
    assert_eq!(replayer.average(), Some(dec!(10)));
    assert_eq!(replayer.summary().duplicate_inserts, 1);
}

#[test]
fn replay_is_deterministic() {
    let events = generated_events(7, 2_000);

    let first = replay(&events, TimestampPolicy::Clamp).unwrap();
    let second = replay(&events, TimestampPolicy::Clamp).unwrap();

    assert_eq!(first, second);
}

#[test]
fn log_text_and_event_list_agree() {
    let events = generated_events(11, 500);
    let log: String = events.iter().map(|e| format!("{e}\n")).collect();

    let from_events = replay(&events, TimestampPolicy::Clamp).unwrap();
    let from_log = replay_reader(Cursor::new(log), &ReplayOptions::default()).unwrap();

    assert_eq!(from_log, from_events);
}

#[test]
fn max_price_matches_brute_force_during_replay() {
    let mut replayer = EventReplayer::new();
    let mut resting: Vec<(i64, Decimal)> = Vec::new();

    for event in generated_events(3, 3_000) {
        replayer.apply(&event).unwrap();
        match event {
            Event::Insert {
                order_id, price, ..
            } => {
                if !resting.iter().any(|(id, _)| *id == order_id) {
                    resting.push((order_id, price));
                }
            }
            Event::Erase { order_id, .. } => resting.retain(|(id, _)| *id != order_id),
        }

        let expected = resting.iter().map(|(_, p)| *p).max();
        assert_eq!(replayer.book().max_price(), expected);
    }
}

#[test]
fn replays_event_log_file() {
    let path = std::env::temp_dir().join(format!("maxprice_twap_{}.log", std::process::id()));
    fs::write(&path, "0 I 1 10.0\n5 I 2 20.0\nnot an event\n10 E 1\n15 E 2\n").unwrap();

    let file = fs::File::open(&path).unwrap();
    let report = replay_reader(BufReader::new(file), &ReplayOptions::default()).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(report.average, Some(dec!(250) / dec!(15)));
    assert_eq!(
        report.summary,
        ReplaySummary {
            events: 4,
            inserts: 2,
            erases: 2,
            duplicate_inserts: 0,
            unknown_erases: 0,
            skipped_lines: 1,
        }
    );
}

#[test]
fn abort_policy_reports_line_number() {
    let options = ReplayOptions::default().with_malformed_lines(MalformedLinePolicy::Abort);
    let err = replay_reader(Cursor::new("0 I 1 1\n1 Q 1\n"), &options).unwrap_err();

    assert_eq!(err.to_string(), "line 2: invalid operation \"Q\", expected I or E");
}

#[test]
fn report_serializes_to_json() {
    let report = replay(&two_order_events(), TimestampPolicy::Clamp).unwrap();
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["nonempty_duration"], 15);
    assert_eq!(json["events"], 4);
    assert_eq!(json["resting_orders"], 0);
    assert!(json["average"].is_string());
}

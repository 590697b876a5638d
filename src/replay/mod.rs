//! Replay module.
//!
//! This module handles:
//! - Event types and the `<timestamp> <I|E> <orderId> [<price>]` line format
//! - Driving events through the book and accumulator
//! - Reading event logs with configurable malformed-line handling
//! - Rendering the final report as text or JSON

pub mod event;
pub mod reader;
pub mod render;
pub mod replayer;

pub use event::Event;
pub use reader::{replay_reader, MalformedLinePolicy, ReplayOptions};
pub use render::render_report;
pub use replayer::{replay, EventReplayer, ReplayReport, ReplaySummary};

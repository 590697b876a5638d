//! Application configuration loaded from environment variables.

use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use strum::{Display, EnumString};

use crate::replay::{MalformedLinePolicy, ReplayOptions};
use crate::stats::TimestampPolicy;

/// Largest number of decimal places a `Decimal` can carry.
pub const MAX_PRECISION: u32 = 28;

/// How the result is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Default)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OutputFormat {
    /// One human-readable line.
    #[default]
    Text,
    /// The full replay report as JSON.
    Json,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Replay ===
    /// Out-of-order timestamp handling: clamp or reject.
    #[serde(default, deserialize_with = "from_str_value")]
    pub timestamp_policy: TimestampPolicy,

    /// Malformed line handling: skip or abort.
    #[serde(default, deserialize_with = "from_str_value")]
    pub malformed_lines: MalformedLinePolicy,

    // === Output ===
    /// Output format: text or json.
    #[serde(default, deserialize_with = "from_str_value")]
    pub output_format: OutputFormat,

    /// Round the printed average to this many decimal places.
    #[serde(default)]
    pub precision: Option<u32>,

    // === Logging ===
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,
}

/// Parse an enum value with the same `FromStr` the CLI uses, so
/// `TIMESTAMP_POLICY=Reject` and `--timestamp-policy Reject` agree.
fn from_str_value<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = String::deserialize(deserializer)?;
    raw.trim().parse().map_err(D::Error::custom)
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timestamp_policy: TimestampPolicy::default(),
            malformed_lines: MalformedLinePolicy::default(),
            output_format: OutputFormat::default(),
            precision: None,
            rust_log: default_log_level(),
            verbose: false,
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(precision) = self.precision {
            if precision > MAX_PRECISION {
                return Err(format!("PRECISION must be at most {MAX_PRECISION}"));
            }
        }

        Ok(())
    }

    /// Replay options derived from this configuration.
    pub fn replay_options(&self) -> ReplayOptions {
        ReplayOptions::default()
            .with_timestamp_policy(self.timestamp_policy)
            .with_malformed_lines(self.malformed_lines)
    }
}

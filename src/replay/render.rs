//! Rendering of a replay report for output.

use super::replayer::ReplayReport;
use crate::config::OutputFormat;

/// Prefix of the text output line.
pub const TEXT_LABEL: &str = "time-averaged highest price";

/// Render `report` in the given format, rounding the average to `precision`
/// decimal places when set.
pub fn render_report(
    report: &ReplayReport,
    format: OutputFormat,
    precision: Option<u32>,
) -> Result<String, serde_json::Error> {
    let average = match precision {
        Some(dp) => report.average.map(|avg| avg.round_dp(dp)),
        None => report.average,
    };

    match format {
        OutputFormat::Text => Ok(match average {
            Some(avg) => format!("{TEXT_LABEL}: {avg}"),
            None => format!("{TEXT_LABEL}: none"),
        }),
        OutputFormat::Json => serde_json::to_string_pretty(&ReplayReport {
            average,
            ..report.clone()
        }),
    }
}

//! Time-weighted max price replay entry point.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use maxprice_twap::config::{Config, OutputFormat};
use maxprice_twap::metrics;
use maxprice_twap::replay::{render_report, replay_reader, MalformedLinePolicy};
use maxprice_twap::stats::TimestampPolicy;
use maxprice_twap::AppError;

/// Time-weighted average of the highest resting price.
#[derive(Parser, Debug)]
#[command(name = "maxprice-twap")]
#[command(about = "Replay an order event log and print the time-weighted average of the highest price")]
#[command(version)]
struct Args {
    /// Event log, one `<timestamp> <I|E> <orderId> [<price>]` per line.
    path: PathBuf,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Out-of-order timestamps: clamp or reject.
    #[arg(long)]
    timestamp_policy: Option<TimestampPolicy>,

    /// Malformed lines: skip or abort.
    #[arg(long)]
    on_malformed: Option<MalformedLinePolicy>,

    /// Close the final interval at this timestamp.
    #[arg(long)]
    until: Option<u64>,

    /// Output format: text or json.
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Round the printed average to this many decimal places.
    #[arg(long)]
    precision: Option<u32>,
}

fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let args = Args::parse();
    let path = args.path.display().to_string();

    run(args).with_context(|| format!("replaying {path}"))
}

fn run(args: Args) -> maxprice_twap::Result<()> {
    // Load configuration; CLI flags take precedence
    let mut config = Config::load()?;
    config.verbose |= args.verbose;
    if let Some(policy) = args.timestamp_policy {
        config.timestamp_policy = policy;
    }
    if let Some(policy) = args.on_malformed {
        config.malformed_lines = policy;
    }
    if let Some(format) = args.format {
        config.output_format = format;
    }
    if args.precision.is_some() {
        config.precision = args.precision;
    }

    // Initialize logging on stderr so stdout carries only the result
    let filter = if config.verbose {
        EnvFilter::new("maxprice_twap=debug,info")
    } else {
        EnvFilter::try_new(&config.rust_log).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    metrics::init_metrics();

    config.validate().map_err(AppError::InvalidConfig)?;
    debug!(?config, "configuration loaded");

    let mut options = config.replay_options();
    options.until = args.until;

    let file = File::open(&args.path)?;
    info!(path = %args.path.display(), "replaying event log");

    let report = replay_reader(BufReader::new(file), &options)?;

    println!(
        "{}",
        render_report(&report, config.output_format, config.precision)?
    );
    Ok(())
}

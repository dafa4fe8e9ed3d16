//! # Request Stats - Replay Entry Point
//!
//! Replays a JSON-lines file of recorded request results through the
//! reporting engine and prints the report:
//!
//! 1. **Initialize logging**: colorized tracing output on stderr
//! 2. **Parse arguments**: input, output mode, elapsed time, retention cap
//! 3. **Validate the output mode** before touching any input
//! 4. **Spawn the reporter**: a single consumer draining the result feed
//! 5. **Replay**: a blocking task decodes lines and pushes them into the feed
//! 6. **Finish**: finalize with the run's elapsed time and render
//!
//! Example: `request-stats -i results.jsonl -o csv --output-file report.csv`

use anyhow::{Context, Result};
use clap::Parser;
use request_stats::{
    cli::Args, feed, logging, replay, utils::format_duration, OutputMode, Reporter,
};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use tracing::{debug, info};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    info!("Starting request-stats {}", request_stats::VERSION);
    debug!("Configuration: {:?}", args);

    let mode: OutputMode = args
        .output
        .parse()
        .context("Unsupported --output value")?;

    let sink: Box<dyn Write + Send> = match &args.output_file {
        Some(path) => Box::new(
            File::create(path)
                .with_context(|| format!("Failed to create output file {:?}", path))?,
        ),
        None => Box::new(io::stdout()),
    };

    let reader: Box<dyn BufRead + Send> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open input file {:?}", path))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let (tx, rx) = feed::channel(args.feed_capacity);
    let handle = Reporter::new(sink, rx, mode.to_string(), 0)
        .with_max_results(args.max_results)
        .spawn();

    let summary = tokio::task::spawn_blocking(move || replay::feed_records(reader, tx))
        .await
        .context("Replay task panicked")?
        .context("Failed to replay results")?;

    let elapsed = args.elapsed.unwrap_or(summary.last_completion);
    info!(
        "Replayed {} results over {}",
        summary.records,
        format_duration(elapsed)
    );

    let snapshot = handle.finish(elapsed).await?;

    if let Some(path) = &args.output_file {
        info!("Report written to: {:?}", path);
    }
    debug!(
        "{} successes, {} errors",
        snapshot.num_successes,
        snapshot.error_count()
    );
    Ok(())
}

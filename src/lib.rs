//! # Request Stats
//!
//! Statistics aggregation and reporting engine for HTTP load generators.
//! Workers executing requests push one [`RequestResult`] per attempt into a
//! shared feed; a single consumer aggregates them, and once the run ends the
//! accumulated state is frozen into an immutable [`Snapshot`] and rendered.
//!
//! ## Architecture Overview
//!
//! - `results`: the per-request record and its phases
//! - `feed`: the multi-producer, single-consumer result queue
//! - `aggregator`: running sums, bounded sample retention, error tally
//! - `finalizer`: throughput and averages from the running sums
//! - `snapshot`: the immutable report and its construction
//! - `metrics`: nearest-rank percentiles, histogram, status code counts
//! - `render`: output-mode driven renderers (summary, csv, json)
//! - `reporter`: spawns the consumer and ties the pipeline together
//! - `replay`: feeds recorded JSON-lines results through the pipeline
//!
//! ## Usage Example
//!
//! ```rust
//! use request_stats::{Aggregator, RequestResult};
//! use std::time::Duration;
//!
//! let mut aggregator = Aggregator::new(3);
//! for secs in [1, 2, 3] {
//!     aggregator.ingest(RequestResult::success(Duration::from_secs(secs), 200));
//! }
//!
//! let snapshot = aggregator.finalize(Duration::from_secs(3));
//! assert_eq!(snapshot.average, 2.0);
//! assert_eq!(snapshot.throughput, 1.0);
//! assert_eq!(snapshot.status_code_dist[&200], 3);
//! ```
//!
//! ## Accuracy
//!
//! Averages and throughput always cover the whole stream. Percentiles, the
//! histogram, and fastest/slowest cover at most
//! [`defaults::MAX_RESULTS`] retained successes, which keeps memory bounded on
//! very long runs.

pub mod aggregator;

/// Command-line interface of the replay binary
pub mod cli;

pub mod error;

/// Multi-producer, single-consumer queue between workers and the aggregator
pub mod feed;

pub mod finalizer;

/// Colorized tracing output for the replay binary
pub mod logging;

pub mod metrics;

/// Output-mode driven report renderers
///
/// Renderers take nothing but a finished snapshot, so new formats can be
/// added without touching aggregation.
pub mod render;

/// JSON-lines replay of recorded results into a feed
pub mod replay;

pub mod reporter;
pub mod results;
pub mod snapshot;
pub mod utils;

pub use aggregator::Aggregator;
pub use error::{ReportError, Result};
pub use finalizer::Finalized;
pub use metrics::{Bucket, LatencyDistribution};
pub use render::{renderer_for, OutputMode, Render};
pub use reporter::{Reporter, ReporterConfig, ReporterHandle};
pub use results::{Phase, RequestResult};
pub use snapshot::{PhaseStats, Snapshot};

/// The current version of the crate, used in the CLI's startup log
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration values
pub mod defaults {
    /// Maximum number of successes retained for order statistics
    ///
    /// Seven `f64` sequences plus status codes and offsets at this size come
    /// to roughly 70 MB, which bounds memory regardless of run length.
    pub const MAX_RESULTS: usize = 1_000_000;

    /// Number of histogram buckets (the histogram has one more boundary mark)
    pub const HISTOGRAM_BUCKETS: usize = 10;

    /// Target percentiles of the latency distribution, ascending
    pub const PERCENTILES: [u32; 7] = [10, 25, 50, 75, 90, 95, 99];

    /// Default bound of the result feed
    pub const FEED_CAPACITY: usize = 1000;

    /// Width, in characters, of the longest histogram bar in the summary
    pub const BAR_WIDTH: usize = 40;
}

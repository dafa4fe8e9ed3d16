//! # Result Aggregator
//!
//! The aggregator is the single consumer of the result feed. It keeps two
//! kinds of state side by side:
//!
//! - **Running sums and counts** updated for every record, so averages and
//!   throughput describe the whole stream no matter how long it runs.
//! - **Retained samples**, parallel per-phase sequences capped at
//!   `max_results` entries, used later for order statistics (percentiles,
//!   histogram, fastest/slowest).
//!
//! Past the cap, order statistics are computed over the first `max_results`
//! successes only. That is a biased approximation, but it keeps memory bounded.
//!
//! The aggregator is owned by exactly one task and never shared, so none of
//! its state needs locking.

use crate::feed::ResultReceiver;
use crate::results::{Phase, RequestResult};
use std::collections::BTreeMap;
use tracing::debug;

const PHASES: usize = Phase::ALL.len();

/// Mutable accumulator for one run
#[derive(Debug)]
pub struct Aggregator {
    pub(crate) max_results: usize,
    pub(crate) num_results: u64,
    pub(crate) num_successes: u64,
    pub(crate) duration_sum: f64,
    pub(crate) phase_sums: [f64; PHASES],
    pub(crate) durations: Vec<f64>,
    pub(crate) phase_samples: [Vec<f64>; PHASES],
    pub(crate) status_codes: Vec<u16>,
    pub(crate) offsets: Vec<f64>,
    pub(crate) error_tally: BTreeMap<String, u64>,
    pub(crate) size_total: i64,
}

impl Aggregator {
    /// Create an aggregator with the default retention cap
    ///
    /// `expected_count` only sizes the initial sample capacity; ingestion is
    /// not limited by it.
    pub fn new(expected_count: usize) -> Self {
        Self::with_max_results(expected_count, crate::defaults::MAX_RESULTS)
    }

    /// Create an aggregator retaining at most `max_results` samples per phase
    pub fn with_max_results(expected_count: usize, max_results: usize) -> Self {
        let capacity = expected_count.min(max_results);

        Self {
            max_results,
            num_results: 0,
            num_successes: 0,
            duration_sum: 0.0,
            phase_sums: [0.0; PHASES],
            durations: Vec::with_capacity(capacity),
            phase_samples: std::array::from_fn(|_| Vec::with_capacity(capacity)),
            status_codes: Vec::with_capacity(capacity),
            offsets: Vec::with_capacity(capacity),
            error_tally: BTreeMap::new(),
            size_total: 0,
        }
    }

    /// Fold one record into the running state
    pub fn ingest(&mut self, result: RequestResult) {
        self.num_results += 1;

        if let Some(err) = result.err {
            *self.error_tally.entry(err).or_insert(0) += 1;
            return;
        }

        self.num_successes += 1;
        self.duration_sum += result.duration.as_secs_f64();
        for phase in Phase::ALL {
            self.phase_sums[phase.index()] += result.phase(phase).as_secs_f64();
        }

        if self.durations.len() < self.max_results {
            self.durations.push(result.duration.as_secs_f64());
            for phase in Phase::ALL {
                self.phase_samples[phase.index()].push(result.phase(phase).as_secs_f64());
            }
            self.status_codes.push(result.status_code);
            self.offsets.push(result.offset.as_secs_f64());
        }

        if result.content_length > 0 {
            self.size_total = self.size_total.saturating_add(result.content_length);
        }
    }

    /// Drain `feed` until end-of-stream, ingesting every record in order
    pub async fn drain(&mut self, feed: &mut ResultReceiver) {
        debug!("Result consumer started");
        while let Some(result) = feed.recv().await {
            self.ingest(result);
        }
        debug!(
            "Result feed ended after {} results ({} errors)",
            self.num_results,
            self.error_count()
        );
    }

    /// All records ingested, successes and failures
    pub fn num_results(&self) -> u64 {
        self.num_results
    }

    pub fn num_successes(&self) -> u64 {
        self.num_successes
    }

    /// Sum over the error tally
    pub fn error_count(&self) -> u64 {
        self.error_tally.values().sum()
    }

    pub fn error_tally(&self) -> &BTreeMap<String, u64> {
        &self.error_tally
    }

    /// Number of successes currently kept for order statistics
    pub fn retained(&self) -> usize {
        self.durations.len()
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Sum of positive content lengths over every success
    pub fn size_total(&self) -> i64 {
        self.size_total
    }
}

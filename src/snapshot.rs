//! # Report Snapshot
//!
//! A [`Snapshot`] is the immutable, fully computed report of one run. It is
//! built exactly once from a finished [`Aggregator`] and then handed to a
//! renderer by reference; nothing mutates it afterwards.
//!
//! ## Two populations
//!
//! Scalars in the snapshot come from two different populations:
//!
//! - `average`, `throughput` and every phase `average` cover **every**
//!   successful result of the run.
//! - `fastest`, `slowest`, phase `max`/`min`, the latency distribution and the
//!   histogram cover only the **retained** sample (the first
//!   `max_results` successes).
//!
//! ## Raw sequences
//!
//! The retained sequences are copied into the snapshot in arrival order before
//! any sorting takes place, so `durations[i]`, `status_codes[i]`, `offsets[i]`
//! and every `phases[p].samples[i]` describe the same request.

use crate::aggregator::Aggregator;
use crate::defaults::{HISTOGRAM_BUCKETS, PERCENTILES};
use crate::finalizer::Finalized;
use crate::metrics::{self, Bucket, LatencyDistribution};
use crate::results::Phase;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Statistics for a single request phase
///
/// Note the naming of `max` and `min`: `max` holds the **smallest** retained
/// sample and `min` the **largest**. Downstream consumers depend on these
/// exact values, so the fields are kept as they are rather than renamed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseStats {
    pub phase: Phase,
    /// Mean over every success, in seconds
    pub average: f64,
    /// Smallest retained sample (first after an ascending sort)
    pub max: f64,
    /// Largest retained sample (last after an ascending sort)
    pub min: f64,
    /// Retained samples in arrival order, in seconds
    pub samples: Vec<f64>,
}

/// Immutable report of one run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub generated_at: chrono::DateTime<chrono::Utc>,
    /// Wall-clock duration of the run
    #[serde(serialize_with = "crate::results::seconds::serialize")]
    pub total: Duration,
    pub num_results: u64,
    pub num_successes: u64,
    /// Sum of every successful request's duration, in seconds
    pub duration_sum: f64,
    pub average: f64,
    pub fastest: f64,
    pub slowest: f64,
    /// Successful requests per second
    pub throughput: f64,
    /// Sum of positive content lengths
    pub size_total: i64,
    /// `size_total` divided by the retained sample size, or 0 when empty
    pub size_per_request: i64,
    /// Per-phase statistics in [`Phase::ALL`] order
    pub phases: Vec<PhaseStats>,
    pub durations: Vec<f64>,
    pub status_codes: Vec<u16>,
    pub offsets: Vec<f64>,
    pub error_dist: BTreeMap<String, u64>,
    pub status_code_dist: BTreeMap<u16, u64>,
    pub latency_distribution: Vec<LatencyDistribution>,
    pub histogram: Vec<Bucket>,
}

impl Snapshot {
    /// Build the snapshot from a finished aggregator and its derived scalars
    pub(crate) fn build(mut aggregator: Aggregator, finalized: Finalized) -> Self {
        let mut snapshot = Snapshot {
            generated_at: chrono::Utc::now(),
            total: finalized.total,
            num_results: aggregator.num_results,
            num_successes: aggregator.num_successes,
            duration_sum: aggregator.duration_sum,
            average: finalized.average,
            fastest: 0.0,
            slowest: 0.0,
            throughput: finalized.throughput,
            size_total: aggregator.size_total,
            size_per_request: 0,
            phases: Phase::ALL
                .iter()
                .map(|&phase| PhaseStats {
                    phase,
                    average: finalized.phase_average(phase),
                    max: 0.0,
                    min: 0.0,
                    samples: aggregator.phase_samples[phase.index()].clone(),
                })
                .collect(),
            durations: aggregator.durations.clone(),
            status_codes: aggregator.status_codes.clone(),
            offsets: aggregator.offsets.clone(),
            error_dist: std::mem::take(&mut aggregator.error_tally),
            status_code_dist: BTreeMap::new(),
            latency_distribution: Vec::new(),
            histogram: Vec::new(),
        };

        let retained = aggregator.durations.len();
        if retained == 0 {
            return snapshot;
        }

        snapshot.size_per_request = aggregator.size_total / retained as i64;

        // Sorting happens on the aggregator's own sequences; the snapshot
        // already holds arrival-order copies.
        aggregator.durations.sort_by(f64::total_cmp);
        let lats = &aggregator.durations;
        snapshot.fastest = lats[0];
        snapshot.slowest = lats[retained - 1];

        for (stats, samples) in snapshot
            .phases
            .iter_mut()
            .zip(aggregator.phase_samples.iter_mut())
        {
            samples.sort_by(f64::total_cmp);
            if let (Some(&first), Some(&last)) = (samples.first(), samples.last()) {
                stats.max = first;
                stats.min = last;
            }
        }

        snapshot.status_code_dist = metrics::status_code_distribution(&snapshot.status_codes);
        snapshot.latency_distribution = metrics::latency_distribution(lats, &PERCENTILES);
        snapshot.histogram =
            metrics::histogram(lats, snapshot.fastest, snapshot.slowest, HISTOGRAM_BUCKETS);

        snapshot
    }

    /// Statistics for `phase`
    pub fn phase(&self, phase: Phase) -> &PhaseStats {
        &self.phases[phase.index()]
    }

    /// Total number of failed results
    pub fn error_count(&self) -> u64 {
        self.error_dist.values().sum()
    }

    /// Latency at percentile `percentage`, if it was reached
    pub fn percentile(&self, percentage: u32) -> Option<f64> {
        self.latency_distribution
            .iter()
            .find(|d| d.percentage == percentage)
            .map(|d| d.latency)
    }
}

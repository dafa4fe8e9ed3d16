//! Finalization: turns an aggregator's running sums into derived scalars once
//! the feed has ended and the run's wall-clock time is known.
//!
//! Nothing here guards against division by zero. A run with no successes has
//! NaN averages, and a zero elapsed time gives an infinite (or NaN)
//! throughput. Those values are passed through to the snapshot unchanged.

use crate::aggregator::Aggregator;
use crate::results::Phase;
use crate::snapshot::Snapshot;
use std::time::Duration;
use tracing::info;

/// Scalars derived from the running sums over the whole stream
#[derive(Debug, Clone, PartialEq)]
pub struct Finalized {
    /// Wall-clock duration of the whole run
    pub total: Duration,
    /// Successful requests per second
    pub throughput: f64,
    /// Mean total duration over every success, in seconds
    pub average: f64,
    /// Mean duration of each phase, indexed by [`Phase::index`]
    pub phase_averages: [f64; Phase::ALL.len()],
}

impl Finalized {
    /// Compute throughput and averages from `aggregator`'s running sums
    pub fn compute(aggregator: &Aggregator, total: Duration) -> Self {
        let successes = aggregator.num_successes as f64;

        Self {
            total,
            throughput: successes / total.as_secs_f64(),
            average: aggregator.duration_sum / successes,
            phase_averages: aggregator.phase_sums.map(|sum| sum / successes),
        }
    }

    pub fn phase_average(&self, phase: Phase) -> f64 {
        self.phase_averages[phase.index()]
    }
}

impl Aggregator {
    /// Consume the aggregator and build the run's snapshot
    ///
    /// `total` is the externally measured wall-clock duration of the run.
    pub fn finalize(self, total: Duration) -> Snapshot {
        let finalized = Finalized::compute(&self, total);
        info!(
            "Finalizing report: {} results, {} successes in {:?} ({:.4} req/s)",
            self.num_results, self.num_successes, total, finalized.throughput
        );
        Snapshot::build(self, finalized)
    }
}

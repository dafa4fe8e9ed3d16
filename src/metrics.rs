//! Order statistics over the retained latency sample: nearest-rank
//! percentiles, the fixed-bucket response-time histogram, and status code
//! counting. Every function here expects its input already sorted ascending
//! where noted, and works in seconds.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Latency at a target percentile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatencyDistribution {
    pub percentage: u32,
    pub latency: f64,
}

/// One histogram bucket: samples `<= mark` not claimed by an earlier bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub mark: f64,
    pub count: usize,
    pub frequency: f64,
}

/// Single-pass nearest-rank percentiles over an ascending `sorted` sample
///
/// Index `i` has rank `i * 100 / n` (integer division). Each target takes the
/// first sample whose rank reaches it. Targets that were never reached, or
/// whose value is exactly zero, are left out of the result.
pub fn latency_distribution(sorted: &[f64], targets: &[u32]) -> Vec<LatencyDistribution> {
    let n = sorted.len();
    let mut values = vec![0.0; targets.len()];
    let mut j = 0;

    for (i, &latency) in sorted.iter().enumerate() {
        if j >= targets.len() {
            break;
        }
        let rank = i * 100 / n;
        if rank >= targets[j] as usize {
            values[j] = latency;
            j += 1;
        }
    }

    targets
        .iter()
        .zip(values)
        .filter(|&(_, latency)| latency > 0.0)
        .map(|(&percentage, latency)| LatencyDistribution {
            percentage,
            latency,
        })
        .collect()
}

/// Fixed-width histogram of an ascending `sorted` sample
///
/// Produces `buckets + 1` entries. Marks are spaced evenly from `fastest`,
/// except the last one which is exactly `slowest`. Once the scan reaches the
/// last bucket every remaining sample is counted there.
pub fn histogram(sorted: &[f64], fastest: f64, slowest: f64, buckets: usize) -> Vec<Bucket> {
    let width = (slowest - fastest) / buckets as f64;
    let mut marks: Vec<f64> = (0..buckets).map(|i| fastest + width * i as f64).collect();
    marks.push(slowest);

    let last = marks.len() - 1;
    let mut counts = vec![0usize; marks.len()];
    let mut bi = 0;
    let mut i = 0;
    while i < sorted.len() {
        if sorted[i] <= marks[bi] || bi == last {
            counts[bi] += 1;
            i += 1;
        } else {
            bi += 1;
        }
    }

    let n = sorted.len() as f64;
    marks
        .into_iter()
        .zip(counts)
        .map(|(mark, count)| Bucket {
            mark,
            count,
            frequency: count as f64 / n,
        })
        .collect()
}

/// Occurrences of each status code
pub fn status_code_distribution(status_codes: &[u16]) -> BTreeMap<u16, u64> {
    let mut dist = BTreeMap::new();
    for &code in status_codes {
        *dist.entry(code).or_insert(0) += 1;
    }
    dist
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::{HISTOGRAM_BUCKETS, PERCENTILES};

    fn hundred() -> Vec<f64> {
        (1..=100).map(|v| v as f64 / 100.0).collect()
    }

    #[test]
    fn test_percentiles_on_hundred_samples() {
        let dist = latency_distribution(&hundred(), &PERCENTILES);
        let pairs: Vec<(u32, f64)> = dist.iter().map(|d| (d.percentage, d.latency)).collect();

        // With n = 100 the rank of index i is i, so target p lands on index p.
        assert_eq!(
            pairs,
            vec![
                (10, 0.11),
                (25, 0.26),
                (50, 0.51),
                (75, 0.76),
                (90, 0.91),
                (95, 0.96),
                (99, 1.0),
            ]
        );
    }

    #[test]
    fn test_percentiles_small_sample_skips_unreached() {
        // n = 3 gives ranks 0, 33, 66: only one target is assigned per index.
        let dist = latency_distribution(&[1.0, 2.0, 3.0], &PERCENTILES);
        let pairs: Vec<(u32, f64)> = dist.iter().map(|d| (d.percentage, d.latency)).collect();
        assert_eq!(pairs, vec![(10, 2.0), (25, 3.0)]);
    }

    #[test]
    fn test_percentiles_zero_latency_omitted() {
        let sorted = vec![0.0; 20];
        assert!(latency_distribution(&sorted, &PERCENTILES).is_empty());
    }

    #[test]
    fn test_percentiles_empty_sample() {
        assert!(latency_distribution(&[], &PERCENTILES).is_empty());
    }

    #[test]
    fn test_histogram_marks_and_counts() {
        let sorted = [1.0, 2.0, 3.0];
        let buckets = histogram(&sorted, 1.0, 3.0, HISTOGRAM_BUCKETS);

        assert_eq!(buckets.len(), HISTOGRAM_BUCKETS + 1);
        assert_eq!(buckets[0].mark, 1.0);
        assert_eq!(buckets[10].mark, 3.0);
        assert!((buckets[5].mark - 2.0).abs() < 1e-12);

        let counts: Vec<usize> = buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1]);
        assert!((buckets[0].frequency - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_histogram_identical_samples_land_in_first_bucket() {
        let sorted = [0.5; 7];
        let buckets = histogram(&sorted, 0.5, 0.5, HISTOGRAM_BUCKETS);
        assert_eq!(buckets[0].count, 7);
        assert_eq!(buckets[0].frequency, 1.0);
        assert_eq!(buckets.iter().map(|b| b.count).sum::<usize>(), 7);
    }

    #[test]
    fn test_histogram_last_bucket_catches_everything_left() {
        // A value beyond the final mark still terminates in the last bucket.
        let sorted = [0.0, 1.0, 5.0];
        let buckets = histogram(&sorted, 0.0, 1.0, HISTOGRAM_BUCKETS);
        assert_eq!(buckets[10].count, 2);
        assert_eq!(buckets.iter().map(|b| b.count).sum::<usize>(), 3);
    }

    #[test]
    fn test_status_code_distribution() {
        let dist = status_code_distribution(&[200, 404, 200, 500, 200]);
        assert_eq!(dist[&200], 3);
        assert_eq!(dist[&404], 1);
        assert_eq!(dist[&500], 1);
        assert_eq!(dist.values().sum::<u64>(), 5);
    }
}

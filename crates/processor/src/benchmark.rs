//! Folding per-PR metrics into a benchmark report

use serde::Serialize;

use crate::buckets::{BucketDistribution, CODING_TIME, PICKUP_TIME, PR_SIZE};
use crate::metrics::PrMetrics;

/// Accumulator for one report run.
///
/// PRs are recorded one at a time in input order; every recorded PR lands
/// in exactly one bucket of each distribution.
#[derive(Debug, Clone)]
pub struct BenchmarkBuilder {
    coding_time: BucketDistribution,
    pickup_time: BucketDistribution,
    pr_size: BucketDistribution,
    total: u64,
    revert_prs: u64,
    hotfix_prs: u64,
}

impl Default for BenchmarkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl BenchmarkBuilder {
    pub fn new() -> Self {
        Self {
            coding_time: BucketDistribution::new(&CODING_TIME),
            pickup_time: BucketDistribution::new(&PICKUP_TIME),
            pr_size: BucketDistribution::new(&PR_SIZE),
            total: 0,
            revert_prs: 0,
            hotfix_prs: 0,
        }
    }

    pub fn record(&mut self, metrics: &PrMetrics) {
        self.coding_time.record(metrics.coding_time_minutes);
        self.pickup_time.record(metrics.pickup_time.minutes());
        self.pr_size.record(metrics.size as f64);
        self.total += 1;

        if metrics.is_revert() {
            self.revert_prs += 1;
        }
        if metrics.is_hotfix() {
            self.hotfix_prs += 1;
        }
    }

    /// Number of PRs recorded so far
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn finish(self, merge_frequency: f64) -> BenchmarkReport {
        BenchmarkReport {
            total_pull_requests: self.total,
            coding_time: self.coding_time.finish(self.total),
            pickup_time: self.pickup_time.finish(self.total),
            pr_size: self.pr_size.finish(self.total),
            revert_pull_requests: self.revert_prs,
            hotfix_pull_requests: self.hotfix_prs,
            merge_frequency,
        }
    }
}

impl<'a> Extend<&'a PrMetrics> for BenchmarkBuilder {
    fn extend<I: IntoIterator<Item = &'a PrMetrics>>(&mut self, iter: I) {
        for metrics in iter {
            self.record(metrics);
        }
    }
}

impl<'a> FromIterator<&'a PrMetrics> for BenchmarkBuilder {
    fn from_iter<I: IntoIterator<Item = &'a PrMetrics>>(iter: I) -> Self {
        let mut builder = Self::new();
        builder.extend(iter);
        builder
    }
}

/// Finished benchmark for one repository
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkReport {
    pub total_pull_requests: u64,
    pub coding_time: BucketDistribution,
    pub pickup_time: BucketDistribution,
    pub pr_size: BucketDistribution,
    pub revert_pull_requests: u64,
    pub hotfix_pull_requests: u64,
    /// PRs per day
    pub merge_frequency: f64,
}

impl BenchmarkReport {
    /// False for an empty run; percentages are then absent
    pub fn has_data(&self) -> bool {
        self.total_pull_requests > 0
    }

    /// Distributions in report order
    pub fn distributions(&self) -> [&BucketDistribution; 3] {
        [&self.coding_time, &self.pickup_time, &self.pr_size]
    }
}

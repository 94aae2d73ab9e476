//! Fixed bucket tables and per-metric distributions
//!
//! Each table is an ordered list of half-open ranges `[lower, upper)`; the
//! last range is unbounded. A value equal to a boundary belongs to the higher
//! bucket, and anything under the first upper bound (negative durations
//! included) belongs to the first one.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bucket {
    pub label: &'static str,
    pub lower: f64,
    /// `None` for the last, unbounded bucket
    pub upper: Option<f64>,
}

impl Bucket {
    const fn new(label: &'static str, lower: f64, upper: f64) -> Self {
        Self {
            label,
            lower,
            upper: Some(upper),
        }
    }

    const fn open_ended(label: &'static str, lower: f64) -> Self {
        Self {
            label,
            lower,
            upper: None,
        }
    }

    fn holds(&self, value: f64) -> bool {
        self.upper.map_or(true, |upper| value < upper)
    }
}

/// A named, ordered bucket table
#[derive(Debug)]
pub struct BucketSet {
    pub name: &'static str,
    pub buckets: &'static [Bucket],
}

impl BucketSet {
    /// Index of the bucket `value` lands in
    pub fn classify(&self, value: f64) -> usize {
        self.buckets
            .iter()
            .position(|bucket| bucket.holds(value))
            .unwrap_or(self.buckets.len() - 1)
    }
}

/// Coding time, in minutes
pub static CODING_TIME: BucketSet = BucketSet {
    name: "Coding Time",
    buckets: &[
        Bucket::new("under_0.5_hours", 0.0, 30.0),
        Bucket::new("between_0.5_and_2.5_hours", 30.0, 150.0),
        Bucket::new("between_2.5_and_24_hours", 150.0, 1440.0),
        Bucket::open_ended("over_24_hours", 1440.0),
    ],
};

/// Pickup time, in minutes
pub static PICKUP_TIME: BucketSet = BucketSet {
    name: "Pickup Time",
    buckets: &[
        Bucket::new("under_1_hour", 0.0, 60.0),
        Bucket::new("between_1_and_3_hours", 60.0, 180.0),
        Bucket::new("between_3_and_14_hours", 180.0, 840.0),
        Bucket::open_ended("over_14_hours", 840.0),
    ],
};

/// PR size, in lines changed
pub static PR_SIZE: BucketSet = BucketSet {
    name: "PR Size",
    buckets: &[
        Bucket::new("under_98_lines", 0.0, 98.0),
        Bucket::new("between_98_and_148_lines", 98.0, 148.0),
        Bucket::new("between_148_and_218_lines", 148.0, 218.0),
        Bucket::open_ended("over_218_lines", 218.0),
    ],
};

/// Count (and, once finished, share) of one bucket
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketCount {
    pub label: &'static str,
    pub count: u64,
    /// Filled in by [`BucketDistribution::finish`]; `None` when no PR was
    /// recorded
    pub percentage: Option<f64>,
}

/// Counts per bucket for one metric, in table order
#[derive(Debug, Clone, Serialize)]
pub struct BucketDistribution {
    pub metric: &'static str,
    pub buckets: Vec<BucketCount>,
    #[serde(skip)]
    set: &'static BucketSet,
}

impl BucketDistribution {
    pub fn new(set: &'static BucketSet) -> Self {
        Self {
            metric: set.name,
            buckets: set
                .buckets
                .iter()
                .map(|bucket| BucketCount {
                    label: bucket.label,
                    count: 0,
                    percentage: None,
                })
                .collect(),
            set,
        }
    }

    /// Count `value` in its bucket and return that bucket's index
    pub fn record(&mut self, value: f64) -> usize {
        let index = self.set.classify(value);
        self.buckets[index].count += 1;
        index
    }

    pub fn total(&self) -> u64 {
        self.buckets.iter().map(|b| b.count).sum()
    }

    pub fn count(&self, label: &str) -> Option<u64> {
        self.buckets
            .iter()
            .find(|b| b.label == label)
            .map(|b| b.count)
    }

    /// Turn counts into percentages of `total`. With a zero total the
    /// percentages stay `None`.
    pub fn finish(mut self, total: u64) -> Self {
        for bucket in &mut self.buckets {
            bucket.percentage =
                (total > 0).then(|| bucket.count as f64 / total as f64 * 100.0);
        }
        self
    }

    pub fn has_data(&self) -> bool {
        self.buckets.iter().any(|b| b.percentage.is_some())
    }
}

//! Metric calculation and benchmark aggregation

pub mod benchmark;
pub mod buckets;
pub mod collect;
pub mod metrics;


pub use benchmark::{BenchmarkBuilder, BenchmarkReport};
pub use collect::{CollectError, Collection, CollectionBuilder, Collector, FetchedPr};
pub use metrics::{PickupTime, PrMetrics};

//! Result aggregation
//!
//! Turns a stream of per-question verdicts into category, difficulty and
//! trigger statistics plus the difficulty trend check.

pub mod aggregator;
pub mod bucket;
pub mod summary;
pub mod trend;

pub use aggregator::ResultAggregator;
pub use bucket::{BucketCounts, BucketStats, TriggerGroup};
pub use summary::{KindCount, RunSummary};
pub use trend::{DifficultyTrend, TierRate, TrendStatus, TrendViolation};

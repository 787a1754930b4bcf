//! Completion statistics.
//!
//! [`Stats`] is the persisted counter record; [`StatsAggregator`] folds
//! completed focus sessions into it through the storage port.

mod aggregator;
mod counters;

pub use aggregator::{LocalToday, StatsAggregator, Today};
pub use counters::Stats;

//! Admin statistics derived from payment history

pub mod aggregator;

pub use aggregator::StatsAggregator;

//! Analysis tools for benchmark runs

pub mod stats;

pub use stats::{BenchmarkReport, RunningStatistic};

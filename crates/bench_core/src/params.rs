//! Benchmark configuration and series settings

use serde::{Deserialize, Serialize};
use std::fmt;

/// One `stockfish bench` configuration.
///
/// Field order matters: the derived ordering is lexicographic on
/// `(threads, tt_size_mb, depth)` and is used to sort reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BenchParams {
    /// Number of search threads
    pub threads: u32,
    /// Transposition table size in MB
    pub tt_size_mb: u32,
    /// Search depth limit
    pub depth: u32,
}

impl BenchParams {
    pub fn new(threads: u32, tt_size_mb: u32, depth: u32) -> Self {
        Self {
            threads,
            tt_size_mb,
            depth,
        }
    }

    /// Positional arguments in the order `bench` expects them.
    pub fn bench_args(&self) -> [String; 3] {
        [
            self.tt_size_mb.to_string(),
            self.threads.to_string(),
            self.depth.to_string(),
        ]
    }
}

impl fmt::Display for BenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "threads={} tt_size_mb={} depth={}",
            self.threads, self.tt_size_mb, self.depth
        )
    }
}

/// Parameters of a sequence of runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesParams {
    /// Number of times to repeat each configuration
    pub repetitions: usize,
    /// Consecutive non-improving configurations tolerated before stopping
    pub max_failures_to_improve: u32,
}

impl Default for SeriesParams {
    fn default() -> Self {
        Self {
            repetitions: 3,
            max_failures_to_improve: 3,
        }
    }
}

#[cfg(test)]
#[path = "params_tests.rs"]
mod params_tests;

//! Configuration sequences for the two swept dimensions
//!
//! Both are plain resumable iterators. They never decide when a sweep ends;
//! the controller stops pulling from them.

use crate::params::BenchParams;

/// Thread counts 1, 2, 3, ... at a fixed table size and depth.
#[derive(Debug, Clone)]
pub struct ThreadSweep {
    next_threads: Option<u32>,
    tt_size_mb: u32,
    depth: u32,
}

impl ThreadSweep {
    pub fn new(tt_size_mb: u32, depth: u32) -> Self {
        Self::starting_at(1, tt_size_mb, depth)
    }

    pub fn starting_at(threads: u32, tt_size_mb: u32, depth: u32) -> Self {
        Self {
            next_threads: Some(threads),
            tt_size_mb,
            depth,
        }
    }
}

impl Iterator for ThreadSweep {
    type Item = BenchParams;

    fn next(&mut self) -> Option<BenchParams> {
        let threads = self.next_threads?;
        self.next_threads = threads.checked_add(1);
        Some(BenchParams::new(threads, self.tt_size_mb, self.depth))
    }
}

/// Stockfish's default hash size, where table-size sweeps start.
pub const DEFAULT_TT_SIZE_MB: u32 = 16;

/// Table sizes doubling from a start value at fixed threads and depth.
///
/// Ends once the next size would not fit in a `u32`.
#[derive(Debug, Clone)]
pub struct TtSizeSweep {
    next_size: Option<u32>,
    threads: u32,
    depth: u32,
}

impl TtSizeSweep {
    pub fn new(threads: u32, depth: u32) -> Self {
        Self::starting_at(DEFAULT_TT_SIZE_MB, threads, depth)
    }

    pub fn starting_at(tt_size_mb: u32, threads: u32, depth: u32) -> Self {
        Self {
            next_size: Some(tt_size_mb),
            threads,
            depth,
        }
    }
}

impl Iterator for TtSizeSweep {
    type Item = BenchParams;

    fn next(&mut self) -> Option<BenchParams> {
        let size = self.next_size?;
        self.next_size = size.checked_mul(2);
        Some(BenchParams::new(self.threads, size, self.depth))
    }
}

#[cfg(test)]
#[path = "sequence_tests.rs"]
mod sequence_tests;

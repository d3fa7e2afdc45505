//! Parser for the summary block at the end of `stockfish bench` output
//!
//! The bench command prints a long search trace followed by lines such as
//!
//! ```text
//! ===========================
//! Total time (ms) : 2113
//! Nodes searched  : 4215890
//! Nodes/second    : 1995215
//! ```
//!
//! Only the trailing run of `Label : integer` lines is read; everything
//! above the first non-matching line (counting from the bottom) is ignored.

use chrono::{DateTime, Utc};
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::error::BenchError;
use crate::result::BenchResult;

static METRIC_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^:]+\S)\s*:\s+(\d+)").expect("metric pattern is valid")
});

/// Collect the trailing `Label : integer` block, scanning bottom-up.
pub fn parse_metrics(output: &str) -> BTreeMap<String, u64> {
    let mut metrics = BTreeMap::new();
    for line in output.lines().rev() {
        let Some(caps) = METRIC_LINE.captures(line) else {
            break;
        };
        // Values too large for u64 end the block like any other non-metric line.
        let Ok(value) = caps[2].parse::<u64>() else {
            break;
        };
        metrics.insert(caps[1].to_string(), value);
    }
    metrics
}

/// Parse a full bench output into a result stamped with `time`.
pub fn parse_bench_output(output: &str, time: DateTime<Utc>) -> Result<BenchResult, BenchError> {
    BenchResult::from_metrics(&parse_metrics(output), time)
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod parser_tests;

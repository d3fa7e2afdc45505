//! Run results, per-configuration averages and the best-so-far tracker

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::BenchError;

/// Label of the nodes-per-second line in the bench summary
pub const NPS_LABEL: &str = "Nodes/second";
/// Label of the total node count line
pub const NODES_SEARCHED_LABEL: &str = "Nodes searched";
/// Label of the wall-clock time line
pub const TOTAL_TIME_LABEL: &str = "Total time (ms)";

/// Result of one completed bench invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchResult {
    pub nps: u64,
    pub nodes_searched: u64,
    pub total_time_ms: u64,
    /// When the invocation completed
    pub time: DateTime<Utc>,
}

impl BenchResult {
    /// Project parsed metrics onto a result, failing on the first absent label.
    pub fn from_metrics(
        metrics: &BTreeMap<String, u64>,
        time: DateTime<Utc>,
    ) -> Result<Self, BenchError> {
        let get = |label: &str| {
            metrics
                .get(label)
                .copied()
                .ok_or_else(|| BenchError::missing_metric(label))
        };
        Ok(Self {
            nps: get(NPS_LABEL)?,
            nodes_searched: get(NODES_SEARCHED_LABEL)?,
            total_time_ms: get(TOTAL_TIME_LABEL)?,
            time,
        })
    }
}

impl fmt::Display for BenchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "nps={} nodes_searched={} total_time_ms={} at {}",
            self.nps,
            self.nodes_searched,
            self.total_time_ms,
            self.time.to_rfc3339()
        )
    }
}

/// Mean of the results collected for one configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchSummary {
    pub nps: f64,
    pub nodes_searched: f64,
    pub total_time_ms: f64,
    /// Latest completion time in the group
    pub time: DateTime<Utc>,
}

impl BenchSummary {
    /// Arithmetic mean of every numeric field. `None` for an empty slice.
    pub fn average(results: &[BenchResult]) -> Option<Self> {
        let time = results.iter().map(|r| r.time).max()?;
        let n = results.len() as f64;
        let mean = |field: fn(&BenchResult) -> u64| {
            results.iter().map(|r| field(r) as f64).sum::<f64>() / n
        };
        Some(Self {
            nps: mean(|r| r.nps),
            nodes_searched: mean(|r| r.nodes_searched),
            total_time_ms: mean(|r| r.total_time_ms),
            time,
        })
    }
}

impl fmt::Display for BenchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "nps={:.1} nodes_searched={:.1} total_time_ms={:.1}",
            self.nps, self.nodes_searched, self.total_time_ms
        )
    }
}

/// Best value seen so far for each metric, taken independently.
///
/// `nps` and `nodes_searched` only grow, `total_time_ms` only shrinks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BestSoFar {
    pub nps: f64,
    pub nodes_searched: f64,
    pub total_time_ms: f64,
    /// Time of the average that set the current best `nps`
    pub time: DateTime<Utc>,
}

impl BestSoFar {
    /// Tracker that any real result improves on.
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            nps: 0.0,
            nodes_searched: 0.0,
            total_time_ms: f64::INFINITY,
            time: start,
        }
    }

    /// Whether `summary` beats this tracker on at least one metric.
    pub fn is_improved_by(&self, summary: &BenchSummary) -> bool {
        has_improvement(summary, self)
    }

    /// Fold `summary` in, keeping the better value of each metric.
    pub fn absorb(&mut self, summary: &BenchSummary) {
        if summary.nps > self.nps {
            self.nps = summary.nps;
            self.time = summary.time;
        }
        self.nodes_searched = self.nodes_searched.max(summary.nodes_searched);
        self.total_time_ms = self.total_time_ms.min(summary.total_time_ms);
    }
}

impl fmt::Display for BestSoFar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "nps={:.1} nodes_searched={:.1} total_time_ms={:.1}",
            self.nps, self.nodes_searched, self.total_time_ms
        )
    }
}

/// Any single metric improving counts as an improvement.
pub fn has_improvement(summary: &BenchSummary, best: &BestSoFar) -> bool {
    summary.nps > best.nps
        || summary.nodes_searched > best.nodes_searched
        || summary.total_time_ms < best.total_time_ms
}

#[cfg(test)]
#[path = "result_tests.rs"]
mod result_tests;

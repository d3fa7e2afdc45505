//! Raw results of a sweep, keyed by configuration

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::params::BenchParams;
use crate::result::{BenchResult, BenchSummary};

/// Every run of a sweep, grouped by configuration.
///
/// Results for a configuration are kept in execution order and are only
/// ever appended. Iteration is in configuration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultTable {
    runs: BTreeMap<BenchParams, Vec<BenchResult>>,
}

/// One configuration with its raw runs, the shape reports work with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableEntry {
    pub params: BenchParams,
    pub runs: Vec<BenchResult>,
    pub mean: Option<BenchSummary>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, params: BenchParams, result: BenchResult) {
        self.runs.entry(params).or_default().push(result);
    }

    /// Results recorded for `params`, empty if it never ran.
    pub fn results(&self, params: &BenchParams) -> &[BenchResult] {
        self.runs.get(params).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn count(&self, params: &BenchParams) -> usize {
        self.results(params).len()
    }

    /// Number of configurations with at least one result.
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&BenchParams, &[BenchResult])> {
        self.runs.iter().map(|(p, r)| (p, r.as_slice()))
    }

    pub fn summary(&self, params: &BenchParams) -> Option<BenchSummary> {
        BenchSummary::average(self.results(params))
    }

    /// Largest number of runs held by any configuration.
    pub fn max_runs(&self) -> usize {
        self.runs.values().map(Vec::len).max().unwrap_or(0)
    }

    pub fn entries(&self) -> Vec<TableEntry> {
        self.iter()
            .map(|(params, runs)| TableEntry {
                params: *params,
                runs: runs.to_vec(),
                mean: BenchSummary::average(runs),
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "table_tests.rs"]
mod table_tests;

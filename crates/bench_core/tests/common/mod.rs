//! Scripted bench runners shared by the integration tests

use bench_core::{BenchError, BenchParams, BenchResult, BenchRunner};
use chrono::{Duration, TimeZone, Utc};
use std::collections::HashMap;

/// Runner whose nps depends only on the thread count.
///
/// Every run of a configuration with `threads = t` reports `nps(t)`, a fixed
/// node count and a fixed time, so only nps can ever improve.
pub struct ByThreads<F> {
    nps: F,
    pub calls: Vec<BenchParams>,
    /// Fail the n-th call (0-based) with a non-zero exit
    pub fail_on_call: Option<usize>,
}

impl<F: Fn(u32) -> u64> ByThreads<F> {
    pub fn new(nps: F) -> Self {
        Self {
            nps,
            calls: Vec::new(),
            fail_on_call: None,
        }
    }

    pub fn failing_on_call(mut self, call: usize) -> Self {
        self.fail_on_call = Some(call);
        self
    }
}

impl<F: Fn(u32) -> u64> BenchRunner for ByThreads<F> {
    fn run(&mut self, params: &BenchParams) -> Result<BenchResult, BenchError> {
        let call = self.calls.len();
        self.calls.push(*params);
        if self.fail_on_call == Some(call) {
            return Err(BenchError::InvocationFailed {
                params: *params,
                message: "exit status: 1".to_string(),
            });
        }
        Ok(BenchResult {
            nps: (self.nps)(params.threads),
            nodes_searched: 1_000,
            total_time_ms: 500,
            time: Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(call as i64),
        })
    }
}

/// Runner replaying a fixed list of results per configuration.
pub struct Replay {
    pub results: HashMap<BenchParams, Vec<BenchResult>>,
    pub calls: usize,
}

impl BenchRunner for Replay {
    fn run(&mut self, params: &BenchParams) -> Result<BenchResult, BenchError> {
        self.calls += 1;
        let queue = self
            .results
            .get_mut(params)
            .expect("replay has results for every configuration");
        Ok(queue.remove(0))
    }
}

pub fn result(nps: u64, nodes_searched: u64, total_time_ms: u64) -> BenchResult {
    BenchResult {
        nps,
        nodes_searched,
        total_time_ms,
        time: Utc::now(),
    }
}

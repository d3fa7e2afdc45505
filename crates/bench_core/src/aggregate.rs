//! Repeating one configuration until enough results are collected

use tracing::warn;

use crate::error::BenchError;
use crate::executor::BenchRunner;
use crate::params::BenchParams;
use crate::table::ResultTable;

/// Whether a configuration got all of its repetitions.
#[derive(Debug)]
pub enum Acceptance {
    Accepted,
    /// An invocation failed; results gathered before it stay in the table.
    Rejected(BenchError),
}

impl Acceptance {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Acceptance::Accepted)
    }
}

/// Run `params` until `table` holds `repetitions` results for it.
///
/// Results are appended one by one as they arrive, so a failure half way
/// through leaves the earlier repetitions visible for diagnostics.
pub fn collect<R: BenchRunner + ?Sized>(
    runner: &mut R,
    params: &BenchParams,
    repetitions: usize,
    table: &mut ResultTable,
) -> Acceptance {
    while table.count(params) < repetitions {
        match runner.run(params) {
            Ok(result) => table.push(*params, result),
            Err(err) => {
                warn!("Run failed: {}", err);
                return Acceptance::Rejected(err);
            }
        }
    }
    Acceptance::Accepted
}

#[cfg(test)]
#[path = "aggregate_tests.rs"]
mod aggregate_tests;

//! Sweep controller
//!
//! Walks a sequence of configurations, repeating and averaging each one, and
//! stops once `max_failures_to_improve` consecutive configurations fail to
//! beat the best value seen for every metric. A caller-supplied
//! `force_continue` predicate can keep the sweep going regardless.

use chrono::Utc;
use std::fmt;
use tracing::info;

use crate::aggregate::{collect, Acceptance};
use crate::error::BenchError;
use crate::executor::BenchRunner;
use crate::params::{BenchParams, SeriesParams};
use crate::result::{BenchSummary, BestSoFar};
use crate::table::ResultTable;

/// Consecutive non-improving configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hysteresis {
    failures_to_improve: u32,
    max_failures_to_improve: u32,
}

impl Hysteresis {
    pub fn new(max_failures_to_improve: u32) -> Self {
        Self {
            failures_to_improve: 0,
            max_failures_to_improve,
        }
    }

    pub fn record_improvement(&mut self) {
        self.failures_to_improve = 0;
    }

    pub fn record_failure(&mut self) {
        self.failures_to_improve = self.failures_to_improve.saturating_add(1);
    }

    pub fn failures(&self) -> u32 {
        self.failures_to_improve
    }

    pub fn exhausted(&self) -> bool {
        self.failures_to_improve >= self.max_failures_to_improve
    }
}

/// Stop only when the counter is exhausted and the caller does not insist.
pub fn should_stop(hysteresis: &Hysteresis, force_continue: bool) -> bool {
    hysteresis.exhausted() && !force_continue
}

/// Why a sweep ended.
#[derive(Debug)]
pub enum StopReason {
    /// The configuration sequence ran out.
    Exhausted,
    /// Too many configurations in a row failed to improve.
    NoImprovement { last: BenchParams, failures: u32 },
    /// An invocation failed; the sweep ended at `params`.
    Failed { params: BenchParams, error: BenchError },
}

impl StopReason {
    pub fn is_failure(&self) -> bool {
        matches!(self, StopReason::Failed { .. })
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Exhausted => write!(f, "configuration sequence exhausted"),
            StopReason::NoImprovement { last, failures } => write!(
                f,
                "no improvement for {} configurations (last: {})",
                failures, last
            ),
            StopReason::Failed { params, error } => {
                write!(f, "run failed at {}: {}", params, error)
            }
        }
    }
}

/// Everything a finished sweep produced.
#[derive(Debug)]
pub struct SweepOutcome {
    pub table: ResultTable,
    pub best: BestSoFar,
    /// Averages of fully collected configurations, in execution order
    pub summaries: Vec<(BenchParams, BenchSummary)>,
    pub stop: StopReason,
}

impl SweepOutcome {
    /// Configuration whose average had the highest nps.
    pub fn best_params(&self) -> Option<BenchParams> {
        self.summaries
            .iter()
            .max_by(|a, b| a.1.nps.total_cmp(&b.1.nps))
            .map(|(params, _)| *params)
    }
}

/// Lifecycle of one sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepState {
    Running,
    Done,
}

/// Drives a `BenchRunner` across a sequence of configurations.
pub struct SweepController<R> {
    runner: R,
    series: SeriesParams,
    state: SweepState,
}

impl<R: BenchRunner> SweepController<R> {
    pub fn new(runner: R, series: SeriesParams) -> Self {
        Self {
            runner,
            series,
            state: SweepState::Done,
        }
    }

    pub fn state(&self) -> SweepState {
        self.state
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run the sweep to completion.
    ///
    /// No configuration is pulled from `configurations` after the sweep
    /// decides to stop, so unbounded sequences are fine.
    pub fn sweep<I, F>(&mut self, configurations: I, mut force_continue: F) -> SweepOutcome
    where
        I: IntoIterator<Item = BenchParams>,
        F: FnMut(&BenchParams) -> bool,
    {
        self.state = SweepState::Running;
        let mut table = ResultTable::new();
        let mut best = BestSoFar::new(Utc::now());
        let mut hysteresis = Hysteresis::new(self.series.max_failures_to_improve);
        let mut summaries = Vec::new();
        let mut stop = StopReason::Exhausted;

        for params in configurations {
            if let Acceptance::Rejected(error) =
                collect(&mut self.runner, &params, self.series.repetitions, &mut table)
            {
                stop = StopReason::Failed { params, error };
                break;
            }

            match table.summary(&params) {
                // Zero repetitions leave nothing to compare; count it as no improvement.
                None => hysteresis.record_failure(),
                Some(average) => {
                    summaries.push((params, average));
                    judge(&average, &mut best, &mut hysteresis);
                }
            }

            if should_stop(&hysteresis, force_continue(&params)) {
                stop = StopReason::NoImprovement {
                    last: params,
                    failures: hysteresis.failures(),
                };
                break;
            }
        }

        self.state = SweepState::Done;
        info!("Sweep finished: {}", stop);
        SweepOutcome {
            table,
            best,
            summaries,
            stop,
        }
    }
}

/// Compare one average against the tracker and move the counter.
fn judge(average: &BenchSummary, best: &mut BestSoFar, hysteresis: &mut Hysteresis) {
    if best.is_improved_by(average) {
        hysteresis.record_improvement();
        info!("Average {} has an improvement on best {}", average, best);
        best.absorb(average);
    } else {
        hysteresis.record_failure();
        info!(
            "Average {} has no improvement on best {}: failures={}",
            average,
            best,
            hysteresis.failures()
        );
    }
}

#[cfg(test)]
#[path = "sweep_tests.rs"]
mod sweep_tests;

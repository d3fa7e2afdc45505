//! End-to-end tests of the sweep controller with scripted runners
//!
//! Covers:
//! - Stopping after repeated non-improvement
//! - The force_continue override
//! - Invocation failures mid-configuration
//! - Per-metric improvement and tracker monotonicity

mod common;

use bench_core::{
    BenchParams, BenchResult, BestSoFar, SeriesParams, StopReason, SweepController, ThreadSweep,
    TtSizeSweep,
};
use chrono::Utc;
use common::{result, ByThreads, Replay};
use std::collections::HashMap;

fn series(repetitions: usize, max_failures_to_improve: u32) -> SeriesParams {
    SeriesParams {
        repetitions,
        max_failures_to_improve,
    }
}

// =============================================================================
// Termination
// =============================================================================

#[test]
fn test_stops_after_max_failures() {
    // Best at one thread, strictly worse afterwards.
    let runner = ByThreads::new(|t| 1_000_000 - t as u64 * 1_000);
    let mut controller = SweepController::new(runner, series(1, 2));

    let outcome = controller.sweep(ThreadSweep::new(16, 14), |_| false);

    assert_eq!(outcome.table.len(), 3, "1 improving + 2 non-improving");
    assert_eq!(controller.runner().calls.len(), 3);
    match outcome.stop {
        StopReason::NoImprovement { last, failures } => {
            assert_eq!(last.threads, 3);
            assert_eq!(failures, 2);
        }
        other => panic!("unexpected stop: {}", other),
    }
}

#[test]
fn test_improvement_resets_counter() {
    // 1: best, 2: worse, 3: new best, 4 and 5: worse.
    let nps = [0, 100, 90, 200, 150, 150];
    let runner = ByThreads::new(move |t| nps[t as usize]);
    let mut controller = SweepController::new(runner, series(1, 2));

    let outcome = controller.sweep(ThreadSweep::new(16, 14), |_| false);

    assert_eq!(outcome.table.len(), 5);
    assert_eq!(outcome.best.nps, 200.0);
    assert_eq!(outcome.best_params().map(|p| p.threads), Some(3));
}

#[test]
fn test_force_continue_extends_sweep() {
    let runner = ByThreads::new(|t| 1_000_000 - t as u64 * 1_000);
    let mut controller = SweepController::new(runner, series(1, 2));

    let outcome = controller.sweep(ThreadSweep::new(16, 14), |p| p.threads < 8);

    let threads: Vec<u32> = outcome.table.iter().map(|(p, _)| p.threads).collect();
    assert_eq!(threads, (1..=8).collect::<Vec<_>>());
    assert!(matches!(
        outcome.stop,
        StopReason::NoImprovement { last, .. } if last.threads == 8
    ));
}

#[test]
fn test_finite_sequence_exhausts() {
    let runner = ByThreads::new(|t| t as u64 * 1_000);
    let mut controller = SweepController::new(runner, series(2, 3));

    let configs: Vec<BenchParams> = ThreadSweep::new(16, 14).take(4).collect();
    let outcome = controller.sweep(configs, |_| false);

    assert!(matches!(outcome.stop, StopReason::Exhausted));
    assert_eq!(outcome.table.len(), 4);
    assert_eq!(outcome.best.nps, 4_000.0);
}

#[test]
fn test_tt_size_sweep_stops_on_plateau() {
    // nps does not depend on table size at all: only the first size improves.
    let runner = ByThreads::new(|_| 5_000);
    let mut controller = SweepController::new(runner, series(2, 3));

    let outcome = controller.sweep(TtSizeSweep::new(4, 14), |_| false);

    let sizes: Vec<u32> = outcome.table.iter().map(|(p, _)| p.tt_size_mb).collect();
    assert_eq!(sizes, vec![16, 32, 64, 128]);
}

// =============================================================================
// Repetitions and failures
// =============================================================================

#[test]
fn test_average_of_repetitions() {
    let params = BenchParams::new(1, 16, 14);
    let mut results = HashMap::new();
    results.insert(
        params,
        vec![result(100, 10, 10), result(110, 10, 10), result(120, 10, 10)],
    );
    let mut controller = SweepController::new(Replay { results, calls: 0 }, series(3, 1));

    let outcome = controller.sweep([params], |_| false);

    assert_eq!(outcome.summaries.len(), 1);
    assert_eq!(outcome.summaries[0].1.nps, 110.0);
    assert_eq!(controller.runner().calls, 3);
}

#[test]
fn test_failure_on_second_repetition_stops_sweep() {
    // Calls 0..3 complete threads=1, call 3 is threads=2 rep 1, call 4 fails.
    let runner = ByThreads::new(|t| t as u64 * 1_000).failing_on_call(4);
    let mut controller = SweepController::new(runner, series(3, 3));

    let outcome = controller.sweep(ThreadSweep::new(16, 14), |_| true);

    assert_eq!(controller.runner().calls.len(), 5);
    assert_eq!(outcome.table.count(&BenchParams::new(1, 16, 14)), 3);
    assert_eq!(outcome.table.count(&BenchParams::new(2, 16, 14)), 1);
    assert_eq!(outcome.table.len(), 2);
    assert!(outcome.stop.is_failure());
    assert_eq!(outcome.summaries.len(), 1, "failed configuration is not averaged");
}

#[test]
fn test_failure_on_first_run() {
    let runner = ByThreads::new(|_| 1).failing_on_call(0);
    let mut controller = SweepController::new(runner, series(3, 3));

    let outcome = controller.sweep(ThreadSweep::new(16, 14), |_| true);

    assert!(outcome.table.is_empty());
    assert!(matches!(
        outcome.stop,
        StopReason::Failed { params, .. } if params.threads == 1
    ));
}

#[test]
fn test_table_never_exceeds_repetitions() {
    let runner = ByThreads::new(|t| [0, 5, 9, 7, 8, 6, 4][t as usize]);
    let mut controller = SweepController::new(runner, series(4, 3));

    let outcome = controller.sweep(ThreadSweep::new(16, 14).take(6), |_| false);

    for (_, runs) in outcome.table.iter() {
        assert_eq!(runs.len(), 4);
    }
}

// =============================================================================
// Per-metric improvement
// =============================================================================

fn replay_of(rows: &[(u32, BenchResult)]) -> Replay {
    let results = rows
        .iter()
        .map(|(threads, r)| (BenchParams::new(*threads, 16, 14), vec![*r]))
        .collect();
    Replay { results, calls: 0 }
}

#[test]
fn test_any_metric_improving_keeps_sweep_alive() {
    // nps falls after threads=1, but each step improves a different metric.
    let rows = [
        (1, result(1_000, 100, 500)),
        (2, result(900, 200, 600)),
        (3, result(800, 150, 400)),
        (4, result(700, 100, 450)),
    ];
    let mut controller = SweepController::new(replay_of(&rows), series(1, 1));

    let configs: Vec<BenchParams> = ThreadSweep::new(16, 14).take(4).collect();
    let outcome = controller.sweep(configs, |_| false);

    assert_eq!(outcome.table.len(), 4);
    assert!(matches!(
        outcome.stop,
        StopReason::NoImprovement { last, .. } if last.threads == 4
    ));
    assert_eq!(outcome.best.nps, 1_000.0);
    assert_eq!(outcome.best.nodes_searched, 200.0);
    assert_eq!(outcome.best.total_time_ms, 400.0);
}

#[test]
fn test_tracker_is_monotonic() {
    let rows = [
        (1, result(500, 300, 900)),
        (2, result(700, 200, 950)),
        (3, result(600, 400, 800)),
        (4, result(800, 100, 990)),
        (5, result(750, 350, 700)),
    ];
    let mut controller = SweepController::new(replay_of(&rows), series(1, 5));

    let configs: Vec<BenchParams> = ThreadSweep::new(16, 14).take(5).collect();
    let outcome = controller.sweep(configs, |_| false);

    let mut tracker = BestSoFar::new(Utc::now());
    for (_, summary) in &outcome.summaries {
        let before = tracker;
        tracker.absorb(summary);
        assert!(tracker.nps >= before.nps);
        assert!(tracker.nodes_searched >= before.nodes_searched);
        assert!(tracker.total_time_ms <= before.total_time_ms);
    }
    assert_eq!(tracker.nps, outcome.best.nps);
    assert_eq!(tracker.nodes_searched, outcome.best.nodes_searched);
    assert_eq!(tracker.total_time_ms, outcome.best.total_time_ms);
}

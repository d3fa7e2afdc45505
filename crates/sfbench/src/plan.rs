//! Turning a configuration into a concrete sweep

use bench_core::{BenchParams, BenchRunner, SweepController, SweepOutcome, ThreadSweep, TtSizeSweep};
use tracing::info;

use crate::config::{SfbenchConfig, Varying};

/// Configurations to visit and the minimum extent of the sweep.
pub struct SweepPlan {
    pub configurations: Box<dyn Iterator<Item = BenchParams>>,
    pub force_continue: Box<dyn FnMut(&BenchParams) -> bool>,
}

impl SweepPlan {
    /// Thread counts 1, 2, ... that never stop before reaching `min_final_threads`.
    pub fn varying_threads(depth: u32, tt_size_mb: u32, min_final_threads: u32) -> Self {
        Self {
            configurations: Box::new(ThreadSweep::new(tt_size_mb, depth)),
            force_continue: Box::new(move |p| p.threads < min_final_threads),
        }
    }

    /// Hash sizes doubling from `tt_size_mb`, stopping purely on the counter.
    pub fn varying_tt_size(depth: u32, threads: u32, tt_size_mb: u32) -> Self {
        Self {
            configurations: Box::new(TtSizeSweep::starting_at(tt_size_mb, threads, depth)),
            force_continue: Box::new(|_| false),
        }
    }

    pub fn from_config(config: &SfbenchConfig, vcpu_count: u32) -> Self {
        match config.test_varying {
            Varying::Threads => {
                Self::varying_threads(config.depth, config.tt_size_mb, vcpu_count)
            }
            Varying::TtSize => Self::varying_tt_size(
                config.depth,
                resolve_threads(config.threads, vcpu_count),
                config.tt_size_mb,
            ),
        }
    }
}

/// `0` means one thread per vCPU.
pub fn resolve_threads(threads: u32, vcpu_count: u32) -> u32 {
    if threads >= 1 { threads } else { vcpu_count.max(1) }
}

/// Run `plan` to completion with `runner`.
pub fn run_plan<R: BenchRunner>(
    runner: R,
    config: &SfbenchConfig,
    plan: SweepPlan,
) -> SweepOutcome {
    info!(
        "Sweeping {:?} with {} repetitions, stopping after {} failures to improve",
        config.test_varying, config.repetitions, config.max_failures_to_improve
    );
    let mut controller = SweepController::new(runner, config.series());
    controller.sweep(plan.configurations, plan.force_continue)
}

#[cfg(test)]
#[path = "plan_tests.rs"]
mod plan_tests;

//! sfbench CLI
//!
//! Sweep Stockfish bench over thread counts or hash sizes and print a CSV
//! row per configuration. Logs go to stderr, the report to stdout.

use anyhow::{Context, Result};
use bench_core::{BenchParams, BenchRunner, StockfishBench};
use clap::Parser;
use sfbench::{
    generate_summary, run_plan, write_csv, ConfigOverrides, JsonReport, MachineInfo,
    MetadataClient, SfbenchConfig, SweepPlan, Varying,
};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "sfbench", about = "Sweep Stockfish bench until performance stops improving")]
struct Cli {
    /// Path to the Stockfish binary [default: /tmp/stockfish/stockfish]
    binary: Option<PathBuf>,

    /// Search depth passed to bench [default: 14]
    #[arg(long)]
    depth: Option<u32>,

    /// Threads for hash-size sweeps; 0 means one per vCPU [default: 0]
    #[arg(long)]
    threads: Option<u32>,

    /// Hash size in MB [default: 16]
    #[arg(long)]
    tt_size_mb: Option<u32>,

    /// Dimension to sweep [default: threads]
    #[arg(long, value_enum)]
    test_varying: Option<Varying>,

    /// Runs per configuration [default: 3]
    #[arg(long)]
    repetitions: Option<usize>,

    /// Consecutive non-improving configurations before stopping [default: 3]
    #[arg(long)]
    max_failures_to_improve: Option<u32>,

    /// Run once with one thread per vCPU and print the result
    #[arg(long)]
    quick: bool,

    /// Config file (defaults to ./sfbench.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the CSV report here instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Also export the results as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Skip the instance metadata server
    #[arg(long)]
    no_metadata: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            binary: self.binary.clone(),
            depth: self.depth,
            threads: self.threads,
            tt_size_mb: self.tt_size_mb,
            test_varying: self.test_varying,
            repetitions: self.repetitions,
            max_failures_to_improve: self.max_failures_to_improve,
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<SfbenchConfig> {
    let cwd = std::env::current_dir().context("failed to read working directory")?;
    let mut config = SfbenchConfig::discover(cli.config.as_deref(), &cwd)?;
    config.apply(cli.overrides());
    config.validate()?;
    Ok(config)
}

fn run_quick(config: &SfbenchConfig, machine: &MachineInfo) -> Result<()> {
    info!(
        "CPU Platform: {}; CPU info: {:?}",
        machine.cpu_platform, machine.cpu_info
    );
    let threads = machine.vcpu_count;
    let mut runner = StockfishBench::new(&config.binary);
    let result = runner.run(&BenchParams::new(threads, config.tt_size_mb, config.depth))?;
    println!(
        "Result with {} threads: {:.1} nps ({:.1} nps per vCPU)",
        threads,
        result.nps as f64,
        result.nps as f64 / threads as f64
    );
    Ok(())
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(&cli)?;
    let client = (!cli.no_metadata).then(|| MetadataClient::new(config.metadata_url.clone()));
    let machine = MachineInfo::collect(client.as_ref());
    info!(
        "Machine {} with {} vCPUs",
        machine.machine_type, machine.vcpu_count
    );

    if cli.quick {
        run_quick(&config, &machine)?;
        return Ok(ExitCode::SUCCESS);
    }

    let plan = SweepPlan::from_config(&config, machine.vcpu_count);
    let outcome = run_plan(StockfishBench::new(&config.binary), &config, plan);

    // Partial results are still reported when the sweep ended on a failure.
    match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_csv(file, &machine, &outcome)?;
            info!("CSV written to {}", path.display());
        }
        None => write_csv(io::stdout().lock(), &machine, &outcome)?,
    }
    if let Some(path) = &cli.json {
        JsonReport::new(&machine, config.series(), &outcome).save(path)?;
        info!("JSON written to {}", path.display());
    }

    for line in generate_summary(&outcome).lines() {
        info!("{}", line);
    }

    if outcome.stop.is_failure() {
        error!("Sweep ended early: {}", outcome.stop);
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

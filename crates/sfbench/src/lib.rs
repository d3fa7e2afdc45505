//! Stockfish bench sweeper
//!
//! This crate provides the glue around `bench_core`:
//! - Layered configuration (defaults, `sfbench.toml`, CLI flags)
//! - Machine metadata from the GCE metadata server and `/proc/cpuinfo`
//! - Planning of thread-count and hash-size sweeps
//! - CSV and JSON reports of the collected runs
//!
//! # Usage
//!
//! ```bash
//! # Sweep thread counts until nps stops improving
//! cargo run -p sfbench -- /tmp/stockfish/stockfish --depth 14 --repetitions 3
//!
//! # Sweep hash sizes at 8 threads, writing the CSV to a file
//! cargo run -p sfbench -- --test-varying ttsize --threads 8 --output ttsize.csv
//! ```

mod config;
mod machine;
mod plan;
mod report;

pub use config::*;
pub use machine::*;
pub use plan::*;
pub use report::*;

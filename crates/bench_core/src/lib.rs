//! Core of the Stockfish bench sweeper
//!
//! This crate provides:
//! - The configuration/result data model (`BenchParams`, `BenchResult`)
//! - Parsing of the trailing metric block printed by `stockfish bench`
//! - A subprocess runner and the `BenchRunner` trait it implements
//! - Repetition of one configuration and averaging of its results
//! - The sweep controller that stops once results stop improving
//!
//! # Usage
//!
//! ```no_run
//! use bench_core::{SeriesParams, StockfishBench, SweepController, ThreadSweep};
//!
//! let runner = StockfishBench::new("/tmp/stockfish/stockfish");
//! let mut controller = SweepController::new(runner, SeriesParams::default());
//! let outcome = controller.sweep(ThreadSweep::new(16, 14), |p| p.threads < 4);
//! println!("stopped: {}", outcome.stop);
//! ```

pub mod aggregate;
pub mod error;
pub mod executor;
pub mod params;
pub mod parser;
pub mod result;
pub mod sequence;
pub mod sweep;
pub mod table;

pub use aggregate::*;
pub use error::*;
pub use executor::*;
pub use params::*;
pub use parser::*;
pub use result::*;
pub use sequence::*;
pub use sweep::*;
pub use table::*;

//! Single bench invocations
//!
//! `BenchRunner` is the seam between the sweep logic and the outside world.
//! `StockfishBench` is the real implementation; tests drive the sweep with
//! scripted runners instead.

use chrono::Utc;
use std::ffi::OsString;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::info;

use crate::error::BenchError;
use crate::params::BenchParams;
use crate::parser::parse_bench_output;
use crate::result::BenchResult;

/// Anything that can produce one bench result for a configuration.
pub trait BenchRunner {
    /// Run once with `params`. Must not retry on failure.
    fn run(&mut self, params: &BenchParams) -> Result<BenchResult, BenchError>;
}

impl<R: BenchRunner + ?Sized> BenchRunner for &mut R {
    fn run(&mut self, params: &BenchParams) -> Result<BenchResult, BenchError> {
        (**self).run(params)
    }
}

impl<R: BenchRunner + ?Sized> BenchRunner for Box<R> {
    fn run(&mut self, params: &BenchParams) -> Result<BenchResult, BenchError> {
        (**self).run(params)
    }
}

/// Runs `<binary> bench <tt_size_mb> <threads> <depth>` as a subprocess.
#[derive(Debug, Clone)]
pub struct StockfishBench {
    binary: PathBuf,
    /// Arguments placed before the three configuration values
    leading_args: Vec<OsString>,
}

impl StockfishBench {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            leading_args: vec![OsString::from("bench")],
        }
    }

    /// Replace the default `bench` sub-command.
    pub fn with_leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Run the binary and return its combined stdout/stderr text.
    fn invoke(&self, params: &BenchParams) -> Result<String, BenchError> {
        let spawn_err = |source| BenchError::Spawn {
            binary: self.binary.clone(),
            source,
        };

        // One pipe for both streams keeps their interleaving intact.
        let (mut reader, writer) = std::io::pipe().map_err(spawn_err)?;
        let writer_clone = writer.try_clone().map_err(spawn_err)?;

        let mut command = Command::new(&self.binary);
        command
            .args(&self.leading_args)
            .args(params.bench_args())
            .stdin(Stdio::null())
            .stdout(writer_clone)
            .stderr(writer);
        let mut child = command.spawn().map_err(spawn_err)?;
        // The command still owns the write ends; drop it so EOF can arrive.
        drop(command);

        let mut raw = Vec::new();
        let read = reader.read_to_end(&mut raw);
        let status = child.wait().map_err(spawn_err)?;
        read.map_err(spawn_err)?;

        if !status.success() {
            return Err(BenchError::InvocationFailed {
                params: *params,
                message: format!("{} exited with {}", self.binary.display(), status),
            });
        }
        Ok(String::from_utf8_lossy(&raw).into_owned())
    }
}

impl BenchRunner for StockfishBench {
    fn run(&mut self, params: &BenchParams) -> Result<BenchResult, BenchError> {
        info!("Running {} bench with {}...", self.binary.display(), params);
        let output = self.invoke(params)?;
        let result = parse_bench_output(&output, Utc::now())?;
        info!("Run complete: {}", result);
        Ok(result)
    }
}

//! Configuration loading from sfbench.toml
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! whatever the command line sets explicitly.

use bench_core::SeriesParams;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "sfbench.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Dimension a sweep varies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Varying {
    /// Thread count 1, 2, 3, ...
    #[default]
    Threads,
    /// Hash size 16, 32, 64, ... MB
    #[value(name = "ttsize")]
    TtSize,
}

/// Full sweep configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SfbenchConfig {
    /// Path to the Stockfish binary
    #[serde(default = "default_binary")]
    pub binary: PathBuf,
    /// Search depth passed to bench
    #[serde(default = "default_depth")]
    pub depth: u32,
    /// Thread count for hash-size sweeps (0 = one per vCPU)
    #[serde(default)]
    pub threads: u32,
    /// Hash size for thread sweeps, and the first size of hash-size sweeps
    #[serde(default = "default_tt_size_mb")]
    pub tt_size_mb: u32,
    #[serde(default)]
    pub test_varying: Varying,
    /// Runs per configuration
    #[serde(default = "default_repetitions")]
    pub repetitions: usize,
    /// Consecutive non-improving configurations before stopping
    #[serde(default = "default_max_failures_to_improve")]
    pub max_failures_to_improve: u32,
    /// Base URL of the instance metadata server
    #[serde(default = "default_metadata_url")]
    pub metadata_url: String,
}

fn default_binary() -> PathBuf {
    PathBuf::from("/tmp/stockfish/stockfish")
}
fn default_depth() -> u32 {
    14
}
fn default_tt_size_mb() -> u32 {
    16
}
fn default_repetitions() -> usize {
    3
}
fn default_max_failures_to_improve() -> u32 {
    3
}
fn default_metadata_url() -> String {
    "http://metadata.google.internal".to_string()
}

impl Default for SfbenchConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            depth: default_depth(),
            threads: 0,
            tt_size_mb: default_tt_size_mb(),
            test_varying: Varying::default(),
            repetitions: default_repetitions(),
            max_failures_to_improve: default_max_failures_to_improve(),
            metadata_url: default_metadata_url(),
        }
    }
}

/// Values set explicitly on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub binary: Option<PathBuf>,
    pub depth: Option<u32>,
    pub threads: Option<u32>,
    pub tt_size_mb: Option<u32>,
    pub test_varying: Option<Varying>,
    pub repetitions: Option<usize>,
    pub max_failures_to_improve: Option<u32>,
}

impl SfbenchConfig {
    /// Parse a TOML document; missing keys take their defaults.
    pub fn from_toml(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents, path)
    }

    /// Load `path` if given, else `sfbench.toml` in `dir` if present, else defaults.
    pub fn discover(path: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(binary) = overrides.binary {
            self.binary = binary;
        }
        if let Some(depth) = overrides.depth {
            self.depth = depth;
        }
        if let Some(threads) = overrides.threads {
            self.threads = threads;
        }
        if let Some(tt_size_mb) = overrides.tt_size_mb {
            self.tt_size_mb = tt_size_mb;
        }
        if let Some(test_varying) = overrides.test_varying {
            self.test_varying = test_varying;
        }
        if let Some(repetitions) = overrides.repetitions {
            self.repetitions = repetitions;
        }
        if let Some(max) = overrides.max_failures_to_improve {
            self.max_failures_to_improve = max;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.repetitions == 0 {
            return Err(ConfigError::Invalid("repetitions must be at least 1".into()));
        }
        if self.depth == 0 {
            return Err(ConfigError::Invalid("depth must be at least 1".into()));
        }
        if self.tt_size_mb == 0 {
            return Err(ConfigError::Invalid("tt_size_mb must be at least 1".into()));
        }
        Ok(())
    }

    /// `max_failures_to_improve = 0` stops on the first non-improving
    /// configuration, the same as 1.
    pub fn series(&self) -> SeriesParams {
        SeriesParams {
            repetitions: self.repetitions,
            max_failures_to_improve: self.max_failures_to_improve.max(1),
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;

//! Host metadata for report rows
//!
//! Collects the GCE machine type, CPU platform, instance id, image and zone
//! from the instance metadata server, plus processor counts from
//! `/proc/cpuinfo`. Anything unavailable degrades to `"unknown"` so the
//! sweep can still run on machines outside GCE.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::process::Command;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, warn};

const UNKNOWN: &str = "unknown";

#[derive(Debug, Error)]
pub enum MachineInfoError {
    #[error("failed to run curl: {0}")]
    Curl(#[from] std::io::Error),

    #[error("metadata request for {path} failed: {status}")]
    Request { path: String, status: String },
}

/// Processor summary from `/proc/cpuinfo`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuInfo {
    /// Distinct logical processors
    pub processors: usize,
    /// Distinct core ids
    pub cores: usize,
    /// Distinct physical packages
    pub physicals: usize,
    /// `"<model> * <count>"` entries, most common first
    pub models: String,
}

static PROCESSOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^processor\s*:\s*(\d+)").expect("valid pattern"));
static MODEL_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^model name\s*:\s*(.*)").expect("valid pattern"));
static PHYSICAL_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^physical id\s*:\s*(\d+)").expect("valid pattern"));
static CORE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^core id\s*:\s*(\d+)").expect("valid pattern"));
static VCPU_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-(\d+)$").expect("valid pattern"));

impl CpuInfo {
    pub fn parse(text: &str) -> Self {
        let mut processors = BTreeSet::new();
        let mut cores = BTreeSet::new();
        let mut physicals = BTreeSet::new();
        let mut models: BTreeMap<String, usize> = BTreeMap::new();

        for line in text.lines() {
            if let Some(c) = PROCESSOR.captures(line) {
                processors.insert(c[1].to_string());
            } else if let Some(c) = MODEL_NAME.captures(line) {
                *models.entry(c[1].to_string()).or_insert(0) += 1;
            } else if let Some(c) = PHYSICAL_ID.captures(line) {
                physicals.insert(c[1].to_string());
            } else if let Some(c) = CORE_ID.captures(line) {
                cores.insert(c[1].to_string());
            }
        }

        let mut models: Vec<(String, usize)> = models.into_iter().collect();
        models.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        let models = models
            .iter()
            .map(|(model, count)| format!("{} * {}", model, count))
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            processors: processors.len(),
            cores: cores.len(),
            physicals: physicals.len(),
            models,
        }
    }

    /// Read `/proc/cpuinfo`, empty on other platforms.
    pub fn read() -> Self {
        match std::fs::read_to_string("/proc/cpuinfo") {
            Ok(text) => Self::parse(&text),
            Err(e) => {
                debug!("no /proc/cpuinfo: {}", e);
                Self::default()
            }
        }
    }
}

/// Fetches values from the GCE instance metadata server with `curl`.
#[derive(Debug, Clone)]
pub struct MetadataClient {
    base_url: String,
}

impl MetadataClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn get(&self, path: &str) -> Result<String, MachineInfoError> {
        let output = Command::new("curl")
            .args(["-s", "-f", "--max-time", "5"])
            .arg(format!("{}{}", self.base_url, path))
            .args(["-H", "Metadata-Flavor: Google"])
            .output()?;
        if !output.status.success() {
            return Err(MachineInfoError::Request {
                path: path.to_string(),
                status: output.status.to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Like `get`, but logs failures and falls back to `"unknown"`.
    fn get_or_unknown(&self, path: &str) -> String {
        self.get(path).unwrap_or_else(|e| {
            warn!("{}", e);
            UNKNOWN.to_string()
        })
    }
}

/// Everything known about the host, repeated on every report row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineInfo {
    pub machine_type: String,
    pub vcpu_count: u32,
    pub cpu_platform: String,
    pub cpu_info: CpuInfo,
    pub instance_id: String,
    pub image: String,
    pub zone: String,
}

/// Raw metadata values before cleanup
#[derive(Debug, Clone, Default)]
pub struct RawMetadata {
    pub machine_type: String,
    pub cpu_platform: String,
    pub instance_id: String,
    pub image: String,
    pub zone: String,
}

impl RawMetadata {
    fn unknown() -> Self {
        Self {
            machine_type: UNKNOWN.to_string(),
            cpu_platform: UNKNOWN.to_string(),
            instance_id: UNKNOWN.to_string(),
            image: UNKNOWN.to_string(),
            zone: UNKNOWN.to_string(),
        }
    }
}

/// Last `/`-separated segment, trimmed.
fn last_segment(value: &str) -> String {
    value.rsplit('/').next().unwrap_or(value).trim().to_string()
}

/// vCPU count from a machine type such as `n2-standard-8`.
pub fn vcpus_from_machine_type(machine_type: &str) -> Option<u32> {
    VCPU_SUFFIX
        .captures(machine_type.trim())
        .and_then(|c| c[1].parse().ok())
}

fn available_cpus() -> u32 {
    std::thread::available_parallelism()
        .map(|n| n.get() as u32)
        .unwrap_or(1)
}

impl MachineInfo {
    /// Combine metadata and cpuinfo, picking the best available vCPU count.
    pub fn from_parts(raw: RawMetadata, cpu_info: CpuInfo) -> Self {
        let machine_type = last_segment(&raw.machine_type);
        let vcpu_count = vcpus_from_machine_type(&machine_type)
            .or_else(|| (cpu_info.processors > 0).then_some(cpu_info.processors as u32))
            .unwrap_or_else(available_cpus);

        Self {
            machine_type,
            vcpu_count,
            cpu_platform: raw.cpu_platform.trim().to_string(),
            cpu_info,
            instance_id: raw.instance_id.trim().to_string(),
            image: last_segment(&raw.image),
            zone: last_segment(&raw.zone),
        }
    }

    /// Query the metadata server (if any) and the local cpuinfo.
    pub fn collect(client: Option<&MetadataClient>) -> Self {
        let raw = match client {
            Some(client) => RawMetadata {
                machine_type: client.get_or_unknown("/computeMetadata/v1/instance/machine-type"),
                cpu_platform: client.get_or_unknown("/computeMetadata/v1/instance/cpu-platform"),
                instance_id: client.get_or_unknown("/computeMetadata/v1/instance/id"),
                image: client.get_or_unknown("/computeMetadata/v1/instance/image"),
                zone: client.get_or_unknown("/computeMetadata/v1/instance/zone"),
            },
            None => RawMetadata::unknown(),
        };
        Self::from_parts(raw, CpuInfo::read())
    }
}

#[cfg(test)]
#[path = "machine_tests.rs"]
mod machine_tests;

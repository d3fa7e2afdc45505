//! CSV and JSON reports of a finished sweep
//!
//! The CSV has one row per configuration: machine columns, the configuration,
//! the means, then four columns per run. It is meant to be appended to a
//! spreadsheet across many machines.

use anyhow::Context;
use bench_core::{SeriesParams, SweepOutcome, TableEntry};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

use crate::machine::MachineInfo;

const MACHINE_COLUMNS: [&str; 10] = [
    "MachineType",
    "VCpuCount",
    "CpuPlatform",
    "CpuProcessors",
    "CpuCores",
    "CpuPhysicals",
    "CpuModels",
    "InstanceID",
    "Image",
    "Zone",
];

const PARAM_COLUMNS: [&str; 6] = [
    "Threads",
    "TTSizeMb",
    "Depth",
    "MeanNPS",
    "MeanTotalTimeMS",
    "MeanNodesSearched",
];

/// Header for a table whose first configuration holds `runs` results.
pub fn csv_header(runs: usize) -> Vec<String> {
    let mut header: Vec<String> = MACHINE_COLUMNS
        .iter()
        .chain(PARAM_COLUMNS.iter())
        .map(|s| s.to_string())
        .collect();
    for i in 1..=runs {
        header.push(format!("Run{}Time", i));
        header.push(format!("Run{}NPS", i));
        header.push(format!("Run{}TotalTimeMS", i));
        header.push(format!("Run{}NodesSearched", i));
    }
    header
}

fn machine_fields(machine: &MachineInfo) -> Vec<String> {
    vec![
        machine.machine_type.clone(),
        machine.vcpu_count.to_string(),
        machine.cpu_platform.clone(),
        machine.cpu_info.processors.to_string(),
        machine.cpu_info.cores.to_string(),
        machine.cpu_info.physicals.to_string(),
        machine.cpu_info.models.clone(),
        machine.instance_id.clone(),
        machine.image.clone(),
        machine.zone.clone(),
    ]
}

fn entry_fields(entry: &TableEntry) -> Vec<String> {
    let mut row = vec![
        entry.params.threads.to_string(),
        entry.params.tt_size_mb.to_string(),
        entry.params.depth.to_string(),
    ];
    if let Some(mean) = &entry.mean {
        row.push(mean.nps.to_string());
        row.push(mean.total_time_ms.to_string());
        row.push(mean.nodes_searched.to_string());
        for run in &entry.runs {
            row.push(run.time.to_rfc3339());
            row.push(run.nps.to_string());
            row.push(run.total_time_ms.to_string());
            row.push(run.nodes_searched.to_string());
        }
    }
    row
}

/// Write the CSV report. Rows are flexible: a partially collected
/// configuration simply has fewer run columns.
pub fn write_csv<W: Write>(
    writer: W,
    machine: &MachineInfo,
    outcome: &SweepOutcome,
) -> csv::Result<()> {
    let entries = outcome.table.entries();
    let runs = entries.first().map(|e| e.runs.len()).unwrap_or(0);

    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(writer);
    wtr.write_record(csv_header(runs))?;

    let machine = machine_fields(machine);
    for entry in &entries {
        let mut row = machine.clone();
        row.extend(entry_fields(entry));
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Everything written to the JSON export
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub machine: &'a MachineInfo,
    pub series: SeriesParams,
    pub stop_reason: String,
    pub entries: Vec<TableEntry>,
}

impl<'a> JsonReport<'a> {
    pub fn new(machine: &'a MachineInfo, series: SeriesParams, outcome: &SweepOutcome) -> Self {
        Self {
            machine,
            series,
            stop_reason: outcome.stop.to_string(),
            entries: outcome.table.entries(),
        }
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display()))
    }
}

/// Short human-readable summary of a sweep
pub fn generate_summary(outcome: &SweepOutcome) -> String {
    let mut report = String::new();
    report.push_str(&format!("Stopped: {}\n", outcome.stop));
    report.push_str(&format!(
        "Configurations: {} ({} fully collected)\n",
        outcome.table.len(),
        outcome.summaries.len()
    ));
    report.push_str(&format!("Best: {}\n", outcome.best));
    if let Some(params) = outcome.best_params() {
        report.push_str(&format!("Best nps at: {}\n", params));
    }
    report
}

#[cfg(test)]
#[path = "report_tests.rs"]
mod report_tests;

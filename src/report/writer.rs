// src/report/writer.rs
//! Per-task report table (`Report_<task>.csv`)

use crate::config::constants::report::{REPORT_PREFIX, VAF_DECIMALS};
use crate::error::SynergyResult;
use crate::ranking::Ranking;
use crate::report::{join_channels, split_channels};
use crate::synergy::SearchOutcome;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// One row of a task report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskReport {
    pub task: String,
    pub synergies: usize,
    pub vaf: f64,
    pub top_channels: Vec<String>,
    pub discardable_channels: Vec<String>,
    pub criterion_met: bool,
}

impl TaskReport {
    pub fn new(task: &str, outcome: &SearchOutcome, ranking: &Ranking, top: usize, bottom: usize) -> Self {
        let factorization = outcome.factorization();
        Self {
            task: task.to_string(),
            synergies: factorization.n_components,
            vaf: round_to(factorization.vaf, VAF_DECIMALS),
            top_channels: ranking.top(top),
            discardable_channels: ranking.bottom(bottom),
            criterion_met: outcome.criterion_met(),
        }
    }
}

/// Flat CSV layout; channel lists live in a single cell
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct ReportRow {
    pub task: String,
    pub synergies: usize,
    pub vaf: f64,
    pub top_channels: String,
    pub discardable_channels: String,
    #[serde(default)]
    pub criterion_met: bool,
}

impl From<&TaskReport> for ReportRow {
    fn from(report: &TaskReport) -> Self {
        Self {
            task: report.task.clone(),
            synergies: report.synergies,
            vaf: report.vaf,
            top_channels: join_channels(&report.top_channels),
            discardable_channels: join_channels(&report.discardable_channels),
            criterion_met: report.criterion_met,
        }
    }
}

impl From<ReportRow> for TaskReport {
    fn from(row: ReportRow) -> Self {
        Self {
            task: row.task,
            synergies: row.synergies,
            vaf: row.vaf,
            top_channels: split_channels(&row.top_channels),
            discardable_channels: split_channels(&row.discardable_channels),
            criterion_met: row.criterion_met,
        }
    }
}

/// Report Writer
pub struct ReportWriter;

impl ReportWriter {
    /// File name for `task`'s report
    pub fn file_name(task: &str) -> String {
        format!("{REPORT_PREFIX}{task}.csv")
    }

    /// Write `reports` to `<output_dir>/Report_<task>.csv`, named after the
    /// first report's task. Returns the written path.
    pub fn write(output_dir: &Path, reports: &[TaskReport]) -> SynergyResult<PathBuf> {
        let task = reports.first().map(|r| r.task.as_str()).unwrap_or("empty");
        std::fs::create_dir_all(output_dir)?;
        let path = output_dir.join(Self::file_name(task));

        let mut writer = csv::Writer::from_path(&path)?;
        for report in reports {
            writer.serialize(ReportRow::from(report))?;
        }
        writer.flush()?;

        info!(path = %path.display(), rows = reports.len(), "report written");
        Ok(path)
    }

    /// Read every row of a report file
    pub fn read(path: &Path) -> SynergyResult<Vec<TaskReport>> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut reports = Vec::new();
        for row in reader.deserialize::<ReportRow>() {
            reports.push(row?.into());
        }
        Ok(reports)
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

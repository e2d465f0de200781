// src/report/summary.rs
//! Cross-task summary of discardable channels
//!
//! Scans a directory tree for task reports, lists each task's discardable
//! channels and counts how often every channel was discarded across tasks.

use crate::config::constants::report::{REPORT_PREFIX, SUMMARY_DETAIL_FILE, SUMMARY_RANKING_FILE};
use crate::error::SynergyResult;
use crate::report::writer::ReportWriter;
use crate::report::join_channels;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Discardable channels of one task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDiscards {
    pub task: String,
    pub discardable_channels: String,
}

/// How many tasks discarded a channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscardCount {
    pub channel: String,
    pub times_discarded: usize,
}

/// Aggregated view over all reports under a root
#[derive(Debug, Clone, PartialEq)]
pub struct DiscardSummary {
    /// One row per task, sorted by task name
    pub details: Vec<TaskDiscards>,
    /// Descending by count; ties keep first-seen order
    pub ranking: Vec<DiscardCount>,
}

impl DiscardSummary {
    /// Build from per-task discard lists, in report discovery order
    pub fn from_tasks(tasks: Vec<(String, Vec<String>)>) -> Self {
        let mut ranking: Vec<DiscardCount> = Vec::new();
        for channel in tasks.iter().flat_map(|(_, channels)| channels) {
            match ranking.iter_mut().find(|c| &c.channel == channel) {
                Some(count) => count.times_discarded += 1,
                None => ranking.push(DiscardCount {
                    channel: channel.clone(),
                    times_discarded: 1,
                }),
            }
        }
        ranking.sort_by(|a, b| b.times_discarded.cmp(&a.times_discarded));

        let mut details: Vec<TaskDiscards> = tasks
            .into_iter()
            .map(|(task, channels)| TaskDiscards {
                task,
                discardable_channels: join_channels(&channels),
            })
            .collect();
        details.sort_by(|a, b| a.task.cmp(&b.task));

        Self { details, ranking }
    }
}

/// Cross-task Summarizer rooted at one directory
pub struct Summarizer {
    root: PathBuf,
}

impl Summarizer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn detail_path(&self) -> PathBuf {
        self.root.join(SUMMARY_DETAIL_FILE)
    }

    pub fn ranking_path(&self) -> PathBuf {
        self.root.join(SUMMARY_RANKING_FILE)
    }

    /// Every `Report_*.csv` below the root, in a stable walk order
    pub fn find_reports(&self) -> Vec<PathBuf> {
        WalkDir::new(&self.root)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    warn!(error = %err, "error accessing entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| is_report_file(entry.path()))
            .map(|entry| entry.path().to_path_buf())
            .collect()
    }

    /// Aggregate all reports without writing anything.
    ///
    /// Unreadable or empty reports are skipped. Returns `None` if no report
    /// contributed a row.
    pub fn collect(&self) -> Option<DiscardSummary> {
        let mut tasks = Vec::new();

        for path in self.find_reports() {
            match ReportWriter::read(&path) {
                Ok(reports) => match reports.into_iter().next() {
                    Some(first) => tasks.push((first.task, first.discardable_channels)),
                    None => debug!(path = %path.display(), "empty report skipped"),
                },
                Err(err) => debug!(path = %path.display(), error = %err, "unreadable report skipped"),
            }
        }

        if tasks.is_empty() {
            return None;
        }
        Some(DiscardSummary::from_tasks(tasks))
    }

    /// Aggregate and persist both summary tables under the root
    pub fn summarize(&self) -> SynergyResult<Option<DiscardSummary>> {
        let Some(summary) = self.collect() else {
            warn!(root = %self.root.display(), "no task reports found to summarize");
            return Ok(None);
        };

        let mut detail = csv::Writer::from_path(self.detail_path())?;
        for row in &summary.details {
            detail.serialize(row)?;
        }
        detail.flush()?;

        let mut ranking = csv::Writer::from_path(self.ranking_path())?;
        if summary.ranking.is_empty() {
            ranking.write_record(["channel", "times_discarded"])?;
        }
        for row in &summary.ranking {
            ranking.serialize(row)?;
        }
        ranking.flush()?;

        info!(
            tasks = summary.details.len(),
            channels = summary.ranking.len(),
            detail = %self.detail_path().display(),
            ranking = %self.ranking_path().display(),
            "discard summary written"
        );
        Ok(Some(summary))
    }
}

fn is_report_file(path: &Path) -> bool {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
        return false;
    };
    name.starts_with(REPORT_PREFIX) && name.to_lowercase().ends_with(".csv")
}

// src/report/mod.rs
//! Per-task report tables and the cross-task discard summary

pub mod summary;
pub mod writer;

pub use summary::{DiscardCount, DiscardSummary, Summarizer, TaskDiscards};
pub use writer::{ReportWriter, TaskReport};

use crate::config::constants::report::LIST_SEPARATOR;

/// Join channel names the way report cells store them
pub fn join_channels(names: &[String]) -> String {
    names.join(LIST_SEPARATOR)
}

/// Split a report cell back into channel names; blanks and "nan" are dropped
pub fn split_channels(cell: &str) -> Vec<String> {
    let trimmed = cell.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return Vec::new();
    }
    trimmed
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

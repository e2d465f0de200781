// src/source/csv_reader.rs
//! Delimited-text recording reader
//!
//! Exports from EMG acquisition software typically start with a few lines of
//! metadata followed by a header row (`time, <channel>, <channel>, ...`) and one
//! row per sample. The header is the first row with a cell labelled like a
//! time base, at least one other labelled cell, and a numeric time value on
//! the next non-blank line. Columns with an empty header (trailing
//! delimiters) are ignored.
//!
//! Channel cells are parsed column by column. A bad cell only fails the file
//! when its column was asked for; otherwise the column is dropped.

use crate::error::{IntoFileLoadError, SynergyError, SynergyResult};
use crate::source::traits::RecordingReader;
use crate::source::types::{RawChannel, Recording};
use std::path::Path;
use tracing::debug;

const CANDIDATE_DELIMITERS: [u8; 3] = [b',', b';', b'\t'];
const TIME_MARKER: &str = "time";

/// Reader for comma, semicolon or tab separated recordings
#[derive(Debug, Clone, Default)]
pub struct CsvRecordingReader {
    delimiter: Option<u8>,
}

/// Header row position and the delimiter that splits it
struct HeaderRow {
    index: usize,
    delimiter: u8,
}

/// A channel column being filled; parsing stops at the first bad cell
struct ColumnBuffer {
    index: usize,
    label: String,
    samples: Vec<f64>,
    rejected: Option<String>,
}

impl ColumnBuffer {
    fn push(&mut self, row: usize, field: Option<&str>) {
        if self.rejected.is_some() {
            return;
        }
        match field.map(|f| (f, f.parse::<f64>())) {
            Some((_, Ok(value))) => self.samples.push(value),
            Some((raw, Err(_))) => {
                self.rejected = Some(format!("non-numeric value '{}' at row {}", raw, row));
            }
            None => self.rejected = Some(format!("missing value at row {}", row)),
        }
    }
}

/// Parsed body of a recording before column selection is applied
struct Table {
    columns: Vec<ColumnBuffer>,
    sample_rate_hz: f64,
}

impl CsvRecordingReader {
    /// Reader that sniffs the delimiter from the header row
    pub fn new() -> Self {
        Self::default()
    }

    /// Reader with a fixed delimiter
    pub fn with_delimiter(delimiter: u8) -> Self {
        Self {
            delimiter: Some(delimiter),
        }
    }

    /// Parse every labelled channel from in-memory text; `path` is only used
    /// for errors. Columns holding non-numeric cells are dropped, and the file
    /// fails only when no channel survives.
    pub fn parse_str(&self, text: &str, path: &Path) -> SynergyResult<Recording> {
        let table = self.parse_table(text, path, &|_| true)?;
        let mut channels = Vec::new();
        let mut first_rejection = None;

        for column in table.columns {
            match column.rejected {
                None => channels.push(RawChannel {
                    label: column.label,
                    samples: column.samples,
                }),
                Some(reason) => {
                    debug!(file = %path.display(), column = %column.label, %reason, "dropping non-numeric column");
                    first_rejection.get_or_insert(format!("column '{}': {}", column.label, reason));
                }
            }
        }

        if channels.is_empty() {
            return Err(file_load(
                path,
                first_rejection.unwrap_or_else(|| "no channel columns".to_string()),
            ));
        }

        Ok(Recording {
            channels,
            sample_rate_hz: table.sample_rate_hz,
        })
    }

    /// Parse only the channels whose label passes `wanted`. A wanted column
    /// with a bad cell fails the file; other columns are never parsed.
    pub fn parse_selected(
        &self,
        text: &str,
        path: &Path,
        wanted: &dyn Fn(&str) -> bool,
    ) -> SynergyResult<Recording> {
        let table = self.parse_table(text, path, wanted)?;
        let channels = table
            .columns
            .into_iter()
            .map(|column| match column.rejected {
                None => Ok(RawChannel {
                    label: column.label,
                    samples: column.samples,
                }),
                Some(reason) => Err(file_load(path, format!("column '{}': {}", column.label, reason))),
            })
            .collect::<SynergyResult<Vec<_>>>()?;

        Ok(Recording {
            channels,
            sample_rate_hz: table.sample_rate_hz,
        })
    }

    fn parse_table(&self, text: &str, path: &Path, wanted: &dyn Fn(&str) -> bool) -> SynergyResult<Table> {
        let lines: Vec<&str> = text.lines().collect();
        let header = self
            .find_header(&lines)
            .ok_or_else(|| file_load(path, "no header row with a time column".to_string()))?;

        let body = lines[header.index..].join("\n");
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(header.delimiter)
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(body.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .file_load_err(path)?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let time_column = headers
            .iter()
            .position(|h| is_time_label(h))
            .ok_or_else(|| file_load(path, "time column vanished after delimiter split".to_string()))?;

        let mut columns: Vec<ColumnBuffer> = headers
            .iter()
            .enumerate()
            .filter(|(index, label)| *index != time_column && !label.is_empty() && wanted(label.as_str()))
            .map(|(index, label)| ColumnBuffer {
                index,
                label: label.clone(),
                samples: Vec::new(),
                rejected: None,
            })
            .collect();

        let mut time = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record.file_load_err(path)?;
            if record.iter().all(|field| field.is_empty()) {
                continue;
            }

            let row = row + 1;
            let stamp = record
                .get(time_column)
                .and_then(|field| field.parse::<f64>().ok())
                .ok_or_else(|| file_load(path, format!("missing or non-numeric time value at row {}", row)))?;
            time.push(stamp);

            for column in &mut columns {
                column.push(row, record.get(column.index));
            }
        }

        let sample_rate_hz = sample_rate_from_time(&time).map_err(|reason| file_load(path, reason))?;
        Ok(Table {
            columns,
            sample_rate_hz,
        })
    }

    fn find_header(&self, lines: &[&str]) -> Option<HeaderRow> {
        lines.iter().enumerate().find_map(|(index, line)| {
            let delimiter = self.delimiter.unwrap_or_else(|| sniff_delimiter(line));
            let cells = split_cells(line, delimiter);

            let time_column = cells.iter().position(|cell| is_time_label(cell))?;
            if cells.iter().filter(|cell| !cell.is_empty()).count() < 2 {
                return None;
            }

            let first_row = lines[index + 1..].iter().find(|l| !l.trim().is_empty())?;
            let stamp = split_cells(first_row, delimiter).get(time_column)?.parse::<f64>();
            stamp.is_ok().then_some(HeaderRow { index, delimiter })
        })
    }
}

impl RecordingReader for CsvRecordingReader {
    fn read(&self, path: &Path) -> SynergyResult<Recording> {
        let text = std::fs::read_to_string(path).file_load_err(path)?;
        self.parse_str(&text, path)
    }

    fn read_selected(&self, path: &Path, wanted: &dyn Fn(&str) -> bool) -> SynergyResult<Recording> {
        let text = std::fs::read_to_string(path).file_load_err(path)?;
        self.parse_selected(&text, path, wanted)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

fn file_load(path: &Path, reason: String) -> SynergyError {
    SynergyError::FileLoad {
        path: path.to_path_buf(),
        reason,
    }
}

fn is_time_label(label: &str) -> bool {
    label.to_lowercase().contains(TIME_MARKER)
}

fn split_cells(line: &str, delimiter: u8) -> Vec<&str> {
    line.split(char::from(delimiter))
        .map(|cell| cell.trim().trim_matches('"').trim())
        .collect()
}

fn sniff_delimiter(header: &str) -> u8 {
    CANDIDATE_DELIMITERS
        .iter()
        .copied()
        .max_by_key(|&d| header.bytes().filter(|&b| b == d).count())
        .unwrap_or(b',')
}

/// Mean rate over the whole recording: `(n - 1) / (t_last - t_first)`
fn sample_rate_from_time(time: &[f64]) -> Result<f64, String> {
    if time.len() < 2 {
        return Err(format!("need at least 2 samples to derive a sampling rate, got {}", time.len()));
    }
    if time.windows(2).any(|w| w[1] <= w[0]) {
        return Err("time column is not strictly increasing".to_string());
    }
    let duration = time[time.len() - 1] - time[0];
    Ok((time.len() - 1) as f64 / duration)
}

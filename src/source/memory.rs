// src/source/memory.rs
//! In-memory recording reader for tests and benchmarks

use crate::error::{SynergyError, SynergyResult};
use crate::source::traits::RecordingReader;
use crate::source::types::Recording;
use std::collections::HashMap;
use std::path::Path;

/// Serves pre-built recordings keyed by file name
#[derive(Debug, Clone, Default)]
pub struct InMemoryReader {
    recordings: HashMap<String, Recording>,
}

impl InMemoryReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a recording under a file name (no directory component)
    pub fn insert(&mut self, file_name: &str, recording: Recording) {
        self.recordings.insert(file_name.to_string(), recording);
    }

    pub fn with(mut self, file_name: &str, recording: Recording) -> Self {
        self.insert(file_name, recording);
        self
    }
}

impl RecordingReader for InMemoryReader {
    fn read(&self, path: &Path) -> SynergyResult<Recording> {
        let key = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        self.recordings.get(&key).cloned().ok_or_else(|| SynergyError::FileLoad {
            path: path.to_path_buf(),
            reason: "no in-memory recording registered".to_string(),
        })
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_file_name() {
        let reader = InMemoryReader::new().with("trial1.csv", Recording::new(1000.0).with_channel("A", vec![1.0]));

        let recording = reader.read(Path::new("/any/folder/trial1.csv")).unwrap();
        assert_eq!(recording.sample_rate_hz, 1000.0);
        assert!(reader.read(Path::new("trial2.csv")).is_err());
    }

    #[test]
    fn test_read_selected_drops_unwanted_channels() {
        let reader = InMemoryReader::new().with(
            "trial1.csv",
            Recording::new(1000.0)
                .with_channel("R BIC", vec![1.0])
                .with_channel("GONIO", vec![0.0]),
        );

        let recording = reader
            .read_selected(Path::new("trial1.csv"), &|label| label.contains("BIC"))
            .unwrap();
        assert_eq!(recording.channels.len(), 1);
        assert_eq!(recording.channels[0].label, "R BIC");
    }
}

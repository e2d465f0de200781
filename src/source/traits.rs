// src/source/traits.rs
//! Core trait for recording file access

use crate::error::SynergyResult;
use crate::source::types::Recording;
use std::path::Path;

/// Reads one recording file into raw channel traces
pub trait RecordingReader: Send + Sync {
    /// Load every channel and the sampling rate of `path`.
    ///
    /// Failures are reported as [`SynergyError::FileLoad`](crate::error::SynergyError::FileLoad)
    /// so the loader can skip the file and keep going.
    fn read(&self, path: &Path) -> SynergyResult<Recording>;

    /// Load only the channels whose label passes `wanted`.
    ///
    /// Columns that are not wanted never fail the file. The default reads
    /// everything and drops the rest afterwards.
    fn read_selected(&self, path: &Path, wanted: &dyn Fn(&str) -> bool) -> SynergyResult<Recording> {
        let mut recording = self.read(path)?;
        recording.channels.retain(|channel| wanted(&channel.label));
        Ok(recording)
    }

    /// Short name used in logs
    fn name(&self) -> &str;
}

// src/processing/aggregator.rs
//! Folder-level signal loading and aggregation
//!
//! Every non-calibration recording in a task folder is read, its channels are
//! mapped to canonical muscle names, conditioned by the [`FilterStage`] and
//! appended per muscle. Segments are stacked in file-name order and the
//! baseline-silent rows are dropped.

use crate::config::{ChannelMap, LoaderConfig};
use crate::error::{SynergyError, SynergyResult};
use crate::processing::filter_stage::FilterStage;
use crate::processing::matrix::SignalMatrix;
use crate::source::RecordingReader;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Loader statistics for logging and reports
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadSummary {
    pub files_discovered: usize,
    pub files_used: usize,
    pub files_skipped: usize,
    pub samples_before_silence_filter: usize,
    pub samples_active: usize,
}

/// Signal Loader/Aggregator for one task folder
pub struct SignalLoader {
    config: LoaderConfig,
    channel_map: ChannelMap,
    filter_stage: FilterStage,
    reader: Box<dyn RecordingReader>,
}

impl SignalLoader {
    pub fn new(
        config: LoaderConfig,
        channel_map: ChannelMap,
        filter_stage: FilterStage,
        reader: Box<dyn RecordingReader>,
    ) -> Self {
        Self {
            config,
            channel_map,
            filter_stage,
            reader,
        }
    }

    /// Candidate recordings in `folder`, non-recursive, sorted by file name
    pub fn discover_files(&self, folder: &Path) -> SynergyResult<Vec<PathBuf>> {
        let extension = self.config.file_extension.to_lowercase();
        let mut files = Vec::new();

        for entry in std::fs::read_dir(folder)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }

            let matches_extension = path
                .extension()
                .map(|ext| ext.to_string_lossy().to_lowercase() == extension)
                .unwrap_or(false);
            if !matches_extension {
                continue;
            }

            if self.is_calibration_file(&path) {
                debug!(file = %path.display(), "skipping calibration recording");
                continue;
            }

            files.push(path);
        }

        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }

    /// Case-insensitive match of the file name against the exclusion markers
    pub fn is_calibration_file(&self, path: &Path) -> bool {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        self.config
            .exclusion_markers
            .iter()
            .any(|marker| name.contains(&marker.to_lowercase()))
    }

    /// Load, condition and aggregate every usable recording in `folder`
    pub fn load(&self, folder: &Path) -> SynergyResult<(SignalMatrix, LoadSummary)> {
        info!(folder = %folder.display(), reader = self.reader.name(), "loading EMG recordings");

        let files = self.discover_files(folder)?;
        let mut summary = LoadSummary {
            files_discovered: files.len(),
            ..LoadSummary::default()
        };

        let names = self.channel_map.canonical_names();
        let mut accumulated: Vec<Vec<f64>> = vec![Vec::new(); names.len()];

        for path in &files {
            match self.load_file(path, &names) {
                Ok(segments) if segments.is_empty() => {
                    warn!(file = %path.display(), "no recognized channels, skipping");
                    summary.files_skipped += 1;
                }
                Ok(segments) => {
                    for (slot, envelope) in segments {
                        accumulated[slot].extend(envelope);
                    }
                    summary.files_used += 1;
                }
                Err(err) if err.is_recoverable() => {
                    warn!(file = %path.display(), error = %err, "skipping unreadable recording");
                    summary.files_skipped += 1;
                }
                Err(err) => return Err(err),
            }
        }

        let channels: Vec<(String, Vec<f64>)> = names
            .iter()
            .zip(accumulated)
            .filter(|(_, trace)| !trace.is_empty())
            .map(|(name, trace)| (name.to_string(), trace))
            .collect();

        if channels.is_empty() {
            return Err(SynergyError::NoValidData {
                folder: folder.to_path_buf(),
            });
        }

        let matrix = SignalMatrix::from_channels(channels)?;
        summary.samples_before_silence_filter = matrix.n_samples();

        let active = matrix.retain_active_rows(self.config.noise_threshold_uv);
        if active.n_samples() == 0 {
            return Err(SynergyError::EmptyAfterFiltering {
                samples_before: matrix.n_samples(),
                threshold_uv: self.config.noise_threshold_uv,
            });
        }
        summary.samples_active = active.n_samples();

        info!(
            files_used = summary.files_used,
            files_skipped = summary.files_skipped,
            channels = active.n_channels(),
            active_samples = summary.samples_active,
            "signal matrix assembled"
        );

        Ok((active, summary))
    }

    /// Conditioned envelopes of one file, keyed by canonical slot.
    ///
    /// A channel whose filter rejects the sampling rate aborts this file only,
    /// and is reported as a file load failure.
    fn load_file(&self, path: &Path, names: &[&str]) -> SynergyResult<Vec<(usize, Vec<f64>)>> {
        let wanted = |label: &str| self.channel_map.resolve(label).is_some();
        let recording = self.reader.read_selected(path, &wanted)?;
        let mut segments = Vec::new();

        for raw in &recording.channels {
            let Some(canonical) = self.channel_map.resolve(&raw.label) else {
                continue;
            };
            let Some(slot) = names.iter().position(|n| *n == canonical) else {
                continue;
            };

            let envelope = self
                .filter_stage
                .process(&raw.samples, recording.sample_rate_hz)
                .map_err(|err| match err {
                    SynergyError::InvalidSamplingRate { .. } => SynergyError::FileLoad {
                        path: path.to_path_buf(),
                        reason: err.to_string(),
                    },
                    other => other,
                })?;

            debug!(file = %path.display(), label = %raw.label, channel = canonical, samples = envelope.len(), "channel conditioned");
            segments.push((slot, envelope));
        }

        Ok(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{InMemoryReader, Recording};
    use std::f64::consts::PI;

    fn burst(len: usize, fs: f64, amplitude: f64, freq: f64) -> Vec<f64> {
        (0..len)
            .map(|i| amplitude * (2.0 * PI * freq * i as f64 / fs).sin())
            .collect()
    }

    fn loader(reader: InMemoryReader) -> SignalLoader {
        let map = ChannelMap::new().with("BIC", "Biceps").with("TRI", "Triceps");
        SignalLoader::new(LoaderConfig::default(), map, FilterStage::default(), Box::new(reader))
    }

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), "").unwrap();
    }

    #[test]
    fn test_calibration_files_are_excluded() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["MVC_calib.csv", "trial1.csv", "ROM_shoulder.CSV", "notes.txt", "Trial0.csv"] {
            touch(dir.path(), name);
        }
        std::fs::create_dir(dir.path().join("nested.csv")).unwrap();

        let files = loader(InMemoryReader::new()).discover_files(dir.path()).unwrap();
        let names: Vec<_> = files.iter().map(|p| p.file_name().unwrap().to_string_lossy().into_owned()).collect();

        assert_eq!(names, vec!["Trial0.csv", "trial1.csv"]);
    }

    #[test]
    fn test_segments_concatenate_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a.csv");
        touch(dir.path(), "b.csv");

        let fs = 2000.0;
        let reader = InMemoryReader::new()
            .with(
                "a.csv",
                Recording::new(fs)
                    .with_channel("R BIC", burst(2000, fs, 200.0, 80.0))
                    .with_channel("R TRI", burst(2000, fs, 100.0, 90.0)),
            )
            .with(
                "b.csv",
                Recording::new(fs)
                    .with_channel("R BIC", burst(1000, fs, 200.0, 80.0))
                    .with_channel("R TRI", burst(1500, fs, 100.0, 90.0))
                    .with_channel("GONIO", vec![0.0; 1500]),
            );

        let (matrix, summary) = loader(reader).load(dir.path()).unwrap();

        assert_eq!(matrix.channel_names(), &["Biceps".to_string(), "Triceps".to_string()]);
        assert_eq!(summary.files_used, 2);
        assert_eq!(summary.samples_before_silence_filter, 3000);
        assert!(matrix.n_samples() <= 3000);
        assert!(matrix.n_samples() > 2000);
    }

    #[test]
    fn test_unreadable_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "good.csv");
        touch(dir.path(), "missing.csv");
        touch(dir.path(), "slow.csv");

        let reader = InMemoryReader::new()
            .with(
                "good.csv",
                Recording::new(2000.0).with_channel("BIC", burst(2000, 2000.0, 150.0, 70.0)),
            )
            .with(
                "slow.csv",
                Recording::new(200.0).with_channel("BIC", burst(200, 200.0, 150.0, 30.0)),
            );

        let (matrix, summary) = loader(reader).load(dir.path()).unwrap();

        assert_eq!(summary.files_used, 1);
        assert_eq!(summary.files_skipped, 2);
        assert_eq!(matrix.n_channels(), 1);
    }

    #[test]
    fn test_no_recognized_channels() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "trial.csv");

        let reader = InMemoryReader::new()
            .with("trial.csv", Recording::new(2000.0).with_channel("ACCEL X", vec![1.0; 100]));

        let err = loader(reader).load(dir.path()).unwrap_err();
        assert!(matches!(err, SynergyError::NoValidData { .. }));
    }

    #[test]
    fn test_silent_recording_is_empty_after_filtering() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "rest.csv");

        let reader = InMemoryReader::new()
            .with(
                "rest.csv",
                Recording::new(2000.0).with_channel("BIC", burst(2000, 2000.0, 0.5, 100.0)),
            );

        let err = loader(reader).load(dir.path()).unwrap_err();
        assert!(matches!(err, SynergyError::EmptyAfterFiltering { samples_before: 2000, .. }));
    }
}

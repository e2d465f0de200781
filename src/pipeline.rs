// src/pipeline.rs
//! Task orchestration
//!
//! A task is one folder of recordings. [`TaskRunner::run`] takes it from raw
//! files to a written report; [`TaskRunner::run_batch`] is the boundary where
//! per-task failures are caught so the remaining tasks still run.

use crate::artifacts::{emit, ArtifactSink, CompositeSink, CsvArtifactWriter, NullSink, PngArtifactWriter};
use crate::config::{LoaderConfig, SynergyConfig};
use crate::error::{SynergyError, SynergyResult};
use crate::processing::aggregator::{LoadSummary, SignalLoader};
use crate::processing::filter_stage::FilterStage;
use crate::processing::quality_monitor::{ChannelQuality, QualityMonitor};
use crate::processing::redundancy::{RedundancyAnalyzer, RedundancyReport};
use crate::ranking::Ranking;
use crate::report::{ReportWriter, TaskReport};
use crate::source::{CsvRecordingReader, RecordingReader};
use crate::synergy::{SearchOutcome, SynergySearch};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info, info_span};

/// Where a task reads from and writes to
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSpec {
    pub name: String,
    pub emg_folder: PathBuf,
    pub output_dir: PathBuf,
}

impl TaskSpec {
    pub fn new(name: impl Into<String>, emg_folder: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            emg_folder: emg_folder.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Session-root layout: recordings in `<root>/EMG`, results in
    /// `<root>/synergy_results`, task named after the root folder.
    pub fn from_root(root: &Path, loader: &LoaderConfig) -> SynergyResult<Self> {
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| {
                SynergyError::configuration(
                    "pipeline",
                    "task_from_root",
                    format!("cannot derive a task name from {}", root.display()),
                )
            })?;

        Ok(Self {
            name,
            emg_folder: root.join(&loader.emg_subfolder),
            output_dir: root.join(&loader.results_subfolder),
        })
    }
}

/// Everything produced for one task
#[derive(Debug, Clone)]
pub struct TaskOutcome {
    pub task: String,
    pub load_summary: LoadSummary,
    pub quality: Vec<ChannelQuality>,
    pub redundancy: RedundancyReport,
    pub search: SearchOutcome,
    pub ranking: Ranking,
    pub report: TaskReport,
    pub report_path: PathBuf,
}

/// Runs the full pipeline for one or many tasks
pub struct TaskRunner {
    config: SynergyConfig,
    loader: SignalLoader,
    quality: QualityMonitor,
    redundancy: RedundancyAnalyzer,
    search: SynergySearch,
    write_artifacts: bool,
}

impl TaskRunner {
    /// Runner reading delimited-text recordings
    pub fn new(config: SynergyConfig) -> Self {
        Self::with_reader(config, Box::new(CsvRecordingReader::new()))
    }

    pub fn with_reader(config: SynergyConfig, reader: Box<dyn RecordingReader>) -> Self {
        let loader = SignalLoader::new(
            config.loader.clone(),
            config.channel_map.clone(),
            FilterStage::new(config.filter.clone()),
            reader,
        );

        Self {
            loader,
            quality: QualityMonitor::new(config.quality.clone()),
            redundancy: RedundancyAnalyzer::new(config.redundancy.clone()),
            search: SynergySearch::new(config.search.clone()),
            write_artifacts: true,
            config,
        }
    }

    /// Toggle the diagnostic tables and figures; reports are always written
    pub fn with_artifacts(mut self, enabled: bool) -> Self {
        self.write_artifacts = enabled;
        self
    }

    pub fn config(&self) -> &SynergyConfig {
        &self.config
    }

    /// Process one task folder end to end
    pub fn run(&self, task: &str, emg_folder: &Path, output_dir: &Path) -> SynergyResult<TaskOutcome> {
        let span = info_span!("task", task);
        let _guard = span.enter();
        let started = Instant::now();

        let (matrix, load_summary) = self.loader.load(emg_folder)?;

        let quality = self.quality.assess(&matrix);
        let redundancy = self.redundancy.analyze(&matrix);

        let sink: Box<dyn ArtifactSink> = if self.write_artifacts {
            Box::new(
                CompositeSink::new()
                    .with(CsvArtifactWriter::new(output_dir))
                    .with(PngArtifactWriter::new(output_dir)),
            )
        } else {
            Box::new(NullSink)
        };
        emit(sink.as_ref(), "correlation", |s| s.correlation(task, &redundancy.correlation));

        let search = self.search.run(&matrix)?;
        let factorization = search.factorization();
        let ranking = Ranking::from_factorization(matrix.channel_names(), factorization);

        emit(sink.as_ref(), "activations", |s| s.activations(task, &ranking, factorization.vaf));
        emit(sink.as_ref(), "ranking", |s| s.ranking(task, &ranking));

        let report = TaskReport::new(
            task,
            &search,
            &ranking,
            self.config.report.top_channels,
            self.config.report.bottom_channels,
        );
        let report_path = ReportWriter::write(output_dir, std::slice::from_ref(&report))?;

        info!(
            synergies = report.synergies,
            vaf = report.vaf,
            criterion_met = report.criterion_met,
            top = ?report.top_channels,
            discardable = ?report.discardable_channels,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "task complete"
        );

        Ok(TaskOutcome {
            task: task.to_string(),
            load_summary,
            quality,
            redundancy,
            search,
            ranking,
            report,
            report_path,
        })
    }

    pub fn run_spec(&self, spec: &TaskSpec) -> SynergyResult<TaskOutcome> {
        self.run(&spec.name, &spec.emg_folder, &spec.output_dir)
    }

    /// Run every task; a failing task is logged and does not stop the others
    pub fn run_batch(&self, tasks: &[TaskSpec]) -> Vec<(String, SynergyResult<TaskOutcome>)> {
        tasks
            .iter()
            .map(|spec| {
                let result = self.run_spec(spec);
                if let Err(err) = &result {
                    error!(task = %spec.name, error = %err, "task failed");
                }
                (spec.name.clone(), result)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChannelMap;
    use crate::source::{InMemoryReader, Recording};
    use std::f64::consts::PI;

    fn modulated(len: usize, fs: f64, carrier_hz: f64, envelope_hz: f64, phase: f64) -> Vec<f64> {
        (0..len)
            .map(|i| {
                let t = i as f64 / fs;
                let envelope = 60.0 + 50.0 * (2.0 * PI * envelope_hz * t + phase).sin();
                envelope * (2.0 * PI * carrier_hz * t).sin()
            })
            .collect()
    }

    fn config() -> SynergyConfig {
        SynergyConfig {
            channel_map: ChannelMap::new()
                .with("BIC", "Biceps")
                .with("TRI", "Triceps")
                .with("DELT", "Deltoid"),
            ..SynergyConfig::default()
        }
    }

    #[test]
    fn test_task_spec_from_root() {
        let spec = TaskSpec::from_root(Path::new("/data/S01_reach"), &LoaderConfig::default()).unwrap();
        assert_eq!(spec.name, "S01_reach");
        assert_eq!(spec.emg_folder, PathBuf::from("/data/S01_reach/EMG"));
        assert_eq!(spec.output_dir, PathBuf::from("/data/S01_reach/synergy_results"));
    }

    #[test]
    fn test_run_writes_report() {
        let root = tempfile::tempdir().unwrap();
        let emg = root.path().join("EMG");
        std::fs::create_dir(&emg).unwrap();
        std::fs::write(emg.join("trial.csv"), "").unwrap();

        let fs = 2000.0;
        let reader = InMemoryReader::new().with(
            "trial.csv",
            Recording::new(fs)
                .with_channel("BIC", modulated(6000, fs, 90.0, 0.5, 0.0))
                .with_channel("TRI", modulated(6000, fs, 110.0, 0.5, 1.0))
                .with_channel("DELT", modulated(6000, fs, 70.0, 0.5, 2.0)),
        );

        let out = root.path().join("results");
        let outcome = TaskRunner::with_reader(config(), Box::new(reader))
            .run("reach", &emg, &out)
            .unwrap();

        assert_eq!(outcome.ranking.len(), 3);
        assert!(outcome.report_path.exists());
        assert!(out.join("Ranking_reach.csv").exists());
        assert!(outcome.report.vaf > 0.0);
    }

    #[test]
    fn test_batch_continues_after_failure() {
        let root = tempfile::tempdir().unwrap();
        let runner = TaskRunner::with_reader(config(), Box::new(InMemoryReader::new())).with_artifacts(false);

        let tasks = vec![
            TaskSpec::new("missing", root.path().join("nope"), root.path().join("out1")),
            TaskSpec::new("empty", root.path(), root.path().join("out2")),
        ];
        let results = runner.run_batch(&tasks);

        assert_eq!(results.len(), 2);
        assert!(matches!(results[0].1, Err(SynergyError::Io(_))));
        assert!(matches!(results[1].1, Err(SynergyError::NoValidData { .. })));
    }
}

// tests/loader_tests.rs
//! Folder loading through the delimited-text reader

use emg_synergy::config::{ChannelMap, LoaderConfig};
use emg_synergy::error::SynergyError;
use emg_synergy::processing::{FilterStage, SignalLoader};
use emg_synergy::source::{CsvRecordingReader, RecordingReader};
use std::f64::consts::PI;
use std::fmt::Write as _;
use std::path::Path;

fn write_trial(path: &Path, fs: f64, samples: usize, delimiter: char, labels: &[&str]) {
    let mut text = String::new();
    let header: Vec<String> = std::iter::once("Time (s)".to_string())
        .chain(labels.iter().map(|l| l.to_string()))
        .collect();
    writeln!(text, "{}", header.join(&delimiter.to_string())).unwrap();

    for i in 0..samples {
        let t = i as f64 / fs;
        write!(text, "{t:.6}").unwrap();
        for (c, _) in labels.iter().enumerate() {
            let value = 150.0 * (2.0 * PI * (80.0 + 15.0 * c as f64) * t).sin();
            write!(text, "{delimiter}{value:.4}").unwrap();
        }
        text.push('\n');
    }
    std::fs::write(path, text).unwrap();
}

fn loader() -> SignalLoader {
    SignalLoader::new(
        LoaderConfig::default(),
        ChannelMap::new().with("BIC", "Biceps").with("TRI", "Triceps"),
        FilterStage::default(),
        Box::new(CsvRecordingReader::new()),
    )
}

#[test]
fn test_only_task_recordings_are_processed() {
    let dir = tempfile::tempdir().unwrap();
    write_trial(&dir.path().join("MVC_calib.csv"), 2000.0, 1000, ',', &["BIC", "TRI"]);
    write_trial(&dir.path().join("trial1.csv"), 2000.0, 3000, ',', &["BIC", "TRI"]);

    let loader = loader();
    let files = loader.discover_files(dir.path()).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].file_name().unwrap(), "trial1.csv");

    let (matrix, summary) = loader.load(dir.path()).unwrap();
    assert_eq!(summary.files_used, 1);
    assert_eq!(summary.samples_before_silence_filter, 3000);
    assert_eq!(matrix.n_channels(), 2);
}

#[test]
fn test_sample_rate_from_time_column() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trial.csv");
    write_trial(&path, 1500.0, 1501, ';', &["BIC"]);

    let recording = CsvRecordingReader::new().read(&path).unwrap();
    assert!((recording.sample_rate_hz - 1500.0).abs() < 1e-6);
    assert_eq!(recording.channels.len(), 1);
    assert_eq!(recording.channels[0].label, "BIC");
    assert_eq!(recording.channels[0].samples.len(), 1501);
}

#[test]
fn test_corrupt_file_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    write_trial(&dir.path().join("a_trial.csv"), 2000.0, 2000, '\t', &["BIC", "TRI"]);
    std::fs::write(dir.path().join("b_trial.csv"), "time,BIC\n0.0,abc\n0.1,2\n").unwrap();

    let (_, summary) = loader().load(dir.path()).unwrap();
    assert_eq!(summary.files_discovered, 2);
    assert_eq!(summary.files_used, 1);
    assert_eq!(summary.files_skipped, 1);
}

#[test]
fn test_undersampled_recording_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    write_trial(&dir.path().join("slow.csv"), 500.0, 1000, ',', &["BIC"]);

    let err = loader().load(dir.path()).unwrap_err();
    assert!(matches!(err, SynergyError::NoValidData { .. }));
}

#[test]
fn test_unmapped_column_with_blanks_does_not_skip_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut text = String::from("Recording time: 10:32\nTime (s),R BIC,SYNC,\n");
    for i in 0..2000 {
        let t = i as f64 / 2000.0;
        let value = 150.0 * (2.0 * PI * 90.0 * t).sin();
        let sync = if i % 100 == 0 { "1" } else { "" };
        writeln!(text, "{t:.6},{value:.4},{sync},").unwrap();
    }
    std::fs::write(dir.path().join("trial.csv"), text).unwrap();

    let (matrix, summary) = loader().load(dir.path()).unwrap();
    assert_eq!(summary.files_used, 1);
    assert_eq!(summary.files_skipped, 0);
    assert_eq!(matrix.channel_names(), &["Biceps".to_string()]);
}

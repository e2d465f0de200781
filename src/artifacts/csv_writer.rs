// src/artifacts/csv_writer.rs
//! Delimited-table artifacts

use crate::artifacts::ArtifactSink;
use crate::error::SynergyResult;
use crate::processing::redundancy::CorrelationMatrix;
use crate::ranking::Ranking;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes each artifact as a CSV table under one directory
#[derive(Debug, Clone)]
pub struct CsvArtifactWriter {
    output_dir: PathBuf,
}

impl CsvArtifactWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn correlation_path(&self, task: &str) -> PathBuf {
        self.output_dir.join(format!("Pearson_{task}.csv"))
    }

    pub fn activations_path(&self, task: &str) -> PathBuf {
        self.output_dir.join(format!("W_Synergies_{task}.csv"))
    }

    pub fn ranking_path(&self, task: &str) -> PathBuf {
        self.output_dir.join(format!("Ranking_{task}.csv"))
    }

    fn writer(&self, path: &Path) -> SynergyResult<csv::Writer<std::fs::File>> {
        std::fs::create_dir_all(&self.output_dir)?;
        Ok(csv::Writer::from_path(path)?)
    }
}

impl ArtifactSink for CsvArtifactWriter {
    fn correlation(&self, task: &str, correlation: &CorrelationMatrix) -> SynergyResult<()> {
        let path = self.correlation_path(task);
        let mut out = self.writer(&path)?;

        let mut header = vec![String::new()];
        header.extend(correlation.channel_names.iter().cloned());
        out.write_record(&header)?;

        for (name, row) in correlation.channel_names.iter().zip(correlation.values.rows()) {
            let mut record = vec![name.clone()];
            record.extend(row.iter().map(|r| format!("{r:.4}")));
            out.write_record(&record)?;
        }
        out.flush()?;

        debug!(path = %path.display(), "correlation table written");
        Ok(())
    }

    fn activations(&self, task: &str, ranking: &Ranking, vaf: f64) -> SynergyResult<()> {
        let path = self.activations_path(task);
        let mut out = self.writer(&path)?;
        let weights = ranking.normalized_activations();

        let mut header = vec![format!("channel (VAF {vaf:.2}%)")];
        header.extend((1..=weights.ncols()).map(|k| format!("S{k}")));
        out.write_record(&header)?;

        for (name, row) in ranking.channel_names().iter().zip(weights.rows()) {
            let mut record = vec![name.clone()];
            record.extend(row.iter().map(|w| format!("{w:.4}")));
            out.write_record(&record)?;
        }
        out.flush()?;

        debug!(path = %path.display(), "synergy weights written");
        Ok(())
    }

    fn ranking(&self, task: &str, ranking: &Ranking) -> SynergyResult<()> {
        let path = self.ranking_path(task);
        let mut out = self.writer(&path)?;

        out.write_record(["rank", "channel", "score"])?;
        for (position, entry) in ranking.entries().iter().enumerate() {
            out.write_record([
                (position + 1).to_string(),
                entry.name.clone(),
                format!("{:.4}", entry.score),
            ])?;
        }
        out.flush()?;

        debug!(path = %path.display(), "ranking written");
        Ok(())
    }

    fn name(&self) -> &str {
        "csv"
    }
}

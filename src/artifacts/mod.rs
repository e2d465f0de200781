// src/artifacts/mod.rs
//! Diagnostic artifacts: correlation heatmap, synergy weights, channel ranking
//!
//! The pipeline hands every intermediate result worth inspecting to an
//! [`ArtifactSink`]. Sinks must never fail the run; errors are logged and
//! swallowed at this boundary. [`CsvArtifactWriter`] keeps the numbers,
//! [`PngArtifactWriter`] renders the figures, and [`CompositeSink`] fans one
//! artifact out to several sinks.

pub mod csv_writer;
pub mod png_writer;

pub use csv_writer::CsvArtifactWriter;
pub use png_writer::PngArtifactWriter;

use crate::error::SynergyResult;
use crate::processing::redundancy::CorrelationMatrix;
use crate::ranking::Ranking;
use tracing::warn;

/// Destination for per-task diagnostic artifacts
pub trait ArtifactSink: Send + Sync {
    /// Channel x channel Pearson table
    fn correlation(&self, task: &str, correlation: &CorrelationMatrix) -> SynergyResult<()>;

    /// Per-synergy normalized activation matrix (channels x synergies)
    fn activations(&self, task: &str, ranking: &Ranking, vaf: f64) -> SynergyResult<()>;

    /// Channel importance ranking
    fn ranking(&self, task: &str, ranking: &Ranking) -> SynergyResult<()>;

    fn name(&self) -> &str;
}

/// Call `f` and log instead of propagating a failure
pub fn emit<F>(sink: &dyn ArtifactSink, artifact: &str, f: F)
where
    F: FnOnce(&dyn ArtifactSink) -> SynergyResult<()>,
{
    if let Err(err) = f(sink) {
        warn!(sink = sink.name(), artifact, error = %err, "failed to persist artifact");
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl ArtifactSink for NullSink {
    fn correlation(&self, _task: &str, _correlation: &CorrelationMatrix) -> SynergyResult<()> {
        Ok(())
    }

    fn activations(&self, _task: &str, _ranking: &Ranking, _vaf: f64) -> SynergyResult<()> {
        Ok(())
    }

    fn ranking(&self, _task: &str, _ranking: &Ranking) -> SynergyResult<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}

/// Forwards every artifact to each inner sink in order.
///
/// All sinks run even when one fails. The first error is returned; later
/// ones are logged here.
#[derive(Default)]
pub struct CompositeSink {
    sinks: Vec<Box<dyn ArtifactSink>>,
}

impl CompositeSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl ArtifactSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    fn fan_out<F>(&self, f: F) -> SynergyResult<()>
    where
        F: Fn(&dyn ArtifactSink) -> SynergyResult<()>,
    {
        let mut first = None;
        for sink in &self.sinks {
            if let Err(err) = f(sink.as_ref()) {
                if first.is_none() {
                    first = Some(err);
                } else {
                    warn!(sink = sink.name(), error = %err, "artifact sink failed");
                }
            }
        }
        first.map_or(Ok(()), Err)
    }
}

impl ArtifactSink for CompositeSink {
    fn correlation(&self, task: &str, correlation: &CorrelationMatrix) -> SynergyResult<()> {
        self.fan_out(|sink| sink.correlation(task, correlation))
    }

    fn activations(&self, task: &str, ranking: &Ranking, vaf: f64) -> SynergyResult<()> {
        self.fan_out(|sink| sink.activations(task, ranking, vaf))
    }

    fn ranking(&self, task: &str, ranking: &Ranking) -> SynergyResult<()> {
        self.fan_out(|sink| sink.ranking(task, ranking))
    }

    fn name(&self) -> &str {
        "composite"
    }
}

// src/processing/quality_monitor.rs
//! Baseline noise audit per channel
//!
//! The noise floor of an envelope is taken as a low percentile of its samples;
//! channels whose floor exceeds the critical threshold are flagged. Konrad
//! (2005) suggests a good baseline sits well under 5 uV. The audit is
//! diagnostic only and never removes channels.

use crate::config::QualityConfig;
use crate::processing::matrix::SignalMatrix;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Quality levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityLevel {
    Optimal,
    Critical,
}

impl std::fmt::Display for QualityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QualityLevel::Optimal => write!(f, "OPTIMAL"),
            QualityLevel::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Per-channel noise estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelQuality {
    pub channel: String,
    pub noise_floor_uv: f64,
    pub level: QualityLevel,
}

/// Signal quality auditor
pub struct QualityMonitor {
    config: QualityConfig,
}

impl QualityMonitor {
    pub fn new(config: QualityConfig) -> Self {
        Self { config }
    }

    /// Audit every channel, sorted by ascending noise floor
    pub fn assess(&self, matrix: &SignalMatrix) -> Vec<ChannelQuality> {
        let mut report: Vec<ChannelQuality> = matrix
            .channel_names()
            .iter()
            .enumerate()
            .map(|(col, name)| {
                let samples = matrix.column(col).to_vec();
                let noise_floor_uv = percentile(&samples, self.config.noise_floor_percentile);
                ChannelQuality {
                    channel: name.clone(),
                    noise_floor_uv,
                    level: self.classify(noise_floor_uv),
                }
            })
            .collect();

        report.sort_by(|a, b| a.noise_floor_uv.total_cmp(&b.noise_floor_uv));

        for entry in &report {
            info!(channel = %entry.channel, noise_uv = entry.noise_floor_uv, quality = %entry.level, "baseline noise audit");
        }

        report
    }

    /// Above the threshold is critical; at or below is optimal
    pub fn classify(&self, noise_floor_uv: f64) -> QualityLevel {
        if noise_floor_uv > self.config.critical_noise_uv {
            QualityLevel::Critical
        } else {
            QualityLevel::Optimal
        }
    }
}

/// Linearly interpolated percentile (`q` in 0..=100); NaN for empty input
pub fn percentile(values: &[f64], q: f64) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let rank = (q.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

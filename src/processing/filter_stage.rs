// src/processing/filter_stage.rs
//! Per-channel conditioning: DC removal, band-pass, linear envelope
//!
//! Band-pass limits follow Yokoyama et al. (2019), 20-450 Hz; the 6 Hz envelope
//! low-pass approximates the mechanical contraction profile (Konrad, 2005).

use crate::config::FilterConfig;
use crate::error::SynergyResult;
use crate::processing::filters::{BandType, SosFilter};

/// Subtract the trace mean from every sample
pub fn remove_dc_offset(trace: &[f64]) -> Vec<f64> {
    if trace.is_empty() {
        return Vec::new();
    }
    let mean = trace.iter().sum::<f64>() / trace.len() as f64;
    trace.iter().map(|&x| x - mean).collect()
}

/// Full-wave rectification
pub fn rectify(trace: &[f64]) -> Vec<f64> {
    trace.iter().map(|x| x.abs()).collect()
}

/// Stateless raw-trace to envelope transform
#[derive(Debug, Clone)]
pub struct FilterStage {
    config: FilterConfig,
}

impl FilterStage {
    pub fn new(config: FilterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Zero-phase band-pass at the configured cutoffs
    pub fn bandpass(&self, trace: &[f64], sample_rate_hz: f64) -> SynergyResult<Vec<f64>> {
        let filter = SosFilter::bandpass(
            self.config.filter_order,
            self.config.bandpass_low_hz,
            self.config.bandpass_high_hz,
            sample_rate_hz,
        )?;
        Ok(filter.filtfilt(trace))
    }

    /// Rectify then zero-phase low-pass at the envelope cutoff
    pub fn linear_envelope(&self, trace: &[f64], sample_rate_hz: f64) -> SynergyResult<Vec<f64>> {
        let smoother = SosFilter::butterworth(
            self.config.envelope_order,
            self.config.envelope_cutoff_hz,
            sample_rate_hz,
            BandType::Lowpass,
        )?;
        Ok(smoother.filtfilt(&rectify(trace)))
    }

    /// Full conditioning chain; output has the input's length
    pub fn process(&self, raw: &[f64], sample_rate_hz: f64) -> SynergyResult<Vec<f64>> {
        let centered = remove_dc_offset(raw);
        let band_limited = self.bandpass(&centered, sample_rate_hz)?;
        self.linear_envelope(&band_limited, sample_rate_hz)
    }
}

impl Default for FilterStage {
    fn default() -> Self {
        Self::new(FilterConfig::default())
    }
}

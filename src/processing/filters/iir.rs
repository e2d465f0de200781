// src/processing/filters/iir.rs
//! Butterworth IIR filters in second-order sections

use super::{BandType, Biquad};
use crate::config::constants::filters::{MAX_FILTER_ORDER, MIN_FILTER_ORDER};
use crate::error::{SynergyError, SynergyResult};
use std::f64::consts::PI;

/// Cascade of second-order sections
#[derive(Debug, Clone, PartialEq)]
pub struct SosFilter {
    sections: Vec<Biquad>,
}

impl SosFilter {
    /// Create filter from sections
    pub fn new(sections: Vec<Biquad>) -> Self {
        Self { sections }
    }

    /// Butterworth low- or high-pass of the given order
    pub fn butterworth(order: usize, cutoff_hz: f64, sample_rate_hz: f64, band_type: BandType) -> SynergyResult<Self> {
        Self::check_design(order, cutoff_hz, sample_rate_hz)?;

        let w0 = 2.0 * PI * cutoff_hz / sample_rate_hz;
        let mut sections = Vec::with_capacity(order.div_ceil(2));

        // Conjugate pole pairs of the analog prototype, one biquad each
        for k in 0..order / 2 {
            let angle = PI * (2 * k + order + 1) as f64 / (2 * order) as f64;
            let q = -1.0 / (2.0 * angle.cos());
            sections.push(Self::second_order(w0, q, band_type));
        }
        if order % 2 == 1 {
            sections.push(Self::first_order(w0, band_type));
        }

        Ok(Self { sections })
    }

    /// Butterworth band-pass: high-pass at `low_hz` cascaded with low-pass at `high_hz`
    pub fn bandpass(order: usize, low_hz: f64, high_hz: f64, sample_rate_hz: f64) -> SynergyResult<Self> {
        if low_hz >= high_hz {
            return Err(SynergyError::configuration(
                "iir_filter",
                "bandpass",
                format!("Invalid band-pass range: {} - {} Hz", low_hz, high_hz),
            ));
        }

        let high_pass = Self::butterworth(order, low_hz, sample_rate_hz, BandType::Highpass)?;
        let low_pass = Self::butterworth(order, high_hz, sample_rate_hz, BandType::Lowpass)?;

        Ok(high_pass.cascade(low_pass))
    }

    /// Append another filter's sections after this one's
    pub fn cascade(mut self, other: SosFilter) -> Self {
        self.sections.extend(other.sections);
        self
    }

    pub fn sections(&self) -> &[Biquad] {
        &self.sections
    }

    /// Number of second-order sections
    pub fn order(&self) -> usize {
        self.sections.len()
    }

    /// Causal filtering from rest
    pub fn filter(&self, input: &[f64]) -> Vec<f64> {
        let mut states = vec![[0.0; 2]; self.sections.len()];
        self.filter_with_state(input, &mut states)
    }

    /// Causal filtering from an explicit per-section state
    pub fn filter_with_state(&self, input: &[f64], states: &mut [[f64; 2]]) -> Vec<f64> {
        input
            .iter()
            .map(|&x| {
                self.sections
                    .iter()
                    .zip(states.iter_mut())
                    .fold(x, |acc, (section, state)| section.step(acc, state))
            })
            .collect()
    }

    /// Per-section steady state for a constant input `x0`
    pub fn steady_state(&self, x0: f64) -> Vec<[f64; 2]> {
        let mut level = x0;
        self.sections
            .iter()
            .map(|section| {
                let state = section.steady_state(level);
                level *= section.dc_gain();
                state
            })
            .collect()
    }

    /// Cascade magnitude response at `freq_hz`
    pub fn magnitude_at(&self, freq_hz: f64, sample_rate_hz: f64) -> f64 {
        self.sections
            .iter()
            .map(|s| s.magnitude_at(freq_hz, sample_rate_hz))
            .product()
    }

    fn check_design(order: usize, cutoff_hz: f64, sample_rate_hz: f64) -> SynergyResult<()> {
        if !(MIN_FILTER_ORDER..=MAX_FILTER_ORDER).contains(&order) {
            return Err(SynergyError::configuration(
                "iir_filter",
                "butterworth",
                format!("Order must be {}-{}, got {}", MIN_FILTER_ORDER, MAX_FILTER_ORDER, order),
            ));
        }
        if cutoff_hz <= 0.0 {
            return Err(SynergyError::configuration(
                "iir_filter",
                "butterworth",
                format!("Invalid cutoff frequency: {} Hz", cutoff_hz),
            ));
        }
        if sample_rate_hz <= 0.0 || cutoff_hz >= sample_rate_hz / 2.0 {
            return Err(SynergyError::InvalidSamplingRate {
                sample_rate_hz,
                cutoff_hz,
            });
        }
        Ok(())
    }

    fn second_order(w0: f64, q: f64, band_type: BandType) -> Biquad {
        let cos_w0 = w0.cos();
        let alpha = w0.sin() / (2.0 * q);
        let a0 = 1.0 + alpha;

        let (b0, b1, b2) = match band_type {
            BandType::Lowpass => ((1.0 - cos_w0) / 2.0, 1.0 - cos_w0, (1.0 - cos_w0) / 2.0),
            BandType::Highpass => ((1.0 + cos_w0) / 2.0, -(1.0 + cos_w0), (1.0 + cos_w0) / 2.0),
        };

        Biquad {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: -2.0 * cos_w0 / a0,
            a2: (1.0 - alpha) / a0,
        }
    }

    fn first_order(w0: f64, band_type: BandType) -> Biquad {
        // Pre-warp frequency for bilinear transform
        let k = (w0 / 2.0).tan();
        let norm = 1.0 + k;

        let (b0, b1) = match band_type {
            BandType::Lowpass => (k / norm, k / norm),
            BandType::Highpass => (1.0 / norm, -1.0 / norm),
        };

        Biquad {
            b0,
            b1,
            b2: 0.0,
            a1: (k - 1.0) / norm,
            a2: 0.0,
        }
    }
}

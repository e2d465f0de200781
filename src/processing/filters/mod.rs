// src/processing/filters/mod.rs
//! Digital filters for EMG signal conditioning

pub mod iir;
pub mod zero_phase;

pub use iir::*;
pub use zero_phase::*;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BandType {
    Lowpass,
    Highpass,
}

/// Second-order section with `a0` normalized to 1
///
/// First-order sections are stored with `b2 = a2 = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Biquad {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl Biquad {
    /// Gain at DC (z = 1)
    pub fn dc_gain(&self) -> f64 {
        (self.b0 + self.b1 + self.b2) / (1.0 + self.a1 + self.a2)
    }

    /// Transposed direct form II state after an infinitely long constant input `x0`
    pub fn steady_state(&self, x0: f64) -> [f64; 2] {
        let y = self.dc_gain() * x0;
        [y - self.b0 * x0, self.b2 * x0 - self.a2 * y]
    }

    /// Advance one sample in transposed direct form II
    #[inline]
    pub fn step(&self, x: f64, state: &mut [f64; 2]) -> f64 {
        let y = self.b0 * x + state[0];
        state[0] = self.b1 * x - self.a1 * y + state[1];
        state[1] = self.b2 * x - self.a2 * y;
        y
    }

    /// Magnitude response at `freq_hz`
    pub fn magnitude_at(&self, freq_hz: f64, sample_rate_hz: f64) -> f64 {
        let w = 2.0 * std::f64::consts::PI * freq_hz / sample_rate_hz;
        // Evaluate numerator and denominator polynomials in z^-1 on the unit circle
        let eval = |c0: f64, c1: f64, c2: f64| {
            let re = c0 + c1 * w.cos() + c2 * (2.0 * w).cos();
            let im = -(c1 * w.sin() + c2 * (2.0 * w).sin());
            (re * re + im * im).sqrt()
        };
        eval(self.b0, self.b1, self.b2) / eval(1.0, self.a1, self.a2)
    }
}

// src/processing/filters/zero_phase.rs
//! Forward-backward (zero-phase) filtering
//!
//! The signal is extended at both ends by odd reflection, filtered forward with
//! steady-state initial conditions, reversed, filtered again and trimmed. The
//! result has no phase lag and squared magnitude response.

use super::SosFilter;
use crate::config::constants::filters::FILTFILT_PAD_FACTOR;

impl SosFilter {
    /// Zero-phase filtering of `input`; output has the same length
    pub fn filtfilt(&self, input: &[f64]) -> Vec<f64> {
        if input.is_empty() || self.sections().is_empty() {
            return input.to_vec();
        }

        let pad = self.default_padlen().min(input.len() - 1);
        let extended = odd_extend(input, pad);

        let mut states = self.steady_state(extended[0]);
        let mut forward = self.filter_with_state(&extended, &mut states);
        forward.reverse();

        let mut states = self.steady_state(forward[0]);
        let mut backward = self.filter_with_state(&forward, &mut states);
        backward.reverse();

        backward[pad..pad + input.len()].to_vec()
    }

    /// Padding used by [`filtfilt`](Self::filtfilt) for long signals
    pub fn default_padlen(&self) -> usize {
        FILTFILT_PAD_FACTOR * (2 * self.sections().len() + 1)
    }
}

/// Odd extension: `2*x[0] - x[pad..1]` before and `2*x[n-1] - x[n-2..n-1-pad]` after
pub fn odd_extend(input: &[f64], pad: usize) -> Vec<f64> {
    let n = input.len();
    if n == 0 || pad == 0 {
        return input.to_vec();
    }
    debug_assert!(pad < n);

    let first = input[0];
    let last = input[n - 1];

    let mut extended = Vec::with_capacity(n + 2 * pad);
    extended.extend((1..=pad).rev().map(|i| 2.0 * first - input[i]));
    extended.extend_from_slice(input);
    extended.extend((1..=pad).map(|i| 2.0 * last - input[n - 1 - i]));
    extended
}

// src/synergy/search.rs
//! Minimal-synergy search
//!
//! Factorizes the signal matrix at `n = 1, 2, ...` and stops at the first `n`
//! whose VAF clears the threshold. If no `n` up to the configured maximum
//! does, the last attempt is returned as [`SearchOutcome::Exhausted`] so that
//! callers can never mistake the fallback for a genuine success.

use crate::config::constants::synergy::MIN_COMPONENTS;
use crate::config::SearchConfig;
use crate::error::{SynergyError, SynergyResult};
use crate::processing::matrix::SignalMatrix;
use crate::synergy::nnmf::Nmf;
use crate::synergy::vaf::variance_accounted_for;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// One factorization selected or attempted by the search
#[derive(Debug, Clone, PartialEq)]
pub struct Factorization {
    pub n_components: usize,
    /// Activation matrix, channels x n
    pub w: Array2<f64>,
    /// Component matrix, n x samples
    pub h: Array2<f64>,
    pub vaf: f64,
    pub iterations: usize,
    pub converged: bool,
}

/// `(n, vaf)` of one search attempt
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchStep {
    pub n_components: usize,
    pub vaf: f64,
}

/// Terminal result of the search
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// First `n` whose VAF exceeded the threshold
    Found {
        factorization: Factorization,
        trace: Vec<SearchStep>,
    },
    /// No `n` in range met the threshold; carries the last attempt
    Exhausted {
        factorization: Factorization,
        trace: Vec<SearchStep>,
    },
}

impl SearchOutcome {
    pub fn factorization(&self) -> &Factorization {
        match self {
            SearchOutcome::Found { factorization, .. } | SearchOutcome::Exhausted { factorization, .. } => factorization,
        }
    }

    pub fn into_factorization(self) -> Factorization {
        match self {
            SearchOutcome::Found { factorization, .. } | SearchOutcome::Exhausted { factorization, .. } => factorization,
        }
    }

    pub fn trace(&self) -> &[SearchStep] {
        match self {
            SearchOutcome::Found { trace, .. } | SearchOutcome::Exhausted { trace, .. } => trace,
        }
    }

    pub fn criterion_met(&self) -> bool {
        matches!(self, SearchOutcome::Found { .. })
    }
}

enum SearchState {
    Searching(usize),
    Found(Factorization),
    Exhausted(Factorization),
}

/// Synergy Search Engine
#[derive(Debug, Clone)]
pub struct SynergySearch {
    config: SearchConfig,
}

impl SynergySearch {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run the search over `matrix` (samples x channels).
    ///
    /// The matrix is clipped to non-negative values and transposed to
    /// channels x samples before factorization. Errors from any attempt,
    /// including [`SynergyError::UnderdeterminedFactorization`], end the search.
    pub fn run(&self, matrix: &SignalMatrix) -> SynergyResult<SearchOutcome> {
        if self.config.max_components == 0 {
            return Err(SynergyError::configuration(
                "synergy_search",
                "run",
                "max_components must be at least 1",
            ));
        }

        let x = matrix.clipped_non_negative().reversed_axes();
        let mut trace = Vec::with_capacity(self.config.max_components);
        let mut state = SearchState::Searching(MIN_COMPONENTS);

        loop {
            state = match state {
                SearchState::Searching(n) => {
                    let factorization = self.attempt(&x, n)?;
                    info!(n, vaf = factorization.vaf, iterations = factorization.iterations, "synergy attempt");
                    trace.push(SearchStep {
                        n_components: n,
                        vaf: factorization.vaf,
                    });

                    if factorization.vaf > self.config.vaf_threshold {
                        SearchState::Found(factorization)
                    } else if n >= self.config.max_components {
                        SearchState::Exhausted(factorization)
                    } else {
                        SearchState::Searching(n + 1)
                    }
                }
                SearchState::Found(factorization) => {
                    info!(n = factorization.n_components, vaf = factorization.vaf, "VAF criterion met");
                    return Ok(SearchOutcome::Found { factorization, trace });
                }
                SearchState::Exhausted(factorization) => {
                    warn!(
                        n = factorization.n_components,
                        vaf = factorization.vaf,
                        threshold = self.config.vaf_threshold,
                        "VAF criterion not met within component range, using last attempt"
                    );
                    return Ok(SearchOutcome::Exhausted { factorization, trace });
                }
            };
        }
    }

    /// Single factorization of `x` (channels x samples) at rank `n`
    pub fn attempt(&self, x: &Array2<f64>, n: usize) -> SynergyResult<Factorization> {
        let fit = Nmf::from_config(n, &self.config).fit(x)?;
        let vaf = variance_accounted_for(x, &fit.reconstruct());

        Ok(Factorization {
            n_components: n,
            w: fit.w,
            h: fit.h,
            vaf,
            iterations: fit.iterations,
            converged: fit.converged,
        })
    }
}

impl Default for SynergySearch {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn synthetic(channels: usize, samples: usize, rank: usize) -> SignalMatrix {
        let data = Array2::from_shape_fn((samples, channels), |(t, c)| {
            (0..rank)
                .map(|k| {
                    let weight = ((c + 1) * (k + 2) % 5) as f64 + 0.5;
                    let activation = 1.0 + ((t as f64) * 0.03 * (k + 1) as f64).sin().abs() * 10.0;
                    weight * activation
                })
                .sum()
        });
        let names = (0..channels).map(|c| format!("ch{c}")).collect();
        SignalMatrix::new(names, data).unwrap()
    }

    #[test]
    fn test_rank_one_is_found_immediately() {
        let outcome = SynergySearch::default().run(&synthetic(4, 300, 1)).unwrap();

        assert!(outcome.criterion_met());
        assert_eq!(outcome.factorization().n_components, 1);
        assert_eq!(outcome.trace().len(), 1);
    }

    #[test]
    fn test_exhausted_returns_last_attempt() {
        let config = SearchConfig {
            vaf_threshold: 100.0,
            max_components: 3,
            ..SearchConfig::default()
        };
        let outcome = SynergySearch::new(config).run(&synthetic(4, 200, 3)).unwrap();

        assert!(!outcome.criterion_met());
        assert_eq!(outcome.factorization().n_components, 3);
        let ns: Vec<_> = outcome.trace().iter().map(|s| s.n_components).collect();
        assert_eq!(ns, (MIN_COMPONENTS..=3).collect::<Vec<_>>());
        assert_eq!(ns[0], MIN_COMPONENTS);
    }

    #[test]
    fn test_underdetermined_aborts_search() {
        let config = SearchConfig {
            vaf_threshold: 100.0,
            max_components: 8,
            ..SearchConfig::default()
        };
        let err = SynergySearch::new(config).run(&synthetic(3, 100, 3)).unwrap_err();

        assert!(matches!(err, SynergyError::UnderdeterminedFactorization { channels: 3, components: 4 }));
    }

    #[test]
    fn test_attempt_bounds() {
        let outcome = SynergySearch::default().run(&synthetic(6, 200, 2)).unwrap();
        assert!(outcome.trace().len() <= 8);
        for step in outcome.trace() {
            assert!((0.0..=100.0).contains(&step.vaf));
        }
    }

    #[test]
    fn test_zero_max_components_rejected() {
        let config = SearchConfig {
            max_components: 0,
            ..SearchConfig::default()
        };
        assert!(SynergySearch::new(config).run(&synthetic(2, 50, 1)).is_err());
    }
}

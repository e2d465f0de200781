// src/synergy/nnmf.rs
//! Non-negative matrix factorization with multiplicative updates
//!
//! Implements the Frobenius-norm update rules of Lee & Seung (1999):
//!
//! ```text
//! W <- W * (X H^T) / (W H H^T)
//! H <- H * (W^T X) / (W^T W H)
//! ```
//!
//! Initial factors are drawn from a seeded generator, so a given input, rank
//! and seed always produce the same factorization.

use crate::config::constants::synergy::NNMF_CHECK_INTERVAL;
use crate::config::SearchConfig;
use crate::error::{SynergyError, SynergyResult};
use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Result of one factorization `X ~= W H`
#[derive(Debug, Clone, PartialEq)]
pub struct NmfFit {
    /// Activation matrix, `rows(X) x k`
    pub w: Array2<f64>,
    /// Component matrix, `k x cols(X)`
    pub h: Array2<f64>,
    pub iterations: usize,
    pub converged: bool,
    /// Frobenius norm of the final residual
    pub reconstruction_error: f64,
}

impl NmfFit {
    pub fn reconstruct(&self) -> Array2<f64> {
        self.w.dot(&self.h)
    }

    pub fn n_components(&self) -> usize {
        self.w.ncols()
    }
}

/// Multiplicative-update NNMF solver
#[derive(Debug, Clone)]
pub struct Nmf {
    n_components: usize,
    max_iterations: usize,
    tolerance: f64,
    seed: u64,
}

impl Nmf {
    pub fn new(n_components: usize) -> Self {
        let defaults = SearchConfig::default();
        Self {
            n_components,
            max_iterations: defaults.max_iterations,
            tolerance: defaults.tolerance,
            seed: defaults.seed,
        }
    }

    /// Solver settings from a search configuration
    pub fn from_config(n_components: usize, config: &SearchConfig) -> Self {
        Self::new(n_components)
            .max_iterations(config.max_iterations)
            .tolerance(config.tolerance)
            .seed(config.seed)
    }

    pub fn max_iterations(mut self, n: usize) -> Self {
        self.max_iterations = n;
        self
    }

    pub fn tolerance(mut self, tol: f64) -> Self {
        self.tolerance = tol;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Factor a non-negative `x` into `W (rows x k)` and `H (k x cols)`.
    ///
    /// Fails with [`SynergyError::UnderdeterminedFactorization`] when `k`
    /// exceeds the number of rows (channels).
    pub fn fit(&self, x: &Array2<f64>) -> SynergyResult<NmfFit> {
        let (rows, cols) = x.dim();
        let k = self.n_components;

        if k == 0 {
            return Err(SynergyError::configuration("nnmf", "fit", "component count must be at least 1"));
        }
        if k > rows {
            return Err(SynergyError::UnderdeterminedFactorization {
                channels: rows,
                components: k,
            });
        }
        if cols == 0 {
            return Err(SynergyError::invalid_data("nnmf", "fit", "signal matrix", "no samples to factorize"));
        }
        if x.iter().any(|&v| v < 0.0 || !v.is_finite()) {
            return Err(SynergyError::invalid_data(
                "nnmf",
                "fit",
                "signal matrix",
                "entries must be finite and non-negative",
            ));
        }

        let (mut w, mut h) = self.random_init(x);

        let error_at_init = frobenius_residual(x, &w, &h);
        let mut previous_error = error_at_init;
        let mut iterations = 0;
        let mut converged = false;

        for iteration in 1..=self.max_iterations {
            iterations = iteration;

            let numerator = x.dot(&h.t());
            let denominator = w.dot(&h.dot(&h.t()));
            multiplicative_step(&mut w, &numerator, &denominator);

            let numerator = w.t().dot(x);
            let denominator = w.t().dot(&w).dot(&h);
            multiplicative_step(&mut h, &numerator, &denominator);

            if iteration % NNMF_CHECK_INTERVAL == 0 {
                let error = frobenius_residual(x, &w, &h);
                if error_at_init == 0.0 || (previous_error - error) / error_at_init < self.tolerance {
                    converged = true;
                    break;
                }
                previous_error = error;
            }
        }

        let reconstruction_error = frobenius_residual(x, &w, &h);
        debug!(k, iterations, converged, reconstruction_error, "nnmf finished");

        Ok(NmfFit {
            w,
            h,
            iterations,
            converged,
            reconstruction_error,
        })
    }

    /// Scaled half-normal draws: `sqrt(mean(X) / k) * |N(0, 1)|`
    fn random_init(&self, x: &Array2<f64>) -> (Array2<f64>, Array2<f64>) {
        let (rows, cols) = x.dim();
        let k = self.n_components;
        let mean = x.mean().unwrap_or(0.0);
        let scale = (mean / k as f64).sqrt();

        let mut rng = StdRng::seed_from_u64(self.seed);
        let h = Array2::from_shape_fn((k, cols), |_| scale * half_normal(&mut rng));
        let w = Array2::from_shape_fn((rows, k), |_| scale * half_normal(&mut rng));
        (w, h)
    }
}

/// `|N(0, 1)|` via the Box-Muller transform
fn half_normal<R: Rng>(rng: &mut R) -> f64 {
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen::<f64>();
    ((-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()).abs()
}

fn multiplicative_step(factor: &mut Array2<f64>, numerator: &Array2<f64>, denominator: &Array2<f64>) {
    ndarray::Zip::from(factor)
        .and(numerator)
        .and(denominator)
        .for_each(|f, &num, &den| {
            *f *= num / den.max(f64::EPSILON);
        });
}

/// `||X - W H||_F`
pub fn frobenius_residual(x: &Array2<f64>, w: &Array2<f64>, h: &Array2<f64>) -> f64 {
    let reconstruction = w.dot(h);
    x.iter()
        .zip(reconstruction.iter())
        .map(|(a, b)| (a - b) * (a - b))
        .sum::<f64>()
        .sqrt()
}

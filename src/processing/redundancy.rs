// src/processing/redundancy.rs
//! Functional redundancy between channels (Pearson correlation)
//!
//! A coefficient above the threshold (0.90, "very strong" after Evans, 1996)
//! marks two sensors as carrying near-duplicate information. Pairs are only
//! reported; which sensor to drop is left to the analyst.

use crate::config::RedundancyConfig;
use crate::processing::matrix::SignalMatrix;
use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Symmetric channel x channel Pearson table
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub channel_names: Vec<String>,
    pub values: Array2<f64>,
}

impl CorrelationMatrix {
    /// Pairwise Pearson coefficients of every column of `matrix`
    pub fn compute(matrix: &SignalMatrix) -> Self {
        let n = matrix.n_channels();
        let mut values = Array2::from_elem((n, n), f64::NAN);

        for i in 0..n {
            for j in i..n {
                let r = pearson(matrix.column(i), matrix.column(j));
                values[[i, j]] = r;
                values[[j, i]] = r;
            }
        }

        Self {
            channel_names: matrix.channel_names().to_vec(),
            values,
        }
    }

    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.channel_names.iter().position(|n| n == a)?;
        let j = self.channel_names.iter().position(|n| n == b)?;
        Some(self.values[[i, j]])
    }
}

/// Pearson coefficient; NaN when either series has zero variance.
///
/// Bit-identical series always correlate at exactly 1.0.
pub fn pearson(x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>) -> f64 {
    let n = x.len().min(y.len());
    if n == 0 {
        return f64::NAN;
    }
    if x == y {
        return 1.0;
    }

    let mean_x = x.sum() / n as f64;
    let mean_y = y.sum() / n as f64;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (&a, &b) in x.iter().zip(y.iter()) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
}

/// Unordered channel pair flagged as redundant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedundantPair {
    pub first: String,
    pub second: String,
    pub coefficient: f64,
}

/// Correlation table plus the flagged pairs
#[derive(Debug, Clone)]
pub struct RedundancyReport {
    pub correlation: CorrelationMatrix,
    pub pairs: Vec<RedundantPair>,
}

impl RedundancyReport {
    pub fn has_redundancy(&self) -> bool {
        !self.pairs.is_empty()
    }
}

/// Redundancy analyzer
pub struct RedundancyAnalyzer {
    config: RedundancyConfig,
}

impl RedundancyAnalyzer {
    pub fn new(config: RedundancyConfig) -> Self {
        Self { config }
    }

    pub fn analyze(&self, matrix: &SignalMatrix) -> RedundancyReport {
        let correlation = CorrelationMatrix::compute(matrix);
        let pairs = self.flag_pairs(&correlation);

        for pair in &pairs {
            warn!(first = %pair.first, second = %pair.second, r = pair.coefficient, "high redundancy between channels");
        }
        if pairs.is_empty() {
            info!("no critical redundancy detected");
        }

        RedundancyReport { correlation, pairs }
    }

    /// Upper-triangle pairs strictly above the threshold; NaN never flags
    pub fn flag_pairs(&self, correlation: &CorrelationMatrix) -> Vec<RedundantPair> {
        let names = &correlation.channel_names;
        let mut pairs = Vec::new();

        for i in 0..names.len() {
            for j in (i + 1)..names.len() {
                let r = correlation.values[[i, j]];
                if r > self.config.correlation_threshold {
                    pairs.push(RedundantPair {
                        first: names[i].clone(),
                        second: names[j].clone(),
                        coefficient: r,
                    });
                }
            }
        }

        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array1};

    fn matrix(names: &[&str], columns: Vec<Vec<f64>>) -> SignalMatrix {
        SignalMatrix::from_channels(
            names.iter().map(|n| n.to_string()).zip(columns).collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_pearson_basics() {
        let x = array![1.0, 2.0, 3.0, 4.0];
        let y = array![2.0, 4.0, 6.0, 8.0];
        let z = array![4.0, 3.0, 2.0, 1.0];

        assert!((pearson(x.view(), y.view()) - 1.0).abs() < 1e-12);
        assert!((pearson(x.view(), z.view()) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_constant_series_is_nan() {
        let x = array![1.0, 2.0, 3.0];
        let c = array![5.0, 5.0, 5.0];
        assert!(pearson(x.view(), c.view()).is_nan());
    }

    #[test]
    fn test_identical_channels_always_flagged() {
        let signal: Vec<f64> = (0..200).map(|i| 10.0 + (i as f64 * 0.1).sin()).collect();
        let other: Vec<f64> = (0..200).map(|i| 10.0 + (i as f64 * 0.37).cos()).collect();
        let m = matrix(&["A", "B", "C"], vec![signal.clone(), other, signal]);

        let report = RedundancyAnalyzer::new(RedundancyConfig::default()).analyze(&m);

        assert_eq!(report.pairs.len(), 1);
        assert_eq!(report.pairs[0].first, "A");
        assert_eq!(report.pairs[0].second, "C");
        assert_eq!(report.pairs[0].coefficient, 1.0);
    }

    #[test]
    fn test_identical_constant_channels_flagged() {
        let m = matrix(&["A", "B"], vec![vec![7.0; 50], vec![7.0; 50]]);
        let report = RedundancyAnalyzer::new(RedundancyConfig::default()).analyze(&m);
        assert!(report.has_redundancy());
    }

    #[test]
    fn test_matrix_is_symmetric_with_unit_diagonal() {
        let a: Vec<f64> = (0..100).map(|i| (i as f64 * 0.2).sin()).collect();
        let b: Vec<f64> = (0..100).map(|i| (i as f64 * 0.05).cos() + 0.3 * (i as f64 * 0.2).sin()).collect();
        let corr = CorrelationMatrix::compute(&matrix(&["A", "B"], vec![a, b]));

        assert_eq!(corr.values[[0, 1]], corr.values[[1, 0]]);
        assert_eq!(corr.values.diag().to_owned(), Array1::from_elem(2, 1.0));
        assert!(corr.get("A", "B").unwrap().abs() <= 1.0);
    }
}

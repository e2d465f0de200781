// src/synergy/vaf.rs
//! Variance Accounted For (Torres-Oviedo & Ting, 2007, Eq. 1)

use ndarray::{Array2, Zip};

/// `max(0, (1 - sum((X - X_hat)^2) / sum(X^2)) * 100)`
///
/// Returns 0 for an all-zero `original`, and never a negative value.
pub fn variance_accounted_for(original: &Array2<f64>, reconstructed: &Array2<f64>) -> f64 {
    debug_assert_eq!(original.dim(), reconstructed.dim());

    let mut residual = 0.0;
    let mut total = 0.0;
    Zip::from(original).and(reconstructed).for_each(|&x, &x_hat| {
        residual += (x - x_hat) * (x - x_hat);
        total += x * x;
    });

    if total == 0.0 {
        return 0.0;
    }

    let vaf = (1.0 - residual / total) * 100.0;
    if vaf.is_nan() {
        0.0
    } else {
        vaf.max(0.0)
    }
}

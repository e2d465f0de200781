// src/ranking.rs
//! Channel importance ranking from the activation matrix
//!
//! Each synergy (column of W) is divided by its own maximum, so the strongest
//! contributor of every synergy scores 1.0 in that synergy. A channel's
//! importance is the sum of its normalized contributions over all synergies.

use crate::synergy::Factorization;
use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

/// Channel with its summed normalized contribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedChannel {
    pub name: String,
    pub score: f64,
}

/// Channels ordered by descending importance
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    entries: Vec<RankedChannel>,
    normalized_w: Array2<f64>,
    channel_names: Vec<String>,
}

impl Ranking {
    /// Rank `channel_names` (row order of `w`) by normalized activation.
    ///
    /// Equal scores keep their input order.
    pub fn from_activations(channel_names: &[String], w: &Array2<f64>) -> Self {
        debug_assert_eq!(channel_names.len(), w.nrows());

        let normalized_w = normalize_per_synergy(w);
        let scores: Array1<f64> = normalized_w.sum_axis(Axis(1));

        let mut entries: Vec<RankedChannel> = channel_names
            .iter()
            .zip(scores.iter())
            .map(|(name, &score)| RankedChannel {
                name: name.clone(),
                score,
            })
            .collect();
        entries.sort_by(|a, b| b.score.total_cmp(&a.score));

        Self {
            entries,
            normalized_w,
            channel_names: channel_names.to_vec(),
        }
    }

    pub fn from_factorization(channel_names: &[String], factorization: &Factorization) -> Self {
        Self::from_activations(channel_names, &factorization.w)
    }

    pub fn entries(&self) -> &[RankedChannel] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// W with every synergy scaled to a maximum of 1.0, in input channel order
    pub fn normalized_activations(&self) -> &Array2<f64> {
        &self.normalized_w
    }

    /// Input channel order, matching the rows of [`Self::normalized_activations`]
    pub fn channel_names(&self) -> &[String] {
        &self.channel_names
    }

    /// Names of the `k` highest-scoring channels, best first
    pub fn top(&self, k: usize) -> Vec<String> {
        self.entries.iter().take(k).map(|e| e.name.clone()).collect()
    }

    /// Names of the `k` lowest-scoring channels, in ranking order
    pub fn bottom(&self, k: usize) -> Vec<String> {
        let start = self.entries.len().saturating_sub(k);
        self.entries[start..].iter().map(|e| e.name.clone()).collect()
    }

    pub fn score(&self, name: &str) -> Option<f64> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.score)
    }
}

/// Divide each column by its maximum; an all-zero column stays zero
pub fn normalize_per_synergy(w: &Array2<f64>) -> Array2<f64> {
    let mut normalized = w.clone();
    for mut column in normalized.columns_mut() {
        let max = column.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        if max > 0.0 {
            column.mapv_inplace(|v| v / max);
        } else {
            column.fill(0.0);
        }
    }
    normalized
}

// src/processing/matrix.rs
//! Samples x channels signal matrix

use crate::error::{SynergyError, SynergyResult};
use ndarray::{Array1, Array2, ArrayView1, Axis};

/// Cleaned EMG envelopes, one column per canonical channel
///
/// All columns have the same length. Rows from different source files are
/// stacked in discovery order with no boundary marker.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalMatrix {
    channel_names: Vec<String>,
    data: Array2<f64>,
}

impl SignalMatrix {
    /// Wrap an existing `samples x channels` array
    pub fn new(channel_names: Vec<String>, data: Array2<f64>) -> SynergyResult<Self> {
        if channel_names.len() != data.ncols() {
            return Err(SynergyError::invalid_data(
                "signal_matrix",
                "new",
                "signal matrix",
                format!("{} names for {} columns", channel_names.len(), data.ncols()),
            ));
        }
        Ok(Self { channel_names, data })
    }

    /// Build from per-channel traces, truncating every trace to the shortest
    pub fn from_channels(channels: Vec<(String, Vec<f64>)>) -> SynergyResult<Self> {
        if channels.is_empty() {
            return Err(SynergyError::invalid_data(
                "signal_matrix",
                "from_channels",
                "signal matrix",
                "no channels supplied",
            ));
        }

        let samples = channels.iter().map(|(_, trace)| trace.len()).min().unwrap_or(0);
        let mut data = Array2::zeros((samples, channels.len()));
        let mut channel_names = Vec::with_capacity(channels.len());

        for (col, (name, trace)) in channels.into_iter().enumerate() {
            data.column_mut(col).assign(&ArrayView1::from(&trace[..samples]));
            channel_names.push(name);
        }

        Ok(Self { channel_names, data })
    }

    pub fn channel_names(&self) -> &[String] {
        &self.channel_names
    }

    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    pub fn n_samples(&self) -> usize {
        self.data.nrows()
    }

    pub fn n_channels(&self) -> usize {
        self.data.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn column(&self, channel: usize) -> ArrayView1<'_, f64> {
        self.data.column(channel)
    }

    /// Column by canonical name
    pub fn channel(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.channel_names
            .iter()
            .position(|n| n == name)
            .map(|col| self.data.column(col))
    }

    /// Cross-channel mean of every row
    pub fn row_means(&self) -> Array1<f64> {
        if self.n_channels() == 0 {
            return Array1::zeros(self.n_samples());
        }
        self.data.mean_axis(Axis(1)).unwrap_or_else(|| Array1::zeros(self.n_samples()))
    }

    /// Keep only rows whose cross-channel mean is strictly above `threshold`
    pub fn retain_active_rows(&self, threshold: f64) -> Self {
        let keep: Vec<usize> = self
            .row_means()
            .iter()
            .enumerate()
            .filter(|(_, mean)| **mean > threshold)
            .map(|(row, _)| row)
            .collect();

        Self {
            channel_names: self.channel_names.clone(),
            data: self.data.select(Axis(0), &keep),
        }
    }

    /// Element-wise `max(x, 0)`
    pub fn clipped_non_negative(&self) -> Array2<f64> {
        self.data.mapv(|x| x.max(0.0))
    }

    /// Reorder columns; `order[i]` is the source column of new column `i`
    pub fn permuted(&self, order: &[usize]) -> Self {
        Self {
            channel_names: order.iter().map(|&i| self.channel_names[i].clone()).collect(),
            data: self.data.select(Axis(1), order),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_truncates_to_shortest() {
        let matrix = SignalMatrix::from_channels(vec![
            ("A".to_string(), vec![1.0, 2.0, 3.0, 4.0]),
            ("B".to_string(), vec![5.0, 6.0]),
        ])
        .unwrap();

        assert_eq!(matrix.n_samples(), 2);
        assert_eq!(matrix.n_channels(), 2);
        assert_eq!(matrix.data(), &array![[1.0, 5.0], [2.0, 6.0]]);
    }

    #[test]
    fn test_silence_filter_is_strict() {
        let matrix = SignalMatrix::new(
            vec!["A".into(), "B".into()],
            array![[1.0, 1.0], [5.0, 5.0], [6.0, 4.5], [10.0, 0.0], [10.0, 1.0]],
        )
        .unwrap();

        let active = matrix.retain_active_rows(5.0);
        // rows whose mean is exactly 5.0 are dropped
        assert_eq!(active.n_samples(), 2);
        assert_eq!(active.data().row(0).to_vec(), vec![6.0, 4.5]);
        assert_eq!(active.data().row(1).to_vec(), vec![10.0, 1.0]);
    }

    #[test]
    fn test_name_count_mismatch() {
        let result = SignalMatrix::new(vec!["A".into()], Array2::zeros((3, 2)));
        assert!(result.is_err());
    }

    #[test]
    fn test_clip_and_lookup() {
        let matrix = SignalMatrix::new(vec!["A".into(), "B".into()], array![[-1.0, 2.0], [3.0, -0.5]]).unwrap();

        assert_eq!(matrix.clipped_non_negative(), array![[0.0, 2.0], [3.0, 0.0]]);
        assert_eq!(matrix.channel("B").unwrap().to_vec(), vec![2.0, -0.5]);
        assert!(matrix.channel("C").is_none());
    }

    #[test]
    fn test_permuted() {
        let matrix = SignalMatrix::new(vec!["A".into(), "B".into()], array![[1.0, 2.0]]).unwrap();
        let swapped = matrix.permuted(&[1, 0]);

        assert_eq!(swapped.channel_names(), &["B".to_string(), "A".to_string()]);
        assert_eq!(swapped.data(), &array![[2.0, 1.0]]);
    }
}

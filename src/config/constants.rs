// src/config/constants.rs
//! Pipeline-wide configuration defaults
//!
//! These literal values are the behavioural reference for the synergy search;
//! [`SynergyConfig::default`](super::SynergyConfig) is built entirely from them.

/// Filter Stage constants
pub mod filters {
    pub const DEFAULT_BANDPASS_LOW_HZ: f64 = 20.0;
    pub const DEFAULT_BANDPASS_HIGH_HZ: f64 = 450.0;
    pub const DEFAULT_ENVELOPE_CUTOFF_HZ: f64 = 6.0;
    pub const DEFAULT_FILTER_ORDER: usize = 4;
    pub const DEFAULT_ENVELOPE_ORDER: usize = 4;
    pub const MIN_FILTER_ORDER: usize = 1;
    pub const MAX_FILTER_ORDER: usize = 8;

    /// Forward-backward padding length, in multiples of the filter length
    pub const FILTFILT_PAD_FACTOR: usize = 3;
}

/// Signal Loader constants
pub mod loader {
    /// Rows whose cross-channel mean is at or below this are baseline silence
    pub const NOISE_THRESHOLD_UV: f64 = 5.0;
    pub const DEFAULT_FILE_EXTENSION: &str = "csv";
    pub const CALIBRATION_MARKERS: &[&str] = &["mvc", "rom", "calib", "dados"];
    pub const DEFAULT_EMG_SUBFOLDER: &str = "EMG";
    pub const DEFAULT_RESULTS_SUBFOLDER: &str = "synergy_results";
}

/// Quality Auditor constants
pub mod quality {
    pub const CRITICAL_NOISE_THRESHOLD_UV: f64 = 15.0;
    pub const NOISE_FLOOR_PERCENTILE: f64 = 5.0;
}

/// Redundancy Analyzer constants
pub mod redundancy {
    /// Evans (1996) "very strong" correlation
    pub const STRONG_CORRELATION_THRESHOLD: f64 = 0.90;
}

/// Synergy Search Engine constants
pub mod synergy {
    pub const VAF_THRESHOLD_PERCENT: f64 = 90.0;
    pub const MIN_COMPONENTS: usize = 1;
    pub const MAX_COMPONENTS: usize = 8;
    pub const NNMF_MAX_ITERATIONS: usize = 3000;
    pub const NNMF_TOLERANCE: f64 = 1e-4;
    pub const NNMF_SEED: u64 = 42;
    /// Convergence is checked every this many iterations
    pub const NNMF_CHECK_INTERVAL: usize = 10;
}

/// Report constants
pub mod report {
    pub const TOP_CHANNELS: usize = 5;
    pub const BOTTOM_CHANNELS: usize = 3;
    pub const VAF_DECIMALS: i32 = 2;
    pub const REPORT_PREFIX: &str = "Report_";
    pub const SUMMARY_DETAIL_FILE: &str = "DISCARDABLE_SUMMARY.csv";
    pub const SUMMARY_RANKING_FILE: &str = "DISCARDABLE_RANKING.csv";
    pub const LIST_SEPARATOR: &str = ", ";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_band_is_ordered() {
        assert!(filters::DEFAULT_BANDPASS_LOW_HZ < filters::DEFAULT_BANDPASS_HIGH_HZ);
        assert!(filters::DEFAULT_ENVELOPE_CUTOFF_HZ < filters::DEFAULT_BANDPASS_LOW_HZ);
    }

    #[test]
    fn test_component_range() {
        assert!(synergy::MIN_COMPONENTS <= synergy::MAX_COMPONENTS);
        assert!(synergy::VAF_THRESHOLD_PERCENT > 0.0 && synergy::VAF_THRESHOLD_PERCENT < 100.0);
    }
}

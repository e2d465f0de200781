// src/config/processing_config.rs
//! Per-component configuration structures

use serde::{Deserialize, Serialize};

/// Filter Stage configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FilterConfig {
    #[serde(default = "defaults::bandpass_low_hz")]
    pub bandpass_low_hz: f64,

    #[serde(default = "defaults::bandpass_high_hz")]
    pub bandpass_high_hz: f64,

    #[serde(default = "defaults::filter_order")]
    pub filter_order: usize,

    #[serde(default = "defaults::envelope_cutoff_hz")]
    pub envelope_cutoff_hz: f64,

    #[serde(default = "defaults::envelope_order")]
    pub envelope_order: usize,
}

/// Signal Loader configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LoaderConfig {
    #[serde(default = "defaults::noise_threshold_uv")]
    pub noise_threshold_uv: f64,

    #[serde(default = "defaults::file_extension")]
    pub file_extension: String,

    #[serde(default = "defaults::exclusion_markers")]
    pub exclusion_markers: Vec<String>,

    #[serde(default = "defaults::emg_subfolder")]
    pub emg_subfolder: String,

    #[serde(default = "defaults::results_subfolder")]
    pub results_subfolder: String,
}

/// Quality Auditor configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct QualityConfig {
    #[serde(default = "defaults::critical_noise_uv")]
    pub critical_noise_uv: f64,

    #[serde(default = "defaults::noise_floor_percentile")]
    pub noise_floor_percentile: f64,
}

/// Redundancy Analyzer configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RedundancyConfig {
    #[serde(default = "defaults::correlation_threshold")]
    pub correlation_threshold: f64,
}

/// Synergy Search Engine configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SearchConfig {
    #[serde(default = "defaults::vaf_threshold")]
    pub vaf_threshold: f64,

    #[serde(default = "defaults::max_components")]
    pub max_components: usize,

    #[serde(default = "defaults::max_iterations")]
    pub max_iterations: usize,

    #[serde(default = "defaults::tolerance")]
    pub tolerance: f64,

    #[serde(default = "defaults::seed")]
    pub seed: u64,
}

/// Report Writer configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReportConfig {
    #[serde(default = "defaults::top_channels")]
    pub top_channels: usize,

    #[serde(default = "defaults::bottom_channels")]
    pub bottom_channels: usize,
}

/// Default value providers using constants
mod defaults {
    use crate::config::constants::*;

    pub fn bandpass_low_hz() -> f64 { filters::DEFAULT_BANDPASS_LOW_HZ }
    pub fn bandpass_high_hz() -> f64 { filters::DEFAULT_BANDPASS_HIGH_HZ }
    pub fn filter_order() -> usize { filters::DEFAULT_FILTER_ORDER }
    pub fn envelope_cutoff_hz() -> f64 { filters::DEFAULT_ENVELOPE_CUTOFF_HZ }
    pub fn envelope_order() -> usize { filters::DEFAULT_ENVELOPE_ORDER }

    pub fn noise_threshold_uv() -> f64 { loader::NOISE_THRESHOLD_UV }
    pub fn file_extension() -> String { loader::DEFAULT_FILE_EXTENSION.to_string() }
    pub fn exclusion_markers() -> Vec<String> {
        loader::CALIBRATION_MARKERS.iter().map(|m| m.to_string()).collect()
    }
    pub fn emg_subfolder() -> String { loader::DEFAULT_EMG_SUBFOLDER.to_string() }
    pub fn results_subfolder() -> String { loader::DEFAULT_RESULTS_SUBFOLDER.to_string() }

    pub fn critical_noise_uv() -> f64 { quality::CRITICAL_NOISE_THRESHOLD_UV }
    pub fn noise_floor_percentile() -> f64 { quality::NOISE_FLOOR_PERCENTILE }

    pub fn correlation_threshold() -> f64 { redundancy::STRONG_CORRELATION_THRESHOLD }

    pub fn vaf_threshold() -> f64 { synergy::VAF_THRESHOLD_PERCENT }
    pub fn max_components() -> usize { synergy::MAX_COMPONENTS }
    pub fn max_iterations() -> usize { synergy::NNMF_MAX_ITERATIONS }
    pub fn tolerance() -> f64 { synergy::NNMF_TOLERANCE }
    pub fn seed() -> u64 { synergy::NNMF_SEED }

    pub fn top_channels() -> usize { report::TOP_CHANNELS }
    pub fn bottom_channels() -> usize { report::BOTTOM_CHANNELS }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            bandpass_low_hz: defaults::bandpass_low_hz(),
            bandpass_high_hz: defaults::bandpass_high_hz(),
            filter_order: defaults::filter_order(),
            envelope_cutoff_hz: defaults::envelope_cutoff_hz(),
            envelope_order: defaults::envelope_order(),
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            noise_threshold_uv: defaults::noise_threshold_uv(),
            file_extension: defaults::file_extension(),
            exclusion_markers: defaults::exclusion_markers(),
            emg_subfolder: defaults::emg_subfolder(),
            results_subfolder: defaults::results_subfolder(),
        }
    }
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            critical_noise_uv: defaults::critical_noise_uv(),
            noise_floor_percentile: defaults::noise_floor_percentile(),
        }
    }
}

impl Default for RedundancyConfig {
    fn default() -> Self {
        Self {
            correlation_threshold: defaults::correlation_threshold(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            vaf_threshold: defaults::vaf_threshold(),
            max_components: defaults::max_components(),
            max_iterations: defaults::max_iterations(),
            tolerance: defaults::tolerance(),
            seed: defaults::seed(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_channels: defaults::top_channels(),
            bottom_channels: defaults::bottom_channels(),
        }
    }
}

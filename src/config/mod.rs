// src/config/mod.rs
//! Configuration for the synergy pipeline
//!
//! Thresholds, cutoffs and iteration caps are held in an explicit
//! [`SynergyConfig`] that is handed to each component at construction.

pub mod constants;
pub mod channel_map;
pub mod loader;
pub mod processing_config;

pub use constants::*;
pub use channel_map::{ChannelMap, ChannelPattern};
pub use loader::ConfigLoader;
pub use processing_config::*;

use serde::{Deserialize, Serialize};
use crate::error::{SynergyError, SynergyResult};

/// Complete pipeline configuration
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SynergyConfig {
    #[serde(default)]
    pub filter: FilterConfig,

    #[serde(default)]
    pub loader: LoaderConfig,

    #[serde(default)]
    pub quality: QualityConfig,

    #[serde(default)]
    pub redundancy: RedundancyConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default = "ChannelMap::upper_limb")]
    pub channel_map: ChannelMap,
}

impl Default for SynergyConfig {
    fn default() -> Self {
        Self {
            filter: FilterConfig::default(),
            loader: LoaderConfig::default(),
            quality: QualityConfig::default(),
            redundancy: RedundancyConfig::default(),
            search: SearchConfig::default(),
            report: ReportConfig::default(),
            channel_map: ChannelMap::upper_limb(),
        }
    }
}

impl SynergyConfig {
    /// Collect every consistency problem in the configuration
    pub fn validate_consistency(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let filter = &self.filter;
        let order_range = filters::MIN_FILTER_ORDER..=filters::MAX_FILTER_ORDER;

        if filter.bandpass_low_hz <= 0.0 {
            errors.push(format!("Band-pass low cutoff must be positive, got {} Hz", filter.bandpass_low_hz));
        }
        if filter.bandpass_high_hz <= filter.bandpass_low_hz {
            errors.push(format!(
                "Band-pass high cutoff ({} Hz) must exceed low cutoff ({} Hz)",
                filter.bandpass_high_hz, filter.bandpass_low_hz
            ));
        }
        if filter.envelope_cutoff_hz <= 0.0 {
            errors.push(format!("Envelope cutoff must be positive, got {} Hz", filter.envelope_cutoff_hz));
        }
        if !order_range.contains(&filter.filter_order) {
            errors.push(format!("Band-pass order must be 1-8, got {}", filter.filter_order));
        }
        if !order_range.contains(&filter.envelope_order) {
            errors.push(format!("Envelope order must be 1-8, got {}", filter.envelope_order));
        }

        if self.loader.noise_threshold_uv < 0.0 {
            errors.push("Noise threshold cannot be negative".to_string());
        }
        if self.loader.file_extension.trim().is_empty() {
            errors.push("File extension cannot be empty".to_string());
        }

        if !(0.0..=100.0).contains(&self.quality.noise_floor_percentile) {
            errors.push(format!(
                "Noise floor percentile must be within 0-100, got {}",
                self.quality.noise_floor_percentile
            ));
        }

        if !(-1.0..=1.0).contains(&self.redundancy.correlation_threshold) {
            errors.push(format!(
                "Correlation threshold must be within -1..1, got {}",
                self.redundancy.correlation_threshold
            ));
        }

        let search = &self.search;
        if search.max_components == 0 {
            errors.push("Maximum component count must be at least 1".to_string());
        }
        if !(0.0..100.0).contains(&search.vaf_threshold) {
            errors.push(format!("VAF threshold must be within 0-100 %, got {}", search.vaf_threshold));
        }
        if search.max_iterations == 0 {
            errors.push("NNMF iteration cap must be at least 1".to_string());
        }
        if search.tolerance <= 0.0 {
            errors.push("NNMF tolerance must be positive".to_string());
        }

        if self.channel_map.is_empty() {
            errors.push("Channel map has no entries".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate and fold all problems into one configuration error
    pub fn validate(&self) -> SynergyResult<()> {
        self.validate_consistency().map_err(|errors| SynergyError::Configuration {
            component: "config".to_string(),
            reason: errors.join("; "),
            context: crate::error_context!("config", "validate"),
        })
    }
}

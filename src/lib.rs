//! EMG-Synergy: muscle synergy extraction from multichannel EMG recordings
//!
//! The crate turns a folder of raw EMG recordings into a small set of additive
//! muscle synergies and a ranking of how much each sensor contributes to them.
//!
//! - Per-channel conditioning: DC removal, zero-phase Butterworth band-pass, linear envelope
//! - Folder aggregation with calibration-file exclusion and a baseline-silence filter
//! - Noise-floor audit and Pearson redundancy analysis (diagnostic)
//! - Multiplicative-update NNMF with a minimal-rank search on VAF
//! - Channel importance ranking, per-task reports and a cross-task discard summary
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use emg_synergy::config::ConfigLoader;
//! use emg_synergy::pipeline::TaskRunner;
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigLoader::new().load()?;
//!     let runner = TaskRunner::new(config);
//!
//!     let outcome = runner.run(
//!         "S01_reach",
//!         Path::new("data/S01_reach/EMG"),
//!         Path::new("data/S01_reach/synergy_results"),
//!     )?;
//!
//!     println!("{} synergies, VAF {:.2}%", outcome.report.synergies, outcome.report.vaf);
//!     println!("top channels: {:?}", outcome.report.top_channels);
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod artifacts;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod processing;
pub mod ranking;
pub mod report;
pub mod source;
pub mod synergy;

// Re-export commonly used types for convenience
pub use config::{ChannelMap, ConfigLoader, SynergyConfig};
pub use error::{ErrorContext, SynergyError, SynergyResult};
pub use pipeline::{TaskOutcome, TaskRunner, TaskSpec};
pub use processing::{FilterStage, SignalLoader, SignalMatrix};
pub use ranking::{RankedChannel, Ranking};
pub use report::{ReportWriter, Summarizer, TaskReport};
pub use synergy::{Factorization, SearchOutcome, SynergySearch};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn version_info() -> VersionInfo {
    VersionInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: "Muscle synergy extraction from multichannel EMG".to_string(),
        features: vec![
            "Zero-phase Butterworth conditioning".to_string(),
            "NNMF synergy search with VAF stopping".to_string(),
            "Channel redundancy and noise audit".to_string(),
            "Per-task reports and cross-task summary".to_string(),
        ],
    }
}

/// Library version information
#[derive(Debug, Clone)]
pub struct VersionInfo {
    /// Library name
    pub name: String,
    /// Version string
    pub version: String,
    /// Description
    pub description: String,
    /// List of features
    pub features: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_info() {
        let info = version_info();
        assert_eq!(info.name, NAME);
        assert_eq!(info.version, VERSION);
        assert!(!info.features.is_empty());
    }
}

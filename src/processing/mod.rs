// src/processing/mod.rs
//! Signal conditioning and per-task diagnostics

pub mod aggregator;
pub mod filter_stage;
pub mod filters;
pub mod matrix;
pub mod quality_monitor;
pub mod redundancy;

pub use aggregator::{LoadSummary, SignalLoader};
pub use filter_stage::FilterStage;
pub use filters::{BandType, Biquad, SosFilter};
pub use matrix::SignalMatrix;
pub use quality_monitor::{ChannelQuality, QualityLevel, QualityMonitor};
pub use redundancy::{CorrelationMatrix, RedundancyAnalyzer, RedundancyReport, RedundantPair};

// src/error.rs
//! Unified error handling for the synergy pipeline
//!
//! Every fallible operation in the crate returns [`SynergyResult`]. The variants
//! split into two recovery classes: per-file failures ([`SynergyError::FileLoad`])
//! are skipped by the loader and the run continues, everything else aborts the
//! task it occurred in. Batch drivers catch task errors at the orchestration
//! boundary so one bad folder never stops the others.

use std::path::PathBuf;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for the synergy pipeline
#[derive(Debug, Error)]
pub enum SynergyError {
    /// A filter cutoff is at or above the Nyquist frequency of the recording
    #[error("[FILTER] Invalid sampling rate {sample_rate_hz} Hz for a {cutoff_hz} Hz cutoff (Nyquist is {} Hz)", .sample_rate_hz / 2.0)]
    InvalidSamplingRate {
        sample_rate_hz: f64,
        cutoff_hz: f64,
    },

    /// A single recording could not be read; the loader skips it
    #[error("[LOADER] Failed to load {}: {reason}", .path.display())]
    FileLoad {
        path: PathBuf,
        reason: String,
    },

    /// No file in the folder produced a recognized channel
    #[error("[LOADER] No valid EMG data found in {}", .folder.display())]
    NoValidData {
        folder: PathBuf,
    },

    /// The baseline-silence filter removed every sample
    #[error("[LOADER] All {samples_before} samples fell at or below the {threshold_uv} uV baseline threshold")]
    EmptyAfterFiltering {
        samples_before: usize,
        threshold_uv: f64,
    },

    /// More synergies were requested than there are channels
    #[error("[SYNERGY] Cannot extract {components} synergies from {channels} channels")]
    UnderdeterminedFactorization {
        channels: usize,
        components: usize,
    },

    /// Configuration and setup errors
    #[error("[CONFIG] Configuration error in {component}: {reason} ({})", .context.operation)]
    Configuration {
        component: String,
        reason: String,
        context: ErrorContext,
    },

    /// Invalid input data errors
    #[error("[DATA] Invalid {data_type}: {reason} ({})", .context.operation)]
    InvalidData {
        data_type: String,
        reason: String,
        context: ErrorContext,
    },

    /// Configuration file could not be parsed
    #[error("[CONFIG] Parse error in {}: {reason}", .path.display())]
    ConfigParse {
        path: PathBuf,
        reason: String,
    },

    /// A figure could not be rendered or encoded
    #[error("[ARTIFACT] Failed to render {}: {reason}", .path.display())]
    Render {
        path: PathBuf,
        reason: String,
    },

    #[error("[IO] {0}")]
    Io(#[from] std::io::Error),

    #[error("[CSV] {0}")]
    Csv(#[from] csv::Error),
}

/// Error context for debugging and analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorContext {
    pub component: String,
    pub operation: String,
    pub file: Option<String>,
    pub line: Option<u32>,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(component: &str, operation: &str) -> Self {
        Self {
            component: component.to_string(),
            operation: operation.to_string(),
            file: None,
            line: None,
        }
    }

    /// Create error context with file and line information
    pub fn with_location(component: &str, operation: &str, file: &'static str, line: u32) -> Self {
        let mut context = Self::new(component, operation);
        context.file = Some(file.to_string());
        context.line = Some(line);
        context
    }
}

/// Macro for creating error context with file and line info
#[macro_export]
macro_rules! error_context {
    ($component:expr, $operation:expr) => {
        $crate::error::ErrorContext::with_location($component, $operation, file!(), line!())
    };
}

impl SynergyError {
    /// Build a configuration error for `component`
    pub fn configuration(component: &str, operation: &str, reason: impl Into<String>) -> Self {
        SynergyError::Configuration {
            component: component.to_string(),
            reason: reason.into(),
            context: ErrorContext::new(component, operation),
        }
    }

    /// Build an invalid-data error
    pub fn invalid_data(component: &str, operation: &str, data_type: &str, reason: impl Into<String>) -> Self {
        SynergyError::InvalidData {
            data_type: data_type.to_string(),
            reason: reason.into(),
            context: ErrorContext::new(component, operation),
        }
    }

    /// Per-file failures are skipped; everything else aborts the task.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SynergyError::FileLoad { .. })
    }
}

/// Result type alias for synergy operations
pub type SynergyResult<T> = Result<T, SynergyError>;

/// Convenience trait for tagging foreign errors with the file they came from
pub trait IntoFileLoadError<T> {
    fn file_load_err(self, path: &std::path::Path) -> SynergyResult<T>;
}

impl<T, E> IntoFileLoadError<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn file_load_err(self, path: &std::path::Path) -> SynergyResult<T> {
        self.map_err(|err| SynergyError::FileLoad {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_context_creation() {
        let context = ErrorContext::new("test_component", "test_operation");
        assert_eq!(context.component, "test_component");
        assert_eq!(context.operation, "test_operation");
        assert!(context.file.is_none());
    }

    #[test]
    fn test_error_context_macro_records_location() {
        let context = error_context!("loader", "discover");
        assert!(context.file.as_deref().unwrap().ends_with("error.rs"));
        assert!(context.line.unwrap() > 0);
    }

    #[test]
    fn test_configuration_builder() {
        let err = SynergyError::configuration("filter", "validate", "low cutoff above high cutoff");

        match err {
            SynergyError::Configuration { component, reason, .. } => {
                assert_eq!(component, "filter");
                assert_eq!(reason, "low cutoff above high cutoff");
            }
            _ => panic!("Expected configuration error"),
        }
    }

    #[test]
    fn test_error_display() {
        let err = SynergyError::InvalidSamplingRate { sample_rate_hz: 500.0, cutoff_hz: 450.0 };
        let display = format!("{}", err);
        assert!(display.contains("500"));
        assert!(display.contains("450"));
        assert!(display.contains("250"));

        let err = SynergyError::UnderdeterminedFactorization { channels: 3, components: 4 };
        let display = format!("{}", err);
        assert!(display.contains("4 synergies"));
        assert!(display.contains("3 channels"));
    }

    #[test]
    fn test_recoverability() {
        let skip = SynergyError::FileLoad { path: PathBuf::from("a.csv"), reason: "bad".into() };
        assert!(skip.is_recoverable());

        let fatal = SynergyError::NoValidData { folder: PathBuf::from("emg") };
        assert!(!fatal.is_recoverable());
    }

    #[test]
    fn test_error_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SynergyError>();
    }

    #[test]
    fn test_file_load_trait() {
        let result: Result<i32, std::num::ParseFloatError> = "x".parse::<f64>().map(|_| 0);
        let tagged = result.file_load_err(std::path::Path::new("trial1.csv"));

        match tagged.unwrap_err() {
            SynergyError::FileLoad { path, .. } => assert_eq!(path, PathBuf::from("trial1.csv")),
            _ => panic!("Expected file load error"),
        }
    }
}

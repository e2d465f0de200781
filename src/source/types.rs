// src/source/types.rs
//! Core types for recording access

use serde::{Deserialize, Serialize};

/// One raw channel as labelled by the acquisition software
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawChannel {
    pub label: String,
    pub samples: Vec<f64>,
}

/// All channels of a single recording file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub channels: Vec<RawChannel>,
    pub sample_rate_hz: f64,
}

impl Recording {
    pub fn new(sample_rate_hz: f64) -> Self {
        Self {
            channels: Vec::new(),
            sample_rate_hz,
        }
    }

    pub fn with_channel(mut self, label: &str, samples: Vec<f64>) -> Self {
        self.channels.push(RawChannel {
            label: label.to_string(),
            samples,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Sample count of the longest channel
    pub fn len(&self) -> usize {
        self.channels.iter().map(|c| c.samples.len()).max().unwrap_or(0)
    }
}

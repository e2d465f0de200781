// src/config/channel_map.rs
//! Raw channel label to canonical muscle name mapping
//!
//! Recording software writes long, vendor-specific channel labels such as
//! `"R BICEPS BR., uV"`. A [`ChannelMap`] is an ordered list of substring
//! patterns; the first pattern contained in a label names the channel. Order
//! matters because patterns may overlap (`FLEX.CARP.R` vs `FLEX.CARP.U`).

use serde::{Deserialize, Serialize};

/// One `(pattern, canonical name)` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelPattern {
    pub pattern: String,
    pub name: String,
}

/// Ordered first-match channel mapping
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelMap {
    entries: Vec<ChannelPattern>,
}

impl ChannelMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pattern; earlier patterns take precedence
    pub fn with(mut self, pattern: &str, name: &str) -> Self {
        self.push(pattern, name);
        self
    }

    pub fn push(&mut self, pattern: &str, name: &str) {
        self.entries.push(ChannelPattern {
            pattern: pattern.to_string(),
            name: name.to_string(),
        });
    }

    /// Canonical name for a raw label, if any pattern is contained in it
    pub fn resolve(&self, raw_label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| raw_label.contains(entry.pattern.as_str()))
            .map(|entry| entry.name.as_str())
    }

    /// Canonical names in first-appearance order, without duplicates
    pub fn canonical_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for entry in &self.entries {
            if !names.contains(&entry.name.as_str()) {
                names.push(entry.name.as_str());
            }
        }
        names
    }

    pub fn entries(&self) -> &[ChannelPattern] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Twelve-muscle upper-limb montage (forearm, arm, shoulder)
    pub fn upper_limb() -> Self {
        Self::new()
            .with("FLEX.CARP.R", "Flexor Rad.")
            .with("BRACHIORAD.", "Brachioradialis")
            .with("EXT.DIG.", "Extensor Dig.")
            .with("EXT.CARP.ULN.", "Extensor Uln.")
            .with("BICEPS BR.", "Biceps")
            .with("LAT. TRICEPS", "Triceps")
            .with("ANT.DELTOID", "Delt. Ant.")
            .with("MID DELT.", "Delt. Med.")
            .with("POST.DELTOID", "Delt. Post.")
            .with("FLEX.CARP.U", "Flexor Uln.")
            .with("PECT. MAJOR", "Pectoral")
            .with("INFRASPIN.", "Infraspinatus")
    }
}

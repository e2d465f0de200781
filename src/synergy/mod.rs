// src/synergy/mod.rs
//! Synergy extraction: NNMF, VAF and the minimal-rank search

pub mod nnmf;
pub mod search;
pub mod vaf;

pub use nnmf::{Nmf, NmfFit};
pub use search::{Factorization, SearchOutcome, SearchStep, SynergySearch};
pub use vaf::variance_accounted_for;

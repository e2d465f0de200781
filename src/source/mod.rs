// src/source/mod.rs
//! Recording sources for multi-channel EMG files
//!
//! The pipeline reads recordings only through [`RecordingReader`], so the
//! file format is swappable. [`CsvRecordingReader`] handles delimited-text
//! exports; [`InMemoryReader`] serves fixtures in tests and benches.

pub mod traits;
pub mod types;
pub mod csv_reader;
pub mod memory;

pub use traits::*;
pub use types::*;
pub use csv_reader::CsvRecordingReader;
pub use memory::InMemoryReader;

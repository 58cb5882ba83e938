//! Export of inference results
//!
//! # Architecture
//!
//! This module defines the [`Exporter`] trait that abstracts the export format.
//! Each format is an independent implementation in its own sub-module, so a
//! new format is a new file.
//!
//! # Available formats
//!
//! | Format  | Module    |
//! |---------|-----------|
//! | CSV     | [`csv`]   |
//!
//! # Usage example
//!
//! ```rust,ignore
//! use rouse_force::output::export::{CsvExporter, Exporter};
//!
//! let exporter = CsvExporter::default();
//! exporter.export(&inference, "force.csv")?;
//! ```

pub mod csv;

pub use csv::{export_columns_csv, export_force_csv, CsvConfig, CsvError, CsvExporter, CsvMetadata};

use std::path::Path;

use crate::inference::ForceInference;

/// Abstraction trait for all export formats
///
/// Each format manages its own errors via the associated type, so callers
/// can react to the precise failure instead of a boxed error.
pub trait Exporter {
    /// Error type specific to this export format
    type Error: std::error::Error;

    /// Write the force profile of `inference` (and its drag, if any) to `path`
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the force profile has not been inferred yet
    /// - the path is invalid or the directory does not exist
    fn export<P: AsRef<Path>>(&self, inference: &ForceInference, path: P) -> Result<(), Self::Error>;
}

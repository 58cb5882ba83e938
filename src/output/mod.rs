//! Output of inference results
//!
//! Only data export lives here; plotting is left to external tools, which
//! read the step-grid CSV directly.
//!
//! ```text
//! output/
//! ├── mod.rs
//! └── export/
//!     ├── mod.rs   ← Exporter trait
//!     └── csv.rs
//! ```
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use rouse_force::output::{export_force_csv, CsvConfig};
//!
//! export_force_csv(&inference, "force.csv", None)?;
//! ```

pub mod export;

pub use export::{export_force_csv, CsvConfig, CsvExporter, CsvMetadata, Exporter};

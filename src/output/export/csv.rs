//! CSV export of inferred force profiles
//!
//! Profiles are written on the step-plot grid: one row per sample time, the
//! value on row `i` being the force acting over `(t_i, t_{i+1}]` and the last
//! value repeated on the final row. Any spreadsheet or plotting tool that
//! draws "steps-post" lines reproduces the piecewise-constant profile.
//!
//! # Features
//!
//! - **Step grid**: time column plus one column per profile
//! - **Metadata support**: optional `#` comment header with the inference parameters
//! - **Customizable**: delimiter, decimal separator, precision, column headers
//! - **Validation**: checks for empty data, mismatched lengths and NaN/Inf
//!
//! # Quick Examples
//!
//! ## From a populated inference
//!
//! ```rust,ignore
//! use rouse_force::inference::ForceInference;
//! use rouse_force::output::export::{CsvExporter, Exporter};
//!
//! let mut inference = ForceInference::with_calibration(times, displacement, 0.8)?;
//! inference.populate()?;
//!
//! CsvExporter::default().export(&inference, "force.csv")?;
//! ```
//!
//! **Output** (`force.csv`):
//! ```csv
//! Time,Force
//! 0.000000,1.250000
//! 10.000000,-0.310000
//! 20.000000,-0.310000
//! ```
//!
//! ## With Metadata
//!
//! ```rust,ignore
//! let config = CsvConfig::default().with_metadata(CsvMetadata::from_inference(&inference));
//! CsvExporter::new(config).export(&inference, "force.csv")?;
//! ```
//!
//! **Output**:
//! ```csv
//! # Rouse Force Inference
//! # Generated: 2026-10-18T09:12:00Z
//! # Kernel: Rouse
//! # Calibration: 0.8
//! # Solver: Triangular
//! # Intervals: 2
//! #
//! Time,Force
//! ...
//! ```

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::ForceError;
use crate::inference::{step_grid, ForceInference};
use crate::physics::ResponseKernel;

// =============================================================================
// Errors
// =============================================================================

/// Errors raised while exporting to CSV
#[derive(Debug)]
pub enum CsvError {
    /// File creation or write failure
    Io(io::Error),
    /// Nothing to write
    EmptyData,
    /// A column does not match the time column length
    LengthMismatch { column: String, expected: usize, got: usize },
    /// NaN or Inf in a column
    NonFinite { column: String, index: usize },
    /// The inference could not provide the requested profile
    Inference(ForceError),
}

impl fmt::Display for CsvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CsvError::Io(err) => write!(f, "CSV I/O error: {}", err),
            CsvError::EmptyData => write!(f, "Empty data: nothing to export"),
            CsvError::LengthMismatch { column, expected, got } => write!(
                f,
                "Column '{}' length mismatch: {} values versus {} time points",
                column, got, expected
            ),
            CsvError::NonFinite { column, index } => {
                write!(f, "Invalid data: NaN or Inf in column '{}' at row {}", column, index)
            }
            CsvError::Inference(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CsvError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CsvError::Io(err) => Some(err),
            CsvError::Inference(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for CsvError {
    fn from(err: io::Error) -> Self {
        CsvError::Io(err)
    }
}

impl From<ForceError> for CsvError {
    fn from(err: ForceError) -> Self {
        CsvError::Inference(err)
    }
}

// =============================================================================
// Configuration Structures
// =============================================================================

/// Configuration for CSV export
///
/// # Example
///
/// ```rust
/// use rouse_force::output::export::CsvConfig;
///
/// let config = CsvConfig {
///     delimiter: ';',
///     precision: 10,
///     ..Default::default()
/// };
/// assert_eq!(config.decimal_separator, '.');
/// ```
#[derive(Debug, Clone)]
pub struct CsvConfig {
    /// Column delimiter (default: ',')
    pub delimiter: char,

    /// Decimal separator (default: '.')
    pub decimal_separator: char,

    /// Number of decimal places for floating-point values (default: 6)
    pub precision: usize,

    /// Include metadata header comments (default: false)
    pub include_metadata: bool,

    /// Metadata written when `include_metadata` is set
    pub metadata: Option<CsvMetadata>,

    /// Header of the time column (default: "Time")
    pub time_header: String,

    /// Header of the force column (default: "Force")
    pub force_header: String,

    /// Header of the drag column (default: "Drag")
    pub drag_header: String,

    /// Write the drag column when a drag profile exists (default: true)
    pub include_drag: bool,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            decimal_separator: '.',
            precision: 6,
            include_metadata: false,
            metadata: None,
            time_header: "Time".to_string(),
            force_header: "Force".to_string(),
            drag_header: "Drag".to_string(),
            include_drag: true,
        }
    }
}

impl CsvConfig {
    /// Semicolon-delimited, comma decimal separator
    pub fn european() -> Self {
        Self {
            delimiter: ';',
            decimal_separator: ',',
            ..Default::default()
        }
    }

    /// Twelve decimal places
    pub fn high_precision() -> Self {
        Self {
            precision: 12,
            ..Default::default()
        }
    }

    /// Attach metadata and switch the header on
    pub fn with_metadata(mut self, metadata: CsvMetadata) -> Self {
        self.include_metadata = true;
        self.metadata = Some(metadata);
        self
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_headers(mut self, time: &str, force: &str) -> Self {
        self.time_header = time.to_string();
        self.force_header = force.to_string();
        self
    }

    pub fn without_drag(mut self) -> Self {
        self.include_drag = false;
        self
    }
}

/// Inference parameters written in the CSV comment header
#[derive(Debug, Clone, Default)]
pub struct CsvMetadata {
    pub kernel_name: Option<String>,
    pub calibration: Option<f64>,
    pub solver_name: Option<String>,
    pub intervals: Option<usize>,
    pub drag_mode: Option<String>,
    /// Free-form `key: value` lines
    pub custom: Vec<(String, String)>,
}

impl CsvMetadata {
    /// Metadata describing an inference object's current parameters
    pub fn from_inference(inference: &ForceInference) -> Self {
        Self {
            kernel_name: Some(inference.kernel().name().to_string()),
            calibration: Some(inference.calibration()),
            solver_name: Some(inference.configuration().method.name().to_string()),
            intervals: Some(inference.intervals()),
            drag_mode: inference.drag_mode().map(|mode| mode.name().to_string()),
            custom: Vec::new(),
        }
    }

    /// Add custom parameter
    pub fn add_custom(&mut self, key: String, value: String) {
        self.custom.push((key, value));
    }
}

// =============================================================================
// Exporter
// =============================================================================

/// CSV implementation of [`Exporter`](super::Exporter)
#[derive(Debug, Clone, Default)]
pub struct CsvExporter {
    pub config: CsvConfig,
}

impl CsvExporter {
    pub fn new(config: CsvConfig) -> Self {
        Self { config }
    }
}

impl super::Exporter for CsvExporter {
    type Error = CsvError;

    fn export<P: AsRef<Path>>(&self, inference: &ForceInference, path: P) -> Result<(), CsvError> {
        export_force_csv(inference, path, Some(&self.config))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Write metadata header comments
fn write_metadata_header<W: Write>(out: &mut W, metadata: &CsvMetadata) -> io::Result<()> {
    writeln!(out, "# Rouse Force Inference")?;

    let now = chrono::Utc::now();
    writeln!(out, "# Generated: {}", now.to_rfc3339())?;

    if let Some(kernel) = &metadata.kernel_name {
        writeln!(out, "# Kernel: {}", kernel)?;
    }
    if let Some(gamma) = metadata.calibration {
        writeln!(out, "# Calibration: {}", gamma)?;
    }
    if let Some(solver) = &metadata.solver_name {
        writeln!(out, "# Solver: {}", solver)?;
    }
    if let Some(intervals) = metadata.intervals {
        writeln!(out, "# Intervals: {}", intervals)?;
    }
    if let Some(mode) = &metadata.drag_mode {
        writeln!(out, "# Drag Mode: {}", mode)?;
    }

    for (key, value) in &metadata.custom {
        writeln!(out, "# {}: {}", key, value)?;
    }

    writeln!(out, "#")
}

/// Format number with configured precision and decimal separator
fn format_number(value: f64, config: &CsvConfig) -> String {
    let formatted = format!("{:.prec$}", value, prec = config.precision);

    if config.decimal_separator != '.' {
        formatted.replace('.', &config.decimal_separator.to_string())
    } else {
        formatted
    }
}

// =============================================================================
// Export Functions
// =============================================================================

/// Export a time column and any number of value columns
///
/// # Arguments
///
/// * `time_serie` - Row times
/// * `columns` - `(header, values)` pairs, each as long as `time_serie`
/// * `output_path` - Output file path
/// * `configuration` - Optional CSV configuration (uses default if None)
///
/// # Errors
///
/// - Empty data
/// - Mismatched lengths
/// - NaN or Inf values
/// - File creation errors
pub fn export_columns_csv<P: AsRef<Path>>(
    time_serie: &[f64],
    columns: &[(&str, &[f64])],
    output_path: P,
    configuration: Option<&CsvConfig>,
) -> Result<(), CsvError> {

    // ============================= Validation =============================

    if time_serie.is_empty() {
        return Err(CsvError::EmptyData);
    }

    if let Some(index) = time_serie.iter().position(|t| !t.is_finite()) {
        return Err(CsvError::NonFinite { column: "time".to_string(), index });
    }

    for (header, values) in columns {
        if values.len() != time_serie.len() {
            return Err(CsvError::LengthMismatch {
                column: header.to_string(),
                expected: time_serie.len(),
                got: values.len(),
            });
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(CsvError::NonFinite { column: header.to_string(), index });
        }
    }

    // ============================= Configuration ==========================

    let binding = CsvConfig::default();
    let configuration = configuration.unwrap_or(&binding);

    // ============================= Open File ==============================

    let mut file = BufWriter::new(File::create(output_path.as_ref())?);

    // ============================= Write Metadata =========================

    if configuration.include_metadata
        && let Some(metadata) = &configuration.metadata
    {
        write_metadata_header(&mut file, metadata)?;
    }

    // ============================= Write Header ===========================

    write!(file, "{}", configuration.time_header)?;
    for (header, _) in columns {
        write!(file, "{}{}", configuration.delimiter, header)?;
    }
    writeln!(file)?;

    // ============================= Write Data =============================

    for (i, time) in time_serie.iter().enumerate() {
        write!(file, "{}", format_number(*time, configuration))?;
        for (_, values) in columns {
            write!(
                file,
                "{}{}",
                configuration.delimiter,
                format_number(values[i], configuration)
            )?;
        }
        writeln!(file)?;
    }

    file.flush()?;

    log::debug!(
        "Exported {} rows x {} columns to {}",
        time_serie.len(),
        columns.len() + 1,
        output_path.as_ref().display()
    );

    Ok(())
}

/// Export the force profile (and drag, when computed) of an inference
///
/// Both profiles are laid out on the step-plot grid. Fails with
/// [`ForceError::ForceNotPopulated`] wrapped in [`CsvError::Inference`] when
/// no force profile has been inferred yet.
pub fn export_force_csv<P: AsRef<Path>>(
    inference: &ForceInference,
    output_path: P,
    configuration: Option<&CsvConfig>,
) -> Result<(), CsvError> {
    let binding = CsvConfig::default();
    let configuration = configuration.unwrap_or(&binding);

    let (times, force) = inference.step_profile()?;
    let drag = match inference.drag_profile() {
        Some(profile) if configuration.include_drag => Some(step_grid(&times, profile).1),
        _ => None,
    };

    let mut columns: Vec<(&str, &[f64])> = vec![(configuration.force_header.as_str(), force.as_slice())];
    if let Some(drag) = &drag {
        columns.push((configuration.drag_header.as_str(), drag.as_slice()));
    }

    export_columns_csv(times.as_slice(), &columns, output_path, Some(configuration))
}

// =================================================================================================
// Tests
// =================================================================================================

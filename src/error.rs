//! Error types for force inference
//!
//! Every fallible operation in the crate returns [`ForceResult`]. Errors fall
//! into two kinds:
//!
//! - **Validation**: malformed input rejected at the offending call
//!   (mismatched lengths, non-increasing times, NaN displacement, ...).
//! - **Numerical**: the response matrix cannot be trusted
//!   (degenerate trajectory, singular or ill-conditioned matrix).
//!
//! Nothing is ever coerced or silently corrected. A failed call leaves any
//! owning [`ForceInference`](crate::inference::ForceInference) unchanged.

use std::fmt;

/// The two families of failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input
    Validation,
    /// Singular or unreliable response matrix
    Numerical,
}

/// Unified error type for force inference
#[derive(Debug, Clone, PartialEq)]
pub enum ForceError {
    // ---- Validation ----
    /// Time and displacement sequences differ in length
    LengthMismatch { times: usize, displacement: usize },

    /// A time value is NaN or infinite
    NonFiniteTime { index: usize, value: f64 },

    /// `t[index] <= t[index - 1]`
    NonIncreasingTime { index: usize, previous: f64, current: f64 },

    /// A displacement value is NaN or infinite
    MissingDisplacement { index: usize },

    /// Calibration constant is not strictly positive and finite
    InvalidCalibration { gamma: f64 },

    /// Force vector does not match the number of intervals
    ForceLengthMismatch { expected: usize, got: usize },

    /// Right-hand side does not match the response matrix
    DimensionMismatch { rows: usize, cols: usize, rhs: usize },

    /// Density profile does not match the number of intervals
    DensityLengthMismatch { expected: usize, got: usize },

    /// Density value is negative or not finite
    InvalidDensity { index: usize, value: f64 },

    /// Drag mode name not recognised
    UnsupportedDragMode(String),

    /// Drag requested before the force profile was inferred
    ForceNotPopulated,

    /// Configuration parameter out of range
    InvalidConfiguration(String),

    // ---- Numerical ----
    /// Fewer than two samples, so no interval exists
    DegenerateTrajectory { samples: usize },

    /// Exactly zero pivot (coincident time samples)
    SingularMatrix { index: usize },

    /// Pivot too small relative to the largest matrix entry
    IllConditioned { index: usize, ratio: f64 },

    /// Solve produced NaN or infinite force values
    NonFiniteSolution,
}

pub type ForceResult<T> = Result<T, ForceError>;

impl ForceError {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ForceError::DegenerateTrajectory { .. }
            | ForceError::SingularMatrix { .. }
            | ForceError::IllConditioned { .. }
            | ForceError::NonFiniteSolution => ErrorKind::Numerical,
            _ => ErrorKind::Validation,
        }
    }

    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    pub fn is_numerical(&self) -> bool {
        self.kind() == ErrorKind::Numerical
    }
}

impl fmt::Display for ForceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // ---- Validation ----
            ForceError::LengthMismatch { times, displacement } => write!(
                f,
                "Validation Error: {} time samples but {} displacement samples",
                times, displacement
            ),
            ForceError::NonFiniteTime { index, value } => {
                write!(f, "Validation Error: time[{}] = {} is not finite", index, value)
            }
            ForceError::NonIncreasingTime { index, previous, current } => write!(
                f,
                "Validation Error: times must be strictly increasing (t[{}] = {} follows {})",
                index, current, previous
            ),
            ForceError::MissingDisplacement { index } => write!(
                f,
                "Validation Error: displacement[{}] is missing or not finite. \
                 Drop the sample from both series instead",
                index
            ),
            ForceError::InvalidCalibration { gamma } => write!(
                f,
                "Validation Error: calibration constant must be positive and finite, got {}",
                gamma
            ),
            ForceError::ForceLengthMismatch { expected, got } => write!(
                f,
                "Validation Error: force vector has {} entries, expected one per interval ({})",
                got, expected
            ),
            ForceError::DimensionMismatch { rows, cols, rhs } => write!(
                f,
                "Validation Error: cannot solve a {}x{} response matrix against {} values",
                rows, cols, rhs
            ),
            ForceError::DensityLengthMismatch { expected, got } => write!(
                f,
                "Validation Error: density profile has {} entries, expected {}",
                got, expected
            ),
            ForceError::InvalidDensity { index, value } => write!(
                f,
                "Validation Error: density[{}] = {} must be finite and non-negative",
                index, value
            ),
            ForceError::UnsupportedDragMode(mode) => write!(
                f,
                "Validation Error: unsupported drag mode '{}' (expected 'viscous' or 'elastic')",
                mode
            ),
            ForceError::ForceNotPopulated => write!(
                f,
                "Validation Error: force profile not populated. Run the inference first"
            ),
            ForceError::InvalidConfiguration(msg) => write!(f, "Validation Error: {}", msg),

            // ---- Numerical ----
            ForceError::DegenerateTrajectory { samples } => write!(
                f,
                "Numerical Error: need at least 2 samples to build a response matrix, got {}",
                samples
            ),
            ForceError::SingularMatrix { index } => write!(
                f,
                "Numerical Error: response matrix is singular (zero pivot at interval {}). \
                 Check for duplicate timestamps",
                index
            ),
            ForceError::IllConditioned { index, ratio } => write!(
                f,
                "Numerical Error: response matrix is ill-conditioned at interval {} \
                 (pivot ratio {:e}). Check for near-duplicate timestamps",
                index, ratio
            ),
            ForceError::NonFiniteSolution => {
                write!(f, "Numerical Error: solve produced non-finite force values")
            }
        }
    }
}

impl std::error::Error for ForceError {}

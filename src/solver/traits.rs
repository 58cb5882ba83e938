//! Solver traits and configuration
//!
//! # Design Philosophy
//!
//! - Central enum `SolveMethod` selects how `M · f = x` is inverted
//! - `InferenceConfiguration` carries the method plus numerical tolerances
//! - `ForceSolver` is the stable interface every method implements

use nalgebra::{DMatrix, DVector};

use crate::error::{ForceError, ForceResult};

// ============================================================================
// Solve method enumeration
// ============================================================================

/// Method used to invert the response matrix
///
/// # Examples
///
/// ```rust
/// use rouse_force::solver::SolveMethod;
///
/// let method = SolveMethod::default();
/// assert_eq!(method, SolveMethod::Triangular);
/// assert_eq!(method.name(), "Triangular");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SolveMethod {
    /// Forward substitution on the lower-triangular response matrix
    ///
    /// O(n²). Exploits causality; falls back to LU if the matrix turns out
    /// not to be lower triangular.
    #[default]
    Triangular,

    /// LU decomposition with partial pivoting
    ///
    /// O(n³). Makes no structural assumption.
    Lu,
}

impl SolveMethod {
    /// Get name identifier
    pub fn name(&self) -> &str {
        match self {
            SolveMethod::Triangular => "Triangular",
            SolveMethod::Lu => "LU",
        }
    }
}

// =================================================================================================
// Inference configuration
// =================================================================================================

/// Default relative pivot magnitude below which a matrix is ill-conditioned
pub const DEFAULT_CONDITIONING_TOLERANCE: f64 = 1e-12;

/// Default number of matrix rows above which rows are filled in parallel
/// (only with the `parallel` feature)
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 256;

/// Configuration for matrix build and solve
///
/// # Examples
///
/// ```rust
/// use rouse_force::solver::{InferenceConfiguration, SolveMethod};
///
/// let config = InferenceConfiguration::default();
/// assert!(config.validate().is_ok());
///
/// let lu = InferenceConfiguration::new(SolveMethod::Lu);
/// assert_eq!(lu.method, SolveMethod::Lu);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct InferenceConfiguration {
    /// Inversion method
    pub method: SolveMethod,

    /// Smallest accepted `|pivot| / max|M|`
    ///
    /// Pivots of the Rouse matrix are `J(Δt) ∝ √Δt`, so a tolerance `τ`
    /// flags time steps shorter than about `τ²` times the longest step:
    /// the default `1e-12` only catches steps below ~1e-24 of it. Raise it
    /// (e.g. `1e-4` to flag steps below 1e-8) to reject near-duplicate
    /// timestamps.
    pub conditioning_tolerance: f64,

    /// Matrix rows above which the build uses rayon
    pub parallel_threshold: usize,
}

impl InferenceConfiguration {
    /// Create a configuration with a given method and default tolerances
    pub fn new(method: SolveMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Set the conditioning tolerance
    pub fn with_conditioning_tolerance(mut self, tolerance: f64) -> Self {
        self.conditioning_tolerance = tolerance;
        self
    }

    /// Set the parallel threshold
    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> ForceResult<()> {
        if !self.conditioning_tolerance.is_finite() || self.conditioning_tolerance <= 0.0 {
            return Err(ForceError::InvalidConfiguration(format!(
                "conditioning tolerance must be positive and finite, got {}",
                self.conditioning_tolerance
            )));
        }
        if self.parallel_threshold == 0 {
            return Err(ForceError::InvalidConfiguration(
                "parallel threshold must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for InferenceConfiguration {
    fn default() -> Self {
        Self {
            method: SolveMethod::default(),
            conditioning_tolerance: DEFAULT_CONDITIONING_TOLERANCE,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

// =================================================================================================
// Force solver trait
// =================================================================================================

/// Exact inversion of a response matrix
///
/// # Responsibility
///
/// Return the unique `f` with `matrix · f = rhs`. Never a least-squares fit:
/// a mismatch between the assumed dynamics and the data must show up in `f`.
///
/// # Errors
///
/// Implementations return a numerical error (`SingularMatrix`,
/// `IllConditioned`, `NonFiniteSolution`) instead of a degenerate result.
pub trait ForceSolver {
    /// Solve `matrix · f = rhs`
    fn solve(
        &self,
        matrix: &DMatrix<f64>,
        rhs: &DVector<f64>,
        config: &InferenceConfiguration,
    ) -> ForceResult<DVector<f64>>;

    /// Name of the method (used for logging)
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configuration() {
        let config = InferenceConfiguration::default();
        assert_eq!(config.method, SolveMethod::Triangular);
        assert_eq!(config.conditioning_tolerance, DEFAULT_CONDITIONING_TOLERANCE);
        assert_eq!(config.parallel_threshold, DEFAULT_PARALLEL_THRESHOLD);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_tolerance() {
        let config = InferenceConfiguration::default().with_conditioning_tolerance(0.0);
        assert!(matches!(config.validate(), Err(ForceError::InvalidConfiguration(_))));

        let config = InferenceConfiguration::default().with_conditioning_tolerance(f64::NAN);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_threshold() {
        let config = InferenceConfiguration::default().with_parallel_threshold(0);
        let err = config.validate().unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("parallel threshold"));
    }

    #[test]
    fn test_method_names() {
        assert_eq!(SolveMethod::Triangular.name(), "Triangular");
        assert_eq!(SolveMethod::Lu.name(), "LU");
    }
}

//! Forward substitution solver
//!
//! # Mathematical Background
//!
//! Causality makes the response matrix lower triangular: the force on
//! interval i cannot move the point at or before `t_i`. The system
//!
//! ```text
//! M · f = x
//! ```
//!
//! is then solved row by row:
//!
//! ```text
//! f_j = ( x_j − Σ_{i<j} M[j,i] · f_i ) / M[j,j]
//! ```
//!
//! # Characteristics
//!
//! - **Cost**: O(n²), no factorization
//! - **Exact**: direct solve, not a regression
//! - **Pivots**: the diagonal `J(t_{j+1} − t_j)`, tiny for near-duplicate samples
//!
//! A matrix that is not lower triangular (e.g. built by a non-causal custom
//! kernel) is handed to [`LuSolver`] with a warning.

use nalgebra::{DMatrix, DVector};

use crate::error::{ForceError, ForceResult};
use crate::solver::methods::lu::LuSolver;
use crate::solver::traits::{ForceSolver, InferenceConfiguration};
use crate::solver::{check_pivots, check_system, validate_solution};

/// Forward substitution on a lower-triangular response matrix
///
/// # Example
///
/// ```rust
/// use nalgebra::{DMatrix, DVector};
/// use rouse_force::solver::{ForceSolver, InferenceConfiguration, TriangularSolver};
///
/// let matrix = DMatrix::from_row_slice(2, 2, &[2.0, 0.0, 1.0, 1.0]);
/// let rhs = DVector::from_vec(vec![4.0, 3.0]);
///
/// let force = TriangularSolver::new()
///     .solve(&matrix, &rhs, &InferenceConfiguration::default())
///     .unwrap();
/// assert_eq!(force.as_slice(), &[2.0, 1.0]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct TriangularSolver;

impl TriangularSolver {
    /// Create a new forward substitution solver
    pub fn new() -> Self {
        Self
    }
}

/// True when every entry above the diagonal is exactly zero
pub(crate) fn is_lower_triangular(matrix: &DMatrix<f64>) -> bool {
    (0..matrix.nrows()).all(|j| ((j + 1)..matrix.ncols()).all(|i| matrix[(j, i)] == 0.0))
}

impl ForceSolver for TriangularSolver {
    fn solve(
        &self,
        matrix: &DMatrix<f64>,
        rhs: &DVector<f64>,
        config: &InferenceConfiguration,
    ) -> ForceResult<DVector<f64>> {
        config.validate()?;
        check_system(matrix, rhs)?;

        if !is_lower_triangular(matrix) {
            log::warn!(
                "Response matrix ({}x{}) is not lower triangular. Using LU fallback.",
                matrix.nrows(),
                matrix.ncols()
            );
            return LuSolver::new().solve(matrix, rhs, config);
        }

        check_pivots(matrix.diagonal().iter().copied(), matrix.amax(), config.conditioning_tolerance)?;

        let force = matrix
            .solve_lower_triangular(rhs)
            .ok_or(ForceError::NonFiniteSolution)?;

        validate_solution(&force)?;
        Ok(force)
    }

    fn name(&self) -> &'static str {
        "Forward substitution"
    }
}

// =================================================================================================
// Tests
// =================================================================================================

//! Response matrix assembly, inversion and forward simulation
//!
//! This module is stateless: every function is a pure map from its inputs.
//! Caching lives in [`ForceInference`](crate::inference::ForceInference).
//!
//! # The Architecture (WHAT vs HOW)
//!
//! 1. **Kernel** ([`ResponseKernel`](crate::physics::ResponseKernel)) - WHAT the
//!    physics is: displacement per unit step force
//!
//! 2. **Configuration** ([`InferenceConfiguration`]) - HOW to solve:
//!    method, conditioning tolerance, parallel threshold
//!
//! 3. **Operations**:
//!    - [`build_response_matrix`]: time grid + kernel → M
//!    - [`solve_force`]: M, x → f with `M · f = x` (exact)
//!    - [`simulate`]: M, f → x
//!
//! # Workflow Diagram
//!
//! ```text
//! ┌──────────────┐   ┌─────────────────┐
//! │  Time grid   │   │ Response kernel │
//! └──────┬───────┘   └────────┬────────┘
//!        └─────────┬──────────┘
//!         ┌────────▼─────────┐
//!         │ Response matrix  │  (n−1)×(n−1), lower triangular
//!         └───┬──────────┬───┘
//!             │          │
//!   ┌─────────▼───┐  ┌───▼─────────┐
//!   │ solve_force │  │  simulate   │
//!   │  x  →  f    │  │  f  →  x    │
//!   └─────────────┘  └─────────────┘
//! ```
//!
//! # Error Handling
//!
//! All operations return [`ForceResult`](crate::error::ForceResult):
//! - validation errors for mismatched lengths or bad configuration
//! - numerical errors for degenerate grids and singular or ill-conditioned
//!   matrices
//!
//! # Example
//!
//! ```rust
//! use rouse_force::physics::RouseKernel;
//! use rouse_force::solver::{build_response_matrix, simulate, solve_force, InferenceConfiguration};
//! use nalgebra::DVector;
//!
//! let config = InferenceConfiguration::default();
//! let times: Vec<f64> = (0..10).map(|i| 10.0 * i as f64).collect();
//! let matrix = build_response_matrix(&times, &RouseKernel::uncalibrated(), &config).unwrap();
//!
//! let force = DVector::from_element(9, -1.0);
//! let x = simulate(&matrix, &force).unwrap();
//! let recovered = solve_force(&matrix, &x, &config).unwrap();
//!
//! assert!((recovered - force).amax() < 1e-10);
//! ```

// =================================================================================================
// Module Declarations
// =================================================================================================
mod traits;
mod matrix;
mod forward;
mod methods;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use traits::{
    ForceSolver,
    InferenceConfiguration,
    SolveMethod,
    DEFAULT_CONDITIONING_TOLERANCE,
    DEFAULT_PARALLEL_THRESHOLD,
};

pub use matrix::{build_response_matrix, interval_response, response_matrix_between};
pub use forward::{simulate, simulate_trajectory};
pub use methods::{solver_for, LuSolver, TriangularSolver};

use nalgebra::{DMatrix, DVector};

use crate::error::{ForceError, ForceResult};

// =================================================================================================
// Solve entry point
// =================================================================================================

/// Solve `matrix · f = rhs` with the configured method
///
/// Logs the residual norm at trace level.
pub fn solve_force(
    matrix: &DMatrix<f64>,
    rhs: &DVector<f64>,
    config: &InferenceConfiguration,
) -> ForceResult<DVector<f64>> {
    let solver = solver_for(config.method);
    let force = solver.solve(matrix, rhs, config)?;

    if log::log_enabled!(log::Level::Trace) {
        let residual = (matrix * &force - rhs).norm();
        log::trace!("{} solve on {} intervals, residual = {:e}", solver.name(), force.len(), residual);
    }

    Ok(force)
}

// =================================================================================================
// Helper Functions
// =================================================================================================

/// Check the matrix is square, non-empty and matches the right-hand side
pub(crate) fn check_system(matrix: &DMatrix<f64>, rhs: &DVector<f64>) -> ForceResult<()> {
    if !matrix.is_square() || matrix.nrows() != rhs.len() {
        return Err(ForceError::DimensionMismatch {
            rows: matrix.nrows(),
            cols: matrix.ncols(),
            rhs: rhs.len(),
        });
    }
    if matrix.nrows() == 0 {
        return Err(ForceError::DegenerateTrajectory { samples: 1 });
    }
    Ok(())
}

/// Reject zero or tiny pivots
///
/// A pivot is ill-conditioned when `|pivot| / scale < tolerance`, with
/// `scale` the largest absolute matrix entry.
pub(crate) fn check_pivots<I>(pivots: I, scale: f64, tolerance: f64) -> ForceResult<()>
where
    I: IntoIterator<Item = f64>,
{
    for (index, pivot) in pivots.into_iter().enumerate() {
        if pivot == 0.0 || scale == 0.0 {
            return Err(ForceError::SingularMatrix { index });
        }
        let ratio = pivot.abs() / scale;
        if ratio < tolerance {
            log::warn!(
                "Pivot {} is {:e} of the largest entry (tolerance {:e})",
                index,
                ratio,
                tolerance
            );
            return Err(ForceError::IllConditioned { index, ratio });
        }
    }
    Ok(())
}

/// Validate a solved force profile for NaN or Inf values
pub(crate) fn validate_solution(force: &DVector<f64>) -> ForceResult<()> {
    if force.iter().any(|f| !f.is_finite()) {
        return Err(ForceError::NonFiniteSolution);
    }
    Ok(())
}

// =================================================================================================
// Tests
// =================================================================================================

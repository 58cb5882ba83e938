//! Forward simulation
//!
//! Maps a force profile to the displacement it produces:
//!
//! ```text
//! x = M · f
//! ```
//!
//! Pure and linear. Used for counterfactual trajectories and as the
//! verification half of the inference round trip.

use nalgebra::{DMatrix, DVector};

use crate::error::{ForceError, ForceResult};

/// Displacement at samples 1..n (relative to sample 0) for a force profile
///
/// # Errors
///
/// `ForceLengthMismatch` when `force.len()` differs from the number of
/// matrix columns.
///
/// # Example
///
/// ```rust
/// use nalgebra::{DMatrix, DVector};
/// use rouse_force::solver::simulate;
///
/// let matrix = DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.5, 1.0]);
/// let x = simulate(&matrix, &DVector::from_vec(vec![2.0, 1.0])).unwrap();
/// assert_eq!(x.as_slice(), &[2.0, 2.0]);
/// ```
pub fn simulate(matrix: &DMatrix<f64>, force: &DVector<f64>) -> ForceResult<DVector<f64>> {
    if force.len() != matrix.ncols() {
        return Err(ForceError::ForceLengthMismatch {
            expected: matrix.ncols(),
            got: force.len(),
        });
    }
    Ok(matrix * force)
}

/// Full trajectory, with the reference sample (zero) prepended
///
/// The result has one entry per time sample, starting at `0.0`.
pub fn simulate_trajectory(matrix: &DMatrix<f64>, force: &DVector<f64>) -> ForceResult<DVector<f64>> {
    let relative = simulate(matrix, force)?;
    Ok(relative.insert_row(0, 0.0))
}

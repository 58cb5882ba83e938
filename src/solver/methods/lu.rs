//! LU decomposition solver
//!
//! Factorizes `P · M = L · U` with partial pivoting and solves by two
//! triangular sweeps. Makes no assumption on the structure of M, so it also
//! serves as the fallback for matrices that are not lower triangular.
//!
//! The pivots checked for conditioning are the diagonal of U.

use nalgebra::{DMatrix, DVector};

use crate::error::{ForceError, ForceResult};
use crate::solver::traits::{ForceSolver, InferenceConfiguration};
use crate::solver::{check_pivots, check_system, validate_solution};

/// Partial-pivot LU solver
#[derive(Debug, Clone, Copy, Default)]
pub struct LuSolver;

impl LuSolver {
    /// Create a new LU solver
    pub fn new() -> Self {
        Self
    }
}

impl ForceSolver for LuSolver {
    fn solve(
        &self,
        matrix: &DMatrix<f64>,
        rhs: &DVector<f64>,
        config: &InferenceConfiguration,
    ) -> ForceResult<DVector<f64>> {
        config.validate()?;
        check_system(matrix, rhs)?;

        let scale = matrix.amax();
        let lu = matrix.clone().lu();
        check_pivots(lu.u().diagonal().iter().copied(), scale, config.conditioning_tolerance)?;

        let force = lu.solve(rhs).ok_or(ForceError::NonFiniteSolution)?;

        validate_solution(&force)?;
        Ok(force)
    }

    fn name(&self) -> &'static str {
        "LU decomposition"
    }
}

//! Numerical methods for inverting the response matrix
//!
//! This module contains concrete implementations of the
//! [`ForceSolver`](crate::solver::ForceSolver) trait.
//!
//! # Available Methods
//!
//! - **[`TriangularSolver`]**: forward substitution
//!   - Cost: O(n²)
//!   - Use: the default; response matrices are lower triangular by causality
//!
//! - **[`LuSolver`]**: LU decomposition with partial pivoting
//!   - Cost: O(n³)
//!   - Use: cross-checks, and matrices without triangular structure
//!
//! Both are exact solves and share the same conditioning checks.
//!
//! # Example
//!
//! ```rust
//! use rouse_force::physics::RouseKernel;
//! use rouse_force::solver::{build_response_matrix, simulate, solver_for};
//! use rouse_force::solver::{InferenceConfiguration, SolveMethod};
//! use nalgebra::DVector;
//!
//! let config = InferenceConfiguration::new(SolveMethod::Lu);
//! let times = [0.0, 1.0, 2.5, 3.0];
//! let matrix = build_response_matrix(&times, &RouseKernel::uncalibrated(), &config).unwrap();
//!
//! let force = DVector::from_vec(vec![1.0, 0.0, -1.0]);
//! let x = simulate(&matrix, &force).unwrap();
//!
//! let recovered = solver_for(config.method).solve(&matrix, &x, &config).unwrap();
//! assert!((recovered - force).amax() < 1e-10);
//! ```

pub mod lu;
pub mod triangular;

// Re-exports for convenience
pub use lu::LuSolver;
pub use triangular::TriangularSolver;

use crate::solver::traits::{ForceSolver, SolveMethod};

/// Solver implementing a given method
pub fn solver_for(method: SolveMethod) -> Box<dyn ForceSolver> {
    match method {
        SolveMethod::Triangular => Box::new(TriangularSolver::new()),
        SolveMethod::Lu => Box::new(LuSolver::new()),
    }
}

//! Response matrix assembly
//!
//! # Mathematical Background
//!
//! A force piecewise constant on intervals `(e_i, e_{i+1}]` is a sum of step
//! forces: `+f_i` switched on at `e_i` and `-f_i` switched on at `e_{i+1}`.
//! By linearity the displacement at time `s` is
//!
//! ```text
//! x(s) = Σ_i f_i · [ J(s − e_i) − J(s − e_{i+1}) ]
//! ```
//!
//! which gives the matrix entry for evaluation time `s` and interval `i`:
//!
//! ```text
//! e_{i+1} ≤ s        :  J(s − e_i) − J(s − e_{i+1})   (interval complete)
//! e_i < s < e_{i+1}  :  J(s − e_i)                    (force partially acted)
//! s ≤ e_i            :  0                             (causality)
//! ```
//!
//! Only absolute time differences enter, so irregular spacing and intervals
//! merged by dropped samples need no special case.
//!
//! # Square case
//!
//! For inference, the evaluation times are the samples `t_1 .. t_{n-1}` and
//! the edges are `t_0 .. t_{n-1}`. The matrix is then (n−1)×(n−1) and lower
//! triangular with diagonal `J(t_{i+1} − t_i)`, which vanishes exactly when
//! two samples coincide.

use nalgebra::DMatrix;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{ForceError, ForceResult};
use crate::physics::{validate_time_grid, ResponseKernel};
use crate::solver::traits::InferenceConfiguration;

/// Contribution to displacement at `sample` from a unit force on `(start, end]`
#[inline]
pub fn interval_response<K>(kernel: &K, sample: f64, start: f64, end: f64) -> f64
where
    K: ResponseKernel + ?Sized,
{
    if start >= sample {
        0.0
    } else if end <= sample {
        kernel.response(sample - start) - kernel.response(sample - end)
    } else {
        kernel.response(sample - start)
    }
}

/// Build the square causal response matrix for a time grid
///
/// Row `j` is the displacement at `times[j + 1]` (relative to `times[0]`),
/// column `i` is the force on `(times[i], times[i + 1]]`.
///
/// # Errors
///
/// `DegenerateTrajectory` when fewer than two samples are given;
/// `NonFiniteTime` / `NonIncreasingTime` for a grid that is not finite and
/// strictly increasing. Near-duplicate times pass and leave tiny pivots that
/// the solver reports as `IllConditioned`.
///
/// # Example
///
/// ```rust
/// use rouse_force::physics::RouseKernel;
/// use rouse_force::solver::{build_response_matrix, InferenceConfiguration};
///
/// let kernel = RouseKernel::uncalibrated();
/// let times = [0.0, 1.0, 2.0, 4.0];
/// let matrix = build_response_matrix(&times, &kernel, &InferenceConfiguration::default()).unwrap();
///
/// assert_eq!(matrix.shape(), (3, 3));
/// assert_eq!(matrix[(0, 1)], 0.0);
/// ```
pub fn build_response_matrix<K>(
    times: &[f64],
    kernel: &K,
    config: &InferenceConfiguration,
) -> ForceResult<DMatrix<f64>>
where
    K: ResponseKernel + ?Sized,
{
    if times.len() < 2 {
        return Err(ForceError::DegenerateTrajectory { samples: times.len() });
    }
    let matrix = response_matrix_between(&times[1..], times, kernel, config)?;

    log::debug!(
        "Built {}x{} response matrix ({} kernel, Γ = {})",
        matrix.nrows(),
        matrix.ncols(),
        kernel.name(),
        kernel.calibration()
    );

    Ok(matrix)
}

/// Build the rectangular response matrix for arbitrary evaluation times
///
/// `edges` delimits the force intervals (`edges.len() − 1` columns);
/// `eval_times` are the times at which displacement is wanted (one row
/// each). Evaluation times falling strictly inside an interval use the
/// partial-action entry.
///
/// # Errors
///
/// `DegenerateTrajectory` when `edges` has fewer than two entries, and the
/// time grid validation errors when `edges` is not finite and strictly
/// increasing.
pub fn response_matrix_between<K>(
    eval_times: &[f64],
    edges: &[f64],
    kernel: &K,
    config: &InferenceConfiguration,
) -> ForceResult<DMatrix<f64>>
where
    K: ResponseKernel + ?Sized,
{
    if edges.len() < 2 {
        return Err(ForceError::DegenerateTrajectory { samples: edges.len() });
    }
    validate_time_grid(edges)?;
    config.validate()?;

    let rows = eval_times.len();
    let cols = edges.len() - 1;

    let entry = |j: usize, i: usize| interval_response(kernel, eval_times[j], edges[i], edges[i + 1]);

    if rows > config.parallel_threshold {
        #[cfg(feature = "parallel")]
        {
            let data: Vec<f64> = (0..rows)
                .into_par_iter()
                .flat_map_iter(|j| (0..cols).map(move |i| entry(j, i)))
                .collect();
            return Ok(DMatrix::from_row_slice(rows, cols, &data));
        }
    }

    Ok(DMatrix::from_fn(rows, cols, entry))
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::RouseKernel;
    use approx::assert_relative_eq;

    fn default_config() -> InferenceConfiguration {
        InferenceConfiguration::default()
    }

    #[test]
    fn test_shape_and_causality() {
        let kernel = RouseKernel::uncalibrated();
        let times: Vec<f64> = (0..6).map(|i| i as f64).collect();
        let matrix = build_response_matrix(&times, &kernel, &default_config()).unwrap();

        assert_eq!(matrix.shape(), (5, 5));
        for j in 0..5 {
            for i in (j + 1)..5 {
                assert_eq!(matrix[(j, i)], 0.0, "entry ({}, {}) must be causal zero", j, i);
            }
            assert!(matrix[(j, j)] > 0.0);
        }
    }

    #[test]
    fn test_entries_match_kernel_differences() {
        let kernel = RouseKernel::new(2.0).unwrap();
        let times = [0.0, 1.0, 3.0, 7.0];
        let matrix = build_response_matrix(&times, &kernel, &default_config()).unwrap();

        // displacement at t=7 from force on (1, 3]
        let expected = kernel.response(6.0) - kernel.response(4.0);
        assert_relative_eq!(matrix[(2, 1)], expected, epsilon = 1e-14);

        // diagonal: force has acted over exactly its own interval
        assert_relative_eq!(matrix[(1, 1)], kernel.response(2.0), epsilon = 1e-14);
    }

    #[test]
    fn test_irregular_grid_equals_merged_interval() {
        // Dropping a sample must give the same entries as a grid built without it
        let kernel = RouseKernel::uncalibrated();
        let full = [0.0, 1.0, 2.0, 3.0];
        let dropped = [0.0, 2.0, 3.0];
        let m_full = build_response_matrix(&full, &kernel, &default_config()).unwrap();
        let m_drop = build_response_matrix(&dropped, &kernel, &default_config()).unwrap();

        // Constant unit force over (0, 2] seen at t=3
        let merged = m_full[(2, 0)] + m_full[(2, 1)];
        assert_relative_eq!(m_drop[(1, 0)], merged, epsilon = 1e-14);
    }

    #[test]
    fn test_partial_interval_entry() {
        let kernel = RouseKernel::uncalibrated();
        let edges = [0.0, 4.0];
        let matrix = response_matrix_between(&[1.0, 4.0, 9.0], &edges, &kernel, &default_config()).unwrap();

        assert_eq!(matrix.shape(), (3, 1));
        assert_relative_eq!(matrix[(0, 0)], kernel.response(1.0), epsilon = 1e-14);
        assert_relative_eq!(matrix[(1, 0)], kernel.response(4.0), epsilon = 1e-14);
        assert_relative_eq!(matrix[(2, 0)], kernel.response(9.0) - kernel.response(5.0), epsilon = 1e-14);
    }

    #[test]
    fn test_eval_before_edges_is_zero() {
        let kernel = RouseKernel::uncalibrated();
        let matrix = response_matrix_between(&[-1.0, 0.0], &[0.0, 1.0, 2.0], &kernel, &default_config()).unwrap();
        assert!(matrix.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_duplicate_time_rejected() {
        let kernel = RouseKernel::uncalibrated();
        assert_eq!(
            build_response_matrix(&[0.0, 1.0, 1.0, 2.0], &kernel, &default_config()),
            Err(ForceError::NonIncreasingTime { index: 2, previous: 1.0, current: 1.0 })
        );
        assert!(matches!(
            response_matrix_between(&[0.5], &[0.0, 2.0, 1.0], &kernel, &default_config()),
            Err(ForceError::NonIncreasingTime { index: 2, .. })
        ));
        assert!(matches!(
            response_matrix_between(&[0.5], &[0.0, f64::NAN], &kernel, &default_config()),
            Err(ForceError::NonFiniteTime { index: 1, .. })
        ));
    }

    #[test]
    fn test_degenerate_grid() {
        let kernel = RouseKernel::uncalibrated();
        assert_eq!(
            build_response_matrix(&[1.0], &kernel, &default_config()),
            Err(ForceError::DegenerateTrajectory { samples: 1 })
        );
        assert_eq!(
            build_response_matrix(&[], &kernel, &default_config()),
            Err(ForceError::DegenerateTrajectory { samples: 0 })
        );
    }

    #[test]
    fn test_linear_in_gamma() {
        let times = [0.0, 0.5, 2.0, 2.5, 6.0];
        let m1 = build_response_matrix(&times, &RouseKernel::new(1.0).unwrap(), &default_config()).unwrap();
        let m5 = build_response_matrix(&times, &RouseKernel::new(5.0).unwrap(), &default_config()).unwrap();
        assert!((m5 - m1 * 5.0).amax() < 1e-12);
    }

    #[test]
    fn test_threshold_does_not_change_result() {
        let kernel = RouseKernel::uncalibrated();
        let times: Vec<f64> = (0..40).map(|i| (i as f64).powf(1.3)).collect();
        let low = default_config().with_parallel_threshold(1);
        let a = build_response_matrix(&times, &kernel, &low).unwrap();
        let b = build_response_matrix(&times, &kernel, &default_config()).unwrap();
        assert_eq!(a, b);
    }
}

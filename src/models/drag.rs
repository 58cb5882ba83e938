//! Drag from transiently attached material
//!
//! As the locus moves, surrounding material (e.g. other chromatin segments,
//! proteins) can bind to it and get dragged along. That material exerts an
//! extra restoring force on top of the polymer response.
//!
//! # Coupling laws
//!
//! With ρ_i the attachment density over interval i and x the trajectory
//! implied by the force profile (`x = M · f`, which reproduces the data):
//!
//! ```text
//! Viscous :  drag_i = −ρ_i · (x_{i+1} − x_i) / (t_{i+1} − t_i)
//! Elastic :  drag_i = −ρ_i · (x_{i+1} − x_i)
//! ```
//!
//! Viscous drag opposes the local velocity; elastic drag opposes the
//! displacement accumulated since the interval began.
//!
//! # Force balance
//!
//! In the overdamped limit the total restoring force is `force + drag`; the
//! force needed to explain the observed motion is minus that sum.

use nalgebra::{DMatrix, DVector};
use std::fmt;
use std::str::FromStr;

use crate::error::{ForceError, ForceResult};
use crate::physics::validate_time_grid;
use crate::solver::simulate_trajectory;

/// Coupling law between attachment density and drag force
///
/// # Example
///
/// ```rust
/// use rouse_force::models::DragMode;
///
/// let mode: DragMode = "viscous".parse().unwrap();
/// assert_eq!(mode, DragMode::Viscous);
/// assert!("plastic".parse::<DragMode>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DragMode {
    /// Drag ∝ density × velocity over the interval
    Viscous,
    /// Drag ∝ density × displacement accumulated over the interval
    Elastic,
}

impl DragMode {
    /// Every supported mode
    pub const ALL: [DragMode; 2] = [DragMode::Viscous, DragMode::Elastic];

    pub fn name(&self) -> &'static str {
        match self {
            DragMode::Viscous => "viscous",
            DragMode::Elastic => "elastic",
        }
    }
}

impl FromStr for DragMode {
    type Err = ForceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "viscous" => Ok(DragMode::Viscous),
            "elastic" => Ok(DragMode::Elastic),
            _ => Err(ForceError::UnsupportedDragMode(s.to_string())),
        }
    }
}

impl fmt::Display for DragMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Check a density profile against the number of intervals
pub fn validate_density(density: &[f64], intervals: usize) -> ForceResult<()> {
    if density.len() != intervals {
        return Err(ForceError::DensityLengthMismatch {
            expected: intervals,
            got: density.len(),
        });
    }
    if let Some(index) = density.iter().position(|&d| !d.is_finite() || d < 0.0) {
        return Err(ForceError::InvalidDensity { index, value: density[index] });
    }
    Ok(())
}

/// Drag force profile for a given force profile
///
/// # Arguments
///
/// * `matrix` - response matrix the force profile was inferred with
/// * `force` - force profile (one value per interval)
/// * `times` - time grid (one more entry than `force`)
/// * `density` - non-negative attachment density per interval
/// * `mode` - coupling law
///
/// # Returns
///
/// A profile with the same length and indexing as `force`, exactly zero
/// wherever `density` is zero.
///
/// # Errors
///
/// Time grid validation errors when `times` is not finite and strictly
/// increasing, `ForceLengthMismatch`, and the density errors of
/// [`validate_density`].
pub fn drag_force(
    matrix: &DMatrix<f64>,
    force: &DVector<f64>,
    times: &[f64],
    density: &[f64],
    mode: DragMode,
) -> ForceResult<DVector<f64>> {
    validate_time_grid(times)?;
    let intervals = force.len();
    if times.len() != intervals + 1 {
        return Err(ForceError::ForceLengthMismatch {
            expected: times.len().saturating_sub(1),
            got: intervals,
        });
    }
    validate_density(density, intervals)?;

    let trajectory = simulate_trajectory(matrix, force)?;

    let drag = DVector::from_fn(intervals, |i, _| {
        let rho = density[i];
        if rho == 0.0 {
            return 0.0;
        }
        let step = trajectory[i + 1] - trajectory[i];
        match mode {
            DragMode::Viscous => -rho * step / (times[i + 1] - times[i]),
            DragMode::Elastic => -rho * step,
        }
    });

    log::debug!("Computed {} drag over {} intervals", mode, intervals);
    Ok(drag)
}

// =================================================================================================
// Tests
// =================================================================================================

//! Observed trajectory record
//!
//! This module provides the immutable input to force inference: a strictly
//! increasing time grid and the displacement observed at each sample.
//!
//! Dropped samples are simply omitted from both series. The wider interval
//! they leave behind needs no special handling downstream.

use nalgebra::DVector;
use std::fmt;

use crate::error::{ForceError, ForceResult};

/// Observed one-dimensional trajectory
///
/// # Invariants
///
/// - `times.len() == displacement.len()`
/// - times are finite and strictly increasing
/// - displacement is finite everywhere (no NaN placeholders)
///
/// # Example
///
/// ```rust
/// use rouse_force::physics::Trajectory;
///
/// let trajectory = Trajectory::new(
///     vec![0.0, 1.0, 3.0],
///     vec![0.5, 0.7, 1.2],
/// ).unwrap();
///
/// assert_eq!(trajectory.len(), 3);
/// assert_eq!(trajectory.intervals(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    times: DVector<f64>,
    displacement: DVector<f64>,
}

impl Trajectory {
    /// Create a validated trajectory
    ///
    /// # Errors
    ///
    /// - `LengthMismatch` when the two series differ in length
    /// - `NonFiniteTime` / `NonIncreasingTime` for a bad time grid
    /// - `MissingDisplacement` for NaN or infinite displacement
    pub fn new(times: Vec<f64>, displacement: Vec<f64>) -> ForceResult<Self> {
        if times.len() != displacement.len() {
            return Err(ForceError::LengthMismatch {
                times: times.len(),
                displacement: displacement.len(),
            });
        }

        validate_time_grid(&times)?;

        if let Some(index) = displacement.iter().position(|x| !x.is_finite()) {
            return Err(ForceError::MissingDisplacement { index });
        }

        Ok(Self {
            times: DVector::from_vec(times),
            displacement: DVector::from_vec(displacement),
        })
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Number of inter-sample intervals (length of a force profile)
    pub fn intervals(&self) -> usize {
        self.len().saturating_sub(1)
    }

    pub fn times(&self) -> &DVector<f64> {
        &self.times
    }

    pub fn displacement(&self) -> &DVector<f64> {
        &self.displacement
    }

    /// Displacement at samples 1..n relative to sample 0
    ///
    /// This is the right-hand side of the inference solve. Empty when the
    /// trajectory has fewer than two samples.
    pub fn relative_displacement(&self) -> DVector<f64> {
        if self.len() < 2 {
            return DVector::zeros(0);
        }
        let reference = self.displacement[0];
        self.displacement.rows(1, self.len() - 1).map(|x| x - reference)
    }

    /// Start time of each interval (one entry per force profile index)
    pub fn interval_starts(&self) -> DVector<f64> {
        self.times.rows(0, self.intervals()).into_owned()
    }

    /// Same trajectory with every displacement scaled by `factor`
    pub fn scaled(&self, factor: f64) -> ForceResult<Self> {
        Self::new(
            self.times.iter().copied().collect(),
            self.displacement.iter().map(|x| x * factor).collect(),
        )
    }
}

/// Check a time grid is finite and strictly increasing
pub fn validate_time_grid(times: &[f64]) -> ForceResult<()> {
    for (index, &value) in times.iter().enumerate() {
        if !value.is_finite() {
            return Err(ForceError::NonFiniteTime { index, value });
        }
        if index > 0 && value <= times[index - 1] {
            return Err(ForceError::NonIncreasingTime {
                index,
                previous: times[index - 1],
                current: value,
            });
        }
    }
    Ok(())
}

impl fmt::Display for Trajectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.times.iter().next(), self.times.iter().last()) {
            (Some(first), Some(last)) => {
                write!(f, "Trajectory [{} samples, t = {} .. {}]", self.len(), first, last)
            }
            _ => write!(f, "Trajectory [empty]"),
        }
    }
}

// ==================== Tests ====================

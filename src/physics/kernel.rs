//! Rouse step-force response
//!
//! # Derivation
//!
//! A free Rouse monomer in 1D has mean squared displacement
//!
//! ```text
//! MSD(Δt) = Γ · √Δt
//! ```
//!
//! The fluctuation–dissipation relation in 1D links this to the creep
//! compliance J (displacement per unit step force):
//!
//! ```text
//! MSD(Δt) = 2 · k_BT · J(Δt)
//! ```
//!
//! Measuring forces in units of k_BT / length gives
//!
//! ```text
//! J(Δt) = Γ · √Δt / 2
//! ```
//!
//! So with time in seconds, displacement in μm and Γ in μm²/√s, inferred
//! forces come out in k_BT/μm. No separate temperature parameter exists.
//!
//! The response grows sublinearly: displacement at any time depends on the
//! whole force history, weighted by this kernel. There is no recursive
//! shortcut, hence the dense response matrix.

use crate::error::{ForceError, ForceResult};
use crate::physics::traits::ResponseKernel;

/// Rouse subdiffusive response kernel
///
/// # Example
///
/// ```rust
/// use rouse_force::physics::{ResponseKernel, RouseKernel};
///
/// let kernel = RouseKernel::new(2.0).unwrap();
/// assert_eq!(kernel.response(0.0), 0.0);
/// assert!((kernel.response(4.0) - 2.0).abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RouseKernel {
    /// MSD prefactor Γ \[length²/√time\]
    gamma: f64,
}

impl RouseKernel {
    /// Create a kernel from a calibration constant Γ
    ///
    /// # Errors
    ///
    /// `InvalidCalibration` if Γ is not strictly positive and finite.
    pub fn new(gamma: f64) -> ForceResult<Self> {
        if !gamma.is_finite() || gamma <= 0.0 {
            return Err(ForceError::InvalidCalibration { gamma });
        }
        Ok(Self { gamma })
    }

    /// Uncalibrated kernel (Γ = 1, arbitrary units)
    pub fn uncalibrated() -> Self {
        Self { gamma: 1.0 }
    }

    /// MSD prefactor Γ
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    /// Free mean squared displacement at `lag`
    pub fn msd(&self, lag: f64) -> f64 {
        if lag <= 0.0 {
            0.0
        } else {
            self.gamma * lag.sqrt()
        }
    }
}

impl Default for RouseKernel {
    fn default() -> Self {
        Self::uncalibrated()
    }
}

impl ResponseKernel for RouseKernel {
    #[inline]
    fn response(&self, lag: f64) -> f64 {
        // MSD = 2 J, with k_BT as the force unit
        0.5 * self.msd(lag)
    }

    fn calibration(&self) -> f64 {
        self.gamma
    }

    fn name(&self) -> &str {
        "Rouse"
    }

    fn description(&self) -> Option<&str> {
        Some("Rouse subdiffusion, MSD = Γ√t, step response J(t) = Γ√t / 2")
    }
}

// =================================================================================================
// Tests
// =================================================================================================

//! Force inference on an observed trajectory
//!
//! [`ForceInference`] is the single entry point: it owns the observed
//! [`Trajectory`], the calibration constant Γ, and lazily memoized derived
//! values:
//!
//! - the response matrix M, cached under an explicit (time grid, Γ) key
//! - the force profile, solved once from `M · f = x`
//! - the drag profile, cached per (density, mode)
//!
//! All numerics are delegated to the stateless [`solver`](crate::solver) and
//! [`models`](crate::models) modules.
//!
//! # Units
//!
//! With time, displacement and Γ in consistent units (e.g. s, μm, μm²/√s),
//! forces come out in k_BT per displacement unit (e.g. k_BT/μm). Γ folds in
//! the thermal energy, so no temperature is ever supplied. With Γ = 1 forces
//! are in arbitrary units.
//!
//! # Example
//!
//! ```rust
//! use rouse_force::inference::ForceInference;
//!
//! let times: Vec<f64> = (0..5).map(|i| i as f64).collect();
//! let displacement = vec![0.0, 0.1, 0.3, 0.2, 0.4];
//!
//! let mut inference = ForceInference::with_calibration(times, displacement, 0.5).unwrap();
//! let force = inference.populate().unwrap().clone();
//! assert_eq!(force.len(), 4);
//!
//! // Forward-simulating the force reproduces the data
//! let x = inference.simulate(&force).unwrap();
//! assert!((x[3] - 0.4).abs() < 1e-10);
//! ```

use nalgebra::{DMatrix, DVector};

use crate::error::{ForceError, ForceResult};
use crate::models::{drag_force, DragMode};
use crate::physics::{RouseKernel, Trajectory};
use crate::solver::{
    build_response_matrix, response_matrix_between, simulate, simulate_trajectory, solve_force,
    InferenceConfiguration,
};

// =================================================================================================
// Caches
// =================================================================================================

/// Response matrix with the (time grid, Γ) it was built from
#[derive(Debug, Clone)]
struct MatrixCache {
    times: DVector<f64>,
    gamma: f64,
    matrix: DMatrix<f64>,
}

impl MatrixCache {
    fn matches(&self, times: &DVector<f64>, gamma: f64) -> bool {
        self.gamma == gamma && &self.times == times
    }
}

/// Drag profile with the density and mode it was computed for
#[derive(Debug, Clone)]
struct DragCache {
    density: Vec<f64>,
    mode: DragMode,
    profile: DVector<f64>,
}

// =================================================================================================
// Force Inference
// =================================================================================================

/// Force inference on a Rouse-subdiffusive trajectory
#[derive(Debug, Clone)]
pub struct ForceInference {
    trajectory: Trajectory,
    kernel: RouseKernel,
    config: InferenceConfiguration,

    matrix: Option<MatrixCache>,
    force: Option<DVector<f64>>,
    drag: Option<DragCache>,
}

impl ForceInference {
    /// Create an uncalibrated inference (Γ = 1)
    pub fn new(times: Vec<f64>, displacement: Vec<f64>) -> ForceResult<Self> {
        Self::with_calibration(times, displacement, 1.0)
    }

    /// Create an inference with calibration constant Γ
    ///
    /// # Errors
    ///
    /// Validation errors for mismatched lengths, non-finite or non-increasing
    /// times, missing displacement, or Γ not positive and finite.
    pub fn with_calibration(times: Vec<f64>, displacement: Vec<f64>, gamma: f64) -> ForceResult<Self> {
        let trajectory = Trajectory::new(times, displacement)?;
        Self::from_trajectory(trajectory, gamma)
    }

    /// Create an inference from a validated trajectory
    pub fn from_trajectory(trajectory: Trajectory, gamma: f64) -> ForceResult<Self> {
        let kernel = RouseKernel::new(gamma)?;
        Ok(Self {
            trajectory,
            kernel,
            config: InferenceConfiguration::default(),
            matrix: None,
            force: None,
            drag: None,
        })
    }

    /// Replace the solver configuration
    ///
    /// Clears the force and drag profiles; the matrix does not depend on the
    /// configuration and stays cached.
    pub fn with_configuration(mut self, config: InferenceConfiguration) -> ForceResult<Self> {
        config.validate()?;
        self.config = config;
        self.force = None;
        self.drag = None;
        Ok(self)
    }

    // ========================================== Access ==========================================

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn times(&self) -> &DVector<f64> {
        self.trajectory.times()
    }

    pub fn displacement(&self) -> &DVector<f64> {
        self.trajectory.displacement()
    }

    /// Calibration constant Γ
    pub fn calibration(&self) -> f64 {
        self.kernel.gamma()
    }

    pub fn kernel(&self) -> &RouseKernel {
        &self.kernel
    }

    pub fn configuration(&self) -> &InferenceConfiguration {
        &self.config
    }

    /// Number of force intervals
    pub fn intervals(&self) -> usize {
        self.trajectory.intervals()
    }

    /// Start time of each interval (one per force profile entry)
    pub fn interval_starts(&self) -> DVector<f64> {
        self.trajectory.interval_starts()
    }

    // ====================================== Parameter change ======================================

    /// Change the calibration constant
    ///
    /// Invalidates the cached matrix, force and drag profiles.
    pub fn recalibrate(&mut self, gamma: f64) -> ForceResult<()> {
        let kernel = RouseKernel::new(gamma)?;
        if kernel != self.kernel {
            log::debug!("Calibration changed ({} -> {}), dropping caches", self.kernel.gamma(), gamma);
            self.kernel = kernel;
            self.invalidate();
        }
        Ok(())
    }

    /// Replace the time grid, keeping the displacement
    ///
    /// Useful to convert frame indices into physical time. Invalidates the
    /// cached matrix, force and drag profiles.
    pub fn retime(&mut self, times: Vec<f64>) -> ForceResult<()> {
        let trajectory = Trajectory::new(times, self.trajectory.displacement().iter().copied().collect())?;
        if trajectory != self.trajectory {
            log::debug!("Time grid changed, dropping caches");
            self.trajectory = trajectory;
            self.invalidate();
        }
        Ok(())
    }

    fn invalidate(&mut self) {
        self.matrix = None;
        self.force = None;
        self.drag = None;
    }

    // ======================================== Matrix cache ========================================

    fn fresh_cache(&self) -> Option<&MatrixCache> {
        self.matrix
            .as_ref()
            .filter(|cache| cache.matches(self.trajectory.times(), self.kernel.gamma()))
    }

    fn build_cache(&self) -> ForceResult<MatrixCache> {
        let times = self.trajectory.times().clone();
        let matrix = build_response_matrix(times.as_slice(), &self.kernel, &self.config)?;
        Ok(MatrixCache {
            times,
            gamma: self.kernel.gamma(),
            matrix,
        })
    }

    /// Response matrix for the current time grid and Γ (built on first use)
    ///
    /// # Errors
    ///
    /// `DegenerateTrajectory` for fewer than two samples.
    pub fn response_matrix(&mut self) -> ForceResult<&DMatrix<f64>> {
        if self.fresh_cache().is_none() {
            self.matrix = Some(self.build_cache()?);
        } else {
            log::debug!("Response matrix cache hit");
        }
        self.matrix
            .as_ref()
            .map(|cache| &cache.matrix)
            .ok_or(ForceError::DegenerateTrajectory { samples: self.trajectory.len() })
    }

    // ========================================= Inference =========================================

    /// Infer the force profile (solved once, then cached)
    ///
    /// Solves `M · f = x[1..] − x[0]` exactly. On failure nothing is stored:
    /// the force profile stays unpopulated and no matrix is cached.
    ///
    /// # Errors
    ///
    /// Numerical errors for degenerate trajectories and singular or
    /// ill-conditioned matrices.
    pub fn populate(&mut self) -> ForceResult<&DVector<f64>> {
        if self.force.is_none() {
            let built = match self.fresh_cache() {
                Some(_) => None,
                None => Some(self.build_cache()?),
            };

            let rhs = self.trajectory.relative_displacement();
            let force = {
                let cache = built
                    .as_ref()
                    .or_else(|| self.fresh_cache())
                    .ok_or(ForceError::DegenerateTrajectory { samples: self.trajectory.len() })?;
                solve_force(&cache.matrix, &rhs, &self.config)?
            };

            if let Some(cache) = built {
                self.matrix = Some(cache);
            }
            log::debug!("Inferred force profile over {} intervals", force.len());
            self.force = Some(force);
        }
        self.force.as_ref().ok_or(ForceError::ForceNotPopulated)
    }

    /// Inferred force profile, if populated
    pub fn force_profile(&self) -> Option<&DVector<f64>> {
        self.force.as_ref()
    }

    pub fn is_populated(&self) -> bool {
        self.force.is_some()
    }

    /// Step-plot grid: interval starts plus the final sample, with the last
    /// force value repeated so a step plot ends at the last sample
    ///
    /// Presentation only; not part of the model state.
    pub fn step_profile(&self) -> ForceResult<(DVector<f64>, DVector<f64>)> {
        let force = self.force.as_ref().ok_or(ForceError::ForceNotPopulated)?;
        Ok(step_grid(self.trajectory.times(), force))
    }

    // ========================================= Simulation =========================================

    /// Displacement at samples 1..n (relative to sample 0) for a force profile
    pub fn simulate(&mut self, force: &DVector<f64>) -> ForceResult<DVector<f64>> {
        let matrix = self.response_matrix()?;
        simulate(matrix, force)
    }

    /// Full trajectory (starting at the reference zero) for a force profile
    pub fn simulate_trajectory(&mut self, force: &DVector<f64>) -> ForceResult<DVector<f64>> {
        let matrix = self.response_matrix()?;
        simulate_trajectory(matrix, force)
    }

    /// Trajectory had the inferred force dropped to zero after interval `last`
    ///
    /// Intervals `0..=last` keep their inferred force; later intervals get
    /// zero. The result starts at the reference zero.
    pub fn simulate_truncated(&mut self, last: usize) -> ForceResult<DVector<f64>> {
        let mut force = self.force.clone().ok_or(ForceError::ForceNotPopulated)?;
        for value in force.iter_mut().skip(last.saturating_add(1)) {
            *value = 0.0;
        }
        self.simulate_trajectory(&force)
    }

    /// Displacement at arbitrary times for a force profile on this grid
    ///
    /// Evaluation times may fall inside intervals (the force has then only
    /// partially acted) or before the first sample (zero). Not cached.
    pub fn simulate_at(&self, eval_times: &[f64], force: &DVector<f64>) -> ForceResult<DVector<f64>> {
        if let Some(index) = eval_times.iter().position(|t| !t.is_finite()) {
            return Err(ForceError::NonFiniteTime { index, value: eval_times[index] });
        }
        let matrix = response_matrix_between(
            eval_times,
            self.trajectory.times().as_slice(),
            &self.kernel,
            &self.config,
        )?;
        simulate(&matrix, force)
    }

    // ============================================ Drag ============================================

    /// Compute the drag profile for an attachment density and coupling law
    ///
    /// Requires a prior [`populate`](Self::populate). The force profile is
    /// not modified; the drag is cached separately.
    ///
    /// # Errors
    ///
    /// - `ForceNotPopulated` if the force profile does not exist yet
    /// - `DensityLengthMismatch` / `InvalidDensity` for a bad density profile
    pub fn compute_drag(&mut self, density: &[f64], mode: DragMode) -> ForceResult<&DVector<f64>> {
        if self.force.is_none() {
            return Err(ForceError::ForceNotPopulated);
        }

        let cached = self
            .drag
            .as_ref()
            .is_some_and(|cache| cache.mode == mode && cache.density == density);

        if !cached {
            self.response_matrix()?;
            let profile = {
                let matrix = self
                    .fresh_cache()
                    .map(|cache| &cache.matrix)
                    .ok_or(ForceError::DegenerateTrajectory { samples: self.trajectory.len() })?;
                let force = self.force.as_ref().ok_or(ForceError::ForceNotPopulated)?;
                drag_force(matrix, force, self.trajectory.times().as_slice(), density, mode)?
            };
            self.drag = Some(DragCache {
                density: density.to_vec(),
                mode,
                profile,
            });
        }

        self.drag
            .as_ref()
            .map(|cache| &cache.profile)
            .ok_or(ForceError::ForceNotPopulated)
    }

    /// Parse a mode name and compute the drag profile
    ///
    /// # Errors
    ///
    /// `UnsupportedDragMode` for an unknown name, plus the errors of
    /// [`compute_drag`](Self::compute_drag).
    pub fn compute_drag_named(&mut self, density: &[f64], mode: &str) -> ForceResult<&DVector<f64>> {
        let mode: DragMode = mode.parse()?;
        self.compute_drag(density, mode)
    }

    /// Drag profile, if computed
    pub fn drag_profile(&self) -> Option<&DVector<f64>> {
        self.drag.as_ref().map(|cache| &cache.profile)
    }

    /// Coupling law of the cached drag profile
    pub fn drag_mode(&self) -> Option<DragMode> {
        self.drag.as_ref().map(|cache| cache.mode)
    }

    /// Total restoring force: force profile plus drag
    ///
    /// Drag counts as zero until [`compute_drag`](Self::compute_drag) has run.
    pub fn total_force(&self) -> ForceResult<DVector<f64>> {
        let force = self.force.as_ref().ok_or(ForceError::ForceNotPopulated)?;
        Ok(match self.drag_profile() {
            Some(drag) => force + drag,
            None => force.clone(),
        })
    }
}

/// Step-plot grid for a force profile on a time grid
///
/// Returns `times` unchanged and the profile with its last value repeated,
/// both of length `times.len()`.
pub fn step_grid(times: &DVector<f64>, profile: &DVector<f64>) -> (DVector<f64>, DVector<f64>) {
    let values = match profile.iter().last() {
        Some(&last) => profile.clone().insert_row(profile.len(), last),
        None => DVector::zeros(0),
    };
    (times.clone(), values)
}

/// Infer the force profile of a trajectory in one call
///
/// Returns the interval start times and the force profile.
pub fn infer_force(
    times: Vec<f64>,
    displacement: Vec<f64>,
    gamma: f64,
) -> ForceResult<(DVector<f64>, DVector<f64>)> {
    let mut inference = ForceInference::with_calibration(times, displacement, gamma)?;
    let force = inference.populate()?.clone();
    Ok((inference.interval_starts(), force))
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::ResponseKernel;
    use crate::solver::SolveMethod;
    use approx::assert_relative_eq;

    fn regular_times(n: usize, dt: f64) -> Vec<f64> {
        (0..n).map(|i| dt * i as f64).collect()
    }

    #[test]
    fn test_defaults_to_uncalibrated() {
        let inference = ForceInference::new(vec![0.0, 1.0], vec![0.0, 1.0]).unwrap();
        assert_eq!(inference.calibration(), 1.0);
        assert!(!inference.is_populated());
        assert!(inference.force_profile().is_none());
        assert!(inference.drag_profile().is_none());
    }

    #[test]
    fn test_construction_validation() {
        assert!(matches!(
            ForceInference::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0]),
            Err(ForceError::LengthMismatch { .. })
        ));
        assert!(matches!(
            ForceInference::with_calibration(vec![0.0, 1.0], vec![0.0, 1.0], 0.0),
            Err(ForceError::InvalidCalibration { .. })
        ));
        assert!(matches!(
            ForceInference::new(vec![0.0, 1.0, 1.0], vec![0.0; 3]),
            Err(ForceError::NonIncreasingTime { .. })
        ));
    }

    #[test]
    fn test_populate_reproduces_data() {
        let times = vec![0.0, 0.5, 2.0, 2.2, 5.0, 6.0];
        let displacement = vec![1.0, 1.3, 0.8, 1.1, 2.0, 1.7];
        let mut inference = ForceInference::with_calibration(times, displacement.clone(), 0.3).unwrap();

        let force = inference.populate().unwrap().clone();
        assert_eq!(force.len(), 5);
        let x = inference.simulate_trajectory(&force).unwrap();
        for (i, value) in x.iter().enumerate() {
            assert_relative_eq!(*value, displacement[i] - displacement[0], epsilon = 1e-10);
        }
    }

    #[test]
    fn test_populate_is_memoized() {
        let mut inference = ForceInference::new(regular_times(6, 1.0), vec![0.0, 1.0, 0.0, 1.0, 0.0, 1.0]).unwrap();
        let first = inference.populate().unwrap().clone();
        let second = inference.populate().unwrap().clone();
        assert_eq!(first, second);
        assert!(inference.is_populated());
    }

    #[test]
    fn test_failed_populate_leaves_state_unchanged() {
        let mut inference = ForceInference::new(vec![2.0], vec![0.0]).unwrap();
        let err = inference.populate().unwrap_err();
        assert_eq!(err, ForceError::DegenerateTrajectory { samples: 1 });
        assert!(!inference.is_populated());
        assert!(inference.matrix.is_none());

        // Near-duplicate samples trip the conditioning check
        let config = InferenceConfiguration::default().with_conditioning_tolerance(1e-3);
        let mut inference = ForceInference::new(vec![0.0, 1e-9, 100.0], vec![0.0, 0.0, 1.0])
            .unwrap()
            .with_configuration(config)
            .unwrap();
        let err = inference.populate().unwrap_err();
        assert!(err.is_numerical());
        assert!(!inference.is_populated());
        assert!(inference.matrix.is_none());
    }

    #[test]
    fn test_recalibrate_invalidates() {
        let mut inference = ForceInference::new(regular_times(5, 1.0), vec![0.0, 0.4, 0.6, 0.9, 1.0]).unwrap();
        let base = inference.populate().unwrap().clone();

        inference.recalibrate(2.0).unwrap();
        assert!(!inference.is_populated());
        let halved = inference.populate().unwrap().clone();
        for (a, b) in halved.iter().zip(base.iter()) {
            assert_relative_eq!(*a, b / 2.0, epsilon = 1e-10);
        }

        assert!(inference.recalibrate(-1.0).is_err());
        assert_eq!(inference.calibration(), 2.0);
        assert!(inference.is_populated());
    }

    #[test]
    fn test_retime_rebuilds_matrix() {
        let mut inference = ForceInference::new(regular_times(4, 1.0), vec![0.0, 1.0, 1.5, 2.0]).unwrap();
        let before = inference.response_matrix().unwrap().clone();
        inference.populate().unwrap();

        inference.retime(regular_times(4, 0.1)).unwrap();
        assert!(!inference.is_populated());
        let after = inference.response_matrix().unwrap().clone();
        assert!((before - after).amax() > 0.0);

        assert!(inference.retime(vec![0.0, 1.0]).is_err());
    }

    #[test]
    fn test_drag_requires_force() {
        let mut inference = ForceInference::new(regular_times(4, 1.0), vec![0.0, 1.0, 1.5, 2.0]).unwrap();
        assert_eq!(
            inference.compute_drag(&[1.0; 3], DragMode::Viscous).unwrap_err(),
            ForceError::ForceNotPopulated
        );
        assert_eq!(inference.total_force().unwrap_err(), ForceError::ForceNotPopulated);
    }

    #[test]
    fn test_drag_does_not_touch_force() {
        let mut inference = ForceInference::new(regular_times(4, 2.0), vec![0.0, 1.0, 1.5, 2.0]).unwrap();
        let force = inference.populate().unwrap().clone();

        let drag = inference.compute_drag(&[0.5, 0.0, 2.0], DragMode::Elastic).unwrap().clone();
        assert_eq!(drag.len(), force.len());
        assert_eq!(drag[1], 0.0);
        assert_eq!(inference.force_profile(), Some(&force));
        assert_eq!(inference.drag_mode(), Some(DragMode::Elastic));

        // displacement over interval 0 is 1.0
        assert_relative_eq!(drag[0], -0.5, epsilon = 1e-10);

        let total = inference.total_force().unwrap();
        assert_relative_eq!(total[2], force[2] + drag[2], epsilon = 1e-14);
    }

    #[test]
    fn test_drag_named_mode() {
        let mut inference = ForceInference::new(regular_times(3, 1.0), vec![0.0, 1.0, 0.0]).unwrap();
        inference.populate().unwrap();
        assert!(inference.compute_drag_named(&[1.0, 1.0], "viscous").is_ok());
        assert_eq!(
            inference.compute_drag_named(&[1.0, 1.0], "magnetic").unwrap_err(),
            ForceError::UnsupportedDragMode("magnetic".to_string())
        );
        // failed call keeps the previous drag
        assert_eq!(inference.drag_mode(), Some(DragMode::Viscous));
    }

    #[test]
    fn test_simulate_truncated() {
        let mut inference = ForceInference::new(regular_times(6, 1.0), vec![0.0, 0.5, 0.7, 0.9, 1.0, 1.1]).unwrap();
        assert_eq!(inference.simulate_truncated(2).unwrap_err(), ForceError::ForceNotPopulated);

        inference.populate().unwrap();
        let truncated = inference.simulate_truncated(2).unwrap();
        assert_eq!(truncated.len(), 6);
        // identical up to the end of the kept intervals
        for i in 0..4 {
            assert_relative_eq!(truncated[i], inference.displacement()[i], epsilon = 1e-10);
        }

        let full = inference.simulate_truncated(10).unwrap();
        assert_relative_eq!(full[5], 1.1, epsilon = 1e-10);

        let untouched = inference.simulate_truncated(usize::MAX).unwrap();
        assert!((untouched - full).amax() < 1e-15);
    }

    #[test]
    fn test_simulate_at_arbitrary_times() {
        let times = vec![0.0, 1.0, 3.0, 4.0];
        let mut inference = ForceInference::with_calibration(times.clone(), vec![0.0; 4], 2.0).unwrap();
        let force = DVector::from_element(3, 0.5);

        // On the sample grid it matches the square simulation
        let on_grid = inference.simulate_at(&times[1..], &force).unwrap();
        let expected = inference.simulate(&force).unwrap();
        assert!((on_grid - expected).amax() < 1e-14);

        // A constant force switched on at t0 moves the point by f·J(s − t0),
        // including mid-interval and before the grid
        let eval = [-1.0, 0.5, 2.0, 3.5];
        let x = inference.simulate_at(&eval, &force).unwrap();
        assert_eq!(x[0], 0.0);
        for (k, &s) in eval.iter().enumerate().skip(1) {
            assert_relative_eq!(x[k], 0.5 * inference.kernel().response(s), epsilon = 1e-12);
        }

        assert!(inference.simulate_at(&[f64::NAN], &force).unwrap_err().is_validation());
    }

    #[test]
    fn test_step_profile() {
        let mut inference = ForceInference::new(vec![0.0, 1.0, 3.0], vec![0.0, 1.0, 1.0]).unwrap();
        assert!(inference.step_profile().is_err());

        let force = inference.populate().unwrap().clone();
        let (t, f) = inference.step_profile().unwrap();
        assert_eq!(t.len(), 3);
        assert_eq!(f.len(), 3);
        assert_eq!(f[2], force[1]);
        assert_eq!(inference.interval_starts().as_slice(), &[0.0, 1.0]);
    }

    #[test]
    fn test_lu_configuration() {
        let times = vec![0.0, 1.0, 2.5, 3.0, 4.0];
        let displacement = vec![0.0, -0.2, 0.1, 0.4, 0.3];
        let mut triangular = ForceInference::new(times.clone(), displacement.clone()).unwrap();
        let mut lu = ForceInference::new(times, displacement)
            .unwrap()
            .with_configuration(InferenceConfiguration::new(SolveMethod::Lu))
            .unwrap();

        let a = triangular.populate().unwrap().clone();
        let b = lu.populate().unwrap().clone();
        assert!((a - b).amax() < 1e-10);
    }

    #[test]
    fn test_infer_force_helper() {
        let (starts, force) = infer_force(vec![0.0, 1.0, 2.0], vec![0.0, 0.5, 0.5], 1.0).unwrap();
        assert_eq!(starts.as_slice(), &[0.0, 1.0]);
        assert_eq!(force.len(), 2);
    }
}

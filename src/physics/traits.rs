//! Response kernel trait
//!
//! A response kernel is the physics half of the crate: it says how far a
//! tracked point moves, on average, after a unit force is switched on and
//! held. It does NOT assemble or solve anything (that's the solver's job).

// =================================================================================================
// Response Kernel Trait
// =================================================================================================

/// Deterministic step-force response of a tracked point
///
/// # Responsibility
///
/// `response(lag)` is the mean displacement at time `lag` after a unit force
/// was switched on at lag 0 and held indefinitely.
///
/// # Contract
///
/// Implementations must satisfy:
/// - `response(0.0) == 0.0` (no instantaneous response)
/// - `response(lag) == 0.0` for `lag < 0.0` (causality)
/// - strictly increasing for `lag > 0.0`
///
/// The solver only ever evaluates differences of this function, so any
/// kernel satisfying these properties produces a lower-triangular, invertible
/// response matrix on a strictly increasing time grid.
pub trait ResponseKernel: Send + Sync {
    /// Mean displacement at `lag` for a unit step force
    fn response(&self, lag: f64) -> f64;

    /// Calibration constant folded into the response
    fn calibration(&self) -> f64;

    /// Name of the kernel (used for display and logging)
    fn name(&self) -> &str;

    /// Description of the kernel (option)
    fn description(&self) -> Option<&str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Linear creep: response grows like lag, enough to exercise defaults
    struct LinearCreep;

    impl ResponseKernel for LinearCreep {
        fn response(&self, lag: f64) -> f64 {
            lag.max(0.0)
        }

        fn calibration(&self) -> f64 {
            1.0
        }

        fn name(&self) -> &str {
            "LinearCreep"
        }
    }

    #[test]
    fn test_default_description() {
        let kernel = LinearCreep;
        assert!(kernel.description().is_none());
        assert_eq!(kernel.name(), "LinearCreep");
    }

    #[test]
    fn test_trait_object() {
        let kernel: Box<dyn ResponseKernel> = Box::new(LinearCreep);
        assert_eq!(kernel.response(-1.0), 0.0);
        assert_eq!(kernel.response(2.0), 2.0);
    }
}

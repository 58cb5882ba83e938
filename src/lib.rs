//! rouse-force: force inference for Rouse-polymer loci
//!
//! Infers the force history acting on a tracked chromatin locus from its
//! one-dimensional displacement trajectory, assuming the unperturbed motion is
//! Rouse subdiffusion (MSD = Γ·√t). The reverse map, from a force history to
//! the trajectory it produces, is available too.
//!
//! # Architecture
//!
//! 1. **Separation of Physics and Numerics**
//!    - The response kernel defines what a unit force does ([`physics`])
//!    - The solver assembles and inverts the response matrix ([`solver`])
//!
//! 2. **One stateful object**
//!    - [`ForceInference`](inference::ForceInference) owns the data and
//!      memoizes the matrix, force and drag profiles
//!    - everything underneath is a pure function
//!
//! # Quick Start
//!
//! ```rust
//! use rouse_force::prelude::*;
//!
//! # fn main() -> Result<(), ForceError> {
//! // 1. Observed trajectory (irregular sampling is fine)
//! let times = vec![0.0, 1.0, 2.0, 4.0, 5.0];
//! let displacement = vec![0.0, 0.3, 0.5, 0.6, 0.9];
//!
//! // 2. Infer with a pre-measured calibration Γ
//! let mut inference = ForceInference::with_calibration(times, displacement, 0.8)?;
//! let force = inference.populate()?.clone();
//! assert_eq!(force.len(), 4);
//!
//! // 3. Counterfactual: what if the force had stopped after interval 1
//! let truncated = inference.simulate_truncated(1)?;
//! assert_eq!(truncated.len(), 5);
//!
//! // 4. Drag from attached material
//! let drag = inference.compute_drag(&[0.0, 1.0, 1.0, 0.0], DragMode::Viscous)?;
//! assert_eq!(drag[0], 0.0);
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`error`]: validation and numerical error kinds
//! - [`physics`]: trajectory data and the response kernel
//! - [`solver`]: response matrix, forward simulation, exact solve
//! - [`models`]: drag force model
//! - [`inference`]: the orchestrating [`ForceInference`](inference::ForceInference)
//! - [`output`]: CSV export

// Core modules
pub mod error;
pub mod physics;

pub mod models;
pub mod solver;

pub mod inference;
pub mod output;

pub mod prelude {
    //! Convenient imports for common usage
    //!
    //! ```rust
    //! use rouse_force::prelude::*;
    //! ```
    pub use crate::error::{ErrorKind, ForceError, ForceResult};
    pub use crate::inference::{infer_force, ForceInference};
    pub use crate::models::DragMode;
    pub use crate::physics::{ResponseKernel, RouseKernel, Trajectory};
    pub use crate::solver::{InferenceConfiguration, SolveMethod};
}

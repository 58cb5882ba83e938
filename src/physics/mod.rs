//! Physical model of the tracked locus
//!
//! This module provides the physics side of force inference:
//!
//! - **Response kernel**: mean displacement after a unit step force
//!   ([`ResponseKernel`], implemented by [`RouseKernel`])
//! - **Trajectory**: the validated, immutable observation ([`Trajectory`])
//!
//! # Architecture
//!
//! Physics is **separate from numerics**:
//! - The kernel provides the **response** (physics)
//! - The solver assembles and inverts the **response matrix** (numerics)
//!
//! The same solver works with any kernel satisfying the causality contract
//! of [`ResponseKernel`].
//!
//! # Example
//!
//! ```rust
//! use rouse_force::physics::{ResponseKernel, RouseKernel, Trajectory};
//!
//! let kernel = RouseKernel::new(0.5).unwrap();
//! let trajectory = Trajectory::new(vec![0.0, 1.0, 2.0], vec![0.0, 0.1, 0.3]).unwrap();
//!
//! assert_eq!(kernel.response(0.0), 0.0);
//! assert_eq!(trajectory.intervals(), 2);
//! ```

// module declaration
pub mod traits;
pub mod kernel;
pub mod data;

// re-export commonly used types for convenience
pub use data::{Trajectory, validate_time_grid};
pub use kernel::RouseKernel;
pub use traits::ResponseKernel;

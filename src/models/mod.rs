//! Secondary force models
//!
//! The primary force profile comes straight out of the inference solve.
//! Models here derive additional force contributions from it.
//!
//! # Available Models
//!
//! ## [`drag_force`]: drag from transiently attached material
//!
//! Material binding to the moving locus adds a restoring force proportional
//! to an attachment density, under a [`DragMode`] coupling law.

// =================================================================================================
// Module Declarations
// =================================================================================================

pub mod drag;

// =================================================================================================
// Public Re-exports
// =================================================================================================

pub use drag::{drag_force, validate_density, DragMode};

//! Common utilities for integration tests

pub mod force_profiles;
pub mod test_helpers;

// Re-export commonly used items
pub use force_profiles::{constant_force, oscillating_force, pulse_force, ramp_force};
pub use test_helpers::{
    assert_vectors_close,
    irregular_grid,
    regular_grid,
    relative_error,
};

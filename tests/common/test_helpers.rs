//! Helper functions for integration tests

#![allow(dead_code)]

use nalgebra::DVector;

/// Assert that two vectors are close element-wise (within tolerance)
pub fn assert_vectors_close(
    actual: &DVector<f64>,
    expected: &DVector<f64>,
    tolerance: f64,
    message: &str,
) {
    assert_eq!(actual.len(), expected.len(), "{}: Dimension mismatch", message);

    for (i, (&a, &e)) in actual.iter().zip(expected.iter()).enumerate() {
        let diff = (a - e).abs();
        assert!(
            diff < tolerance,
            "{}: Element {} differs by {} (tolerance {})",
            message, i, diff, tolerance
        );
    }
}

/// Evenly spaced time grid `0, dt, 2·dt, ...` with `n` samples
pub fn regular_grid(n: usize, dt: f64) -> Vec<f64> {
    (0..n).map(|i| dt * i as f64).collect()
}

/// Irregular grid: a regular grid with a few samples dropped
///
/// Drops every sample whose index is divisible by 4 or 7 (except the first),
/// mimicking frames lost during tracking.
pub fn irregular_grid(n: usize, dt: f64) -> Vec<f64> {
    (0..n)
        .filter(|&i| i == 0 || (i % 4 != 0 && i % 7 != 0))
        .map(|i| dt * i as f64)
        .collect()
}

/// Compute relative error: |actual - expected| / |expected|
pub fn relative_error(actual: f64, expected: f64) -> f64 {
    if expected.abs() < 1e-10 {
        (actual - expected).abs()
    } else {
        (actual - expected).abs() / expected.abs()
    }
}

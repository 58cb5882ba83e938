//! Reference force profiles for integration tests
//!
//! Each builder returns one value per interval of a grid with `intervals + 1`
//! samples.

#![allow(dead_code)]

use nalgebra::DVector;

/// Constant pulling force
pub fn constant_force(intervals: usize, value: f64) -> DVector<f64> {
    DVector::from_element(intervals, value)
}

/// Force growing linearly from 0 to `peak` over the profile
pub fn ramp_force(intervals: usize, peak: f64) -> DVector<f64> {
    let last = intervals.saturating_sub(1).max(1) as f64;
    DVector::from_fn(intervals, |i, _| peak * i as f64 / last)
}

/// Force of `amplitude` on intervals `start..end`, zero elsewhere
pub fn pulse_force(intervals: usize, start: usize, end: usize, amplitude: f64) -> DVector<f64> {
    DVector::from_fn(intervals, |i, _| if (start..end).contains(&i) { amplitude } else { 0.0 })
}

/// Sign-alternating force with a slow envelope
pub fn oscillating_force(intervals: usize) -> DVector<f64> {
    DVector::from_fn(intervals, |i, _| {
        let phase = i as f64 * 0.7;
        phase.sin() * (1.0 + 0.1 * i as f64)
    })
}

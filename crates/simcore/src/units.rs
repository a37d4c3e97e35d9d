use std::f64::consts::PI;

use crate::error::{KernelError, Result};

pub const KMH_PER_MS: f64 = 3.6;

/// Longest run the integrator accepts, in steps.
pub const MAX_STEPS: usize = 10_000_000;

pub fn rpm_to_rad_per_s(rpm: f64) -> f64 {
    rpm * 2.0 * PI / 60.0
}

pub fn rad_per_s_to_rpm(omega: f64) -> f64 {
    omega * 60.0 / (2.0 * PI)
}

/// Torque constant (N·m/A) of a motor with velocity constant `kv` (rpm/V).
pub fn torque_constant(kv: f64) -> f64 {
    60.0 / (2.0 * PI * kv)
}

pub fn ms_to_kmh(speed: f64) -> f64 {
    speed * KMH_PER_MS
}

pub fn kmh_to_ms(speed: f64) -> f64 {
    speed / KMH_PER_MS
}

/// Number of fixed steps covering `[0, max_time)`.
///
/// The small bias keeps `5.0 / 0.05` at 100 steps despite float rounding.
pub fn step_count(max_time: f64, dt: f64) -> usize {
    ((max_time / dt) - 1e-9).ceil().max(0.0) as usize
}

/// [`step_count`], rejecting horizons that need more than [`MAX_STEPS`] steps.
pub fn checked_step_count(max_time: f64, dt: f64) -> Result<usize> {
    let steps = ((max_time / dt) - 1e-9).ceil();
    if steps.is_nan() || steps > MAX_STEPS as f64 {
        return Err(KernelError::invalid(
            "max_time",
            format!("needs {steps:.3e} steps of {dt} s, at most {MAX_STEPS} allowed"),
        ));
    }
    Ok(steps.max(0.0) as usize)
}

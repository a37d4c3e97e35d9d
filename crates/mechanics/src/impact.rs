//! Deceleration felt by the robot's own electronics when it rams something.

use serde::{Deserialize, Serialize};
use simcore::units::kmh_to_ms;
use simcore::GRAVITY;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RamImpact {
    pub g_force: f64,
    pub energy_joules: f64,
    pub impact_speed_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Below 20 G.
    Safe,
    Warning,
    Critical,
}

impl Severity {
    pub fn from_g_force(g_force: f64) -> Self {
        if g_force >= 50.0 {
            Severity::Critical
        } else if g_force >= 20.0 {
            Severity::Warning
        } else {
            Severity::Safe
        }
    }
}

/// Constant deceleration over `deformation_mm` of crumple: `a = v² / 2s`.
///
/// `None` when nothing deforms, since the deceleration is then unbounded.
pub fn impact_g_force(mass: f64, impact_speed_kmh: f64, deformation_mm: f64) -> Option<RamImpact> {
    let speed = kmh_to_ms(impact_speed_kmh);
    let distance = deformation_mm / 1000.0;
    if distance <= 0.0 {
        return None;
    }

    let accel = speed * speed / (2.0 * distance);
    Some(RamImpact {
        g_force: accel / GRAVITY,
        energy_joules: 0.5 * mass * speed * speed,
        impact_speed_ms: speed,
    })
}

//! Impact estimate for a spinner hit: rotor energy to target recoil,
//! self recoil, G-forces and a qualitative damage comparison.

use serde::{Deserialize, Serialize};
use simcore::units::{ms_to_kmh, rpm_to_rad_per_s};
use simcore::GRAVITY;

use crate::static_specs::rotor_energy;

/// Share of rotor energy delivered to the target.
pub const ENERGY_TRANSFER_EFFICIENCY: f64 = 0.7;

/// Familiar events of comparable energy, in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DamageEquivalent {
    HammerBlow,
    SledgehammerSwing,
    RifleRound,
    CarAt15Kmh,
    HeavyMachineGunRound,
    Cannon20mmShell,
    Cannon30mmShell,
}

/// Upper energy bound (J, exclusive) of each rung; anything above the last is a 30 mm shell.
const DAMAGE_LADDER: &[(f64, DamageEquivalent)] = &[
    (100.0, DamageEquivalent::HammerBlow),
    (500.0, DamageEquivalent::SledgehammerSwing),
    (4_000.0, DamageEquivalent::RifleRound),
    (10_000.0, DamageEquivalent::CarAt15Kmh),
    (20_000.0, DamageEquivalent::HeavyMachineGunRound),
    (30_000.0, DamageEquivalent::Cannon20mmShell),
];

impl DamageEquivalent {
    pub fn from_energy(energy_joules: f64) -> Self {
        DAMAGE_LADDER
            .iter()
            .find(|(limit, _)| energy_joules < *limit)
            .map(|(_, label)| *label)
            .unwrap_or(DamageEquivalent::Cannon30mmShell)
    }

    pub fn label(&self) -> &'static str {
        match self {
            DamageEquivalent::HammerBlow => "hammer blow",
            DamageEquivalent::SledgehammerSwing => "sledgehammer swing",
            DamageEquivalent::RifleRound => "7.62 mm rifle round",
            DamageEquivalent::CarAt15Kmh => "small car at 15 km/h",
            DamageEquivalent::HeavyMachineGunRound => ".50 BMG round",
            DamageEquivalent::Cannon20mmShell => "20 mm cannon shell",
            DamageEquivalent::Cannon30mmShell => "30 mm shell",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionResult {
    /// Rotor kinetic energy before impact (J).
    pub energy_joules: f64,
    pub impact_force_kn: f64,
    pub g_force_self: f64,
    pub g_force_target: f64,
    /// Attacker recoil speed (km/h).
    pub recoil_speed_kmh: f64,
    pub equivalent: DamageEquivalent,
}

/// Impulse approximation of a rotor strike with the default transfer efficiency.
///
/// `impact_duration` is the contact time in seconds over which the target is
/// accelerated.
pub fn analyze_collision(
    robot_mass: f64,
    rotor_inertia: f64,
    rotor_rpm: f64,
    target_mass: f64,
    impact_duration: f64,
) -> CollisionResult {
    analyze_collision_with_efficiency(
        robot_mass,
        rotor_inertia,
        rotor_rpm,
        target_mass,
        impact_duration,
        ENERGY_TRANSFER_EFFICIENCY,
    )
}

pub fn analyze_collision_with_efficiency(
    robot_mass: f64,
    rotor_inertia: f64,
    rotor_rpm: f64,
    target_mass: f64,
    impact_duration: f64,
    transfer_efficiency: f64,
) -> CollisionResult {
    let energy = rotor_energy(rotor_inertia, rotor_rpm);
    let transferred = energy * transfer_efficiency;

    let target_speed = (2.0 * transferred / target_mass).sqrt();
    let target_accel = target_speed / impact_duration;

    // momentum balance: what the target gains, the attacker loses
    let self_speed = target_mass * target_speed / robot_mass;
    let self_accel = self_speed / impact_duration;

    CollisionResult {
        energy_joules: energy,
        impact_force_kn: target_mass * target_accel / 1000.0,
        g_force_self: self_accel / GRAVITY,
        g_force_target: target_accel / GRAVITY,
        recoil_speed_kmh: ms_to_kmh(self_speed),
        equivalent: DamageEquivalent::from_energy(energy),
    }
}

/// Rotor tip speed (m/s), handy next to the collision numbers.
pub fn tip_speed(rotor_rpm: f64, rotor_radius_m: f64) -> f64 {
    rpm_to_rad_per_s(rotor_rpm) * rotor_radius_m
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const INERTIA: f64 = 0.6 * 28.0 * 0.18 * 0.18;

    #[test]
    fn test_energy_scales_with_rpm_squared() {
        let slow = analyze_collision(104.0, INERTIA, 2000.0, 110.0, 0.01);
        let fast = analyze_collision(104.0, INERTIA, 4000.0, 110.0, 0.01);
        assert_relative_eq!(fast.energy_joules, 4.0 * slow.energy_joules, max_relative = 1e-12);
    }

    #[test]
    fn test_reference_hit_is_finite_and_positive() {
        let hit = analyze_collision(103.72, INERTIA, 4440.0, 110.0, 0.01);
        let figures = [
            hit.impact_force_kn,
            hit.g_force_self,
            hit.g_force_target,
            hit.recoil_speed_kmh,
        ];
        for value in figures {
            assert!(value.is_finite() && value > 0.0);
        }
        assert_eq!(hit.equivalent, DamageEquivalent::Cannon30mmShell);
    }

    #[test]
    fn test_heavier_robot_recoils_less() {
        let light = analyze_collision(80.0, INERTIA, 4440.0, 110.0, 0.01);
        let heavy = analyze_collision(160.0, INERTIA, 4440.0, 110.0, 0.01);
        assert!(heavy.g_force_self < light.g_force_self);
        assert_relative_eq!(light.g_force_self, 2.0 * heavy.g_force_self, max_relative = 1e-12);
        assert_relative_eq!(light.g_force_target, heavy.g_force_target, max_relative = 1e-12);
    }

    #[test]
    fn test_momentum_is_balanced() {
        let hit = analyze_collision(100.0, INERTIA, 3000.0, 50.0, 0.005);
        let target_speed = hit.g_force_target * GRAVITY * 0.005;
        let self_speed = hit.recoil_speed_kmh / 3.6;
        assert_relative_eq!(100.0 * self_speed, 50.0 * target_speed, max_relative = 1e-9);
    }

    #[test]
    fn test_damage_ladder_boundaries() {
        assert_eq!(DamageEquivalent::from_energy(0.0), DamageEquivalent::HammerBlow);
        assert_eq!(DamageEquivalent::from_energy(99.9), DamageEquivalent::HammerBlow);
        assert_eq!(DamageEquivalent::from_energy(100.0), DamageEquivalent::SledgehammerSwing);
        assert_eq!(DamageEquivalent::from_energy(3_999.0), DamageEquivalent::RifleRound);
        assert_eq!(DamageEquivalent::from_energy(15_000.0), DamageEquivalent::HeavyMachineGunRound);
        assert_eq!(DamageEquivalent::from_energy(29_999.0), DamageEquivalent::Cannon20mmShell);
        assert_eq!(DamageEquivalent::from_energy(30_000.0), DamageEquivalent::Cannon30mmShell);
        assert_eq!(DamageEquivalent::Cannon30mmShell.label(), "30 mm shell");
    }

    #[test]
    fn test_tip_speed() {
        assert_relative_eq!(tip_speed(4440.0, 0.18), 83.69, epsilon = 0.01);
    }
}

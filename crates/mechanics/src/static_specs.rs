//! Steady-state figures computed straight from the configuration.

use std::f64::consts::PI;

use simcore::units::{ms_to_kmh, rpm_to_rad_per_s};
use simcore::{Coefficients, RobotConfig, StaticResult};

/// No-load top speed (km/h): motor free speed through the gearbox and the
/// wheel circumference. Ignores loaded back-EMF droop, so it is optimistic.
pub fn top_speed_kmh(nominal_voltage: f64, kv: f64, gear_ratio: f64, wheel_diameter_m: f64) -> f64 {
    let wheel_rpm = nominal_voltage * kv / gear_ratio;
    ms_to_kmh(wheel_rpm * (PI * wheel_diameter_m) / 60.0)
}

pub fn rotor_inertia(shape_factor: f64, rotor_mass: f64, rotor_radius_m: f64) -> f64 {
    shape_factor * rotor_mass * rotor_radius_m * rotor_radius_m
}

/// Kinetic energy (J) of a rotor with `inertia` spinning at `rpm`.
pub fn rotor_energy(inertia: f64, rpm: f64) -> f64 {
    let omega = rpm_to_rad_per_s(rpm);
    0.5 * inertia * omega * omega
}

pub fn armor_mass(config: &RobotConfig) -> f64 {
    let a = &config.armor;
    a.total_area_m2 * (a.coverage_pct / 100.0) * (a.thickness_mm / 1000.0) * a.density_kg_m3
}

/// Pure function of the configuration. Zero gear ratio, KV or wheel size give
/// infinities or NaN rather than an error; validate the config first.
pub fn compute_static(config: &RobotConfig, coefficients: &Coefficients) -> StaticResult {
    let nominal_voltage = config.battery.nominal_voltage();
    let drive = &config.drive;
    let weapon = &config.weapon;

    let wheel_diameter_m = drive.wheel_diameter_mm / 1000.0;
    let speed_kmh = top_speed_kmh(nominal_voltage, drive.kv, drive.gear_ratio, wheel_diameter_m);

    let weapon_inertia = rotor_inertia(
        coefficients.inertia_shape_factor,
        weapon.rotor_mass_kg,
        weapon.rotor_radius_m(),
    );
    let weapon_rpm = nominal_voltage * weapon.kv / weapon.reduction;
    let weapon_energy = rotor_energy(weapon_inertia, weapon_rpm);

    let armor_mass = armor_mass(config);
    let base = &config.base;
    let total_mass =
        base.drive_kg + base.electronics_kg + base.frame_kg + weapon.rotor_mass_kg + armor_mass;

    StaticResult {
        nominal_voltage,
        speed_kmh,
        weapon_inertia,
        weapon_rpm,
        weapon_energy,
        armor_mass,
        total_mass,
    }
}

//! Modeling coefficients that the dashboard variants disagreed on.
//!
//! All lumped constants live in one [`Coefficients`] value so a caller picks a
//! preset instead of a different integrator.

use serde::{Deserialize, Serialize};

use crate::error::{require_non_negative, require_positive, KernelError, Result};

pub const GRAVITY: f64 = 9.81;
pub const AMBIENT_TEMPERATURE_C: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Coefficients {
    /// `I = k * m * r²` shape factor for the weapon rotor.
    pub inertia_shape_factor: f64,

    /// Winding resistance of one drive motor (Ω).
    pub drive_phase_resistance: f64,
    /// Gearbox + chain efficiency between drive motor and wheel.
    pub transmission_efficiency: f64,
    /// Rolling resistance as a fraction of weight.
    pub rolling_resistance_coeff: f64,
    pub air_density: f64,
    pub drag_coefficient: f64,
    /// Frontal area (m²).
    pub frontal_area: f64,

    /// Winding resistance of one weapon motor (Ω).
    pub weapon_phase_resistance: f64,
    pub weapon_efficiency: f64,
    /// Aerodynamic drag on the rotor, `τ = k ω²` (N·m·s²).
    pub rotor_drag_coeff: f64,

    /// Mass of one lumped motor for the thermal model (kg).
    pub motor_thermal_mass: f64,
    /// Specific heat of that mass (J/(kg·K)).
    pub motor_specific_heat: f64,
    /// Still-air heat transfer of a drive motor (W/K).
    pub drive_cooling_base: f64,
    /// Additional drive motor heat transfer per m/s of vehicle speed (W/K per m/s).
    pub drive_cooling_per_speed: f64,
    /// Still-air heat transfer of a weapon motor (W/K).
    pub weapon_cooling_base: f64,
    /// Additional weapon motor heat transfer per rad/s of motor speed.
    pub weapon_cooling_per_rad_s: f64,
    pub ambient_temperature: f64,

    /// Share of rotor energy delivered to the target on impact.
    pub energy_transfer_efficiency: f64,
}

impl Default for Coefficients {
    fn default() -> Self {
        Coefficients::reference()
    }
}

impl Coefficients {
    /// Reference preset: 0.6 shape factor for a disk/bar rotor.
    pub const fn reference() -> Self {
        Coefficients {
            inertia_shape_factor: 0.6,
            drive_phase_resistance: 0.05,
            transmission_efficiency: 0.9,
            rolling_resistance_coeff: 0.02,
            air_density: 1.22,
            drag_coefficient: 0.4,
            frontal_area: 0.09,
            weapon_phase_resistance: 0.05,
            weapon_efficiency: 0.85,
            rotor_drag_coeff: 2.0e-5,
            motor_thermal_mass: 1.2,
            motor_specific_heat: 900.0,
            drive_cooling_base: 2.0,
            drive_cooling_per_speed: 0.5,
            weapon_cooling_base: 2.0,
            weapon_cooling_per_rad_s: 0.01,
            ambient_temperature: AMBIENT_TEMPERATURE_C,
            energy_transfer_efficiency: 0.7,
        }
    }

    /// Solid uniform disk rotor, `I = ½ m r²`.
    pub const fn solid_disk() -> Self {
        let mut c = Coefficients::reference();
        c.inertia_shape_factor = 0.5;
        c
    }

    /// Looks up a preset by the name used on the command line.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "reference" => Some(Coefficients::reference()),
            "solid_disk" | "disk" => Some(Coefficients::solid_disk()),
            _ => None,
        }
    }

    /// Lumped drag factor `½ ρ C_d A` (N·s²/m²).
    pub fn drag_factor(&self) -> f64 {
        0.5 * self.air_density * self.drag_coefficient * self.frontal_area
    }

    pub fn thermal_capacity(&self) -> f64 {
        self.motor_thermal_mass * self.motor_specific_heat
    }

    pub fn validate(&self) -> Result<()> {
        require_positive("coefficients.inertia_shape_factor", self.inertia_shape_factor)?;
        require_positive("coefficients.drive_phase_resistance", self.drive_phase_resistance)?;
        require_positive("coefficients.weapon_phase_resistance", self.weapon_phase_resistance)?;
        require_positive("coefficients.motor_thermal_mass", self.motor_thermal_mass)?;
        require_positive("coefficients.motor_specific_heat", self.motor_specific_heat)?;
        for (field, value) in [
            ("coefficients.transmission_efficiency", self.transmission_efficiency),
            ("coefficients.weapon_efficiency", self.weapon_efficiency),
            ("coefficients.energy_transfer_efficiency", self.energy_transfer_efficiency),
        ] {
            require_non_negative(field, value)?;
            if value > 1.0 {
                return Err(KernelError::invalid(field, format!("must be <= 1, got {value}")));
            }
        }
        require_non_negative(
            "coefficients.rolling_resistance_coeff",
            self.rolling_resistance_coeff,
        )?;
        require_non_negative("coefficients.air_density", self.air_density)?;
        require_non_negative("coefficients.drag_coefficient", self.drag_coefficient)?;
        require_non_negative("coefficients.frontal_area", self.frontal_area)?;
        require_non_negative("coefficients.rotor_drag_coeff", self.rotor_drag_coeff)?;
        require_non_negative("coefficients.drive_cooling_base", self.drive_cooling_base)?;
        require_non_negative("coefficients.drive_cooling_per_speed", self.drive_cooling_per_speed)?;
        require_non_negative("coefficients.weapon_cooling_base", self.weapon_cooling_base)?;
        require_non_negative(
            "coefficients.weapon_cooling_per_rad_s",
            self.weapon_cooling_per_rad_s,
        )?;
        if !self.ambient_temperature.is_finite() {
            return Err(KernelError::invalid("coefficients.ambient_temperature", "must be finite"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_differ_only_in_shape_factor() {
        let reference = Coefficients::reference();
        let disk = Coefficients::solid_disk();
        assert_eq!(reference.inertia_shape_factor, 0.6);
        assert_eq!(disk.inertia_shape_factor, 0.5);
        let mut patched = disk;
        patched.inertia_shape_factor = 0.6;
        assert_eq!(patched, reference);
    }

    #[test]
    fn test_preset_lookup() {
        assert_eq!(Coefficients::preset("disk"), Some(Coefficients::solid_disk()));
        assert!(Coefficients::preset("bar").is_none());
    }

    #[test]
    fn test_efficiency_above_one_rejected() {
        let mut c = Coefficients::reference();
        assert!(c.validate().is_ok());
        c.transmission_efficiency = 1.2;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_drag_factor() {
        let c = Coefficients::reference();
        assert!((c.drag_factor() - 0.5 * 1.22 * 0.4 * 0.09).abs() < 1e-12);
    }
}

use simcore::units::torque_constant;
use simcore::{Coefficients, MechanicsModel, RobotConfig, SimContext, SimState};

use crate::static_specs::rotor_inertia;

/// Weapon rotor spun up by the weapon motors through a fixed reduction.
#[derive(Debug, Clone, Copy)]
pub struct WeaponRotor {
    pub active: bool,
    pub torque_constant: f64,
    pub motor_count: u32,
    pub efficiency: f64,
    pub reduction: f64,
    /// Rotor moment of inertia (kg·m²), must be positive.
    pub inertia: f64,
    pub drag_coeff: f64,
}

impl WeaponRotor {
    pub fn from_config(config: &RobotConfig, coefficients: &Coefficients) -> Self {
        let weapon = &config.weapon;
        WeaponRotor {
            active: weapon.active,
            torque_constant: torque_constant(weapon.kv),
            motor_count: weapon.motor_count,
            efficiency: coefficients.weapon_efficiency,
            reduction: weapon.reduction,
            inertia: rotor_inertia(
                coefficients.inertia_shape_factor,
                weapon.rotor_mass_kg,
                weapon.rotor_radius_m(),
            ),
            drag_coeff: coefficients.rotor_drag_coeff,
        }
    }

    /// Combined torque of all weapon motors at the motor shaft (N·m).
    pub fn motor_torque(&self, current_per_motor: f64) -> f64 {
        current_per_motor * self.torque_constant * self.motor_count as f64 * self.efficiency
    }

    pub fn drag_torque(&self, omega: f64) -> f64 {
        self.drag_coeff * omega * omega
    }

    pub fn angular_acceleration(&self, current_per_motor: f64, omega: f64) -> f64 {
        let drive = self.motor_torque(current_per_motor) * self.reduction;
        (drive - self.drag_torque(omega)) / self.inertia
    }
}

impl MechanicsModel for WeaponRotor {
    fn step_physics(&self, ctx: SimContext, state: &mut SimState) {
        if !self.active {
            return;
        }
        let weapon = &mut state.weapon;
        let omega = weapon.angular_velocity
            + self.angular_acceleration(weapon.current_per_motor, weapon.angular_velocity) * ctx.dt;
        weapon.angular_velocity = if omega < 0.0 { 0.0 } else { omega };
    }
}

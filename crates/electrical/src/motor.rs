use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use simcore::units::{rad_per_s_to_rpm, torque_constant};
use simcore::{Coefficients, ElectricalModel, RobotConfig, SimContext, SimState};

/// Single-resistor brushless motor behind a current-limiting ESC.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotorConstant {
    /// Velocity constant (rpm/V).
    pub kv: f64,
    /// Phase resistance (Ω).
    pub resistance: f64,
    /// ESC current limit (A).
    pub current_limit: f64,
}

impl MotorConstant {
    pub fn new(kv: f64, resistance: f64, current_limit: f64) -> Self {
        MotorConstant {
            kv,
            resistance,
            current_limit,
        }
    }

    /// Torque constant Kt (N·m/A), `60 / (2π Kv)`.
    pub fn kt(&self) -> f64 {
        torque_constant(self.kv)
    }

    pub fn back_emf(&self, motor_rpm: f64) -> f64 {
        motor_rpm / self.kv
    }

    /// Phase current at `voltage` against `back_emf`, limited by the ESC.
    ///
    /// Zero once the back-EMF reaches the supply. NaN input stays NaN so a
    /// broken run is detectable downstream.
    pub fn current(&self, voltage: f64, back_emf: f64) -> f64 {
        let raw = (voltage - back_emf) / self.resistance;
        if raw.is_nan() {
            raw
        } else if raw <= 0.0 {
            0.0
        } else if raw > self.current_limit {
            self.current_limit
        } else {
            raw
        }
    }
}

/// The drive motors: all identical, sharing one gear ratio and wheel size.
#[derive(Debug, Clone, Copy)]
pub struct DriveMotors {
    pub motor: MotorConstant,
    pub gear_ratio: f64,
    /// Wheel radius (m).
    pub wheel_radius: f64,
}

impl DriveMotors {
    pub fn from_config(config: &RobotConfig, coefficients: &Coefficients) -> Self {
        DriveMotors {
            motor: MotorConstant::new(
                config.drive.kv,
                coefficients.drive_phase_resistance,
                config.drive.esc_current_limit_a,
            ),
            gear_ratio: config.drive.gear_ratio,
            wheel_radius: config.drive.wheel_radius_m(),
        }
    }

    pub fn motor_rpm(&self, speed: f64) -> f64 {
        let wheel_rpm = speed * 60.0 / (2.0 * PI * self.wheel_radius);
        wheel_rpm * self.gear_ratio
    }
}

impl ElectricalModel for DriveMotors {
    fn step_electrical(&self, _ctx: SimContext, state: &mut SimState) {
        let back_emf = self.motor.back_emf(self.motor_rpm(state.drive.speed));
        state.drive.back_emf = back_emf;
        state.drive.current_per_motor = self.motor.current(state.battery.voltage, back_emf);
    }
}

/// The weapon motors driving the rotor through `reduction`.
#[derive(Debug, Clone, Copy)]
pub struct WeaponMotors {
    pub motor: MotorConstant,
    pub reduction: f64,
    pub active: bool,
}

impl WeaponMotors {
    pub fn from_config(config: &RobotConfig, coefficients: &Coefficients) -> Self {
        WeaponMotors {
            motor: MotorConstant::new(
                config.weapon.kv,
                coefficients.weapon_phase_resistance,
                config.weapon.esc_current_limit_a,
            ),
            reduction: config.weapon.reduction,
            active: config.weapon.active,
        }
    }

    pub fn motor_rpm(&self, rotor_omega: f64) -> f64 {
        rad_per_s_to_rpm(rotor_omega) * self.reduction
    }
}

impl ElectricalModel for WeaponMotors {
    fn step_electrical(&self, _ctx: SimContext, state: &mut SimState) {
        if !self.active {
            state.weapon.back_emf = 0.0;
            state.weapon.current_per_motor = 0.0;
            return;
        }
        let back_emf = self.motor.back_emf(self.motor_rpm(state.weapon.angular_velocity));
        state.weapon.back_emf = back_emf;
        state.weapon.current_per_motor = self.motor.current(state.battery.voltage, back_emf);
    }
}

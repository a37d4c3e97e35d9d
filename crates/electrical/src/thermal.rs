//! Lumped single-mass motor thermal model with forced-air cooling.

use simcore::{Coefficients, RobotConfig, SimContext, SimState, ThermalModel};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LumpedThermalMass {
    /// Winding resistance heating the mass (Ω).
    pub resistance: f64,
    /// Heat capacity `m * c_p` (J/K).
    pub heat_capacity: f64,
    /// Heat transfer to ambient at standstill (W/K).
    pub cooling_base: f64,
    /// Extra heat transfer per unit of cooling speed.
    pub cooling_slope: f64,
    pub ambient: f64,
}

impl LumpedThermalMass {
    pub fn cooling_coefficient(&self, cooling_speed: f64) -> f64 {
        self.cooling_base + self.cooling_slope * cooling_speed.abs()
    }

    /// `dT/dt` for a motor carrying `current` while moving air at `cooling_speed`.
    pub fn derivative(&self, temperature: f64, current: f64, cooling_speed: f64) -> f64 {
        let heat_in = current * current * self.resistance;
        let heat_out = self.cooling_coefficient(cooling_speed) * (temperature - self.ambient);
        (heat_in - heat_out) / self.heat_capacity
    }

    /// Temperature the mass settles at for constant operating conditions.
    pub fn steady_state(&self, current: f64, cooling_speed: f64) -> f64 {
        self.ambient + current * current * self.resistance / self.cooling_coefficient(cooling_speed)
    }

    pub fn step(&self, temperature: f64, current: f64, cooling_speed: f64, dt: f64) -> f64 {
        temperature + self.derivative(temperature, current, cooling_speed) * dt
    }
}

/// One drive motor and one weapon motor, each treated as a single lump.
#[derive(Debug, Clone, Copy)]
pub struct MotorThermal {
    pub drive: LumpedThermalMass,
    pub weapon: LumpedThermalMass,
    /// Weapon cooling runs off motor speed, i.e. rotor speed times reduction.
    pub weapon_reduction: f64,
}

impl MotorThermal {
    pub fn from_config(config: &RobotConfig, coefficients: &Coefficients) -> Self {
        let heat_capacity = coefficients.thermal_capacity();
        MotorThermal {
            drive: LumpedThermalMass {
                resistance: coefficients.drive_phase_resistance,
                heat_capacity,
                cooling_base: coefficients.drive_cooling_base,
                cooling_slope: coefficients.drive_cooling_per_speed,
                ambient: coefficients.ambient_temperature,
            },
            weapon: LumpedThermalMass {
                resistance: coefficients.weapon_phase_resistance,
                heat_capacity,
                cooling_base: coefficients.weapon_cooling_base,
                cooling_slope: coefficients.weapon_cooling_per_rad_s,
                ambient: coefficients.ambient_temperature,
            },
            weapon_reduction: config.weapon.reduction,
        }
    }
}

impl ThermalModel for MotorThermal {
    fn step_thermal(&self, ctx: SimContext, state: &mut SimState) {
        let thermal = &mut state.thermal;
        thermal.drive_temperature = self.drive.step(
            thermal.drive_temperature,
            state.drive.current_per_motor,
            state.drive.speed,
            ctx.dt,
        );
        thermal.weapon_temperature = self.weapon.step(
            thermal.weapon_temperature,
            state.weapon.current_per_motor,
            state.weapon.angular_velocity * self.weapon_reduction,
            ctx.dt,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mass() -> LumpedThermalMass {
        let c = Coefficients::reference();
        LumpedThermalMass {
            resistance: c.drive_phase_resistance,
            heat_capacity: c.thermal_capacity(),
            cooling_base: c.drive_cooling_base,
            cooling_slope: c.drive_cooling_per_speed,
            ambient: c.ambient_temperature,
        }
    }

    #[test]
    fn test_no_current_stays_at_ambient() {
        let m = mass();
        assert_eq!(m.step(25.0, 0.0, 3.0, 0.02), 25.0);
    }

    #[test]
    fn test_converges_to_steady_state_under_constant_current() {
        let m = mass();
        let (current, speed, dt) = (40.0, 2.0, 1.0);
        let mut temperature = m.ambient;
        for _ in 0..50_000 {
            temperature = m.step(temperature, current, speed, dt);
        }
        let rate = m.derivative(temperature, current, speed);
        assert!(rate.abs() < 1e-9, "still changing at {rate} K/s");
        assert!((temperature - m.steady_state(current, speed)).abs() < 1e-6);
    }

    #[test]
    fn test_airflow_lowers_steady_state() {
        let m = mass();
        assert!(m.steady_state(40.0, 5.0) < m.steady_state(40.0, 0.0));
    }

    #[test]
    fn test_inactive_weapon_motor_stays_cold() {
        let mut config = RobotConfig::default();
        config.weapon.active = false;
        let thermal = MotorThermal::from_config(&config, &Coefficients::reference());
        let mut state = SimState::initial(44.4, 25.0);
        state.drive.current_per_motor = 60.0;
        thermal.step_thermal(SimContext { dt: 0.02, t: 0.0 }, &mut state);
        assert!(state.thermal.drive_temperature > 25.0);
        assert_eq!(state.thermal.weapon_temperature, 25.0);
    }
}

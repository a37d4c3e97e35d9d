use simcore::{ElectricalModel, RobotConfig, SimContext, SimState};

/// Ideal voltage source behind a single internal resistance, shared by the
/// drive and weapon ESCs.
///
/// The sagged voltage computed from this step's current is what the motors
/// see on the *next* step; the bus is not solved simultaneously.
#[derive(Debug, Clone, Copy)]
pub struct Battery {
    pub nominal_voltage: f64,
    /// Internal resistance (Ω).
    pub internal_resistance: f64,
    pub drive_motor_count: u32,
    pub weapon_motor_count: u32,
}

impl Battery {
    pub fn from_config(config: &RobotConfig) -> Self {
        Battery {
            nominal_voltage: config.battery.nominal_voltage(),
            internal_resistance: config.battery.internal_resistance_ohm(),
            drive_motor_count: config.drive.motor_count,
            weapon_motor_count: config.weapon.motor_count,
        }
    }

    /// Terminal voltage at `current`, kept inside `[0, nominal]`.
    pub fn sagged_voltage(&self, current: f64) -> f64 {
        let v = self.nominal_voltage - current * self.internal_resistance;
        if v.is_nan() {
            v
        } else {
            v.max(0.0).min(self.nominal_voltage)
        }
    }
}

impl ElectricalModel for Battery {
    fn step_electrical(&self, _ctx: SimContext, state: &mut SimState) {
        let total_current_draw = state.drive.current_per_motor * self.drive_motor_count as f64
            + state.weapon.current_per_motor * self.weapon_motor_count as f64;

        state.battery.total_current_draw = total_current_draw;
        state.battery.voltage = self.sagged_voltage(total_current_draw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sag_from_total_current() {
        let battery = Battery::from_config(&RobotConfig::default());
        let mut state = SimState::initial(battery.nominal_voltage, 25.0);
        state.drive.current_per_motor = 60.0;
        state.weapon.current_per_motor = 150.0;

        battery.step_electrical(SimContext { dt: 0.02, t: 0.0 }, &mut state);

        // 2 x 60 A + 1 x 150 A through 20 mΩ
        assert!((state.battery.total_current_draw - 270.0).abs() < 1e-9);
        assert!((state.battery.voltage - (44.4 - 270.0 * 0.02)).abs() < 1e-9);
    }

    #[test]
    fn test_sag_never_leaves_bounds() {
        let battery = Battery::from_config(&RobotConfig::default());
        assert_eq!(battery.sagged_voltage(0.0), battery.nominal_voltage);
        assert_eq!(battery.sagged_voltage(1.0e6), 0.0);
        assert_eq!(battery.sagged_voltage(-10.0), battery.nominal_voltage);
    }
}

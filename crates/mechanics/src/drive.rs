use simcore::units::torque_constant;
use simcore::{Coefficients, MechanicsModel, RobotConfig, SimContext, SimState, GRAVITY};

/// Straight-line longitudinal dynamics of the whole robot.
#[derive(Debug, Clone, Copy)]
pub struct Drivetrain {
    /// Drive motor torque constant (N·m/A).
    pub torque_constant: f64,
    pub transmission_efficiency: f64,
    pub gear_ratio: f64,
    pub motor_count: u32,
    /// Wheel radius (m).
    pub wheel_radius: f64,
    /// Total robot mass (kg).
    pub mass: f64,
    pub friction_coeff: f64,
    /// `½ ρ C_d A`.
    pub drag_factor: f64,
    pub rolling_resistance_coeff: f64,
}

impl Drivetrain {
    pub fn from_config(config: &RobotConfig, coefficients: &Coefficients, total_mass: f64) -> Self {
        Drivetrain {
            torque_constant: torque_constant(config.drive.kv),
            transmission_efficiency: coefficients.transmission_efficiency,
            gear_ratio: config.drive.gear_ratio,
            motor_count: config.drive.motor_count,
            wheel_radius: config.drive.wheel_radius_m(),
            mass: total_mass,
            friction_coeff: config.drive.friction_coeff,
            drag_factor: coefficients.drag_factor(),
            rolling_resistance_coeff: coefficients.rolling_resistance_coeff,
        }
    }

    /// Force at the contact patches from `current_per_motor`, before the traction limit.
    pub fn tractive_force(&self, current_per_motor: f64) -> f64 {
        let motor_torque = current_per_motor * self.torque_constant * self.transmission_efficiency;
        motor_torque * self.gear_ratio * self.motor_count as f64 / self.wheel_radius
    }

    /// Most force the tyres can transmit before spinning, `μ m g`.
    pub fn traction_limit(&self) -> f64 {
        self.friction_coeff * self.mass * GRAVITY
    }

    pub fn aerodynamic_drag(&self, speed: f64) -> f64 {
        self.drag_factor * speed * speed
    }

    pub fn rolling_resistance(&self) -> f64 {
        self.rolling_resistance_coeff * self.mass * GRAVITY
    }

    pub fn net_force(&self, current_per_motor: f64, speed: f64) -> f64 {
        let tractive = self.tractive_force(current_per_motor);
        let limit = self.traction_limit();
        // comparison keeps NaN visible where f64::min would drop it
        let transmitted = if tractive > limit { limit } else { tractive };
        transmitted - self.aerodynamic_drag(speed) - self.rolling_resistance()
    }
}

impl MechanicsModel for Drivetrain {
    fn step_physics(&self, ctx: SimContext, state: &mut SimState) {
        let drive = &mut state.drive;
        let accel = self.net_force(drive.current_per_motor, drive.speed) / self.mass;
        let speed = drive.speed + accel * ctx.dt;
        // resistive forces alone never push the robot backwards
        drive.speed = if speed < 0.0 { 0.0 } else { speed };
    }
}

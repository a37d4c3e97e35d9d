//! Fixed-step explicit-Euler simulation of a straight-line launch with the
//! weapon spinning up on the same battery.

use electrical::{Battery, DriveMotors, MotorThermal, WeaponMotors};
use log::{debug, warn};
use mechanics::{Drivetrain, WeaponRotor};
use simcore::error::require_positive;
use simcore::units::{checked_step_count, ms_to_kmh, rad_per_s_to_rpm, step_count, MAX_STEPS};
use simcore::{
    Coefficients, ElectricalModel, KernelError, MechanicsModel, Result, RobotConfig, SimContext,
    SimState, SimulationTrace, ThermalModel, TracePoint,
};

/// All sub-models of one run, built once from the configuration.
#[derive(Debug, Clone, Copy)]
struct Kernel {
    drive_motors: DriveMotors,
    weapon_motors: WeaponMotors,
    battery: Battery,
    drivetrain: Drivetrain,
    rotor: WeaponRotor,
    thermal: MotorThermal,
    ambient: f64,
}

impl Kernel {
    fn new(config: &RobotConfig, coefficients: &Coefficients, total_mass: f64) -> Self {
        Kernel {
            drive_motors: DriveMotors::from_config(config, coefficients),
            weapon_motors: WeaponMotors::from_config(config, coefficients),
            battery: Battery::from_config(config),
            drivetrain: Drivetrain::from_config(config, coefficients, total_mass),
            rotor: WeaponRotor::from_config(config, coefficients),
            thermal: MotorThermal::from_config(config, coefficients),
            ambient: coefficients.ambient_temperature,
        }
    }

    fn initial_state(&self) -> SimState {
        SimState::initial(self.battery.nominal_voltage, self.ambient)
    }

    /// One tick. The motors read the bus voltage left by the previous tick;
    /// the battery then sags it for the next one.
    fn step(&self, ctx: SimContext, state: &mut SimState) {
        self.drive_motors.step_electrical(ctx, state);
        self.weapon_motors.step_electrical(ctx, state);
        self.battery.step_electrical(ctx, state);

        self.drivetrain.step_physics(ctx, state);
        self.rotor.step_physics(ctx, state);

        self.thermal.step_thermal(ctx, state);
    }

    fn integrate(
        &self,
        dt: f64,
        max_time: f64,
        halt_on_non_finite: bool,
    ) -> (SimulationTrace, Option<KernelError>) {
        let steps = step_count(max_time, dt);
        let mut state = self.initial_state();
        let mut points = Vec::with_capacity(steps.min(MAX_STEPS));

        for step in 0..steps {
            let ctx = SimContext { dt, t: step as f64 * dt };
            self.step(ctx, &mut state);
            points.push(sample(ctx.t, &state));

            if halt_on_non_finite {
                if let Some(quantity) = state.first_non_finite() {
                    let err = KernelError::NumericDegeneracy {
                        step,
                        time: ctx.t,
                        quantity,
                    };
                    return (SimulationTrace::new(dt, max_time, points), Some(err));
                }
            }
        }

        (SimulationTrace::new(dt, max_time, points), None)
    }
}

fn sample(t: f64, state: &SimState) -> TracePoint {
    TracePoint {
        t,
        v_kmh: ms_to_kmh(state.drive.speed),
        i_bat: state.battery.total_current_draw,
        u_sag: state.battery.voltage,
        t_drive: state.thermal.drive_temperature,
        t_weapon: state.thermal.weapon_temperature,
        weapon_rpm: rad_per_s_to_rpm(state.weapon.angular_velocity),
        drive_current: state.drive.current_per_motor,
        weapon_current: state.weapon.current_per_motor,
    }
}

/// Validates the inputs, then integrates `ceil(max_time / dt)` steps, at most
/// [`MAX_STEPS`].
///
/// Stops with [`KernelError::NumericDegeneracy`] on the first NaN/Inf state
/// instead of returning a trace full of them.
pub fn simulate(
    config: &RobotConfig,
    coefficients: &Coefficients,
    total_mass: f64,
    dt: f64,
    max_time: f64,
) -> Result<SimulationTrace> {
    config.validate()?;
    coefficients.validate()?;
    require_positive("total_mass", total_mass)?;
    require_positive("dt", dt)?;
    require_positive("max_time", max_time)?;
    let steps = checked_step_count(max_time, dt)?;

    debug!(
        "simulating {steps} steps (dt = {dt} s, m = {total_mass:.1} kg, weapon {})",
        if config.weapon.active { "on" } else { "off" }
    );

    let kernel = Kernel::new(config, coefficients, total_mass);
    let (trace, degeneracy) = kernel.integrate(dt, max_time, true);
    match degeneracy {
        Some(err) => {
            warn!("simulation aborted after {} samples: {err}", trace.len());
            Err(err)
        }
        None => Ok(trace),
    }
}

/// Raw integrator: no validation and no early exit. Pathological input shows
/// up as NaN/Inf samples, see [`SimulationTrace::first_non_finite`].
pub fn simulate_unchecked(
    config: &RobotConfig,
    coefficients: &Coefficients,
    total_mass: f64,
    dt: f64,
    max_time: f64,
) -> SimulationTrace {
    Kernel::new(config, coefficients, total_mass)
        .integrate(dt, max_time, false)
        .0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::aggregate;
    use mechanics::compute_static;

    fn reference() -> (RobotConfig, Coefficients, f64) {
        let config = RobotConfig::default();
        let coefficients = Coefficients::reference();
        let mass = compute_static(&config, &coefficients).total_mass;
        (config, coefficients, mass)
    }

    #[test]
    fn test_sample_count_and_timestamps() {
        let (config, coefficients, mass) = reference();
        let trace = simulate(&config, &coefficients, mass, 0.05, 3.0).unwrap();
        assert_eq!(trace.len(), 60);
        assert_eq!(trace.points()[0].t, 0.0);
        assert!((trace.points()[59].t - 2.95).abs() < 1e-9);
    }

    #[test]
    fn test_first_step_runs_on_nominal_voltage() {
        let (config, coefficients, mass) = reference();
        let trace = simulate(&config, &coefficients, mass, 0.02, 0.1).unwrap();
        let first = trace.points()[0];
        // both ESCs saturate at standstill
        assert_eq!(first.drive_current, 60.0);
        assert_eq!(first.weapon_current, 150.0);
        assert!((first.i_bat - 270.0).abs() < 1e-9);
        assert!((first.u_sag - (44.4 - 270.0 * 0.02)).abs() < 1e-9);
    }

    #[test]
    fn test_sag_feeds_back_one_step_late() {
        let (mut config, coefficients, mass) = reference();
        // tiny current limits keep both motors saturated, so currents stay flat
        config.drive.esc_current_limit_a = 10.0;
        config.weapon.esc_current_limit_a = 10.0;
        let trace = simulate(&config, &coefficients, mass, 0.02, 0.2).unwrap();
        for p in trace.points() {
            assert!((p.i_bat - 30.0).abs() < 1e-9);
            assert!((p.u_sag - (44.4 - 30.0 * 0.02)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_robot_accelerates_and_rotor_spins_up() {
        let (config, coefficients, mass) = reference();
        let trace = simulate(&config, &coefficients, mass, 0.02, 5.0).unwrap();
        let last = trace.last().unwrap();
        assert!(last.v_kmh > 15.0);
        assert!(last.weapon_rpm > 0.0);
        assert!(last.t_drive > 25.0);
        assert!(last.t_weapon > last.t_drive);
    }

    #[test]
    fn test_invalid_config_is_rejected_before_simulating() {
        let (mut config, coefficients, mass) = reference();
        config.drive.kv = 0.0;
        let err = simulate(&config, &coefficients, mass, 0.02, 1.0).unwrap_err();
        assert!(err.is_invalid_configuration());
    }

    #[test]
    fn test_non_positive_dt_is_rejected() {
        let (config, coefficients, mass) = reference();
        assert!(simulate(&config, &coefficients, mass, 0.0, 1.0).is_err());
        assert!(simulate(&config, &coefficients, mass, 0.02, -1.0).is_err());
        assert!(simulate(&config, &coefficients, 0.0, 0.02, 1.0).is_err());
    }

    #[test]
    fn test_horizon_beyond_step_cap_is_rejected() {
        let (config, coefficients, mass) = reference();
        let err = simulate(&config, &coefficients, mass, 1e-3, 1e20).unwrap_err();
        assert!(err.is_invalid_configuration());
        assert!(simulate(&config, &coefficients, mass, 1e-12, 5.0).is_err());
    }

    #[test]
    fn test_unchecked_run_exposes_nan_from_zero_kv() {
        let (mut config, coefficients, mass) = reference();
        config.drive.kv = 0.0;
        let trace = simulate_unchecked(&config, &coefficients, mass, 0.02, 1.0);
        assert_eq!(trace.len(), 50);
        assert!(trace.first_non_finite().is_some());
        match aggregate(&trace) {
            Err(KernelError::NumericDegeneracy { step, .. }) => assert_eq!(step, 0),
            other => panic!("expected degeneracy, got {other:?}"),
        }
    }

    #[test]
    fn test_unstable_time_step_is_reported_as_degeneracy() {
        let (config, coefficients, mass) = reference();
        // a huge step is valid input, but the explicit thermal update diverges
        let err = simulate(&config, &coefficients, mass, 1.0e6, 2.0e8).unwrap_err();
        match err {
            KernelError::NumericDegeneracy { step, quantity, .. } => {
                assert!(step > 0 && step < 200);
                assert!(quantity.contains("temperature"), "{quantity}");
            }
            other => panic!("expected degeneracy, got {other:?}"),
        }
    }
}

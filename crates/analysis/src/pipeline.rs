use log::debug;
use mechanics::{analyze_collision_with_efficiency, compute_static, CollisionResult};
use serde::{Deserialize, Serialize};
use simcore::error::require_positive;
use simcore::units::checked_step_count;
use simcore::{Coefficients, Result, RobotConfig, SimulationTrace, StaticResult};

use crate::simulate::simulate;
use crate::stats::{aggregate_with_threshold, StatsSummary, DEFAULT_SPEED_THRESHOLD_KMH};

/// Everything besides the robot itself that shapes one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSettings {
    pub dt: f64,
    pub max_time: f64,
    pub speed_threshold_kmh: f64,
    /// Opponent mass for the collision estimate (kg).
    pub target_mass: f64,
    /// Contact time of a hit (s).
    pub impact_duration: f64,
}

impl Default for RunSettings {
    fn default() -> Self {
        RunSettings {
            dt: 0.02,
            max_time: 5.0,
            speed_threshold_kmh: DEFAULT_SPEED_THRESHOLD_KMH,
            target_mass: 110.0,
            impact_duration: 0.01,
        }
    }
}

impl RunSettings {
    pub fn with_max_time(mut self, max_time: f64) -> Self {
        self.max_time = max_time;
        self
    }

    pub fn validate(&self) -> Result<()> {
        require_positive("dt", self.dt)?;
        require_positive("max_time", self.max_time)?;
        checked_step_count(self.max_time, self.dt)?;
        require_positive("target_mass", self.target_mass)?;
        require_positive("impact_duration", self.impact_duration)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub static_result: StaticResult,
    pub trace: SimulationTrace,
    pub stats: StatsSummary,
    pub collision: CollisionResult,
}

/// Statics, launch simulation, trace summary and a rotor hit on a
/// `settings.target_mass` opponent at the no-load rotor speed.
pub fn evaluate(
    config: &RobotConfig,
    coefficients: &Coefficients,
    settings: &RunSettings,
) -> Result<Evaluation> {
    settings.validate()?;
    config.validate()?;
    coefficients.validate()?;

    let static_result = compute_static(config, coefficients);
    debug!(
        "statics: {:.1} km/h, {:.0} rpm rotor, {:.1} kg",
        static_result.speed_kmh, static_result.weapon_rpm, static_result.total_mass
    );

    let trace = simulate(
        config,
        coefficients,
        static_result.total_mass,
        settings.dt,
        settings.max_time,
    )?;
    let stats = aggregate_with_threshold(&trace, settings.speed_threshold_kmh)?;
    let collision = analyze_collision_with_efficiency(
        static_result.total_mass,
        static_result.weapon_inertia,
        static_result.weapon_rpm,
        settings.target_mass,
        settings.impact_duration,
        coefficients.energy_transfer_efficiency,
    );

    Ok(Evaluation {
        static_result,
        trace,
        stats,
        collision,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use simcore::KernelError;

    #[test]
    fn test_reference_evaluation() {
        let eval = evaluate(
            &RobotConfig::default(),
            &Coefficients::reference(),
            &RunSettings::default(),
        )
        .unwrap();
        assert_eq!(eval.trace.len(), 250);
        assert!(eval.stats.peak_current > 0.0);
        assert!(eval.stats.min_voltage < eval.static_result.nominal_voltage);
        assert!(eval.stats.time_to_threshold.reached().is_some());
        assert!(eval.collision.g_force_self > 0.0);
    }

    #[test]
    fn test_bad_settings_are_rejected() {
        let config = RobotConfig::default();
        let coefficients = Coefficients::reference();
        let settings = RunSettings {
            target_mass: 0.0,
            ..RunSettings::default()
        };
        match evaluate(&config, &coefficients, &settings) {
            Err(KernelError::InvalidConfiguration { field, .. }) => {
                assert_eq!(field, "target_mass")
            }
            other => panic!("expected rejection, got {other:?}"),
        }

        let settings = RunSettings {
            impact_duration: -0.01,
            ..RunSettings::default()
        };
        assert!(evaluate(&config, &coefficients, &settings).is_err());
    }

    #[test]
    fn test_horizon_beyond_step_cap_is_rejected() {
        let settings = RunSettings {
            dt: 1e-3,
            max_time: 1e20,
            ..RunSettings::default()
        };
        match evaluate(&RobotConfig::default(), &Coefficients::reference(), &settings) {
            Err(KernelError::InvalidConfiguration { field, .. }) => assert_eq!(field, "max_time"),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_inactive_weapon_with_zero_reduction_is_rejected() {
        let mut config = RobotConfig::default();
        config.weapon.active = false;
        config.weapon.reduction = 0.0;
        match evaluate(&config, &Coefficients::reference(), &RunSettings::default()) {
            Err(KernelError::InvalidConfiguration { field, .. }) => {
                assert_eq!(field, "weapon.reduction")
            }
            other => panic!("expected rejection, got {other:?}"),
        }

        config.weapon.reduction = 1.0;
        let eval = evaluate(&config, &Coefficients::reference(), &RunSettings::default()).unwrap();
        assert!(eval.static_result.weapon_rpm.is_finite());
        assert!(eval.collision.g_force_self.is_finite());
    }
}

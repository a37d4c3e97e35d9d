//! Objective for searching drive and armor layouts. The search loop lives with
//! the caller; this only scores one candidate.

use log::warn;
use mechanics::compute_static;
use serde::{Deserialize, Serialize};
use simcore::{Coefficients, KernelError, RobotConfig};
use thiserror::Error;

use crate::pipeline::{evaluate, RunSettings};

/// Search horizon for a candidate launch (s).
pub const CANDIDATE_HORIZON: f64 = 4.0;

/// Search box for `[gear_ratio, wheel_diameter_mm, drive_kv, rotor_mass_kg, armor_thickness_mm]`.
pub const DEFAULT_BOUNDS: [(f64, f64); 5] = [
    (8.0, 20.0),
    (150.0, 300.0),
    (100.0, 300.0),
    (15.0, 40.0),
    (2.0, 12.0),
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub gear_ratio: f64,
    pub wheel_diameter_mm: f64,
    pub drive_kv: f64,
    pub rotor_mass_kg: f64,
    pub armor_thickness_mm: f64,
}

impl Candidate {
    pub fn from_array(x: [f64; 5]) -> Self {
        Candidate {
            gear_ratio: x[0],
            wheel_diameter_mm: x[1],
            drive_kv: x[2],
            rotor_mass_kg: x[3],
            armor_thickness_mm: x[4],
        }
    }

    pub fn to_array(&self) -> [f64; 5] {
        [
            self.gear_ratio,
            self.wheel_diameter_mm,
            self.drive_kv,
            self.rotor_mass_kg,
            self.armor_thickness_mm,
        ]
    }

    pub fn within(&self, bounds: &[(f64, f64); 5]) -> bool {
        self.to_array()
            .iter()
            .zip(bounds)
            .all(|(x, (lo, hi))| lo <= x && x <= hi)
    }

    pub fn apply(&self, base: &RobotConfig) -> RobotConfig {
        let mut config = *base;
        config.drive.gear_ratio = self.gear_ratio;
        config.drive.wheel_diameter_mm = self.wheel_diameter_mm;
        config.drive.kv = self.drive_kv;
        config.weapon.rotor_mass_kg = self.rotor_mass_kg;
        config.armor.thickness_mm = self.armor_thickness_mm;
        config
    }
}

/// Which terms enter the score and how strongly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Goals {
    pub maximize_speed: bool,
    pub speed_weight: f64,
    pub maximize_energy: bool,
    /// Per kJ of rotor energy.
    pub energy_weight: f64,
    pub minimize_mass: bool,
    pub mass_weight: f64,
    pub minimize_current: bool,
    pub current_weight: f64,
    pub minimize_gforce: bool,
    pub gforce_weight: f64,
}

impl Default for Goals {
    fn default() -> Self {
        Goals {
            maximize_speed: true,
            speed_weight: 1.0,
            maximize_energy: true,
            energy_weight: 1.0,
            minimize_mass: false,
            mass_weight: 1.0,
            minimize_current: false,
            current_weight: 0.1,
            minimize_gforce: false,
            gforce_weight: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Constraints {
    /// Weight class limit (kg).
    pub max_mass: f64,
    /// Highest acceptable pack current (A).
    pub max_current: f64,
}

impl Default for Constraints {
    fn default() -> Self {
        Constraints {
            max_mass: 110.0,
            max_current: 400.0,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Rejection {
    #[error("overweight: {mass:.1} kg > {limit:.1} kg")]
    Overweight { mass: f64, limit: f64 },

    #[error("over current: {peak:.0} A > {limit:.0} A")]
    OverCurrent { peak: f64, limit: f64 },

    #[error(transparent)]
    Invalid(#[from] KernelError),
}

/// Score of an accepted candidate (lower is better) and the numbers behind it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CandidateScore {
    pub score: f64,
    pub speed_kmh: f64,
    pub total_mass: f64,
    pub weapon_energy_kj: f64,
    pub peak_current: f64,
    pub g_force_self: f64,
}

/// Applies `candidate` to `base`, checks the mass limit on the statics, then
/// runs a 4 s launch with the weapon off and a hit on a 110 kg opponent.
pub fn evaluate_candidate(
    base: &RobotConfig,
    coefficients: &Coefficients,
    candidate: &Candidate,
    goals: &Goals,
    constraints: &Constraints,
) -> Result<CandidateScore, Rejection> {
    let result = score_candidate(base, coefficients, candidate, goals, constraints);
    if let Err(rejection) = &result {
        warn!("candidate {:?} rejected: {rejection}", candidate.to_array());
    }
    result
}

fn score_candidate(
    base: &RobotConfig,
    coefficients: &Coefficients,
    candidate: &Candidate,
    goals: &Goals,
    constraints: &Constraints,
) -> Result<CandidateScore, Rejection> {
    let mut config = candidate.apply(base);
    config.weapon.active = false;
    config.validate()?;
    coefficients.validate()?;

    let statics = compute_static(&config, coefficients);
    if statics.total_mass > constraints.max_mass {
        return Err(Rejection::Overweight {
            mass: statics.total_mass,
            limit: constraints.max_mass,
        });
    }

    let settings = RunSettings::default().with_max_time(CANDIDATE_HORIZON);
    let eval = evaluate(&config, coefficients, &settings)?;
    if eval.stats.peak_current > constraints.max_current {
        return Err(Rejection::OverCurrent {
            peak: eval.stats.peak_current,
            limit: constraints.max_current,
        });
    }

    let speed_kmh = eval.static_result.speed_kmh;
    let total_mass = eval.static_result.total_mass;
    let weapon_energy_kj = eval.static_result.weapon_energy / 1000.0;
    let peak_current = eval.stats.peak_current;
    let g_force_self = eval.collision.g_force_self;

    let mut score = 0.0;
    if goals.maximize_speed {
        score -= speed_kmh * goals.speed_weight;
    }
    if goals.maximize_energy {
        score -= weapon_energy_kj * goals.energy_weight;
    }
    if goals.minimize_mass {
        score += total_mass * goals.mass_weight;
    }
    if goals.minimize_current {
        score += peak_current * goals.current_weight;
    }
    if goals.minimize_gforce {
        score += g_force_self * goals.gforce_weight;
    }

    Ok(CandidateScore {
        score,
        speed_kmh,
        total_mass,
        weapon_energy_kj,
        peak_current,
        g_force_self,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_candidate() -> Candidate {
        Candidate::from_array([12.5, 200.0, 190.0, 28.0, 5.0])
    }

    #[test]
    fn test_reference_candidate_round_trips_config() {
        let base = RobotConfig::default();
        assert_eq!(reference_candidate().apply(&base), base);
        assert!(reference_candidate().within(&DEFAULT_BOUNDS));
        assert!(!Candidate::from_array([25.0, 200.0, 190.0, 28.0, 5.0]).within(&DEFAULT_BOUNDS));
    }

    #[test]
    fn test_reference_candidate_scores() {
        let goals = Goals::default();
        let result = evaluate_candidate(
            &RobotConfig::default(),
            &Coefficients::reference(),
            &reference_candidate(),
            &goals,
            &Constraints::default(),
        )
        .unwrap();
        let expected = -(result.speed_kmh + result.weapon_energy_kj);
        assert!((result.score - expected).abs() < 1e-9);
        assert!(result.score < 0.0);
    }

    #[test]
    fn test_heavy_armor_is_overweight() {
        let candidate = Candidate {
            armor_thickness_mm: 12.0,
            ..reference_candidate()
        };
        let err = evaluate_candidate(
            &RobotConfig::default(),
            &Coefficients::reference(),
            &candidate,
            &Goals::default(),
            &Constraints::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Rejection::Overweight { .. }), "{err}");
    }

    #[test]
    fn test_current_limit() {
        let constraints = Constraints {
            max_current: 50.0,
            ..Constraints::default()
        };
        let err = evaluate_candidate(
            &RobotConfig::default(),
            &Coefficients::reference(),
            &reference_candidate(),
            &Goals::default(),
            &constraints,
        )
        .unwrap_err();
        assert_eq!(
            err,
            Rejection::OverCurrent {
                peak: 120.0,
                limit: 50.0
            }
        );
    }

    #[test]
    fn test_invalid_candidate() {
        let candidate = Candidate {
            drive_kv: 0.0,
            ..reference_candidate()
        };
        let err = evaluate_candidate(
            &RobotConfig::default(),
            &Coefficients::reference(),
            &candidate,
            &Goals::default(),
            &Constraints::default(),
        )
        .unwrap_err();
        assert!(matches!(err, Rejection::Invalid(e) if e.is_invalid_configuration()));
    }
}

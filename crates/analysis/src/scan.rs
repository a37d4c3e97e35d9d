//! One-parameter sensitivity sweep over a base configuration.

use log::{info, warn};
use rayon::prelude::*;
use serde::Serialize;
use simcore::{Coefficients, KernelError, Result, RobotConfig};

use crate::pipeline::{evaluate, RunSettings};

/// A sweepable configuration parameter with its UI range and accessor.
pub struct ScannableParam {
    pub name: &'static str,
    pub label: &'static str,
    pub default: f64,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub unit: &'static str,
    /// Apply this parameter value to a RobotConfig.
    pub apply: fn(&mut RobotConfig, f64),
}

pub const SCANNABLE_PARAMS: &[ScannableParam] = &[
    ScannableParam {
        name: "gear_ratio",
        label: "Drive reduction",
        default: 12.5,
        min: 8.0,
        max: 20.0,
        step: 0.5,
        unit: ":1",
        apply: |c, v| c.drive.gear_ratio = v,
    },
    ScannableParam {
        name: "wheel_dia_mm",
        label: "Wheel diameter",
        default: 200.0,
        min: 150.0,
        max: 300.0,
        step: 10.0,
        unit: "mm",
        apply: |c, v| c.drive.wheel_diameter_mm = v,
    },
    ScannableParam {
        name: "motor_kv",
        label: "Drive motor KV",
        default: 190.0,
        min: 100.0,
        max: 300.0,
        step: 10.0,
        unit: "rpm/V",
        apply: |c, v| c.drive.kv = v,
    },
    ScannableParam {
        name: "weapon_mass_kg",
        label: "Rotor mass",
        default: 28.0,
        min: 15.0,
        max: 40.0,
        step: 1.0,
        unit: "kg",
        apply: |c, v| c.weapon.rotor_mass_kg = v,
    },
    ScannableParam {
        name: "armor_thickness",
        label: "Armor thickness",
        default: 5.0,
        min: 2.0,
        max: 12.0,
        step: 1.0,
        unit: "mm",
        apply: |c, v| c.armor.thickness_mm = v,
    },
    ScannableParam {
        name: "voltage_s",
        label: "Battery voltage",
        default: 12.0,
        min: 8.0,
        max: 14.0,
        step: 1.0,
        unit: "S",
        // cell counts are whole; negative values saturate to 0 and fail validation
        apply: |c, v| c.battery.cell_count = v.round() as u32,
    },
];

pub fn find_param(name: &str) -> Option<&'static ScannableParam> {
    SCANNABLE_PARAMS.iter().find(|p| p.name == name)
}

/// Headline numbers of one scan point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScanMetrics {
    pub speed_kmh: f64,
    pub total_mass: f64,
    pub weapon_energy_kj: f64,
    pub peak_current: f64,
    /// Launch time to the threshold speed, or the horizon if never reached (s).
    pub time_to_20: f64,
    /// Hottest drive motor temperature (°C).
    pub temp_max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanRow {
    pub param_value: f64,
    pub outcome: std::result::Result<ScanMetrics, KernelError>,
}

/// `num_points` evenly spaced values from `min` to `max` inclusive.
pub fn linspace(min: f64, max: f64, num_points: usize) -> Vec<f64> {
    match num_points {
        0 => Vec::new(),
        1 => vec![min],
        n => (0..n)
            .map(|i| min + (max - min) * i as f64 / (n - 1) as f64)
            .collect(),
    }
}

/// Evaluates `base` with `param` set to each point of `range`.
///
/// The weapon circuit is switched off for every point so only the drive
/// loads the battery. Points whose configuration is rejected stay in the
/// output, in order, carrying their error.
pub fn run_parameter_scan(
    base: &RobotConfig,
    coefficients: &Coefficients,
    param: &str,
    range: (f64, f64),
    num_points: usize,
    settings: &RunSettings,
) -> Result<Vec<ScanRow>> {
    let spec = find_param(param).ok_or_else(|| KernelError::UnknownParameter(param.to_string()))?;
    settings.validate()?;
    coefficients.validate()?;

    let (min, max) = range;
    info!("scanning {} over [{min}, {max}] in {num_points} points", spec.name);

    let rows: Vec<ScanRow> = linspace(min, max, num_points)
        .par_iter()
        .map(|&value| {
            let mut config = *base;
            (spec.apply)(&mut config, value);
            config.weapon.active = false;
            ScanRow {
                param_value: value,
                outcome: scan_point(&config, coefficients, settings),
            }
        })
        .collect();

    for row in &rows {
        if let Err(err) = &row.outcome {
            warn!("{} = {}: {err}", spec.name, row.param_value);
        }
    }
    Ok(rows)
}

fn scan_point(
    config: &RobotConfig,
    coefficients: &Coefficients,
    settings: &RunSettings,
) -> Result<ScanMetrics> {
    let eval = evaluate(config, coefficients, settings)?;
    Ok(ScanMetrics {
        speed_kmh: eval.static_result.speed_kmh,
        total_mass: eval.static_result.total_mass,
        weapon_energy_kj: eval.static_result.weapon_energy / 1000.0,
        peak_current: eval.stats.peak_current,
        time_to_20: eval.stats.time_to_threshold.seconds_or_horizon(),
        temp_max: eval.stats.temp_drive_max,
    })
}

/// Best-balanced point of a scan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptimalValue {
    pub value: f64,
    /// Index of the winning row in the scan output.
    pub index: usize,
    /// Weighted score of every successful row, in row order.
    pub scores: Vec<(usize, f64)>,
}

const SPEED_WEIGHT: f64 = 0.3;
const ENERGY_WEIGHT: f64 = 0.2;
const MASS_WEIGHT: f64 = 0.2;
const CURRENT_WEIGHT: f64 = 0.15;
const TIME_WEIGHT: f64 = 0.15;

/// Min-max normalises every metric over the successful rows (0.5 for a flat
/// metric) and picks the row with the highest weighted score. Speed and energy
/// count up, mass, peak current and launch time count down.
pub fn optimal_range(rows: &[ScanRow]) -> Option<OptimalValue> {
    let ok: Vec<(usize, &ScanMetrics)> = rows
        .iter()
        .enumerate()
        .filter_map(|(i, row)| row.outcome.as_ref().ok().map(|m| (i, m)))
        .collect();
    if ok.is_empty() {
        return None;
    }

    let metrics: Vec<&ScanMetrics> = ok.iter().map(|(_, m)| *m).collect();
    let speed = normalize(&metrics, |m| m.speed_kmh, true);
    let energy = normalize(&metrics, |m| m.weapon_energy_kj, true);
    let mass = normalize(&metrics, |m| m.total_mass, false);
    let current = normalize(&metrics, |m| m.peak_current, false);
    let time = normalize(&metrics, |m| m.time_to_20, false);

    let scores: Vec<(usize, f64)> = ok
        .iter()
        .enumerate()
        .map(|(k, (i, _))| {
            let score = speed[k] * SPEED_WEIGHT
                + energy[k] * ENERGY_WEIGHT
                + mass[k] * MASS_WEIGHT
                + current[k] * CURRENT_WEIGHT
                + time[k] * TIME_WEIGHT;
            (*i, score)
        })
        .collect();

    // first row wins ties
    let (index, _) = scores
        .iter()
        .copied()
        .fold(None, |best: Option<(usize, f64)>, (i, s)| match best {
            Some((_, b)) if b >= s => best,
            _ => Some((i, s)),
        })?;

    Some(OptimalValue {
        value: rows[index].param_value,
        index,
        scores,
    })
}

fn normalize(
    metrics: &[&ScanMetrics],
    f: impl Fn(&ScanMetrics) -> f64,
    maximize: bool,
) -> Vec<f64> {
    let values: Vec<f64> = metrics.iter().map(|m| f(m)).collect();
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;

    values
        .iter()
        .map(|v| {
            if span == 0.0 || !span.is_finite() {
                0.5
            } else if maximize {
                (v - min) / span
            } else {
                1.0 - (v - min) / span
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(speed_kmh: f64, total_mass: f64, time_to_20: f64) -> ScanMetrics {
        ScanMetrics {
            speed_kmh,
            total_mass,
            weapon_energy_kj: 10.0,
            peak_current: 120.0,
            time_to_20,
            temp_max: 30.0,
        }
    }

    #[test]
    fn test_linspace_matches_endpoints() {
        assert_eq!(linspace(8.0, 20.0, 0), Vec::<f64>::new());
        assert_eq!(linspace(8.0, 20.0, 1), vec![8.0]);
        let values = linspace(8.0, 20.0, 5);
        assert_eq!(values, vec![8.0, 11.0, 14.0, 17.0, 20.0]);
    }

    #[test]
    fn test_param_table_defaults_are_in_range() {
        assert_eq!(SCANNABLE_PARAMS.len(), 6);
        for p in SCANNABLE_PARAMS {
            assert!(p.min <= p.default && p.default <= p.max, "{}", p.name);
            let mut config = RobotConfig::default();
            (p.apply)(&mut config, p.default);
            assert_eq!(config, RobotConfig::default(), "{}", p.name);
        }
    }

    #[test]
    fn test_voltage_rounds_to_cell_count() {
        let mut config = RobotConfig::default();
        (find_param("voltage_s").unwrap().apply)(&mut config, 9.6);
        assert_eq!(config.battery.cell_count, 10);
    }

    #[test]
    fn test_unknown_parameter() {
        let err = run_parameter_scan(
            &RobotConfig::default(),
            &Coefficients::reference(),
            "tyre_colour",
            (0.0, 1.0),
            3,
            &RunSettings::default(),
        )
        .unwrap_err();
        assert_eq!(err, KernelError::UnknownParameter("tyre_colour".to_string()));
    }

    #[test]
    fn test_gear_scan_keeps_order_and_rejects_bad_points() {
        let settings = RunSettings::default().with_max_time(1.0);
        let rows = run_parameter_scan(
            &RobotConfig::default(),
            &Coefficients::reference(),
            "gear_ratio",
            (-4.0, 16.0),
            6,
            &settings,
        )
        .unwrap();
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[0].param_value, -4.0);
        assert!(rows[0].outcome.is_err());
        assert!(rows[1].outcome.is_err());

        // taller gearing (smaller ratio) is faster on paper
        let speeds: Vec<f64> = rows[2..]
            .iter()
            .map(|r| r.outcome.as_ref().unwrap().speed_kmh)
            .collect();
        assert!(speeds.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_optimal_prefers_fast_light_quick() {
        let rows = vec![
            ScanRow {
                param_value: 1.0,
                outcome: Ok(metrics(20.0, 110.0, 2.0)),
            },
            ScanRow {
                param_value: 2.0,
                outcome: Err(KernelError::invalid("drive.kv", "must be positive")),
            },
            ScanRow {
                param_value: 3.0,
                outcome: Ok(metrics(30.0, 100.0, 1.0)),
            },
        ];
        let best = optimal_range(&rows).unwrap();
        assert_eq!(best.index, 2);
        assert_eq!(best.value, 3.0);
        // flat energy and current contribute 0.5 each
        assert!((best.scores[1].1 - (0.3 + 0.1 + 0.2 + 0.075 + 0.15)).abs() < 1e-12);
    }

    #[test]
    fn test_optimal_of_nothing() {
        assert_eq!(optimal_range(&[]), None);
    }
}

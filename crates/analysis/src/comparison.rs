//! Named snapshots of evaluated builds and side-by-side deltas between them.

use serde::{Deserialize, Serialize};
use simcore::RobotConfig;

use crate::pipeline::Evaluation;

/// Inputs and headline results of one evaluated build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedConfiguration {
    pub name: String,
    pub config: RobotConfig,
    pub speed_kmh: f64,
    pub total_mass: f64,
    pub weapon_energy_kj: f64,
    pub peak_current: f64,
    pub min_voltage: f64,
    pub temp_max_drive: f64,
    pub temp_max_weapon: f64,
    pub g_force_self: f64,
    /// `None` when the run never reached the threshold speed.
    pub time_to_20: Option<f64>,
}

impl SavedConfiguration {
    pub fn from_evaluation(
        name: impl Into<String>,
        config: &RobotConfig,
        eval: &Evaluation,
    ) -> Self {
        SavedConfiguration {
            name: name.into(),
            config: *config,
            speed_kmh: eval.static_result.speed_kmh,
            total_mass: eval.static_result.total_mass,
            weapon_energy_kj: eval.static_result.weapon_energy / 1000.0,
            peak_current: eval.stats.peak_current,
            min_voltage: eval.stats.min_voltage,
            temp_max_drive: eval.stats.temp_drive_max,
            temp_max_weapon: eval.stats.temp_weap_max,
            g_force_self: eval.collision.g_force_self,
            time_to_20: eval.stats.time_to_threshold.reached(),
        }
    }

    fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::SpeedKmh => self.speed_kmh,
            Metric::TotalMass => self.total_mass,
            Metric::WeaponEnergyKj => self.weapon_energy_kj,
            Metric::PeakCurrent => self.peak_current,
            Metric::GForceSelf => self.g_force_self,
        }
    }
}

/// Saved builds in insertion order. Owned by the caller; nothing here is global.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigurationStore {
    entries: Vec<SavedConfiguration>,
}

impl ConfigurationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, saved: SavedConfiguration) {
        self.entries.push(saved);
    }

    pub fn entries(&self) -> &[SavedConfiguration] {
        &self.entries
    }

    /// First entry saved under `name`.
    pub fn get(&self, name: &str) -> Option<&SavedConfiguration> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    SpeedKmh,
    TotalMass,
    WeaponEnergyKj,
    PeakCurrent,
    GForceSelf,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::SpeedKmh,
        Metric::TotalMass,
        Metric::WeaponEnergyKj,
        Metric::PeakCurrent,
        Metric::GForceSelf,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Metric::SpeedKmh => "speed_kmh",
            Metric::TotalMass => "total_mass",
            Metric::WeaponEnergyKj => "weapon_energy_kj",
            Metric::PeakCurrent => "peak_current",
            Metric::GForceSelf => "g_force_self",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricDelta {
    pub metric: Metric,
    pub a: f64,
    pub b: f64,
    /// `b - a`
    pub delta: f64,
    /// `delta` relative to `a` in percent, 0 when `a` is 0.
    pub delta_pct: f64,
}

pub fn compare(a: &SavedConfiguration, b: &SavedConfiguration) -> Vec<MetricDelta> {
    Metric::ALL
        .iter()
        .map(|&metric| {
            let (va, vb) = (a.metric(metric), b.metric(metric));
            let delta = vb - va;
            MetricDelta {
                metric,
                a: va,
                b: vb,
                delta,
                delta_pct: if va != 0.0 { delta / va * 100.0 } else { 0.0 },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{evaluate, RunSettings};
    use simcore::Coefficients;

    fn saved(name: &str, config: &RobotConfig) -> SavedConfiguration {
        let settings = RunSettings::default().with_max_time(2.0);
        let eval = evaluate(config, &Coefficients::reference(), &settings).unwrap();
        SavedConfiguration::from_evaluation(name, config, &eval)
    }

    #[test]
    fn test_store_add_get_clear() {
        let mut store = ConfigurationStore::new();
        assert!(store.is_empty());
        store.add(saved("baseline", &RobotConfig::default()));
        let mut geared = RobotConfig::default();
        geared.drive.gear_ratio = 10.0;
        store.add(saved("tall gearing", &geared));

        assert_eq!(store.len(), 2);
        assert_eq!(store.entries()[1].name, "tall gearing");
        assert_eq!(store.get("tall gearing").unwrap().config.drive.gear_ratio, 10.0);
        assert!(store.get("missing").is_none());

        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_compare_deltas() {
        let base = saved("a", &RobotConfig::default());
        let mut geared = RobotConfig::default();
        geared.drive.gear_ratio = 10.0;
        let fast = saved("b", &geared);

        let deltas = compare(&base, &fast);
        assert_eq!(deltas.len(), 5);
        let speed = deltas[0];
        assert_eq!(speed.metric, Metric::SpeedKmh);
        assert!(speed.delta > 0.0);
        // 12.5 -> 10 is exactly 25 % more top speed
        assert!((speed.delta_pct - 25.0).abs() < 1e-9);
        // mass does not depend on gearing
        assert_eq!(deltas[1].delta, 0.0);
    }

    #[test]
    fn test_zero_baseline_gives_zero_percent() {
        let mut a = saved("a", &RobotConfig::default());
        let b = a.clone();
        a.g_force_self = 0.0;
        let g = compare(&a, &b)[4];
        assert_eq!(g.metric, Metric::GForceSelf);
        assert!(g.delta > 0.0);
        assert_eq!(g.delta_pct, 0.0);
    }
}

//! Plain output records handed to whatever renders or stores results.

use serde::{Deserialize, Serialize};

/// Steady-state figures derived directly from a [`crate::RobotConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StaticResult {
    pub nominal_voltage: f64,
    /// No-load top speed (km/h).
    pub speed_kmh: f64,
    /// Rotor moment of inertia (kg·m²).
    pub weapon_inertia: f64,
    /// No-load rotor speed (rpm).
    pub weapon_rpm: f64,
    /// Rotor kinetic energy at `weapon_rpm` (J).
    pub weapon_energy: f64,
    pub armor_mass: f64,
    pub total_mass: f64,
}

/// One row of a simulation trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TracePoint {
    /// Start time of the step (s).
    pub t: f64,
    pub v_kmh: f64,
    /// Total pack current (A).
    pub i_bat: f64,
    /// Sagged terminal voltage produced by this step (V).
    pub u_sag: f64,
    pub t_drive: f64,
    pub t_weapon: f64,
    pub weapon_rpm: f64,
    /// Current through one drive motor (A).
    pub drive_current: f64,
    /// Current through one weapon motor (A).
    pub weapon_current: f64,
}

impl TracePoint {
    fn first_non_finite(&self) -> Option<&'static str> {
        [
            ("v_kmh", self.v_kmh),
            ("i_bat", self.i_bat),
            ("u_sag", self.u_sag),
            ("t_drive", self.t_drive),
            ("t_weapon", self.t_weapon),
            ("weapon_rpm", self.weapon_rpm),
        ]
        .into_iter()
        .find(|(_, v)| !v.is_finite())
        .map(|(name, _)| name)
    }
}

/// Ordered, immutable time series of one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationTrace {
    pub dt: f64,
    pub max_time: f64,
    points: Vec<TracePoint>,
}

impl SimulationTrace {
    pub fn new(dt: f64, max_time: f64, points: Vec<TracePoint>) -> Self {
        SimulationTrace { dt, max_time, points }
    }

    pub fn points(&self) -> &[TracePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&TracePoint> {
        self.points.last()
    }

    pub fn column(&self, f: impl Fn(&TracePoint) -> f64) -> Vec<f64> {
        self.points.iter().map(f).collect()
    }

    /// Index and column name of the first NaN/Inf sample.
    pub fn first_non_finite(&self) -> Option<(usize, &'static str)> {
        self.points
            .iter()
            .enumerate()
            .find_map(|(i, p)| p.first_non_finite().map(|name| (i, name)))
    }

    pub fn csv_header() -> &'static str {
        "t,v_kmh,i_bat,u_sag,t_drive,t_weapon,weapon_rpm,drive_current,weapon_current"
    }

    pub fn csv_rows(&self) -> impl Iterator<Item = String> + '_ {
        self.points.iter().map(|p| {
            format!(
                "{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.2},{:.4},{:.4}",
                p.t,
                p.v_kmh,
                p.i_bat,
                p.u_sag,
                p.t_drive,
                p.t_weapon,
                p.weapon_rpm,
                p.drive_current,
                p.weapon_current
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(t: f64, v_kmh: f64) -> TracePoint {
        TracePoint {
            t,
            v_kmh,
            i_bat: 10.0,
            u_sag: 44.0,
            t_drive: 25.0,
            t_weapon: 25.0,
            weapon_rpm: 0.0,
            drive_current: 5.0,
            weapon_current: 0.0,
        }
    }

    #[test]
    fn test_first_non_finite() {
        let points = vec![point(0.0, 1.0), point(0.1, f64::NAN), point(0.2, 2.0)];
        let trace = SimulationTrace::new(0.1, 0.3, points);
        assert_eq!(trace.first_non_finite(), Some((1, "v_kmh")));

        let clean = SimulationTrace::new(0.1, 0.2, vec![point(0.0, 1.0), point(0.1, 2.0)]);
        assert_eq!(clean.first_non_finite(), None);
    }

    #[test]
    fn test_csv_rows_match_header_width() {
        let trace = SimulationTrace::new(0.1, 0.1, vec![point(0.0, 1.0)]);
        let columns = SimulationTrace::csv_header().split(',').count();
        for row in trace.csv_rows() {
            assert_eq!(row.split(',').count(), columns);
        }
    }
}

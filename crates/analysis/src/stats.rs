//! Reductions of a [`SimulationTrace`] to the handful of numbers a builder
//! looks at: peak current, worst sag, hottest motor, wire size, launch time.

use serde::{Deserialize, Serialize};
use simcore::{KernelError, Result, SimulationTrace, TracePoint};

/// Speed a launch is timed to unless the caller asks for another one (km/h).
pub const DEFAULT_SPEED_THRESHOLD_KMH: f64 = 20.0;

/// Main battery lead size suggested for an RMS current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WireGauge {
    Awg16,
    Awg14,
    Awg12,
    Awg10,
    Awg8,
    Awg6OrBusbar,
}

/// Upper RMS bound (A, exclusive) of each gauge; anything above the last needs 6 AWG.
const WIRE_LADDER: &[(f64, WireGauge)] = &[
    (20.0, WireGauge::Awg16),
    (35.0, WireGauge::Awg14),
    (55.0, WireGauge::Awg12),
    (80.0, WireGauge::Awg10),
    (150.0, WireGauge::Awg8),
];

impl WireGauge {
    pub fn for_rms_current(rms_current: f64) -> Self {
        WIRE_LADDER
            .iter()
            .find(|(limit, _)| rms_current < *limit)
            .map(|(_, gauge)| *gauge)
            .unwrap_or(WireGauge::Awg6OrBusbar)
    }

    pub fn label(&self) -> &'static str {
        match self {
            WireGauge::Awg16 => "16 AWG",
            WireGauge::Awg14 => "14 AWG",
            WireGauge::Awg12 => "12 AWG",
            WireGauge::Awg10 => "10 AWG",
            WireGauge::Awg8 => "8 AWG",
            WireGauge::Awg6OrBusbar => "6 AWG or busbar",
        }
    }
}

/// When the robot first reached the threshold speed, if it did at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TimeToThreshold {
    Reached { seconds: f64 },
    NotReached { horizon: f64 },
}

impl TimeToThreshold {
    pub fn reached(&self) -> Option<f64> {
        match self {
            TimeToThreshold::Reached { seconds } => Some(*seconds),
            TimeToThreshold::NotReached { .. } => None,
        }
    }

    /// Launch time, or the full horizon when the threshold was never reached.
    /// Used wherever a single number has to be ranked.
    pub fn seconds_or_horizon(&self) -> f64 {
        match self {
            TimeToThreshold::Reached { seconds } => *seconds,
            TimeToThreshold::NotReached { horizon } => *horizon,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    /// Highest total pack current (A).
    pub peak_current: f64,
    /// Lowest sagged bus voltage (V).
    pub min_voltage: f64,
    pub temp_drive_max: f64,
    pub temp_weap_max: f64,
    /// RMS of the total pack current (A).
    pub rms_current: f64,
    pub wire_awg: WireGauge,
    pub time_to_threshold: TimeToThreshold,
}

/// [`aggregate_with_threshold`] at 20 km/h.
pub fn aggregate(trace: &SimulationTrace) -> Result<StatsSummary> {
    aggregate_with_threshold(trace, DEFAULT_SPEED_THRESHOLD_KMH)
}

/// An empty trace summarises to zeros and `NotReached`. A trace holding any
/// NaN/Inf sample is refused with [`KernelError::NumericDegeneracy`].
pub fn aggregate_with_threshold(
    trace: &SimulationTrace,
    threshold_kmh: f64,
) -> Result<StatsSummary> {
    let points = trace.points();
    if let Some((step, quantity)) = trace.first_non_finite() {
        return Err(KernelError::NumericDegeneracy {
            step,
            time: points[step].t,
            quantity,
        });
    }
    if points.is_empty() {
        return Ok(StatsSummary {
            peak_current: 0.0,
            min_voltage: 0.0,
            temp_drive_max: 0.0,
            temp_weap_max: 0.0,
            rms_current: 0.0,
            wire_awg: WireGauge::for_rms_current(0.0),
            time_to_threshold: TimeToThreshold::NotReached {
                horizon: trace.max_time,
            },
        });
    }

    let mean_square = points.iter().map(|p| p.i_bat * p.i_bat).sum::<f64>() / points.len() as f64;
    let rms_current = mean_square.sqrt();

    let time_to_threshold = points
        .iter()
        .find(|p| p.v_kmh >= threshold_kmh)
        .map(|p| TimeToThreshold::Reached { seconds: p.t })
        .unwrap_or(TimeToThreshold::NotReached {
            horizon: trace.max_time,
        });

    Ok(StatsSummary {
        peak_current: fold_max(points, |p| p.i_bat),
        min_voltage: points.iter().map(|p| p.u_sag).fold(f64::INFINITY, f64::min),
        temp_drive_max: fold_max(points, |p| p.t_drive),
        temp_weap_max: fold_max(points, |p| p.t_weapon),
        rms_current,
        wire_awg: WireGauge::for_rms_current(rms_current),
        time_to_threshold,
    })
}

fn fold_max(points: &[TracePoint], f: impl Fn(&TracePoint) -> f64) -> f64 {
    points.iter().map(f).fold(f64::NEG_INFINITY, f64::max)
}

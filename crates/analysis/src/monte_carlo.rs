//! Build-tolerance study: how far the headline numbers move when the real
//! parts differ from the datasheet by a few percent.

use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use simcore::error::require_non_negative;
use simcore::{Coefficients, KernelError, Result, RobotConfig};

use crate::pipeline::{evaluate, RunSettings};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonteCarloSettings {
    pub samples: usize,
    pub seed: u64,
    /// Standard deviation of every perturbation, relative to the nominal value.
    pub relative_std: f64,
    pub run: RunSettings,
}

impl Default for MonteCarloSettings {
    fn default() -> Self {
        MonteCarloSettings {
            samples: 200,
            seed: 42,
            relative_std: 0.05,
            run: RunSettings::default(),
        }
    }
}

/// Sample statistics of one output quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distribution1D {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub p5: f64,
    pub p95: f64,
}

impl Distribution1D {
    /// `None` for an empty sample.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }
        let n = samples.len() as f64;
        let mean = samples.iter().sum::<f64>() / n;
        let std_dev = (samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n).sqrt();

        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);

        Some(Distribution1D {
            mean,
            std_dev,
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            p5: percentile(&sorted, 0.05),
            p95: percentile(&sorted, 0.95),
        })
    }
}

/// Linear interpolation between closest ranks; `sorted` must be non-empty.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonteCarloSummary {
    pub samples: usize,
    /// Perturbed configurations that failed validation or degenerated.
    pub rejected: usize,
    pub speed_kmh: Option<Distribution1D>,
    /// Launch time, counting the horizon for runs that never got there (s).
    pub time_to_20: Option<Distribution1D>,
    pub peak_current: Option<Distribution1D>,
    pub temp_drive_max: Option<Distribution1D>,
    pub g_force_self: Option<Distribution1D>,
}

#[derive(Debug, Clone, Copy)]
struct SampleOutcome {
    speed_kmh: f64,
    time_to_20: f64,
    peak_current: f64,
    temp_drive_max: f64,
    g_force_self: f64,
}

/// Scales the toleranced inputs of `base` by `1 + N(0, relative_std)` each.
pub fn perturb<R: rand::Rng + ?Sized>(
    base: &RobotConfig,
    noise: &Normal<f64>,
    rng: &mut R,
) -> RobotConfig {
    let mut factor = || 1.0 + noise.sample(&mut *rng);
    let mut config = *base;
    config.battery.internal_resistance_mohm *= factor();
    config.drive.kv *= factor();
    config.drive.gear_ratio *= factor();
    config.drive.wheel_diameter_mm *= factor();
    config.drive.friction_coeff *= factor();
    config.weapon.rotor_mass_kg *= factor();
    config
}

/// Draws every sample up front from one seeded generator, then evaluates them
/// in parallel, so a seed always reproduces the same summary.
pub fn run_monte_carlo(
    base: &RobotConfig,
    coefficients: &Coefficients,
    settings: &MonteCarloSettings,
) -> Result<MonteCarloSummary> {
    require_non_negative("relative_std", settings.relative_std)?;
    if settings.samples == 0 {
        return Err(KernelError::invalid("samples", "must be >= 1"));
    }
    base.validate()?;
    coefficients.validate()?;
    settings.run.validate()?;

    let noise = Normal::new(0.0, settings.relative_std)
        .map_err(|e| KernelError::invalid("relative_std", e.to_string()))?;
    let mut rng = StdRng::seed_from_u64(settings.seed);
    let configs: Vec<RobotConfig> = (0..settings.samples)
        .map(|_| perturb(base, &noise, &mut rng))
        .collect();

    info!(
        "monte carlo: {} samples, ±{:.1}% (1σ), seed {}",
        settings.samples,
        settings.relative_std * 100.0,
        settings.seed
    );

    let outcomes: Vec<Result<SampleOutcome>> = configs
        .par_iter()
        .map(|config| {
            let eval = evaluate(config, coefficients, &settings.run)?;
            Ok(SampleOutcome {
                speed_kmh: eval.static_result.speed_kmh,
                time_to_20: eval.stats.time_to_threshold.seconds_or_horizon(),
                peak_current: eval.stats.peak_current,
                temp_drive_max: eval.stats.temp_drive_max,
                g_force_self: eval.collision.g_force_self,
            })
        })
        .collect();

    let accepted: Vec<SampleOutcome> =
        outcomes.iter().filter_map(|o| o.as_ref().ok().copied()).collect();
    let rejected = outcomes.len() - accepted.len();
    if rejected > 0 {
        warn!("monte carlo: {rejected} of {} samples rejected", settings.samples);
    }

    let column = |f: fn(&SampleOutcome) -> f64| {
        let values: Vec<f64> = accepted.iter().map(f).collect();
        Distribution1D::from_samples(&values)
    };

    Ok(MonteCarloSummary {
        samples: settings.samples,
        rejected,
        speed_kmh: column(|o| o.speed_kmh),
        time_to_20: column(|o| o.time_to_20),
        peak_current: column(|o| o.peak_current),
        temp_drive_max: column(|o| o.temp_drive_max),
        g_force_self: column(|o| o.g_force_self),
    })
}

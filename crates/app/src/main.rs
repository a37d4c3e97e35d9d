use std::error::Error;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use log::{info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use analysis::scan::linspace;
use analysis::{
    compare, evaluate, evaluate_candidate, find_param, optimal_range, run_monte_carlo,
    run_parameter_scan, Candidate, ConfigurationStore, Constraints, Distribution1D, Evaluation,
    Goals, MonteCarloSettings, RunSettings, SavedConfiguration, SCANNABLE_PARAMS,
};
use mechanics::{impact_g_force, Severity};
use simcore::{catalog, Coefficients, RobotConfig, SimulationTrace};

#[derive(Parser)]
#[command(name = "botcalc", about = "Combat robot performance calculator")]
struct Cli {
    /// Robot configuration JSON; the reference build when omitted
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Coefficient preset (reference, solid_disk)
    #[arg(long, global = true, default_value = "reference")]
    preset: String,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Static figures, launch simulation and rotor hit for one build
    Run {
        /// Time step (s)
        #[arg(long, default_value_t = 0.02)]
        dt: f64,

        /// Simulated time (s)
        #[arg(long, default_value_t = 5.0)]
        max_time: f64,

        /// Drive motor from the catalog, e.g. "TP Power 5670"
        #[arg(long)]
        motor: Option<String>,

        /// Battery cell from the catalog, e.g. "Molicel P42A (21700)"
        #[arg(long)]
        cell: Option<String>,

        /// Write the full trace as CSV
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Print the summary as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Sweep one parameter with the weapon off
    Scan {
        /// One of: gear_ratio, wheel_dia_mm, motor_kv, weapon_mass_kg, armor_thickness, voltage_s
        #[arg(long)]
        param: String,

        #[arg(long)]
        min: Option<f64>,

        #[arg(long)]
        max: Option<f64>,

        #[arg(long, default_value_t = 20)]
        points: usize,

        /// Write the scan table as CSV
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Spread of the results under part tolerances
    MonteCarlo {
        #[arg(long, default_value_t = 200)]
        samples: usize,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Relative standard deviation of each toleranced part
        #[arg(long, default_value_t = 0.05)]
        std: f64,
    },

    /// Score one drive/armor layout against the weight and current limits
    Score {
        #[arg(long)]
        gear_ratio: Option<f64>,

        #[arg(long)]
        wheel_mm: Option<f64>,

        #[arg(long)]
        kv: Option<f64>,

        #[arg(long)]
        rotor_kg: Option<f64>,

        #[arg(long)]
        armor_mm: Option<f64>,

        #[arg(long, default_value_t = 110.0)]
        max_mass: f64,

        #[arg(long, default_value_t = 400.0)]
        max_current: f64,
    },

    /// Side-by-side of two configuration files
    Compare { a: PathBuf, b: PathBuf },

    /// G-force on the robot when it rams a wall
    Ram {
        #[arg(long, default_value_t = 25.0)]
        speed_kmh: f64,

        /// Crumple distance of bumper and wall (mm)
        #[arg(long, default_value_t = 15.0)]
        deformation_mm: f64,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    TermLogger::init(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto)?;

    let config = load_config(cli.config.as_deref())?;
    let coefficients = Coefficients::preset(&cli.preset).ok_or_else(|| {
        format!(
            "unknown coefficient preset '{}', valid: reference, solid_disk",
            cli.preset
        )
    })?;

    match cli.command {
        Commands::Run {
            dt,
            max_time,
            motor,
            cell,
            csv,
            json,
        } => cmd_run(
            config,
            &coefficients,
            dt,
            max_time,
            motor.as_deref(),
            cell.as_deref(),
            csv,
            json,
        ),

        Commands::Scan {
            param,
            min,
            max,
            points,
            output,
        } => cmd_scan(&config, &coefficients, &param, min, max, points, output),

        Commands::MonteCarlo { samples, seed, std } => {
            cmd_monte_carlo(&config, &coefficients, samples, seed, std)
        }

        Commands::Score {
            gear_ratio,
            wheel_mm,
            kv,
            rotor_kg,
            armor_mm,
            max_mass,
            max_current,
        } => {
            let candidate = Candidate {
                gear_ratio: gear_ratio.unwrap_or(config.drive.gear_ratio),
                wheel_diameter_mm: wheel_mm.unwrap_or(config.drive.wheel_diameter_mm),
                drive_kv: kv.unwrap_or(config.drive.kv),
                rotor_mass_kg: rotor_kg.unwrap_or(config.weapon.rotor_mass_kg),
                armor_thickness_mm: armor_mm.unwrap_or(config.armor.thickness_mm),
            };
            let constraints = Constraints {
                max_mass,
                max_current,
            };
            cmd_score(&config, &coefficients, &candidate, &constraints)
        }

        Commands::Compare { a, b } => cmd_compare(&coefficients, &a, &b),

        Commands::Ram {
            speed_kmh,
            deformation_mm,
        } => cmd_ram(&config, &coefficients, speed_kmh, deformation_mm),
    }
}

fn load_config(path: Option<&Path>) -> Result<RobotConfig, Box<dyn Error>> {
    match path {
        Some(path) => {
            let json = std::fs::read_to_string(path)?;
            let config = RobotConfig::from_json_str(&json)?;
            info!("loaded {}", path.display());
            Ok(config)
        }
        None => Ok(RobotConfig::default()),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_run(
    mut config: RobotConfig,
    coefficients: &Coefficients,
    dt: f64,
    max_time: f64,
    motor: Option<&str>,
    cell: Option<&str>,
    csv: Option<PathBuf>,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    if let Some(name) = motor {
        let preset = catalog::motor(name).ok_or_else(|| format!("unknown motor '{name}'"))?;
        preset.apply_to_drive(&mut config.drive);
        info!("drive motor: {} ({} KV)", preset.name, preset.kv);
    }
    if let Some(name) = cell {
        let preset = catalog::cell(name).ok_or_else(|| format!("unknown cell '{name}'"))?;
        preset.apply_to_battery(&mut config.battery);
        info!(
            "cells: {} -> pack {:.1} mΩ",
            preset.name, config.battery.internal_resistance_mohm
        );
    }

    let settings = RunSettings {
        dt,
        max_time,
        ..RunSettings::default()
    };
    let eval = evaluate(&config, coefficients, &settings)?;

    if let Some(path) = csv {
        write_trace_csv(&path, &eval.trace)?;
        println!("Trace written to {}", path.display());
    }

    if json {
        let summary = serde_json::json!({
            "static": eval.static_result,
            "stats": eval.stats,
            "collision": eval.collision,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_evaluation(&eval);
    }
    Ok(())
}

fn write_trace_csv(path: &Path, trace: &SimulationTrace) -> Result<(), Box<dyn Error>> {
    let mut file = File::create(path)?;
    writeln!(file, "{}", SimulationTrace::csv_header())?;
    for row in trace.csv_rows() {
        writeln!(file, "{row}")?;
    }
    Ok(())
}

fn print_evaluation(eval: &Evaluation) {
    let s = &eval.static_result;
    println!("=== Static ===");
    println!("  Bus voltage     {:>8.1} V", s.nominal_voltage);
    println!("  Top speed       {:>8.1} km/h (no load)", s.speed_kmh);
    println!("  Rotor           {:>8.0} rpm, {:.3} kg·m²", s.weapon_rpm, s.weapon_inertia);
    println!("  Rotor energy    {:>8.1} kJ", s.weapon_energy / 1000.0);
    println!("  Armor           {:>8.1} kg", s.armor_mass);
    println!("  Total mass      {:>8.1} kg", s.total_mass);

    let st = &eval.stats;
    println!("\n=== Launch ({} steps) ===", eval.trace.len());
    println!("  Peak current    {:>8.0} A", st.peak_current);
    println!("  Min bus voltage {:>8.1} V", st.min_voltage);
    println!("  Drive motor     {:>8.1} °C", st.temp_drive_max);
    println!("  Weapon motor    {:>8.1} °C", st.temp_weap_max);
    println!("  RMS current     {:>8.0} A -> {}", st.rms_current, st.wire_awg.label());
    match st.time_to_threshold.reached() {
        Some(t) => println!("  Time to 20 km/h {:>8.2} s", t),
        None => println!("  Time to 20 km/h      n/a (not within {:.1} s)", eval.trace.max_time),
    }

    let c = &eval.collision;
    println!("\n=== Hit ===");
    println!("  Impact force    {:>8.1} kN", c.impact_force_kn);
    println!("  Target          {:>8.0} G", c.g_force_target);
    println!("  Self            {:>8.0} G, recoil {:.1} km/h", c.g_force_self, c.recoil_speed_kmh);
    println!("  Comparable to   {}", c.equivalent.label());
}

fn cmd_scan(
    config: &RobotConfig,
    coefficients: &Coefficients,
    param: &str,
    min: Option<f64>,
    max: Option<f64>,
    points: usize,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    let spec = find_param(param).ok_or_else(|| {
        format!(
            "unknown parameter '{}'. Available: {}",
            param,
            SCANNABLE_PARAMS.iter().map(|p| p.name).collect::<Vec<_>>().join(", ")
        )
    })?;
    let range = (min.unwrap_or(spec.min), max.unwrap_or(spec.max));

    let settings = RunSettings::default();
    let rows = run_parameter_scan(config, coefficients, spec.name, range, points, &settings)?;
    let best = optimal_range(&rows);

    println!("\n--- {} ({}) ---", spec.label, spec.unit);
    println!(
        "{:>10} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "value", "km/h", "kg", "kJ", "peak A", "t20 s", "T °C"
    );
    println!("{:-<66}", "");
    for (i, row) in rows.iter().enumerate() {
        let marker = if best.as_ref().map(|b| b.index) == Some(i) { " *" } else { "" };
        match &row.outcome {
            Ok(m) => println!(
                "{:>10.2} {:>8.1} {:>8.1} {:>8.1} {:>8.0} {:>8.2} {:>8.1}{}",
                row.param_value,
                m.speed_kmh,
                m.total_mass,
                m.weapon_energy_kj,
                m.peak_current,
                m.time_to_20,
                m.temp_max,
                marker
            ),
            Err(err) => println!("{:>10.2} rejected: {err}", row.param_value),
        }
    }
    if let Some(best) = &best {
        println!("\nBest balance at {} = {:.2} {}", spec.name, best.value, spec.unit);
    }

    if let Some(path) = output {
        let mut file = File::create(&path)?;
        writeln!(
            file,
            "param_value,speed_kmh,total_mass,weapon_energy_kj,peak_current,time_to_20,temp_max"
        )?;
        for row in &rows {
            if let Ok(m) = &row.outcome {
                writeln!(
                    file,
                    "{:.4},{:.4},{:.4},{:.4},{:.4},{:.4},{:.4}",
                    row.param_value,
                    m.speed_kmh,
                    m.total_mass,
                    m.weapon_energy_kj,
                    m.peak_current,
                    m.time_to_20,
                    m.temp_max
                )?;
            }
        }
        println!("CSV written to {}", path.display());
    }
    Ok(())
}

fn cmd_monte_carlo(
    config: &RobotConfig,
    coefficients: &Coefficients,
    samples: usize,
    seed: u64,
    relative_std: f64,
) -> Result<(), Box<dyn Error>> {
    let settings = MonteCarloSettings {
        samples,
        seed,
        relative_std,
        run: RunSettings::default(),
    };
    let start = std::time::Instant::now();
    let summary = run_monte_carlo(config, coefficients, &settings)?;

    println!(
        "\n=== Monte Carlo: {} samples, {} rejected ({:.1}s) ===",
        summary.samples,
        summary.rejected,
        start.elapsed().as_secs_f64()
    );
    println!(
        "{:>16} {:>9} {:>9} {:>9} {:>9} {:>9} {:>9}",
        "", "mean", "std", "min", "p5", "p95", "max"
    );
    let rows: [(&str, &Option<Distribution1D>); 5] = [
        ("top speed km/h", &summary.speed_kmh),
        ("time to 20 s", &summary.time_to_20),
        ("peak current A", &summary.peak_current),
        ("drive temp °C", &summary.temp_drive_max),
        ("self hit G", &summary.g_force_self),
    ];
    for (label, dist) in rows {
        match dist {
            Some(d) => println!(
                "{:>16} {:>9.2} {:>9.2} {:>9.2} {:>9.2} {:>9.2} {:>9.2}",
                label, d.mean, d.std_dev, d.min, d.p5, d.p95, d.max
            ),
            None => println!("{:>16} no accepted samples", label),
        }
    }
    Ok(())
}

fn cmd_score(
    base: &RobotConfig,
    coefficients: &Coefficients,
    candidate: &Candidate,
    constraints: &Constraints,
) -> Result<(), Box<dyn Error>> {
    match evaluate_candidate(base, coefficients, candidate, &Goals::default(), constraints) {
        Ok(score) => {
            println!("score {:.3}", score.score);
            println!(
                "  {:.1} km/h, {:.1} kg, {:.1} kJ, {:.0} A peak, {:.0} G self",
                score.speed_kmh,
                score.total_mass,
                score.weapon_energy_kj,
                score.peak_current,
                score.g_force_self
            );
        }
        Err(rejection) => println!("rejected: {rejection}"),
    }
    Ok(())
}

fn cmd_compare(coefficients: &Coefficients, a: &Path, b: &Path) -> Result<(), Box<dyn Error>> {
    let settings = RunSettings::default();
    let mut store = ConfigurationStore::new();
    for path in [a, b] {
        let config = load_config(Some(path))?;
        let eval = evaluate(&config, coefficients, &settings)?;
        store.add(SavedConfiguration::from_evaluation(path.display().to_string(), &config, &eval));
    }
    let (first, second) = (&store.entries()[0], &store.entries()[1]);

    println!("A: {}\nB: {}\n", first.name, second.name);
    println!("{:>18} {:>10} {:>10} {:>10} {:>8}", "", "A", "B", "delta", "%");
    for d in compare(first, second) {
        println!(
            "{:>18} {:>10.2} {:>10.2} {:>+10.2} {:>+8.1}",
            d.metric.label(),
            d.a,
            d.b,
            d.delta,
            d.delta_pct
        );
    }
    Ok(())
}

fn cmd_ram(
    config: &RobotConfig,
    coefficients: &Coefficients,
    speed_kmh: f64,
    deformation_mm: f64,
) -> Result<(), Box<dyn Error>> {
    config.validate()?;
    let mass = mechanics::compute_static(config, coefficients).total_mass;
    let impact = impact_g_force(mass, speed_kmh, deformation_mm)
        .ok_or_else(|| format!("deformation must be positive, got {deformation_mm} mm"))?;

    let verdict = match Severity::from_g_force(impact.g_force) {
        Severity::Safe => "safe",
        Severity::Warning => "check electronics mounting",
        Severity::Critical => "shock-mount the electronics",
    };
    println!(
        "{:.1} kg at {:.1} km/h over {:.0} mm: {:.0} G, {:.0} J ({verdict})",
        mass, speed_kmh, deformation_mm, impact.g_force, impact.energy_joules
    );

    // the same check across the launch, in case the robot hits before top speed
    for v in linspace(5.0, speed_kmh, 4) {
        if let Some(hit) = impact_g_force(mass, v, deformation_mm) {
            println!("  {:>5.1} km/h -> {:>5.0} G", v, hit.g_force);
        }
    }
    Ok(())
}

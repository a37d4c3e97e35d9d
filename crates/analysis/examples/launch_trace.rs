use analysis::{evaluate, RunSettings};
use simcore::{Coefficients, RobotConfig, SimulationTrace};
use std::fs::File;
use std::io::Write;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Reference 12S build, weapon spinning up during the launch
    let config = RobotConfig::default();
    let coefficients = Coefficients::reference();

    // 10 ms steps over 6 s
    let settings = RunSettings {
        dt: 1e-2,
        max_time: 6.0,
        ..RunSettings::default()
    };

    let eval = evaluate(&config, &coefficients, &settings)?;

    let mut csv = File::create("launch_trace.csv")?;
    writeln!(csv, "{}", SimulationTrace::csv_header())?;
    for row in eval.trace.csv_rows() {
        writeln!(csv, "{row}")?;
    }

    let stats = eval.stats;
    println!("Wrote launch_trace.csv ({} rows)", eval.trace.len());
    println!(
        "peak {:.0} A, min bus {:.1} V, drive motor {:.1} °C, weapon motor {:.1} °C, leads {}",
        stats.peak_current,
        stats.min_voltage,
        stats.temp_drive_max,
        stats.temp_weap_max,
        stats.wire_awg.label()
    );
    match stats.time_to_threshold.reached() {
        Some(t) => println!("20 km/h after {t:.2} s"),
        None => println!("20 km/h not reached in {:.1} s", settings.max_time),
    }
    Ok(())
}

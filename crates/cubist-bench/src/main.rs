use std::path::{Path, PathBuf};
use std::process;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use cubist_bench::report;
use cubist_bench::runner::BenchmarkRunner;
use cubist_bench::scenes;
use cubist_core::config::WorldConfig;

fn print_usage() {
    eprintln!("Usage: stream-bench [OPTIONS]");
    eprintln!("  --frames <n>                   Frames per scene (default: 240)");
    eprintln!("  --speed <blocks>               Viewpoint travel per frame (default: 2)");
    eprintln!("  --config <path>                Run one scene from a RON world config");
    eprintln!("  --baseline <path>              Load baseline JSON for comparison");
    eprintln!("  --output <path>                Save current results as JSON baseline");
    eprintln!("  --regression-threshold <pct>   Regression threshold percentage (default: 10)");
}

/// Value following `args[i]`, or exit with a usage error.
fn flag_value<T: FromStr>(args: &[String], i: usize) -> T {
    let flag = &args[i];
    let Some(raw) = args.get(i + 1) else {
        eprintln!("Missing value for {flag}");
        process::exit(1);
    };
    match raw.parse() {
        Ok(value) => value,
        Err(_) => {
            eprintln!("Invalid value for {flag}: {raw}");
            process::exit(1);
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();

    let mut baseline_path: Option<PathBuf> = None;
    let mut output_path: Option<PathBuf> = None;
    let mut config_path: Option<PathBuf> = None;
    let mut regression_threshold = 10.0f64;
    let mut frame_count = 240u32;
    let mut speed = 2.0f32;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--baseline" => baseline_path = Some(flag_value(&args, i)),
            "--output" => output_path = Some(flag_value(&args, i)),
            "--config" => config_path = Some(flag_value(&args, i)),
            "--regression-threshold" => regression_threshold = flag_value(&args, i),
            "--frames" => frame_count = flag_value(&args, i),
            "--speed" => speed = flag_value(&args, i),
            "--help" | "-h" => {
                print_usage();
                process::exit(0);
            }
            other => {
                eprintln!("Unknown argument: {}", other);
                print_usage();
                process::exit(1);
            }
        }
        i += 2;
    }

    let scene_configs = match config_path {
        Some(ref path) => match WorldConfig::load(path) {
            Ok(world) => vec![scenes::custom_scene(world)],
            Err(e) => {
                eprintln!("ERROR: {e}");
                process::exit(1);
            }
        },
        None => scenes::standard_scenes(),
    };

    let runner = BenchmarkRunner::new(frame_count, speed);
    let mut results = Vec::new();
    for config in &scene_configs {
        match runner.run_scene(config) {
            Ok(result) => results.push(result),
            Err(e) => {
                eprintln!("ERROR: scene '{}': {e}", config.name);
                process::exit(1);
            }
        }
    }

    println!("\n## Streaming Benchmark Results\n");
    println!("{}", report::format_markdown(&results));

    if let Some(ref path) = output_path {
        save(path, &results);
    }

    if let Some(ref path) = baseline_path {
        if let Some(baseline) = report::load_baseline(path) {
            let regressions = report::compare(&results, &baseline, regression_threshold);
            println!(
                "{}",
                report::format_comparison(&regressions, regression_threshold)
            );
            if !regressions.is_empty() {
                eprintln!(
                    "ERROR: {} regressions detected, exiting with code 1",
                    regressions.len()
                );
                process::exit(1);
            }
        } else {
            log::warn!("Baseline file not found: {}", path.display());
        }
    }

    log::info!("Benchmark complete.");
}

fn save(path: &Path, results: &[cubist_bench::runner::BenchmarkResult]) {
    let baseline = report::Baseline {
        timestamp: unix_timestamp(),
        results: results.to_vec(),
    };
    if let Err(e) = report::save_baseline(path, &baseline) {
        eprintln!("ERROR: failed to save baseline {}: {e}", path.display());
        process::exit(1);
    }
    log::info!("Saved baseline to {}", path.display());
}

fn unix_timestamp() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    format!("unix-{secs}")
}

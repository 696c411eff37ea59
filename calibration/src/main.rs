use anyhow::Context;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use suite::config::SuiteConfig;
use suite::runner::CalibrationSuite;

mod scenario;
mod suite;

#[derive(Parser)]
#[command(author, version, about = "Calibration harness for the SFCW GPR core")]
struct Args {
    /// Test roster: quick runs the first two targets only
    #[arg(long, value_enum, default_value = "full")]
    mode: Mode,
    /// Load a suite config from YAML instead of the built-in roster
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory receiving the JSON calibration report
    #[arg(long, default_value = "reports")]
    report_dir: PathBuf,
    /// Seed for the synthetic noise generator
    #[arg(long, default_value_t = 7)]
    seed: u64,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    Quick,
    Full,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = if let Some(path) = args.config {
        SuiteConfig::load(path)?
    } else {
        SuiteConfig::default()
    };

    let mut suite = CalibrationSuite::new(config, args.seed);
    let report = suite.run(matches!(args.mode, Mode::Quick))?;

    println!(
        "calibration {} -> {}/{} targets passed, mean depth error {:.3} m",
        if report.overall_pass { "PASSED" } else { "FAILED" },
        report.summary_statistics.passed_tests,
        report.summary_statistics.total_tests,
        report.summary_statistics.mean_depth_error
    );

    let path = report
        .save(&args.report_dir)
        .context("writing calibration report")?;
    println!("report written to {}", path.display());

    if !report.overall_pass {
        std::process::exit(1);
    }
    Ok(())
}

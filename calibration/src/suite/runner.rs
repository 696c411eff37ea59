use crate::scenario::synth::{target_response, SAMPLE_RATE};
use crate::scenario::targets::CalibrationTarget;
use crate::suite::config::SuiteConfig;
use anyhow::Context;
use chrono::Utc;
use gprcore::prelude::ProcessingParams;
use gprcore::processing::TraceConditioner;
use gprcore::telemetry::MetricsRecorder;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Half-maximum lead of the synthetic pulse, in samples. The arrival picker
/// triggers on the rising edge; this offset re-centres it on the apex.
const APEX_LEAD_SAMPLES: f64 = 2.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub test_name: String,
    pub target: CalibrationTarget,
    pub measured_depth: f64,
    pub depth_error: f64,
    pub measured_snr: f64,
    pub passed: bool,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub total_tests: usize,
    pub passed_tests: usize,
    pub failed_tests: usize,
    pub pass_rate: f64,
    pub mean_depth_error: f64,
    pub max_depth_error: f64,
    pub mean_snr: f64,
    pub min_snr: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationReport {
    pub timestamp: String,
    pub system_config: SuiteConfig,
    pub test_results: Vec<TestResult>,
    pub overall_pass: bool,
    pub summary_statistics: SummaryStatistics,
}

impl CalibrationReport {
    pub fn save(&self, dir: &Path) -> anyhow::Result<PathBuf> {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating report directory {}", dir.display()))?;
        let path = dir.join(format!(
            "calibration_report_{}.json",
            Utc::now().format("%Y%m%d_%H%M%S")
        ));
        let json = serde_json::to_string_pretty(self).context("serializing report")?;
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }
}

/// Drives the conditioning pipeline with synthetic truth data and scores the
/// detections against each target's tolerance.
pub struct CalibrationSuite {
    config: SuiteConfig,
    rng: StdRng,
    metrics: MetricsRecorder,
}

impl CalibrationSuite {
    pub fn new(config: SuiteConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
            metrics: MetricsRecorder::new(),
        }
    }

    pub fn run(&mut self, quick: bool) -> anyhow::Result<CalibrationReport> {
        let count = if quick {
            self.config.targets.len().min(2)
        } else {
            self.config.targets.len()
        };
        let targets: Vec<CalibrationTarget> = self.config.targets[..count].to_vec();

        let mut results = Vec::with_capacity(targets.len());
        for target in &targets {
            let result = self
                .depth_accuracy_test(target)
                .with_context(|| format!("running depth accuracy test for {}", target.name))?;
            if result.passed {
                self.metrics.record_completed();
            } else {
                self.metrics.record_failure();
            }
            log::info!(
                "{}: measured {:.3} m (error {:+.3} m, {:.1} dB) -> {}",
                target.name,
                result.measured_depth,
                result.depth_error,
                result.measured_snr,
                if result.passed { "pass" } else { "FAIL" }
            );
            results.push(result);
        }

        let snapshot = self.metrics.snapshot();
        log::info!(
            "suite totals: {} completed, {} failed",
            snapshot.completed,
            snapshot.failed
        );

        let summary = summarize(&results);
        Ok(CalibrationReport {
            timestamp: Utc::now().to_rfc3339(),
            system_config: self.config.clone(),
            overall_pass: !results.is_empty() && results.iter().all(|r| r.passed),
            test_results: results,
            summary_statistics: summary,
        })
    }

    fn depth_accuracy_test(&mut self, target: &CalibrationTarget) -> anyhow::Result<TestResult> {
        let trace = target_response(target, self.config.noise_level, &mut self.rng);
        let velocity = target.velocity_m_ns();
        let params = ProcessingParams {
            velocity,
            // See APEX_LEAD_SAMPLES; the conversion divides the legacy
            // offset formula back out.
            time_zero_offset: APEX_LEAD_SAMPLES / (1e-9 * velocity * 3e8),
            filter_low: 10e6,
            filter_high: 300e6,
            snr_threshold: self.config.snr_threshold,
            apply_agc: false,
            agc_window: 50,
            envelope_detection: true,
        };
        let conditioner = TraceConditioner::new(params).context("building conditioner")?;
        let conditioned = conditioner
            .process_trace(&trace, SAMPLE_RATE)
            .context("conditioning synthetic trace")?;

        let nearest = conditioned.targets.iter().min_by(|a, b| {
            (a.depth_m - target.depth)
                .abs()
                .partial_cmp(&(b.depth_m - target.depth).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let result = match nearest {
            Some(detected) => {
                let depth_error = detected.depth_m - target.depth;
                let within_tolerance = depth_error.abs() <= target.tolerance;
                let snr_ok = detected.snr_db >= target.expected_snr - self.config.snr_margin;
                TestResult {
                    test_name: format!("Depth Accuracy - {}", target.name),
                    target: target.clone(),
                    measured_depth: detected.depth_m,
                    depth_error,
                    measured_snr: detected.snr_db,
                    passed: within_tolerance && snr_ok,
                    notes: if within_tolerance {
                        String::new()
                    } else {
                        "depth error exceeds tolerance".into()
                    },
                }
            }
            None => TestResult {
                test_name: format!("Depth Accuracy - {}", target.name),
                target: target.clone(),
                measured_depth: 0.0,
                depth_error: target.depth,
                measured_snr: 0.0,
                passed: false,
                notes: "no targets detected".into(),
            },
        };
        Ok(result)
    }
}

fn summarize(results: &[TestResult]) -> SummaryStatistics {
    let total_tests = results.len();
    let passed_tests = results.iter().filter(|r| r.passed).count();
    let depth_errors: Vec<f64> = results.iter().map(|r| r.depth_error.abs()).collect();
    let snr_values: Vec<f64> = results.iter().map(|r| r.measured_snr).collect();

    SummaryStatistics {
        total_tests,
        passed_tests,
        failed_tests: total_tests - passed_tests,
        pass_rate: if total_tests > 0 {
            passed_tests as f64 / total_tests as f64 * 100.0
        } else {
            0.0
        },
        mean_depth_error: mean(&depth_errors),
        max_depth_error: depth_errors.iter().cloned().fold(0.0, f64::max),
        mean_snr: mean(&snr_values),
        min_snr: snr_values.iter().cloned().fold(f64::INFINITY, f64::min),
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

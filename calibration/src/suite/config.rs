use crate::scenario::targets::{default_targets, CalibrationTarget};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Suite-level settings; any field may be overridden from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteConfig {
    pub targets: Vec<CalibrationTarget>,
    /// Standard deviation of the additive noise.
    pub noise_level: f64,
    /// Local-SNR gate handed to the detection stage.
    pub snr_threshold: f64,
    /// Detected SNR may fall this many dB below the target's spec.
    pub snr_margin: f64,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            targets: default_targets(),
            noise_level: 0.05,
            snr_threshold: 3.0,
            snr_margin: 5.0,
        }
    }
}

impl SuiteConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading suite config {}", path_ref.display()))?;
        let config: SuiteConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing suite config {}", path_ref.display()))?;
        Ok(config)
    }
}

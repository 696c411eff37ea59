//! Minimal persisted schema for captured sweeps.
//!
//! Mirrors the hierarchical store written by the acquisition flowgraph:
//! `processed_data/{a_scans,frequencies}` plus a flat `metadata` group,
//! serialized as JSON. Full survey exchange formats are out of scope.

use crate::prelude::{GprError, GprResult, SweepConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepArchive {
    pub processed_data: ProcessedData,
    pub metadata: ArchiveMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedData {
    /// One row per captured sweep step, one column per range bin.
    pub a_scans: Vec<Vec<f64>>,
    pub frequencies: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArchiveMetadata {
    pub sample_rate: f64,
    pub center_freq: f64,
    pub freq_start: f64,
    pub freq_stop: f64,
    pub num_steps: usize,
    pub dwell_time: f64,
    pub tx_power: f64,
    pub rx_gain: f64,
    pub timestamp: String,
}

impl SweepArchive {
    pub fn from_sweep(
        config: &SweepConfig,
        a_scans: Vec<Vec<f64>>,
        tx_power: f64,
        rx_gain: f64,
        timestamp: String,
    ) -> Self {
        Self {
            processed_data: ProcessedData {
                a_scans,
                frequencies: config.frequencies(),
            },
            metadata: ArchiveMetadata {
                sample_rate: config.sample_rate,
                center_freq: config.center_freq(),
                freq_start: config.freq_start,
                freq_stop: config.freq_stop,
                num_steps: config.num_steps(),
                dwell_time: config.dwell_time,
                tx_power,
                rx_gain,
                timestamp,
            },
        }
    }

    pub fn to_json(&self) -> GprResult<String> {
        serde_json::to_string_pretty(self).map_err(|err| GprError::Archive(err.to_string()))
    }

    pub fn from_json(json: &str) -> GprResult<Self> {
        serde_json::from_str(json).map_err(|err| GprError::Archive(err.to_string()))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> GprResult<()> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|err| GprError::Archive(err.to_string()))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> GprResult<Self> {
        let json = fs::read_to_string(path).map_err(|err| GprError::Archive(err.to_string()))?;
        Self::from_json(&json)
    }
}

use serde::{Deserialize, Serialize};

/// Fixed decimation factor applied after the dechirp low-pass stage.
pub const DECIMATION_FACTOR: usize = 10;

/// Stepped-frequency sweep description.
///
/// Frequencies run linearly from `freq_start` to `freq_stop` in `num_steps`
/// steps; the radio dwells `dwell_time` seconds on each step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    pub freq_start: f64,
    pub freq_stop: f64,
    pub freq_step: f64,
    pub dwell_time: f64,
    pub sample_rate: f64,
    pub bandwidth: f64,
}

impl SweepConfig {
    pub fn num_steps(&self) -> usize {
        ((self.freq_stop - self.freq_start) / self.freq_step).round() as usize + 1
    }

    pub fn dwell_samples(&self) -> usize {
        (self.sample_rate * self.dwell_time).round() as usize
    }

    /// Range bins produced per step after decimation.
    pub fn range_bins(&self) -> usize {
        self.dwell_samples() / DECIMATION_FACTOR
    }

    pub fn center_freq(&self) -> f64 {
        (self.freq_start + self.freq_stop) / 2.0
    }

    /// Step frequencies, strictly increasing from start to stop.
    pub fn frequencies(&self) -> Vec<f64> {
        let steps = self.num_steps();
        if steps == 1 {
            return vec![self.freq_start];
        }
        let spacing = (self.freq_stop - self.freq_start) / (steps - 1) as f64;
        (0..steps)
            .map(|i| self.freq_start + spacing * i as f64)
            .collect()
    }

    pub fn validate(&self) -> GprResult<()> {
        if self.sample_rate <= 0.0 {
            return Err(GprError::InvalidConfig(
                "sample_rate must be positive".into(),
            ));
        }
        if self.dwell_time <= 0.0 {
            return Err(GprError::InvalidConfig("dwell_time must be positive".into()));
        }
        if self.freq_step <= 0.0 {
            return Err(GprError::InvalidConfig("freq_step must be positive".into()));
        }
        if self.freq_stop <= self.freq_start {
            return Err(GprError::InvalidConfig(
                "freq_stop must exceed freq_start".into(),
            ));
        }
        if self.bandwidth <= 0.0 {
            return Err(GprError::InvalidConfig("bandwidth must be positive".into()));
        }
        if self.dwell_samples() < 1 {
            return Err(GprError::InvalidConfig(
                "dwell_time too short for one sample per step".into(),
            ));
        }
        if self.range_bins() < 1 {
            return Err(GprError::InvalidConfig(
                "dwell too short to fill one range bin after decimation".into(),
            ));
        }
        Ok(())
    }
}

impl Default for SweepConfig {
    /// The 450 MHz survey profile: 400-500 MHz in 2 MHz steps, 1 ms dwell.
    fn default() -> Self {
        Self {
            freq_start: 400e6,
            freq_stop: 500e6,
            freq_step: 2e6,
            dwell_time: 1e-3,
            sample_rate: 10e6,
            bandwidth: 10e6,
        }
    }
}

/// Knobs for the trace-conditioning pipeline.
///
/// `velocity` is the two-way propagation speed in m/ns; `time_zero_offset`
/// is in nanoseconds; filter cutoffs are in Hz before Nyquist clamping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingParams {
    pub velocity: f64,
    pub time_zero_offset: f64,
    pub filter_low: f64,
    pub filter_high: f64,
    pub snr_threshold: f64,
    pub apply_agc: bool,
    pub agc_window: usize,
    pub envelope_detection: bool,
}

impl ProcessingParams {
    pub fn validate(&self) -> GprResult<()> {
        if self.velocity <= 0.0 {
            return Err(GprError::InvalidConfig("velocity must be positive".into()));
        }
        if self.agc_window == 0 {
            return Err(GprError::InvalidConfig("agc_window must be positive".into()));
        }
        Ok(())
    }
}

impl Default for ProcessingParams {
    fn default() -> Self {
        Self {
            velocity: 0.1,
            time_zero_offset: 0.0,
            filter_low: 100e6,
            filter_high: 400e6,
            snr_threshold: 10.0,
            apply_agc: true,
            agc_window: 50,
            envelope_detection: true,
        }
    }
}

/// Common error type for the processing core.
#[derive(thiserror::Error, Debug)]
pub enum GprError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("incomplete sweep: {completed} of {expected} steps captured")]
    IncompleteSweep { completed: usize, expected: usize },
    #[error("archive failure: {0}")]
    Archive(String),
}

pub type GprResult<T> = Result<T, GprError>;

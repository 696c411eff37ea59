use crate::math::envelope::hilbert_envelope;
use crate::math::peaks::find_peaks;
use crate::math::stats::StatsHelper;
use crate::prelude::{GprError, GprResult, ProcessingParams};
use crate::processing::filter::BandpassFilter;
use crate::telemetry::log::LogManager;
use ndarray::{Array2, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

/// Subsurface reflector picked out of a conditioned trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub sample_index: usize,
    pub time_ns: f64,
    pub depth_m: f64,
    pub amplitude: f64,
    pub snr_db: f64,
}

/// Result of running a batch through the conditioning chain.
#[derive(Debug, Clone)]
pub struct ConditionedBatch {
    pub traces: Array2<f64>,
    pub time_zero_index: usize,
    pub snr_db: f64,
    pub targets: Vec<Target>,
}

/// Fixed-order conditioning chain: DC removal, bandpass, time-zero
/// alignment, optional envelope, optional AGC, then SNR and detection.
///
/// Everything is batch-shaped; a single trace is the degenerate 1xN batch.
/// Stages act per trace except where one explicitly reduces across the
/// batch (time-zero picking, SNR, detection).
pub struct TraceConditioner {
    params: ProcessingParams,
    logger: LogManager,
}

impl TraceConditioner {
    pub fn new(params: ProcessingParams) -> GprResult<Self> {
        params.validate()?;
        Ok(Self {
            params,
            logger: LogManager::new(),
        })
    }

    pub fn params(&self) -> &ProcessingParams {
        &self.params
    }

    /// Full chain over a batch of traces sharing one sample rate.
    pub fn process(&self, batch: Array2<f64>, sample_rate: f64) -> GprResult<ConditionedBatch> {
        if batch.nrows() == 0 || batch.ncols() == 0 {
            return Err(GprError::InvalidInput("empty trace batch".into()));
        }
        if sample_rate <= 0.0 {
            return Err(GprError::InvalidInput("sample_rate must be positive".into()));
        }

        let mut traces = batch;
        self.remove_dc(&mut traces);
        self.bandpass(&mut traces, sample_rate);
        let time_zero_index = self.time_zero_correction(&mut traces);
        if self.params.envelope_detection {
            self.envelope(&mut traces);
        }
        if self.params.apply_agc {
            self.agc(&mut traces);
        }

        let mean = batch_mean(&traces.view());
        let snr_db = self.global_snr_of(&mean);
        let targets = self.detect_in(&mean, sample_rate);
        self.logger.record(&format!(
            "conditioned {} trace(s): time-zero {}, SNR {:.1} dB, {} target(s)",
            traces.nrows(),
            time_zero_index,
            snr_db,
            targets.len()
        ));

        Ok(ConditionedBatch {
            traces,
            time_zero_index,
            snr_db,
            targets,
        })
    }

    /// Single-trace convenience: the 1xN degenerate batch.
    pub fn process_trace(&self, trace: &[f64], sample_rate: f64) -> GprResult<ConditionedBatch> {
        let batch = Array2::from_shape_vec((1, trace.len()), trace.to_vec())
            .map_err(|err| GprError::InvalidInput(err.to_string()))?;
        self.process(batch, sample_rate)
    }

    /// Subtract the per-trace mean.
    pub fn remove_dc(&self, batch: &mut Array2<f64>) {
        for mut row in batch.rows_mut() {
            let mean = StatsHelper::mean(&row.to_vec());
            row.mapv_inplace(|value| value - mean);
        }
    }

    /// Clamp cutoffs into the open Nyquist interval, then bandpass each
    /// trace causally. A collapsed band self-heals to `low + 0.01`.
    pub fn bandpass(&self, batch: &mut Array2<f64>, sample_rate: f64) {
        let nyquist = sample_rate / 2.0;
        let low = (self.params.filter_low / nyquist).clamp(0.01, 0.99);
        let high = (self.params.filter_high / nyquist).min(0.99).max(low + 0.01);
        let filter = BandpassFilter::butterworth(4, low, high);
        for mut row in batch.rows_mut() {
            let mut data = row.to_vec();
            filter.apply_in_place(&mut data);
            for (slot, value) in row.iter_mut().zip(data) {
                *slot = value;
            }
        }
    }

    /// Locate the direct-wave arrival and shift it to sample zero, muting
    /// the vacated head. Returns the shift applied.
    ///
    /// A single trace is picked on its own envelope; a batch is picked on
    /// the envelope of the across-trace mean of absolute values.
    pub fn time_zero_correction(&self, batch: &mut Array2<f64>) -> usize {
        let cols = batch.ncols();
        if cols == 0 {
            return 0;
        }

        let reference: Vec<f64> = if batch.nrows() == 1 {
            batch.row(0).to_vec()
        } else {
            let rows = batch.nrows() as f64;
            batch
                .map(|value| value.abs())
                .sum_axis(Axis(0))
                .mapv(|value| value / rows)
                .to_vec()
        };
        let envelope = hilbert_envelope(&reference);
        let maximum = envelope.iter().cloned().fold(f64::MIN, f64::max);
        let threshold = 0.5 * maximum;
        let detected = envelope
            .iter()
            .position(|&value| value > threshold)
            .unwrap_or(0);

        // Offset conversion preserved verbatim from the legacy analysis
        // chain; see DESIGN.md before changing it.
        let offset =
            (self.params.time_zero_offset * 1e-9 * self.params.velocity * 3e8).round() as i64;
        let time_zero = (detected as i64 + offset).max(0) as usize;

        for mut row in batch.rows_mut() {
            let mut data = row.to_vec();
            data.rotate_left(time_zero % cols);
            for value in data.iter_mut().take(time_zero.min(cols)) {
                *value = 0.0;
            }
            for (slot, value) in row.iter_mut().zip(data) {
                *slot = value;
            }
        }
        time_zero
    }

    /// Replace each trace with its Hilbert-transform magnitude.
    pub fn envelope(&self, batch: &mut Array2<f64>) {
        for mut row in batch.rows_mut() {
            let env = hilbert_envelope(&row.to_vec());
            for (slot, value) in row.iter_mut().zip(env) {
                *slot = value;
            }
        }
    }

    /// Normalize each trace by its moving RMS, floored against division by
    /// zero.
    pub fn agc(&self, batch: &mut Array2<f64>) {
        let window = self.params.agc_window;
        for mut row in batch.rows_mut() {
            let data = row.to_vec();
            let rms = moving_rms(&data, window);
            for (slot, (value, divisor)) in row.iter_mut().zip(data.iter().zip(rms)) {
                *slot = value / divisor;
            }
        }
    }

    /// Global SNR of the batch-averaged trace: the leading 10% of samples is
    /// treated as noise-only. Zero noise variance reports the 100 dB ceiling.
    pub fn global_snr(&self, batch: &ArrayView2<f64>) -> f64 {
        self.global_snr_of(&batch_mean(batch))
    }

    fn global_snr_of(&self, trace: &[f64]) -> f64 {
        let noise_end = trace.len() / 10;
        let noise_power = StatsHelper::variance(&trace[..noise_end]);
        let signal_power = StatsHelper::variance(&trace[noise_end..]);
        if noise_power > 0.0 {
            10.0 * (signal_power / noise_power).log10()
        } else {
            100.0
        }
    }

    /// Peak-pick the batch-averaged trace into depth-annotated targets.
    pub fn detect_targets(&self, batch: &ArrayView2<f64>, sample_rate: f64) -> Vec<Target> {
        self.detect_in(&batch_mean(batch), sample_rate)
    }

    fn detect_in(&self, trace: &[f64], sample_rate: f64) -> Vec<Target> {
        if trace.is_empty() {
            return Vec::new();
        }
        let maximum = trace.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let min_height = 0.1 * maximum;
        // Minimum separation scales with the configured velocity: half a
        // nanosecond of two-way travel, floored at one sample.
        let min_distance =
            ((sample_rate * 0.5e-9 / self.params.velocity).round() as usize).max(1);

        let mut targets = Vec::new();
        for index in find_peaks(trace, min_height, min_distance) {
            let amplitude = trace[index];
            let time_ns = two_way_time_ns(index, sample_rate);
            let depth_m = self.params.velocity * time_ns / 2.0;

            let window_start = index.saturating_sub(50);
            let window_end = (index + 50).min(trace.len());
            let local_noise = StatsHelper::stddev(&trace[window_start..window_end]);
            let snr_db = if local_noise > 0.0 {
                20.0 * (amplitude / local_noise).log10()
            } else {
                100.0
            };

            if snr_db > self.params.snr_threshold {
                targets.push(Target {
                    sample_index: index,
                    time_ns,
                    depth_m,
                    amplitude,
                    snr_db,
                });
            }
        }
        targets
    }
}

fn batch_mean(batch: &ArrayView2<f64>) -> Vec<f64> {
    batch
        .mean_axis(Axis(0))
        .map(|mean| mean.to_vec())
        .unwrap_or_default()
}

/// Same-length boxcar RMS with a floor against division by zero.
fn moving_rms(trace: &[f64], window: usize) -> Vec<f64> {
    let len = trace.len();
    let squared: Vec<f64> = trace.iter().map(|value| value * value).collect();
    let half = (window - 1) / 2;
    let mut rms = Vec::with_capacity(len);
    for i in 0..len {
        let centre = i + half;
        let lo = centre.saturating_sub(window - 1);
        let hi = centre.min(len - 1);
        let sum: f64 = squared[lo..=hi].iter().sum();
        rms.push((sum / window as f64).sqrt().max(1e-6));
    }
    rms
}

/// Two-way travel time in nanoseconds for a sample index.
pub fn two_way_time_ns(sample_index: usize, sample_rate: f64) -> f64 {
    sample_index as f64 / sample_rate * 1e9
}

/// Depth in metres for a sample index under a propagation velocity in m/ns.
pub fn depth_for_index(sample_index: usize, sample_rate: f64, velocity: f64) -> f64 {
    velocity * two_way_time_ns(sample_index, sample_rate) / 2.0
}

/// Nearest sample index for a reflector at `depth_m`.
pub fn index_for_depth(depth_m: f64, sample_rate: f64, velocity: f64) -> usize {
    let time_ns = 2.0 * depth_m / velocity;
    (time_ns * 1e-9 * sample_rate).round() as usize
}

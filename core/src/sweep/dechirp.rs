use crate::math::fft::{fft_shift, FftHelper};
use crate::math::window::{blackman_harris, hamming};
use crate::prelude::{GprError, GprResult, SweepConfig, DECIMATION_FACTOR};
use crate::telemetry::log::LogManager;
use num_complex::Complex64;
use std::f64::consts::PI;

/// Magnitude spectrum for one completed frequency step.
#[derive(Debug, Clone)]
pub struct RangeProfile {
    pub step_frequency: f64,
    pub bins: Vec<f64>,
}

/// Turns one step's IQ capture into a range-bin magnitude vector.
///
/// The chain follows the capture flowgraph: homodyne mixing against the
/// conjugated step reference, a low-pass to reject mixing images, a second
/// identical low-pass inside the decimator, then a Blackman-Harris windowed
/// spectrum of the decimated dwell.
pub struct DechirpRangeProcessor {
    sample_rate: f64,
    dwell_samples: usize,
    range_bins: usize,
    taps: Vec<f64>,
    window: Vec<f64>,
    fft: FftHelper,
    logger: LogManager,
}

impl DechirpRangeProcessor {
    pub fn new(config: &SweepConfig) -> GprResult<Self> {
        config.validate()?;
        let dwell_samples = config.dwell_samples();
        let range_bins = dwell_samples / DECIMATION_FACTOR;
        let taps = low_pass_taps(
            config.sample_rate,
            config.bandwidth / 2.0,
            config.bandwidth / 10.0,
        );
        Ok(Self {
            sample_rate: config.sample_rate,
            dwell_samples,
            range_bins,
            taps,
            window: blackman_harris(range_bins),
            fft: FftHelper::new(range_bins),
            logger: LogManager::new(),
        })
    }

    pub fn range_bins(&self) -> usize {
        self.range_bins
    }

    pub fn dwell_samples(&self) -> usize {
        self.dwell_samples
    }

    /// Process exactly one dwell worth of received IQ samples.
    pub fn process_step(
        &self,
        step_frequency: f64,
        samples: &[Complex64],
    ) -> GprResult<RangeProfile> {
        if samples.len() != self.dwell_samples {
            return Err(GprError::InvalidInput(format!(
                "expected {} samples per step, got {}",
                self.dwell_samples,
                samples.len()
            )));
        }

        let omega = 2.0 * PI * step_frequency / self.sample_rate;
        let mixed: Vec<Complex64> = samples
            .iter()
            .enumerate()
            .map(|(n, &sample)| {
                let reference = Complex64::from_polar(1.0, omega * n as f64);
                sample * reference.conj()
            })
            .collect();

        let filtered = fir_filter(&mixed, &self.taps, 1);
        let mut block = fir_filter(&filtered, &self.taps, DECIMATION_FACTOR);
        block.truncate(self.range_bins);

        for (value, weight) in block.iter_mut().zip(&self.window) {
            *value *= *weight;
        }
        self.fft.forward(&mut block);
        fft_shift(&mut block);
        let bins: Vec<f64> = block.iter().map(|value| value.norm()).collect();

        self.logger.detail(&format!(
            "step {:.3e} Hz -> {} range bins",
            step_frequency,
            bins.len()
        ));
        Ok(RangeProfile {
            step_frequency,
            bins,
        })
    }
}

/// Causal FIR, optionally decimating: outputs every `decimation`-th sample.
fn fir_filter(input: &[Complex64], taps: &[f64], decimation: usize) -> Vec<Complex64> {
    let mut output = Vec::with_capacity(input.len() / decimation + 1);
    let mut n = 0;
    while n < input.len() {
        let mut acc = Complex64::new(0.0, 0.0);
        for (j, &tap) in taps.iter().enumerate() {
            if j > n {
                break;
            }
            acc += input[n - j] * tap;
        }
        output.push(acc);
        n += decimation;
    }
    output
}

/// Windowed-sinc low-pass design in the flowgraph's style: Hamming-shaped
/// taps, tap count from the transition-width factor, unity DC gain.
fn low_pass_taps(sample_rate: f64, cutoff: f64, transition_width: f64) -> Vec<f64> {
    let mut ntaps = (3.3 * sample_rate / transition_width).ceil() as usize;
    if ntaps % 2 == 0 {
        ntaps += 1;
    }
    let window = hamming(ntaps);
    let middle = (ntaps / 2) as isize;
    let wc = 2.0 * PI * cutoff / sample_rate;
    let mut taps: Vec<f64> = (0..ntaps)
        .map(|i| {
            let m = i as isize - middle;
            let ideal = if m == 0 {
                wc / PI
            } else {
                (wc * m as f64).sin() / (PI * m as f64)
            };
            ideal * window[i]
        })
        .collect();
    let gain: f64 = taps.iter().sum();
    for tap in taps.iter_mut() {
        *tap /= gain;
    }
    taps
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bench_config() -> SweepConfig {
        SweepConfig {
            freq_start: 100e3,
            freq_stop: 104e3,
            freq_step: 1e3,
            dwell_time: 1e-3,
            sample_rate: 1e6,
            bandwidth: 2e5,
        }
    }

    fn tone(frequency: f64, sample_rate: f64, len: usize) -> Vec<Complex64> {
        let omega = 2.0 * PI * frequency / sample_rate;
        (0..len)
            .map(|n| Complex64::from_polar(1.0, omega * n as f64))
            .collect()
    }

    #[test]
    fn zero_beat_lands_in_the_centre_bin() {
        let config = bench_config();
        let processor = DechirpRangeProcessor::new(&config).unwrap();
        let samples = tone(100e3, config.sample_rate, config.dwell_samples());

        let profile = processor.process_step(100e3, &samples).unwrap();
        assert_eq!(profile.bins.len(), processor.range_bins());

        let peak_bin = profile
            .bins
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak_bin, processor.range_bins() / 2);
    }

    #[test]
    fn nonzero_beat_lands_off_centre() {
        let config = bench_config();
        let processor = DechirpRangeProcessor::new(&config).unwrap();
        // Received tone offset from the reference by two decimated bins.
        let decimated_rate = config.sample_rate / DECIMATION_FACTOR as f64;
        let beat = 2.0 * decimated_rate / processor.range_bins() as f64;
        let samples = tone(100e3 + beat, config.sample_rate, config.dwell_samples());

        let profile = processor.process_step(100e3, &samples).unwrap();
        let peak_bin = profile
            .bins
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak_bin, processor.range_bins() / 2 + 2);
    }

    #[test]
    fn short_step_input_is_rejected() {
        let config = bench_config();
        let processor = DechirpRangeProcessor::new(&config).unwrap();
        let samples = tone(100e3, config.sample_rate, 10);
        assert!(matches!(
            processor.process_step(100e3, &samples),
            Err(GprError::InvalidInput(_))
        ));
    }

    #[test]
    fn low_pass_taps_have_unity_dc_gain() {
        let taps = low_pass_taps(1e6, 1e5, 2e4);
        assert_eq!(taps.len() % 2, 1);
        assert!((taps.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }
}

use crate::scenario::targets::CalibrationTarget;
use rand::rngs::StdRng;
use rand::Rng;
use std::f64::consts::PI;

/// Capture rate for the synthetic scope traces.
pub const SAMPLE_RATE: f64 = 1e9;

const TRACE_DURATION: f64 = 200e-9;
const PULSE_WIDTH: f64 = 2e-9;

/// Direct coupling is the strongest arrival on a real record head.
const DIRECT_WAVE_GAIN: f64 = 1.5;

/// Synthetic A-scan for a calibration target: direct coupling at time zero
/// plus a Gaussian echo at the two-way travel time, in additive noise.
///
/// The echo amplitude comes straight from the target's SNR spec.
pub fn target_response(
    target: &CalibrationTarget,
    noise_level: f64,
    rng: &mut StdRng,
) -> Vec<f64> {
    let n_samples = (SAMPLE_RATE * TRACE_DURATION) as usize;
    let travel_time = target.two_way_travel_time();
    let amplitude = 10f64.powf(target.expected_snr / 20.0);

    (0..n_samples)
        .map(|i| {
            let t = i as f64 / SAMPLE_RATE;
            let direct = DIRECT_WAVE_GAIN * amplitude * (-(t / PULSE_WIDTH).powi(2)).exp();
            let echo = amplitude * (-((t - travel_time) / PULSE_WIDTH).powi(2)).exp();
            direct + echo + gaussian(rng) * noise_level
        })
        .collect()
}

/// Box-Muller draw from the unit normal.
fn gaussian(rng: &mut StdRng) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::targets::default_targets;
    use rand::SeedableRng;

    #[test]
    fn echo_sits_at_the_two_way_travel_time() {
        let target = &default_targets()[1];
        let mut rng = StdRng::seed_from_u64(3);
        let trace = target_response(target, 0.0, &mut rng);

        assert_eq!(trace.len(), 200);
        let echo_index = (target.two_way_travel_time() * SAMPLE_RATE).round() as usize;
        assert_eq!(echo_index, 20);
        // A local maximum at the echo position, clearly above the tail.
        assert!(trace[echo_index] > trace[echo_index + 4]);
        assert!(trace[echo_index] > trace[echo_index - 4]);
        assert!(trace[echo_index] > 0.9 * 10f64.powf(target.expected_snr / 20.0));
    }

    #[test]
    fn direct_wave_dominates_the_record_head() {
        let target = &default_targets()[2];
        let mut rng = StdRng::seed_from_u64(3);
        let trace = target_response(target, 0.0, &mut rng);
        let peak = trace.iter().cloned().fold(f64::MIN, f64::max);
        assert_eq!(peak, trace[0]);
    }

    #[test]
    fn seeded_noise_is_reproducible() {
        let target = &default_targets()[0];
        let a = target_response(target, 0.1, &mut StdRng::seed_from_u64(11));
        let b = target_response(target, 0.1, &mut StdRng::seed_from_u64(11));
        assert_eq!(a, b);
    }
}

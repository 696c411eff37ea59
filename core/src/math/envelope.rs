use crate::math::fft::FftHelper;
use num_complex::Complex64;

/// Instantaneous amplitude via the analytic signal (Hilbert transform).
///
/// Negative frequencies are zeroed, positive frequencies doubled; DC and the
/// Nyquist bin (even lengths) are left untouched.
pub fn hilbert_envelope(signal: &[f64]) -> Vec<f64> {
    let len = signal.len();
    if len == 0 {
        return Vec::new();
    }
    if len == 1 {
        return vec![signal[0].abs()];
    }

    let helper = FftHelper::new(len);
    let mut spectrum: Vec<Complex64> = signal
        .iter()
        .map(|&value| Complex64::new(value, 0.0))
        .collect();
    helper.forward(&mut spectrum);

    let positive_end = if len % 2 == 0 { len / 2 } else { (len + 1) / 2 };
    for bin in spectrum[1..positive_end].iter_mut() {
        *bin *= 2.0;
    }
    let negative_start = if len % 2 == 0 { len / 2 + 1 } else { positive_end };
    for bin in spectrum[negative_start..].iter_mut() {
        *bin = Complex64::new(0.0, 0.0);
    }

    helper.inverse(&mut spectrum);
    spectrum.iter().map(|value| value.norm()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn sine_envelope_is_flat() {
        let signal: Vec<f64> = (0..64)
            .map(|n| (2.0 * PI * 8.0 * n as f64 / 64.0).sin())
            .collect();
        for value in hilbert_envelope(&signal) {
            assert!((value - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn envelope_tracks_amplitude_scaling() {
        let signal: Vec<f64> = (0..63)
            .map(|n| 2.5 * (2.0 * PI * 7.0 * n as f64 / 63.0).cos())
            .collect();
        let envelope = hilbert_envelope(&signal);
        let peak = envelope.iter().cloned().fold(f64::MIN, f64::max);
        assert!((peak - 2.5).abs() < 1e-6);
    }

    #[test]
    fn empty_signal_yields_empty_envelope() {
        assert!(hilbert_envelope(&[]).is_empty());
    }
}

use std::f64::consts::PI;

/// 4-term Blackman-Harris window (symmetric).
pub fn blackman_harris(len: usize) -> Vec<f64> {
    const A0: f64 = 0.35875;
    const A1: f64 = 0.48829;
    const A2: f64 = 0.14128;
    const A3: f64 = 0.01168;

    if len <= 1 {
        return vec![1.0; len];
    }
    let denom = (len - 1) as f64;
    (0..len)
        .map(|i| {
            let x = 2.0 * PI * i as f64 / denom;
            A0 - A1 * x.cos() + A2 * (2.0 * x).cos() - A3 * (3.0 * x).cos()
        })
        .collect()
}

/// Hamming window (symmetric), used for FIR tap shaping.
pub fn hamming(len: usize) -> Vec<f64> {
    if len <= 1 {
        return vec![1.0; len];
    }
    let denom = (len - 1) as f64;
    (0..len)
        .map(|i| 0.54 - 0.46 * (2.0 * PI * i as f64 / denom).cos())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blackman_harris_peaks_at_centre() {
        let window = blackman_harris(65);
        assert!((window[32] - 1.0).abs() < 1e-12);
        assert!(window[0] < 1e-4);
        assert!(window[64] < 1e-4);
    }

    #[test]
    fn hamming_has_standard_edge_level() {
        let window = hamming(33);
        assert!((window[0] - 0.08).abs() < 1e-12);
        assert!((window[16] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_lengths_are_unity() {
        assert_eq!(blackman_harris(1), vec![1.0]);
        assert!(hamming(0).is_empty());
    }
}

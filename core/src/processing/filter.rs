use num_complex::Complex64;
use std::f64::consts::PI;

/// One normalized second-order section.
#[derive(Debug, Clone, Copy)]
struct Biquad {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
}

impl Biquad {
    /// Direct form II transposed, zero initial state.
    fn run(&self, samples: &mut [f64]) {
        let mut z1 = 0.0;
        let mut z2 = 0.0;
        for value in samples.iter_mut() {
            let x = *value;
            let y = self.b0 * x + z1;
            z1 = self.b1 * x - self.a1 * y + z2;
            z2 = self.b2 * x - self.a2 * y;
            *value = y;
        }
    }
}

/// Butterworth bandpass realised as cascaded biquads.
///
/// Designed digitally: analog prototype poles, lowpass-to-bandpass transform
/// at the pre-warped band edges, bilinear mapping, unity gain at the
/// geometric band centre. Both band edges carry transmission zeros, so DC
/// and Nyquist are rejected exactly.
#[derive(Debug, Clone)]
pub struct BandpassFilter {
    sections: Vec<Biquad>,
}

impl BandpassFilter {
    /// Design an `order`-pole-pair bandpass; `low`/`high` are fractions of
    /// Nyquist in (0, 1).
    pub fn butterworth(order: usize, low: f64, high: f64) -> Self {
        let w1 = (PI * low / 2.0).tan();
        let w2 = (PI * high / 2.0).tan();
        let bandwidth = w2 - w1;
        let centre_sq = w1 * w2;

        let one = Complex64::new(1.0, 0.0);
        let mut poles = Vec::with_capacity(2 * order);
        for k in 0..order {
            let theta = PI * (2 * k + order + 1) as f64 / (2 * order) as f64;
            let prototype = Complex64::from_polar(1.0, theta);
            let half = 0.5 * bandwidth * prototype;
            let discriminant = (half * half - centre_sq).sqrt();
            for s in [half + discriminant, half - discriminant] {
                poles.push((one + s) / (one - s));
            }
        }

        // Unity gain at the geometric centre of the passband.
        let omega0 = 2.0 * centre_sq.sqrt().atan();
        let z = Complex64::from_polar(1.0, omega0);
        let mut response = one;
        for _ in 0..order {
            response *= (z - one) * (z + one);
        }
        for &pole in &poles {
            response /= z - pole;
        }
        let section_gain = response.norm().recip().powf(1.0 / order as f64);

        Self {
            sections: pair_sections(poles, section_gain),
        }
    }

    /// Causal per-trace application with zero initial conditions.
    pub fn apply_in_place(&self, trace: &mut [f64]) {
        for section in &self.sections {
            section.run(trace);
        }
    }

    pub fn apply(&self, trace: &[f64]) -> Vec<f64> {
        let mut out = trace.to_vec();
        self.apply_in_place(&mut out);
        out
    }
}

/// Group conjugate pole pairs into biquads; numerators carry one zero at DC
/// and one at Nyquist each.
fn pair_sections(mut poles: Vec<Complex64>, gain: f64) -> Vec<Biquad> {
    const IM_TOL: f64 = 1e-10;
    let mut sections = Vec::with_capacity(poles.len() / 2);
    let mut reals: Vec<f64> = Vec::new();

    while let Some(pole) = poles.pop() {
        if pole.im.abs() > IM_TOL {
            if let Some(partner) = nearest(&poles, pole.conj()) {
                poles.swap_remove(partner);
            }
            sections.push(Biquad {
                b0: gain,
                b1: 0.0,
                b2: -gain,
                a1: -2.0 * pole.re,
                a2: pole.norm_sqr(),
            });
        } else {
            reals.push(pole.re);
        }
    }
    for pair in reals.chunks(2) {
        if let [r1, r2] = *pair {
            sections.push(Biquad {
                b0: gain,
                b1: 0.0,
                b2: -gain,
                a1: -(r1 + r2),
                a2: r1 * r2,
            });
        }
    }
    sections
}

fn nearest(pool: &[Complex64], target: Complex64) -> Option<usize> {
    pool.iter()
        .enumerate()
        .min_by(|a, b| {
            (a.1 - target)
                .norm()
                .partial_cmp(&(b.1 - target).norm())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steady_amplitude(output: &[f64]) -> f64 {
        output[output.len() - 500..]
            .iter()
            .fold(0.0f64, |acc, &v| acc.max(v.abs()))
    }

    #[test]
    fn passband_tone_is_preserved() {
        let filter = BandpassFilter::butterworth(4, 0.2, 0.5);
        // Tone at the geometric centre of the pre-warped band.
        let w1 = (PI * 0.2 / 2.0).tan();
        let w2 = (PI * 0.5 / 2.0).tan();
        let omega0 = 2.0 * (w1 * w2).sqrt().atan();
        let input: Vec<f64> = (0..4000).map(|n| (omega0 * n as f64).sin()).collect();
        let output = filter.apply(&input);
        assert!((steady_amplitude(&output) - 1.0).abs() < 0.02);
    }

    #[test]
    fn dc_is_rejected_exactly() {
        let filter = BandpassFilter::butterworth(4, 0.2, 0.5);
        let output = filter.apply(&vec![1.0; 4000]);
        assert!(steady_amplitude(&output) < 1e-6);
    }

    #[test]
    fn nyquist_is_rejected() {
        let filter = BandpassFilter::butterworth(4, 0.2, 0.5);
        let input: Vec<f64> = (0..4000).map(|n| if n % 2 == 0 { 1.0 } else { -1.0 }).collect();
        let output = filter.apply(&input);
        assert!(steady_amplitude(&output) < 1e-6);
    }

    #[test]
    fn out_of_band_tone_is_attenuated() {
        let filter = BandpassFilter::butterworth(4, 0.2, 0.5);
        let omega = PI * 0.05;
        let input: Vec<f64> = (0..4000).map(|n| (omega * n as f64).sin()).collect();
        let output = filter.apply(&input);
        assert!(steady_amplitude(&output) < 0.05);
    }

    #[test]
    fn cascade_has_expected_section_count() {
        let filter = BandpassFilter::butterworth(4, 0.1, 0.4);
        assert_eq!(filter.sections.len(), 4);
    }
}

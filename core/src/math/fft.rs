use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

/// Helper that wraps the `rustfft` planner for reuse.
pub struct FftHelper {
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
    size: usize,
}

impl FftHelper {
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(size);
        let inverse = planner.plan_fft_inverse(size);
        Self {
            forward,
            inverse,
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn forward(&self, buffer: &mut [Complex64]) {
        self.forward.process(buffer);
    }

    /// Inverse transform scaled by 1/N so forward-then-inverse round-trips.
    pub fn inverse(&self, buffer: &mut [Complex64]) {
        self.inverse.process(buffer);
        let scale = 1.0 / self.size as f64;
        for value in buffer.iter_mut() {
            *value *= scale;
        }
    }
}

/// Rotate a spectrum so the zero-frequency bin sits at the centre.
pub fn fft_shift<T: Copy>(bins: &mut [T]) {
    let half = bins.len() / 2;
    bins.rotate_right(half);
}

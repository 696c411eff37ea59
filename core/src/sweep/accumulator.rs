use crate::prelude::{GprError, GprResult};
use crate::sweep::dechirp::RangeProfile;
use ndarray::Array2;

/// Collects per-step range profiles until a sweep is complete.
///
/// Interrupted sweeps never yield short or padded rows: `finish` reports the
/// shortfall and `completed_matrix` exposes only whole steps.
pub struct SweepAccumulator {
    expected_steps: usize,
    profiles: Vec<RangeProfile>,
}

impl SweepAccumulator {
    pub fn new(expected_steps: usize) -> Self {
        Self {
            expected_steps,
            profiles: Vec::with_capacity(expected_steps),
        }
    }

    pub fn push(&mut self, profile: RangeProfile) -> GprResult<()> {
        if self.profiles.len() >= self.expected_steps {
            return Err(GprError::InvalidInput(format!(
                "sweep already holds {} steps",
                self.expected_steps
            )));
        }
        if let Some(first) = self.profiles.first() {
            if first.bins.len() != profile.bins.len() {
                return Err(GprError::InvalidInput(format!(
                    "range profile has {} bins, sweep started with {}",
                    profile.bins.len(),
                    first.bins.len()
                )));
            }
        }
        self.profiles.push(profile);
        Ok(())
    }

    pub fn completed_steps(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_complete(&self) -> bool {
        self.profiles.len() == self.expected_steps
    }

    /// Step frequencies captured so far, in sweep order.
    pub fn frequencies(&self) -> Vec<f64> {
        self.profiles
            .iter()
            .map(|profile| profile.step_frequency)
            .collect()
    }

    /// Matrix of completed steps only, one row per step.
    pub fn completed_matrix(&self) -> Array2<f64> {
        let rows = self.profiles.len();
        let cols = self.profiles.first().map_or(0, |p| p.bins.len());
        let flat: Vec<f64> = self
            .profiles
            .iter()
            .flat_map(|profile| profile.bins.iter().copied())
            .collect();
        Array2::from_shape_vec((rows, cols), flat).expect("profiles share a bin count")
    }

    /// Concatenate one profile per step into the raw A-scan row.
    pub fn finish(self) -> GprResult<Vec<f64>> {
        if !self.is_complete() {
            return Err(GprError::IncompleteSweep {
                completed: self.profiles.len(),
                expected: self.expected_steps,
            });
        }
        Ok(self
            .profiles
            .into_iter()
            .flat_map(|profile| profile.bins)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(frequency: f64, bins: Vec<f64>) -> RangeProfile {
        RangeProfile {
            step_frequency: frequency,
            bins,
        }
    }

    #[test]
    fn complete_sweep_concatenates_in_step_order() {
        let mut accumulator = SweepAccumulator::new(3);
        for step in 0..3 {
            let base = step as f64 * 10.0;
            accumulator
                .push(profile(100.0 + step as f64, vec![base, base + 1.0]))
                .unwrap();
        }
        assert!(accumulator.is_complete());
        assert_eq!(accumulator.frequencies(), vec![100.0, 101.0, 102.0]);
        assert_eq!(
            accumulator.finish().unwrap(),
            vec![0.0, 1.0, 10.0, 11.0, 20.0, 21.0]
        );
    }

    #[test]
    fn interrupted_sweep_surfaces_the_shortfall() {
        let mut accumulator = SweepAccumulator::new(5);
        accumulator.push(profile(100.0, vec![1.0, 2.0])).unwrap();
        accumulator.push(profile(101.0, vec![3.0, 4.0])).unwrap();

        let matrix = accumulator.completed_matrix();
        assert_eq!(matrix.dim(), (2, 2));

        match accumulator.finish() {
            Err(GprError::IncompleteSweep {
                completed,
                expected,
            }) => {
                assert_eq!(completed, 2);
                assert_eq!(expected, 5);
            }
            other => panic!("expected IncompleteSweep, got {other:?}"),
        }
    }

    #[test]
    fn mismatched_bin_counts_are_rejected() {
        let mut accumulator = SweepAccumulator::new(2);
        accumulator.push(profile(100.0, vec![1.0, 2.0])).unwrap();
        assert!(accumulator.push(profile(101.0, vec![1.0])).is_err());
    }

    #[test]
    fn overfilling_a_sweep_is_rejected() {
        let mut accumulator = SweepAccumulator::new(1);
        accumulator.push(profile(100.0, vec![1.0])).unwrap();
        assert!(accumulator.push(profile(101.0, vec![2.0])).is_err());
    }
}

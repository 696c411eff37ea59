use crate::prelude::{GprError, GprResult};
use ndarray::Array2;

/// Post-decimation rate assumed when scaling the depth axis.
///
/// The decimated rate actually used upstream is not threaded through to
/// assembly; the axis is scaled for the nominal 1 MSPS output of the capture
/// chain. See DESIGN.md.
pub const ASSUMED_DECIMATED_RATE: f64 = 1e6;

/// Stacked radargram with survey-line and depth axes.
#[derive(Debug, Clone)]
pub struct BScan {
    pub image: Array2<f64>,
    pub distance_axis: Vec<f64>,
    pub depth_axis: Vec<f64>,
}

/// Stacks conditioned traces into a radargram. No smoothing is applied
/// across the trace axis.
pub struct BScanAssembler {
    velocity: f64,
    trace_spacing: f64,
}

impl BScanAssembler {
    /// `velocity` in m/ns, `trace_spacing` in metres between survey points.
    pub fn new(velocity: f64, trace_spacing: f64) -> GprResult<Self> {
        if velocity <= 0.0 || trace_spacing <= 0.0 {
            return Err(GprError::InvalidConfig(
                "velocity and trace_spacing must be positive".into(),
            ));
        }
        Ok(Self {
            velocity,
            trace_spacing,
        })
    }

    /// Stack a matrix whose rows are already-conditioned traces.
    pub fn assemble(&self, image: Array2<f64>) -> GprResult<BScan> {
        let (n_traces, n_samples) = image.dim();
        if n_traces == 0 || n_samples == 0 {
            return Err(GprError::InvalidInput("no traces to stack".into()));
        }

        let distance_axis = (0..n_traces)
            .map(|i| i as f64 * self.trace_spacing)
            .collect();
        let depth_axis = (0..n_samples)
            .map(|j| {
                let time_ns = j as f64 / ASSUMED_DECIMATED_RATE * 1e9;
                self.velocity * time_ns / 2.0
            })
            .collect();

        Ok(BScan {
            image,
            distance_axis,
            depth_axis,
        })
    }

    /// Convenience over a slice of equal-length traces.
    pub fn assemble_traces(&self, traces: &[Vec<f64>]) -> GprResult<BScan> {
        let n_traces = traces.len();
        let n_samples = traces.first().map_or(0, |t| t.len());
        if traces.iter().any(|trace| trace.len() != n_samples) {
            return Err(GprError::InvalidInput(
                "traces must share a sample count".into(),
            ));
        }
        let flat: Vec<f64> = traces.iter().flatten().copied().collect();
        let image = Array2::from_shape_vec((n_traces, n_samples), flat)
            .map_err(|err| GprError::InvalidInput(err.to_string()))?;
        self.assemble(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_axis_steps_by_trace_spacing() {
        let assembler = BScanAssembler::new(0.1, 0.1).unwrap();
        let traces = vec![vec![0.0; 8]; 5];
        let bscan = assembler.assemble_traces(&traces).unwrap();

        assert_eq!(bscan.distance_axis.len(), 5);
        for (i, expected) in [0.0, 0.1, 0.2, 0.3, 0.4].iter().enumerate() {
            assert!((bscan.distance_axis[i] - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn depth_axis_follows_the_assumed_decimated_rate() {
        let assembler = BScanAssembler::new(0.1, 0.5).unwrap();
        let traces = vec![vec![0.0; 4]; 2];
        let bscan = assembler.assemble_traces(&traces).unwrap();

        // One sample at 1 MSPS is 1000 ns of two-way time: 50 m per bin at
        // 0.1 m/ns.
        for (j, depth) in bscan.depth_axis.iter().enumerate() {
            assert!((depth - 50.0 * j as f64).abs() < 1e-9);
        }
    }

    #[test]
    fn image_shape_matches_input() {
        let assembler = BScanAssembler::new(0.1, 0.25).unwrap();
        let image = Array2::from_shape_vec((3, 6), (0..18).map(f64::from).collect()).unwrap();
        let bscan = assembler.assemble(image).unwrap();
        assert_eq!(bscan.image.dim(), (3, 6));
        assert_eq!(bscan.depth_axis.len(), 6);
    }

    #[test]
    fn empty_and_ragged_inputs_are_rejected() {
        let assembler = BScanAssembler::new(0.1, 0.1).unwrap();
        assert!(assembler.assemble_traces(&[]).is_err());
        assert!(assembler
            .assemble_traces(&[vec![0.0; 4], vec![0.0; 3]])
            .is_err());
    }

    #[test]
    fn non_physical_geometry_is_rejected() {
        assert!(BScanAssembler::new(0.0, 0.1).is_err());
        assert!(BScanAssembler::new(0.1, -1.0).is_err());
    }
}

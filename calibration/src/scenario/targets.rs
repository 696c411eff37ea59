use serde::{Deserialize, Serialize};

/// Reference reflector buried at a known depth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationTarget {
    pub name: String,
    /// Burial depth in metres.
    pub depth: f64,
    pub material: String,
    pub dielectric_constant: f64,
    /// Echo strength specification in dB; also sets the injected amplitude.
    pub expected_snr: f64,
    /// Acceptable absolute depth error in metres.
    pub tolerance: f64,
}

impl CalibrationTarget {
    /// Propagation velocity in m/ns for the host material.
    pub fn velocity_m_ns(&self) -> f64 {
        3e8 / self.dielectric_constant.sqrt() / 1e9
    }

    /// Two-way travel time to the reflector in seconds.
    pub fn two_way_travel_time(&self) -> f64 {
        2.0 * self.depth / (self.velocity_m_ns() * 1e9)
    }
}

/// Standard roster: shallow plate, mid-range rebar, deep pipe.
pub fn default_targets() -> Vec<CalibrationTarget> {
    vec![
        CalibrationTarget {
            name: "Shallow Target".into(),
            depth: 0.6,
            material: "Metal plate in sand".into(),
            dielectric_constant: 4.0,
            expected_snr: 10.0,
            tolerance: 0.1,
        },
        CalibrationTarget {
            name: "Mid-Range Target".into(),
            depth: 1.0,
            material: "Reinforcing bar in soil".into(),
            dielectric_constant: 9.0,
            expected_snr: 10.0,
            tolerance: 0.1,
        },
        CalibrationTarget {
            name: "Deep Target".into(),
            depth: 2.0,
            material: "Pipe in clay".into(),
            dielectric_constant: 16.0,
            expected_snr: 8.0,
            tolerance: 0.2,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn velocity_follows_the_dielectric_constant() {
        let targets = default_targets();
        assert!((targets[0].velocity_m_ns() - 0.15).abs() < 1e-12);
        assert!((targets[1].velocity_m_ns() - 0.1).abs() < 1e-12);
        assert!((targets[2].velocity_m_ns() - 0.075).abs() < 1e-12);
    }

    #[test]
    fn travel_time_is_two_way() {
        let target = &default_targets()[1];
        // 1 m at 0.1 m/ns: 20 ns there and back.
        assert!((target.two_way_travel_time() - 20e-9).abs() < 1e-15);
    }
}

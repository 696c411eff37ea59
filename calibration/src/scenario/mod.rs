pub mod synth;
pub mod targets;

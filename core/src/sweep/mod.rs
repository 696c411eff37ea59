pub mod accumulator;
pub mod dechirp;
pub mod sequencer;

pub use accumulator::SweepAccumulator;
pub use dechirp::{DechirpRangeProcessor, RangeProfile};
pub use sequencer::{FrequencyStepSequencer, StepState};

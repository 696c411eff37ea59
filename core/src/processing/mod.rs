pub mod bscan;
pub mod filter;
pub mod pipeline;

pub use bscan::{BScan, BScanAssembler};
pub use filter::BandpassFilter;
pub use pipeline::{ConditionedBatch, Target, TraceConditioner};

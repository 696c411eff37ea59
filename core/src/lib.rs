//! Signal-processing core for the stepped-frequency GPR platform.
//!
//! The modules mirror the capture-to-radargram chain: `sweep` turns stepped
//! IQ captures into range profiles, `processing` conditions traces and stacks
//! radargrams, `archive` carries the persisted sweep schema.

pub mod archive;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod sweep;
pub mod telemetry;

pub use prelude::{GprError, GprResult, ProcessingParams, SweepConfig};

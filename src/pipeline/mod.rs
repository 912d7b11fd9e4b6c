//! Pipeline configuration and execution.

pub mod config;
pub mod runner;

pub use config::{CompiledConfig, PairingConfig};
pub use runner::{DataSetOutcome, Pipeline, PipelineOutput};
